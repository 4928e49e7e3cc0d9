//! Deletion Confirmation
//!
//! Two-phase guard in front of the destructive call: `request` only stores
//! the candidate, `confirm` performs the removal, `cancel` drops it.

use hr_client::EmployeeRepository;
use shared::models::Employee;

#[derive(Debug, Clone, PartialEq)]
pub enum DeletionOutcome {
    Deleted(Employee),
    /// The prompt is closed; the caller reports and carries on
    Failed { employee: Employee, message: String },
    /// The backend rejected the token; the navigator already redirects
    SessionExpired(Employee),
    NothingPending,
}

#[derive(Debug, Default)]
pub struct DeletionConfirmation {
    pending: Option<Employee>,
}

impl DeletionConfirmation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the prompt for `employee`, replacing any previous candidate
    pub fn request(&mut self, employee: Employee) {
        tracing::debug!(id = employee.id, "Deletion requested");
        self.pending = Some(employee);
    }

    pub fn pending(&self) -> Option<&Employee> {
        self.pending.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn prompt(&self) -> Option<String> {
        self.pending.as_ref().map(|e| {
            format!(
                "¿Seguro que quieres eliminar al empleado:\n{}",
                e.display_label()
            )
        })
    }

    pub fn cancel(&mut self) -> Option<Employee> {
        self.pending.take()
    }

    /// Remove the pending employee; the prompt closes either way
    pub async fn confirm(&mut self, repo: &dyn EmployeeRepository) -> DeletionOutcome {
        let Some(employee) = self.pending.take() else {
            return DeletionOutcome::NothingPending;
        };
        match repo.remove(employee.id).await {
            Ok(()) => DeletionOutcome::Deleted(employee),
            Err(e) if e.is_session_expired() => DeletionOutcome::SessionExpired(employee),
            Err(e) => {
                tracing::warn!(id = employee.id, error = %e, "Employee removal failed");
                DeletionOutcome::Failed {
                    message: e.user_message(),
                    employee,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use hr_client::{ClientError, ClientResult, Document, ListQuery, Photo};
    use http::StatusCode;
    use shared::models::{EmployeeCreate, EmployeeUpdate, Page};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRepo {
        removed: Mutex<Vec<i64>>,
        expired: bool,
    }

    #[async_trait]
    impl EmployeeRepository for RecordingRepo {
        async fn list(&self, _: &ListQuery) -> ClientResult<Page<Employee>> {
            unreachable!()
        }
        async fn get(&self, _: i64) -> ClientResult<Employee> {
            unreachable!()
        }
        async fn create(&self, _: &EmployeeCreate) -> ClientResult<Employee> {
            unreachable!()
        }
        async fn update(&self, _: i64, _: &EmployeeUpdate) -> ClientResult<Employee> {
            unreachable!()
        }
        async fn remove(&self, id: i64) -> ClientResult<()> {
            if self.expired {
                return Err(ClientError::SessionExpired);
            }
            let mut removed = self.removed.lock().unwrap();
            if removed.contains(&id) {
                return Err(ClientError::Server {
                    status: StatusCode::NOT_FOUND,
                    message: Some(format!("Empleado {} no encontrado", id)),
                });
            }
            removed.push(id);
            Ok(())
        }
        async fn fetch_generated_document(&self, _: i64) -> ClientResult<Document> {
            unreachable!()
        }
        async fn upload_photo(&self, _: i64, _: Photo) -> ClientResult<()> {
            unreachable!()
        }
    }

    fn employee(id: i64) -> Employee {
        Employee {
            id,
            num_empleado: "0007".into(),
            nombres: "Luis".into(),
            apellido_paterno: "Pérez".into(),
            apellido_materno: None,
            telefono: None,
            email: None,
            fecha_ingreso: NaiveDate::from_ymd_opt(2020, 5, 4).unwrap(),
            activo: true,
            foto_url: None,
            hr: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_request_then_cancel_makes_no_call() {
        let repo = RecordingRepo::default();
        let mut dialog = DeletionConfirmation::new();
        dialog.request(employee(7));
        assert_eq!(
            dialog.prompt().as_deref(),
            Some("¿Seguro que quieres eliminar al empleado:\n0007 - Luis Pérez")
        );
        assert_eq!(dialog.cancel().map(|e| e.id), Some(7));
        assert_eq!(dialog.confirm(&repo).await, DeletionOutcome::NothingPending);
        assert!(repo.removed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_twice_reports_failure() {
        let repo = RecordingRepo::default();
        let mut dialog = DeletionConfirmation::new();

        dialog.request(employee(7));
        assert!(matches!(dialog.confirm(&repo).await, DeletionOutcome::Deleted(e) if e.id == 7));
        assert!(!dialog.is_open());

        dialog.request(employee(7));
        match dialog.confirm(&repo).await {
            DeletionOutcome::Failed { employee, message } => {
                assert_eq!(employee.id, 7);
                assert_eq!(message, "Empleado 7 no encontrado");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!dialog.is_open());
    }

    #[tokio::test]
    async fn test_expired_session_is_not_a_failure() {
        let repo = RecordingRepo {
            expired: true,
            ..Default::default()
        };
        let mut dialog = DeletionConfirmation::new();
        dialog.request(employee(7));
        assert!(matches!(
            dialog.confirm(&repo).await,
            DeletionOutcome::SessionExpired(e) if e.id == 7
        ));
        assert!(!dialog.is_open());
    }
}
