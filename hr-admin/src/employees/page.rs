//! EmployeesPage - the roster screen
//!
//! Wires the collection controller, the form dialog, the deletion prompt
//! and exports together. Every failure ends in a notification and the
//! screen stays usable.

use super::controller::{EmployeeCollectionController, ListState, QueryIntent, QueryState};
use super::deletion::{DeletionConfirmation, DeletionOutcome};
use super::form::{EmployeeForm, SubmitOutcome};
use crate::core::{Notifier, guard};
use crate::export::{self, ExportError, ExportFormat, ExportOptions};
use chrono::{NaiveDate, NaiveDateTime};
use hr_client::{EmployeeRepository, SessionStore};
use shared::error::ErrorCode;
use shared::models::{Employee, EmployeeStats, Page};
use std::path::PathBuf;
use std::sync::Arc;

pub const CREATED: &str = "Empleado creado correctamente";
pub const UPDATED: &str = "Empleado actualizado correctamente";
pub const DELETED: &str = "Empleado eliminado correctamente";

pub struct EmployeesPage {
    repo: Arc<dyn EmployeeRepository>,
    session: SessionStore,
    notifier: Notifier,
    controller: EmployeeCollectionController,
    form: Option<EmployeeForm>,
    deletion: DeletionConfirmation,
    export_dir: PathBuf,
}

impl EmployeesPage {
    pub fn new(
        repo: Arc<dyn EmployeeRepository>,
        session: SessionStore,
        notifier: Notifier,
        page_size: u32,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        let controller = EmployeeCollectionController::new(repo.clone(), notifier.clone(), page_size);
        Self {
            repo,
            session,
            notifier,
            controller,
            form: None,
            deletion: DeletionConfirmation::new(),
            export_dir: export_dir.into(),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn controller(&self) -> &EmployeeCollectionController {
        &self.controller
    }

    // ========== Listing ==========

    pub async fn mount(&self) -> ListState {
        self.controller.dispatch(QueryIntent::Mount).await
    }

    pub async fn search(&self, text: impl Into<String>) -> ListState {
        self.controller.dispatch(QueryIntent::Search(text.into())).await
    }

    pub async fn set_active_only(&self, active_only: bool) -> ListState {
        self.controller
            .dispatch(QueryIntent::SetActiveOnly(active_only))
            .await
    }

    pub async fn go_to_page(&self, page: u32) -> ListState {
        self.controller.dispatch(QueryIntent::GoToPage(page)).await
    }

    pub async fn set_page_size(&self, size: u32) -> ListState {
        self.controller.dispatch(QueryIntent::SetPageSize(size)).await
    }

    /// Jump straight to a query (page is zero-based), one fetch
    pub async fn load(
        &self,
        search: Option<String>,
        active_only: bool,
        page: u32,
        size: Option<u32>,
    ) -> ListState {
        let mut intents = Vec::with_capacity(4);
        if let Some(size) = size {
            intents.push(QueryIntent::SetPageSize(size));
        }
        intents.push(QueryIntent::Search(search.unwrap_or_default()));
        intents.push(QueryIntent::SetActiveOnly(active_only));
        intents.push(QueryIntent::GoToPage(page));
        self.controller.dispatch_all(&intents).await
    }

    pub async fn refresh(&self) -> ListState {
        self.controller.dispatch(QueryIntent::Refresh).await
    }

    pub fn state(&self) -> ListState {
        self.controller.state()
    }

    pub fn query(&self) -> QueryState {
        self.controller.query()
    }

    pub fn current_page(&self) -> Option<Page<Employee>> {
        self.controller.current_page()
    }

    pub fn stats(&self) -> Option<EmployeeStats> {
        self.current_page().as_ref().map(EmployeeStats::from)
    }

    // ========== Permissions ==========

    pub fn can_create(&self) -> bool {
        guard::can_edit(&self.session.snapshot())
    }

    pub fn can_edit(&self) -> bool {
        guard::can_edit(&self.session.snapshot())
    }

    pub fn can_delete(&self) -> bool {
        guard::can_edit(&self.session.snapshot())
    }

    fn deny(&self) {
        self.notifier.error(ErrorCode::PermissionDenied.message());
    }

    // ========== Form dialog ==========

    pub fn open_create(&mut self, today: NaiveDate) -> Option<&mut EmployeeForm> {
        if !self.can_create() {
            self.deny();
            return None;
        }
        self.form = Some(EmployeeForm::create(today));
        self.form.as_mut()
    }

    pub fn open_edit(&mut self, employee: &Employee) -> Option<&mut EmployeeForm> {
        if !self.can_edit() {
            self.deny();
            return None;
        }
        self.form = Some(EmployeeForm::edit(employee));
        self.form.as_mut()
    }

    pub fn form(&self) -> Option<&EmployeeForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut EmployeeForm> {
        self.form.as_mut()
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Submit the open dialog
    ///
    /// The dialog closes only once the record is saved; validation and
    /// save failures leave it open with the input intact.
    pub async fn submit_form(&mut self, today: NaiveDate) -> Option<SubmitOutcome> {
        let form = self.form.as_mut()?;
        let editing = form.is_edit();
        let outcome = form.submit(self.repo.as_ref(), today).await;

        match &outcome {
            SubmitOutcome::Invalid(errors) => {
                tracing::debug!(fields = errors.len(), "Form has validation errors");
            }
            SubmitOutcome::Failed { message } => self.notifier.error(message.clone()),
            SubmitOutcome::SessionExpired => {
                tracing::debug!("Save dropped after session expiry");
            }
            SubmitOutcome::Saved(_) | SubmitOutcome::SavedWithWarning { .. } => {
                self.form = None;
                match &outcome {
                    SubmitOutcome::SavedWithWarning { warning, .. } => {
                        self.notifier.info(warning.clone())
                    }
                    _ => self.notifier.success(if editing { UPDATED } else { CREATED }),
                }
                self.refresh().await;
            }
        }
        Some(outcome)
    }

    // ========== Deletion ==========

    /// Open the confirmation prompt; returns its text
    pub fn request_delete(&mut self, employee: Employee) -> Option<String> {
        if !self.can_delete() {
            self.deny();
            return None;
        }
        self.deletion.request(employee);
        self.deletion.prompt()
    }

    pub fn pending_delete(&self) -> Option<&Employee> {
        self.deletion.pending()
    }

    pub fn cancel_delete(&mut self) {
        self.deletion.cancel();
    }

    pub async fn confirm_delete(&mut self) -> DeletionOutcome {
        let outcome = self.deletion.confirm(self.repo.as_ref()).await;
        match &outcome {
            DeletionOutcome::Deleted(_) => {
                self.notifier.success(DELETED);
                self.refresh().await;
            }
            DeletionOutcome::Failed { message, .. } => self.notifier.error(message.clone()),
            DeletionOutcome::SessionExpired(_) | DeletionOutcome::NothingPending => {}
        }
        outcome
    }

    // ========== Detail and documents ==========

    pub async fn view(&self, id: i64) -> Option<Employee> {
        match self.repo.get(id).await {
            Ok(employee) => Some(employee),
            Err(e) => {
                tracing::warn!(id, error = %e, "Employee fetch failed");
                if !e.is_session_expired() {
                    self.notifier.error(e.user_message());
                }
                None
            }
        }
    }

    /// Save the generated ficha into the export dir; failures only notify
    pub async fn download_ficha(&self, id: i64) -> Option<PathBuf> {
        let document = match self.repo.fetch_generated_document(id).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(id, error = %e, "Ficha download failed");
                if !e.is_session_expired() {
                    self.notifier.error(e.user_message());
                }
                return None;
            }
        };
        let path = self.export_dir.join(&document.file_name);
        let written = std::fs::create_dir_all(&self.export_dir)
            .and_then(|_| std::fs::write(&path, &document.bytes));
        match written {
            Ok(()) => {
                self.notifier.success(format!("Ficha guardada en {}", path.display()));
                Some(path)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ficha save failed");
                self.notifier.error(ErrorCode::StorageError.message());
                None
            }
        }
    }

    // ========== Export ==========

    /// Export the rows on screen; nothing is written when there are none
    pub fn export(&self, format: ExportFormat, now: NaiveDateTime) -> Result<PathBuf, ExportError> {
        let rows = self.current_page().map(|p| p.content).unwrap_or_default();
        let options = ExportOptions::default().with_filter_summary(self.query().describe_filters());

        let saved = export::export(&rows, format, &options, now)
            .and_then(|artifact| export::save(&artifact, &self.export_dir));
        match &saved {
            Ok(path) => self.notifier.success(format!(
                "Exportados {} empleados de esta página a {}",
                rows.len(),
                path.display()
            )),
            Err(e) => {
                tracing::warn!(?format, error = %e, "Export failed");
                self.notifier.error(e.user_message());
            }
        }
        saved
    }
}
