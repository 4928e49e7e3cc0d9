use chrono::NaiveDate;
use shared::models::{Employee, HrAttributes};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A request as seen by the mock, recorded before routing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MockUser {
    pub username: String,
    pub password: String,
    pub roles: Vec<String>,
}

impl MockUser {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == "ADMIN" || r == "RH")
    }
}

/// Stored photo: (content type, bytes)
pub type StoredPhoto = (String, Vec<u8>);

/// In-memory backend state
#[derive(Debug, Default)]
pub struct MockState {
    users: Vec<MockUser>,
    employees: Mutex<Vec<Employee>>,
    sessions: Mutex<HashMap<String, MockUser>>,
    photos: Mutex<HashMap<i64, StoredPhoto>>,
    requests: Mutex<Vec<RecordedRequest>>,
    next_id: AtomicU64,
    token_seq: AtomicU64,
    list_delay_ms: AtomicU64,
    reject_delay_ms: AtomicU64,
    fail_photo_upload: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockState {
    pub fn new() -> Self {
        Self {
            users: vec![
                MockUser {
                    username: "admin".into(),
                    password: "admin123".into(),
                    roles: vec!["ADMIN".into()],
                },
                MockUser {
                    username: "consulta".into(),
                    password: "consulta123".into(),
                    roles: vec!["CONSULTA".into()],
                },
            ],
            next_id: AtomicU64::new(1),
            ..Default::default()
        }
    }

    /// State pre-filled with `count` employees; every third one is inactive
    pub fn with_demo_employees(count: usize) -> Self {
        let state = Self::new();
        let surnames = ["Garcia", "Hernandez", "Lopez", "Martinez", "Perez"];
        for i in 0..count {
            let id = state.next_id();
            let ingreso = NaiveDate::from_ymd_opt(2018, 1, 1)
                .and_then(|d| d.checked_add_days(chrono::Days::new(i as u64 * 17)))
                .unwrap_or_default();
            state.insert(Employee {
                id,
                num_empleado: format!("{:04}", id),
                nombres: format!("Empleado {}", id),
                apellido_paterno: surnames[i % surnames.len()].to_string(),
                apellido_materno: (i % 2 == 0).then(|| "Ruiz".to_string()),
                telefono: Some(format!("55{:08}", id)),
                email: Some(format!("empleado{}@gv.mx", id)),
                fecha_ingreso: ingreso,
                activo: i % 3 != 2,
                foto_url: None,
                hr: HrAttributes::default(),
            });
        }
        state
    }

    pub fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) as i64
    }

    pub fn find_user(&self, username: &str, password: &str) -> Option<MockUser> {
        self.users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .cloned()
    }

    pub fn issue_token(&self, user: &MockUser) -> String {
        let seq = self.token_seq.fetch_add(1, Ordering::SeqCst);
        let token = format!("tok-{}-{}", seq, user.username);
        lock(&self.sessions).insert(token.clone(), user.clone());
        token
    }

    pub fn user_for_token(&self, token: &str) -> Option<MockUser> {
        lock(&self.sessions).get(token).cloned()
    }

    /// Invalidate every issued token; next authenticated call gets 401
    pub fn revoke_all_tokens(&self) {
        lock(&self.sessions).clear();
    }

    pub fn insert(&self, employee: Employee) {
        lock(&self.employees).push(employee);
    }

    pub fn employees(&self) -> Vec<Employee> {
        lock(&self.employees).clone()
    }

    pub fn with_employees<R>(&self, f: impl FnOnce(&mut Vec<Employee>) -> R) -> R {
        f(&mut lock(&self.employees))
    }

    pub fn store_photo(&self, id: i64, content_type: String, bytes: Vec<u8>) {
        lock(&self.photos).insert(id, (content_type, bytes));
    }

    pub fn photo(&self, id: i64) -> Option<StoredPhoto> {
        lock(&self.photos).get(&id).cloned()
    }

    pub fn record(&self, request: RecordedRequest) {
        lock(&self.requests).push(request);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Requests whose path matches exactly
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        lock(&self.requests)
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn set_list_delay(&self, delay: Duration) {
        self.list_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn list_delay(&self) -> Duration {
        Duration::from_millis(self.list_delay_ms.load(Ordering::SeqCst))
    }

    /// Hold 401 responses back, so a client can replace its token meanwhile
    pub fn set_reject_delay(&self, delay: Duration) {
        self.reject_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn reject_delay(&self) -> Duration {
        Duration::from_millis(self.reject_delay_ms.load(Ordering::SeqCst))
    }

    pub fn set_fail_photo_upload(&self, fail: bool) {
        self.fail_photo_upload.store(fail, Ordering::SeqCst);
    }

    pub fn fail_photo_upload(&self) -> bool {
        self.fail_photo_upload.load(Ordering::SeqCst)
    }
}
