//! AppContext - wiring for one process
//!
//! config -> SessionStore -> ApiGateway -> repository, plus the notifier
//! and a navigator listening to the gateway's session events. Everything
//! is passed down explicitly from here.

use crate::config::AppConfig;
use crate::core::{Navigator, Notifier, Screen};
use crate::employees::EmployeesPage;
use hr_client::{
    ApiGateway, ClientResult, EmployeeRepository, HttpEmployeeRepository, Session, SessionStorage,
    SessionStore,
};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct AppContext {
    pub config: AppConfig,
    pub session: SessionStore,
    pub gateway: ApiGateway,
    pub repo: Arc<dyn EmployeeRepository>,
    pub notifier: Notifier,
    pub navigator: Navigator,
    listener: JoinHandle<()>,
}

impl AppContext {
    /// Build the context; must run inside a tokio runtime
    pub fn new(config: AppConfig) -> ClientResult<Self> {
        let session = SessionStore::open(SessionStorage::new(config.data_dir.clone()));
        let gateway = ApiGateway::new(&config.client_config(), session.clone())?;
        let repo: Arc<dyn EmployeeRepository> = Arc::new(HttpEmployeeRepository::new(gateway.clone()));

        let start = if session.is_authenticated() {
            Screen::Dashboard
        } else {
            Screen::Login
        };
        let navigator = Navigator::new(start);
        let listener = navigator.listen(gateway.subscribe());

        tracing::debug!(api = %gateway.base_url(), data_dir = %config.data_dir.display(), "App context ready");
        Ok(Self {
            notifier: Notifier::new(config.notify_duration()),
            config,
            session,
            gateway,
            repo,
            navigator,
            listener,
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Session> {
        let session = self.session.login(&self.gateway, username, password).await?;
        self.navigator.navigate(Screen::Dashboard, &session);
        Ok(session)
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.session.logout()?;
        self.navigator.navigate(Screen::Login, &Session::anonymous());
        Ok(())
    }

    /// Navigate through the route guard
    pub fn enter(&self, screen: Screen) -> Screen {
        self.navigator.navigate(screen, &self.session.snapshot())
    }

    pub fn employees_page(&self) -> EmployeesPage {
        EmployeesPage::new(
            self.repo.clone(),
            self.session.clone(),
            self.notifier.clone(),
            self.config.page_size,
            self.config.export_dir.clone(),
        )
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
