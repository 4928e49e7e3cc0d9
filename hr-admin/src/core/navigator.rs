//! Navigator - current screen and the session-expiry listener

use super::guard::{self, Access};
use hr_client::{Session, SessionEvent};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Dashboard,
    Employees,
    Unauthorized,
}

impl Screen {
    pub fn path(&self) -> &'static str {
        match self {
            Screen::Login => "/login",
            Screen::Dashboard => "/",
            Screen::Employees => "/empleados",
            Screen::Unauthorized => "/unauthorized",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Iniciar sesión",
            Screen::Dashboard => "Dashboard GV-RH",
            Screen::Employees => "Empleados",
            Screen::Unauthorized => "No autorizado",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Screen::Login | Screen::Unauthorized)
    }

    /// Any one of these grants access; empty means "logged in"
    pub fn required_roles(&self) -> &'static [&'static str] {
        &[]
    }
}

struct NavState {
    tx: watch::Sender<Screen>,
    history: Mutex<Vec<Screen>>,
}

#[derive(Clone)]
pub struct Navigator {
    state: Arc<NavState>,
}

impl Navigator {
    pub fn new(initial: Screen) -> Self {
        let (tx, _) = watch::channel(initial);
        Self {
            state: Arc::new(NavState {
                tx,
                history: Mutex::new(vec![initial]),
            }),
        }
    }

    pub fn current(&self) -> Screen {
        *self.state.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Screen> {
        self.state.tx.subscribe()
    }

    /// Every screen entered, in order
    pub fn history(&self) -> Vec<Screen> {
        self.state
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, screen: Screen) {
        self.state
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(screen);
        self.state.tx.send_replace(screen);
        tracing::debug!(path = screen.path(), "navigate");
    }

    /// Navigate through the route guard; returns where we actually landed
    pub fn navigate(&self, target: Screen, session: &Session) -> Screen {
        let landed = if target.is_public() {
            target
        } else {
            match guard::check(session, target.required_roles()) {
                Access::Granted => target,
                Access::RedirectToLogin => Screen::Login,
                Access::Forbidden => Screen::Unauthorized,
            }
        };
        if landed != self.current() {
            self.set(landed);
        }
        landed
    }

    /// Go to login unless already there; true if we moved
    pub fn on_session_expired(&self) -> bool {
        if self.current() == Screen::Login {
            return false;
        }
        tracing::info!(from = self.current().path(), "Session expired, redirecting to login");
        self.set(Screen::Login);
        true
    }

    /// Consume session events until the channel closes
    pub fn listen(&self, mut events: broadcast::Receiver<SessionEvent>) -> JoinHandle<()> {
        let nav = self.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::Expired) => {
                        nav.on_session_expired();
                    }
                    Ok(SessionEvent::LoggedOut) => {
                        if nav.current() != Screen::Login {
                            nav.set(Screen::Login);
                        }
                    }
                    Ok(SessionEvent::LoggedIn { username }) => {
                        tracing::debug!(%username, "login observed");
                        if nav.current() == Screen::Login {
                            nav.set(Screen::Dashboard);
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Navigator lagged behind session events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_navigation() {
        let nav = Navigator::new(Screen::Login);
        assert_eq!(nav.navigate(Screen::Employees, &Session::anonymous()), Screen::Login);

        let session = Session::authenticated("t", None, "rh", ["RH"]);
        assert_eq!(nav.navigate(Screen::Employees, &session), Screen::Employees);
        assert_eq!(nav.current(), Screen::Employees);
        assert_eq!(nav.history(), vec![Screen::Login, Screen::Employees]);
    }

    #[test]
    fn test_expiry_redirects_once() {
        let nav = Navigator::new(Screen::Employees);
        assert!(nav.on_session_expired());
        assert!(!nav.on_session_expired());
        assert_eq!(nav.history(), vec![Screen::Employees, Screen::Login]);
    }

    #[tokio::test]
    async fn test_listener_follows_events() {
        let nav = Navigator::new(Screen::Employees);
        let (tx, rx) = broadcast::channel(8);
        let handle = nav.listen(rx);
        let mut screens = nav.subscribe();

        tx.send(SessionEvent::Expired).unwrap();
        screens.changed().await.unwrap();
        assert_eq!(*screens.borrow_and_update(), Screen::Login);

        tx.send(SessionEvent::LoggedIn { username: "rh".into() }).unwrap();
        screens.changed().await.unwrap();
        assert_eq!(*screens.borrow_and_update(), Screen::Dashboard);

        drop(tx);
        handle.await.unwrap();
    }
}
