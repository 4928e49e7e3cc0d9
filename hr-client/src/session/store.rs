//! SessionStore - current authentication state
//!
//! One explicit, cloneable handle owns the in-memory session and its
//! persisted copy. Consumers receive it by parameter; there is no global.
//!
//! Every mutation writes both copies. Reads for request signing only touch
//! memory, so they are synchronous.

use super::storage::{PersistedSession, SessionStorage};
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use shared::client::LoginResponse;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

/// Authentication lifecycle notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { username: String },
    LoggedOut,
    /// A 401 cleared a live session; the UI should go to the login screen
    Expired,
}

/// Issues tokens for a username/password pair
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> ClientResult<LoginResponse>;
}

/// Snapshot of the authentication state
///
/// Invariant: authenticated iff a token is present, and roles are empty
/// whenever unauthenticated. Only the constructors build values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    refresh_token: Option<String>,
    username: Option<String>,
    roles: BTreeSet<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(
        token: impl Into<String>,
        refresh_token: Option<String>,
        username: impl Into<String>,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            token: Some(token.into()),
            refresh_token,
            username: Some(username.into()),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Rebuild from disk; any missing required field yields anonymous
    fn from_persisted(persisted: PersistedSession) -> Self {
        match persisted {
            PersistedSession {
                access_token: Some(token),
                refresh_token,
                username: Some(username),
                roles: Some(roles),
            } if !token.is_empty() && !username.is_empty() => {
                Self::authenticated(token, refresh_token, username, roles)
            }
            _ => Self::anonymous(),
        }
    }

    fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            access_token: self.token.clone(),
            refresh_token: self.refresh_token.clone(),
            username: self.username.clone(),
            roles: Some(self.roles.iter().cloned().collect()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// True iff authenticated and holding at least one of `required`
    pub fn has_role<I, S>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.is_authenticated() || self.roles.is_empty() {
            return false;
        }
        required.into_iter().any(|r| self.roles.contains(r.as_ref()))
    }
}

struct Inner {
    session: RwLock<Session>,
    storage: SessionStorage,
    events: broadcast::Sender<SessionEvent>,
}

/// Shared handle to the session
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .field("storage", &self.inner.storage.path())
            .finish()
    }
}

impl SessionStore {
    /// Open the store, rehydrating from `storage` when the file is complete
    pub fn open(storage: SessionStorage) -> Self {
        let session = storage
            .load()
            .map(Session::from_persisted)
            .unwrap_or_default();

        if session.is_authenticated() {
            tracing::info!(username = ?session.username(), "Session restored from disk");
        } else {
            tracing::debug!(path = %storage.path().display(), "No usable persisted session");
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                session: RwLock::new(session),
                storage,
                events,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.inner.events.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Backend-issued login
    ///
    /// Any failure (bad credentials, network, malformed response) comes back
    /// as [`ClientError::Authentication`]; the cause is only logged.
    pub async fn login(
        &self,
        authenticator: &dyn Authenticator,
        username: &str,
        password: &str,
    ) -> ClientResult<Session> {
        let response = match authenticator.authenticate(username, password).await {
            Ok(resp) if !resp.access_token.is_empty() => resp,
            Ok(_) => {
                tracing::warn!(username = %username, "Login response without access token");
                return Err(ClientError::Authentication);
            }
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Login failed");
                return Err(ClientError::Authentication);
            }
        };

        self.set_session(
            response.access_token,
            response.refresh_token,
            response.username,
            response.roles,
        )?;
        Ok(self.snapshot())
    }

    /// Install a session the caller already holds
    ///
    /// Disk is written first; on failure memory keeps the previous session.
    /// A blank token is rejected with [`ClientError::Authentication`].
    pub fn set_session(
        &self,
        token: impl Into<String>,
        refresh_token: Option<String>,
        username: impl Into<String>,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> ClientResult<()> {
        let token = token.into();
        if token.trim().is_empty() {
            tracing::warn!("Refusing to install a session without access token");
            return Err(ClientError::Authentication);
        }
        let session = Session::authenticated(token, refresh_token, username, roles);
        self.inner.storage.save(&session.to_persisted())?;

        let username = session.username().unwrap_or_default().to_string();
        *self.write() = session;

        tracing::info!(username = %username, "Session established");
        self.emit(SessionEvent::LoggedIn { username });
        Ok(())
    }

    /// Clear memory and disk; safe to call when already logged out
    ///
    /// Memory is always cleared, even if removing the file fails.
    pub fn logout(&self) -> ClientResult<()> {
        let was_authenticated = {
            let mut guard = self.write();
            let was = guard.is_authenticated();
            *guard = Session::anonymous();
            was
        };
        self.inner.storage.clear()?;

        if was_authenticated {
            tracing::info!("Session cleared by logout");
            self.emit(SessionEvent::LoggedOut);
        }
        Ok(())
    }

    /// Clear the session after the backend rejected `rejected_token`
    ///
    /// Nothing happens unless that token is still the current one, so a late
    /// 401 for a replaced token leaves the newer session alone. Returns
    /// whether a live session was cleared; only that caller emits
    /// [`SessionEvent::Expired`], so a burst of 401s redirects once.
    pub fn expire_if(&self, rejected_token: Option<&str>) -> bool {
        {
            let mut guard = self.write();
            if !guard.is_authenticated() || guard.token.as_deref() != rejected_token {
                return false;
            }
            *guard = Session::anonymous();
        }
        if let Err(e) = self.inner.storage.clear() {
            tracing::error!(error = %e, "Failed to remove persisted session after 401");
        }

        tracing::warn!("Session expired, token rejected by server");
        self.emit(SessionEvent::Expired);
        true
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn username(&self) -> Option<String> {
        self.read().username.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    pub fn has_role<I, S>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.read().has_role(required)
    }

    pub fn storage(&self) -> &SessionStorage {
        &self.inner.storage
    }
}
