//! Mock HR backend
//!
//! In-memory implementation of the `/api/auth` and `/api/empleados`
//! endpoints. Used by the integration tests of `hr-client` and `hr-admin`
//! and runnable on its own for local development.

pub mod api;
pub mod state;

pub use state::{MockState, MockUser, RecordedRequest};

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A running mock server bound to an ephemeral local port
pub struct MockServer {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Bind `127.0.0.1:0` and serve `state` in a background task
    pub async fn start(state: MockState) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Self::serve(listener, state).await
    }

    pub async fn serve(listener: TcpListener, state: MockState) -> std::io::Result<Self> {
        let addr = listener.local_addr()?;
        let state = Arc::new(state);
        let app = api::router(state.clone());
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "mock server stopped");
            }
        });
        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
