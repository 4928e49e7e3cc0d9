//! Routes of the mock HR backend

mod auth;
mod employees;

use crate::state::{MockState, MockUser, RecordedRequest};
use axum::{
    Json, Router,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use shared::error::ErrorBody;
use std::sync::Arc;

pub type SharedState = Arc<MockState>;

/// Error response in the backend's `{message, status}` shape
#[derive(Debug)]
pub struct MockError {
    pub status: StatusCode,
    pub message: String,
}

impl MockError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn not_found(id: i64) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("Empleado {} no encontrado", id))
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: Some(self.message),
            error: self.status.canonical_reason().map(str::to_string),
            status: Some(self.status.as_u16()),
        };
        (self.status, Json(body)).into_response()
    }
}

pub fn router(state: SharedState) -> Router {
    let protected = Router::new()
        .route(
            "/api/empleados",
            get(employees::list).post(employees::create),
        )
        .route(
            "/api/empleados/{id}",
            get(employees::get_by_id)
                .put(employees::update)
                .delete(employees::delete),
        )
        .route("/api/empleados/{id}/ficha.pdf", get(employees::ficha))
        .route("/api/empleados/{id}/foto", put(employees::upload_photo))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

async fn record_request(State(state): State<SharedState>, req: Request, next: Next) -> Response {
    state.record(RecordedRequest {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        query: req.uri().query().map(str::to_string),
        authorization: req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });
    next.run(req).await
}

/// Resolve the bearer token to a user; 401 otherwise
async fn require_auth(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Result<Response, MockError> {
    let user = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| state.user_for_token(token));
    let Some(user) = user else {
        let delay = state.reject_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        return Err(MockError::unauthorized());
    };
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

fn require_admin(user: &MockUser) -> Result<(), MockError> {
    if user.is_admin() {
        Ok(())
    } else {
        tracing::warn!(username = %user.username, "admin role required");
        Err(MockError::new(StatusCode::FORBIDDEN, "Acceso denegado"))
    }
}
