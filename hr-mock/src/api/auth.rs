use super::{MockError, SharedState};
use axum::{Json, extract::State, http::StatusCode};
use shared::client::{LoginRequest, LoginResponse};

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, MockError> {
    let user = state
        .find_user(&req.username, &req.password)
        .ok_or_else(|| MockError::new(StatusCode::UNAUTHORIZED, "Bad credentials"))?;

    let token = state.issue_token(&user);
    tracing::info!(username = %user.username, "mock login");

    Ok(Json(LoginResponse {
        access_token: token,
        refresh_token: Some(format!("refresh-{}", user.username)),
        token_type: Some("Bearer".into()),
        expires_in: Some(3600),
        username: user.username,
        roles: user.roles,
    }))
}
