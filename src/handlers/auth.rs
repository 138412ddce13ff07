use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;

use crate::entities::user::{
    GoogleLoginRequest, LoginRequest, RegisterRequest, SessionInfo, SessionRole,
};
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub session: SessionInfo,
    /// Upstream reply, passed through untouched.
    pub upstream: Value,
}

fn respond(state: &AppState, upstream: Value) -> Json<AuthResponse> {
    Json(AuthResponse {
        session: state.session.info(),
        upstream,
    })
}

/// Admin sign-in; the upstream sets the session cookie
pub async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let upstream = state.api.admin_login(&payload).await?;
    state.session.sign_in(SessionRole::Admin);
    Ok(respond(&state, upstream))
}

/// Admin sign-out. The local session is cleared even if the upstream call fails
pub async fn admin_logout(State(state): State<AppState>) -> AppResult<Json<AuthResponse>> {
    let result = state.api.admin_logout().await;
    state.session.sign_out();
    Ok(respond(&state, result?))
}

/// Re-check the upstream session
pub async fn verify(State(state): State<AppState>) -> AppResult<Json<AuthResponse>> {
    match state.api.verify().await {
        Ok(upstream) => {
            if let Some(role) = upstream
                .get("role")
                .and_then(|role| serde_json::from_value::<SessionRole>(role.clone()).ok())
            {
                state.session.sign_in(role);
            }
            Ok(respond(&state, upstream))
        }
        Err(err @ AppError::Upstream { status: 401 | 403, .. }) => {
            state.session.sign_out();
            Err(err)
        }
        Err(err) => Err(err),
    }
}

pub async fn user_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let upstream = state.api.user_login(&payload).await?;
    state.session.sign_in(SessionRole::User);
    Ok(respond(&state, upstream))
}

pub async fn user_register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    let upstream = state.api.user_register(&payload).await?;
    Ok(respond(&state, upstream))
}

pub async fn user_google(
    State(state): State<AppState>,
    Json(payload): Json<GoogleLoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let upstream = state.api.user_google(&payload).await?;
    state.session.sign_in(SessionRole::User);
    Ok(respond(&state, upstream))
}
