use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::entities::user::SessionRole;
use crate::error::AppResult;
use crate::AppState;

/// Require an admin session
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    state.session.require(SessionRole::Admin)?;
    Ok(next.run(request).await)
}

/// Require any signed-in session
pub async fn require_user(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    state.session.require(SessionRole::User)?;
    Ok(next.run(request).await)
}
