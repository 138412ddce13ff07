use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::utils::validation::FieldErrors;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("validation failed")]
    Validation(FieldErrors),

    /// The upstream API answered, but rejected the request.
    #[error("upstream rejected request ({status}){}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Upstream {
        status: u16,
        message: Option<String>,
    },

    #[error("upstream unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Text shown in an inline error banner.
    ///
    /// A message supplied by the upstream wins; a bare rejection falls back
    /// to the operation-specific `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Upstream {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            AppError::Upstream { .. } => fallback.to_string(),
            other => other.to_string(),
        }
    }

    /// Short label used in logs to tell failure kinds apart.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Transport(_) => "transport",
            AppError::Upstream { .. } => "rejected",
            AppError::Validation(_) => "validation",
            _ => "local",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(FieldErrors::from(&errors))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream { .. } | AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        }

        let body = match &self {
            AppError::Validation(errors) => serde_json::json!({
                "error": self.to_string(),
                "fields": errors,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
