//! Typed access to the external travel API.

pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod transport;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Sends `request` and returns the body of a 2xx response.
    ///
    /// Any other status becomes [`AppError::Upstream`] carrying the server's
    /// `message`/`error` text when it sent one.
    pub async fn call(&self, request: ApiRequest) -> AppResult<Value> {
        Ok(self.exchange(request).await?.body)
    }

    /// Like [`ApiClient::call`], keeping the 2xx status.
    pub async fn exchange(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        let method = request.method.clone();
        let path = request.path.clone();
        let response = self.transport.send(request).await?;

        if response.is_success() {
            return Ok(response);
        }

        let message = error_message(&response.body);
        tracing::warn!(
            kind = "rejected",
            method = %method,
            path = %path,
            status = response.status,
            message = message.as_deref().unwrap_or(""),
            "Upstream rejected request"
        );
        Err(AppError::Upstream {
            status: response.status,
            message,
        })
    }

    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> AppResult<T> {
        decode(self.call(request).await?)
    }

    pub async fn fetch_list<T: DeserializeOwned>(&self, request: ApiRequest) -> AppResult<Vec<T>> {
        let envelope: ListEnvelope<T> = self.fetch(request).await?;
        Ok(envelope.into_items())
    }
}

/// Collections arrive either bare or wrapped as `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            ListEnvelope::Wrapped { data } => data,
            ListEnvelope::Bare(items) => items,
        }
    }
}

pub(crate) fn encode<T: Serialize>(payload: &T) -> AppResult<Value> {
    serde_json::to_value(payload)
        .map_err(|e| AppError::Internal(format!("Failed to encode request: {}", e)))
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Internal(format!("Unexpected upstream payload: {}", e)))
}

fn error_message(body: &Value) -> Option<String> {
    match body {
        Value::Object(map) => ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}
