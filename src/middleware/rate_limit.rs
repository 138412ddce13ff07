use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// Log each request with the client address and flag rate-limited ones
pub async fn log_request(request: Request, next: Next) -> Response {
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let method = request.method().clone();
    let uri = request.uri().clone();

    tracing::debug!(client_ip = %client_ip, method = %method, uri = %uri, "Incoming request");

    let response = next.run(request).await;
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        tracing::warn!(
            client_ip = %client_ip,
            method = %method,
            uri = %uri,
            "RATE LIMITED - Request rejected due to too many requests"
        );
    } else if status.is_client_error() || status.is_server_error() {
        tracing::warn!(client_ip = %client_ip, method = %method, uri = %uri, status = %status, "Request failed");
    } else {
        tracing::debug!(client_ip = %client_ip, method = %method, uri = %uri, status = %status, "Request completed");
    }

    response
}
