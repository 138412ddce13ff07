use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use tokio::net::TcpListener;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use travel_console::{
    api::HttpTransport, config::Config, middleware::rate_limit::log_request, routes, AppError,
    AppResult, AppState,
};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travel_console=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        api = %config.api_base_url,
        "Starting console at {}",
        config.server_addr()
    );

    let transport = Arc::new(HttpTransport::new(&config)?);
    let state = AppState::new(config.clone(), transport)?;

    // Warm the admin booking cache; the console still starts if the API is down
    if let Err(err) = state.bookings.refresh(None, None).await {
        tracing::warn!(error = %err, "Initial booking load failed");
    }

    // Configure rate limiting: bursts of 100, one token every 60ms per IP
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(60)
            .burst_size(100)
            .finish()
            .ok_or_else(|| AppError::Config("Invalid rate limit settings".to_string()))?,
    );

    let app = routes::create_router(state)
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(GovernorLayer::new(governor_config));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid address: {}", e)))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::Internal(format!("Server error: {}", e)))
}
