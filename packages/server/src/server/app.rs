//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::middleware::{
    extract_client_ip, RATE_LIMIT_BURST, RATE_LIMIT_REPLENISH_SECONDS,
};
use crate::server::routes::{health_handler, send_otp_handler, verify_otp_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

fn routes() -> Router {
    Router::new()
        .route("/auth/otp/send", post(send_otp_handler))
        .route("/auth/otp/verify", post(verify_otp_handler))
        .route("/health", get(health_handler))
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
}

/// Router without connection-level middleware.
///
/// Needs no `ConnectInfo`, so it can be driven directly with `oneshot` in tests.
pub fn build_router(deps: Arc<ServerDeps>) -> Router {
    routes()
        .layer(Extension(AppState { deps }))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

/// Build the production Axum application router
///
/// Adds client IP extraction and per-IP rate limiting on top of
/// [`build_router`]. Must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn build_app(deps: Arc<ServerDeps>) -> anyhow::Result<Router> {
    // Rate limiting configuration, keyed by forwarded client IP
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(RATE_LIMIT_REPLENISH_SECONDS)
            .burst_size(RATE_LIMIT_BURST)
            .key_extractor(SmartIpKeyExtractor)
            .use_headers() // Adds x-ratelimit-* response headers
            .finish()
            .ok_or_else(|| anyhow::anyhow!("invalid rate limiter configuration"))?,
    );

    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    let app = routes()
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(extract_client_ip))
        .layer(rate_limit_layer)
        .layer(Extension(AppState { deps }))
        .layer(cors())
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
