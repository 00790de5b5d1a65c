//! Per-client rate limiting on the production router.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use server_core::kernel::TestDependencies;
use server_core::server::build_app;
use server_core::server::middleware::RATE_LIMIT_BURST;

/// Every request arrives through the same proxy address
async fn health_from(app: &Router, forwarded_for: &str) -> StatusCode {
    let mut request = Request::builder()
        .uri("/health")
        .header("x-forwarded-for", forwarded_for)
        .body(Body::empty())
        .unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 40000))));

    app.clone().oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn test_burst_exhausted_per_forwarded_client() {
    let test_deps = TestDependencies::new();
    let app = build_app(Arc::new(test_deps.build_deps())).unwrap();

    for _ in 0..RATE_LIMIT_BURST {
        assert_eq!(health_from(&app, "203.0.113.7").await, StatusCode::OK);
    }
    assert_eq!(
        health_from(&app, "203.0.113.7").await,
        StatusCode::TOO_MANY_REQUESTS
    );

    // A different client behind the same proxy has its own bucket
    assert_eq!(health_from(&app, "198.51.100.2").await, StatusCode::OK);
}
