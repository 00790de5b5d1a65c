use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: String,
    pending_codes: usize,
}

/// Health check endpoint
///
/// The service has no external dependency to probe at request time; SMTP is
/// only contacted when a code is sent. Reports the number of keys currently
/// holding an OTP entry.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            pending_codes: state.deps.otp_registry.len(),
        }),
    )
}
