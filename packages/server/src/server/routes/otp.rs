//! OTP endpoints.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::domains::auth::{
    send_otp, verify_otp, DeliveryFailedError, InvalidEmailError, VerificationFailedError,
};
use crate::server::app::AppState;
use crate::server::middleware::ClientIp;

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

/// Errors surfaced by the OTP endpoints
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),

    #[error(transparent)]
    InvalidEmail(#[from] InvalidEmailError),

    #[error(transparent)]
    VerificationFailed(#[from] VerificationFailedError),

    #[error(transparent)]
    DeliveryFailed(#[from] DeliveryFailedError),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<InvalidEmailError>() {
            Ok(e) => return e.into(),
            Err(err) => err,
        };
        let err = match err.downcast::<VerificationFailedError>() {
            Ok(e) => return e.into(),
            Err(err) => err,
        };
        match err.downcast::<DeliveryFailedError>() {
            Ok(e) => e.into(),
            Err(err) => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidBody(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            ApiError::InvalidEmail(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::VerificationFailed(e) => (StatusCode::UNAUTHORIZED, e.to_string()),
            ApiError::DeliveryFailed(_) => (
                StatusCode::BAD_GATEWAY,
                "Failed to deliver verification email".to_string(),
            ),
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "OTP request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// POST /auth/otp/send
///
/// 200 when a code was sent, 429 with `secondsRemaining` during cooldown.
pub async fn send_otp_handler(
    Extension(state): Extension<AppState>,
    client_ip: Option<Extension<ClientIp>>,
    payload: Result<Json<SendOtpRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;

    if let Some(Extension(ClientIp(ip))) = client_ip {
        tracing::debug!(client_ip = %ip, "OTP send requested");
    }

    let result = send_otp(&request.email, &state.deps).await?;

    if result.sent {
        return Ok((StatusCode::OK, Json(result)).into_response());
    }

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(&result)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(result.seconds_remaining));
    Ok(response)
}

/// POST /auth/otp/verify
pub async fn verify_otp_handler(
    Extension(state): Extension<AppState>,
    client_ip: Option<Extension<ClientIp>>,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;

    if let Some(Extension(ClientIp(ip))) = client_ip {
        tracing::debug!(client_ip = %ip, "OTP verification requested");
    }

    let verified = verify_otp(&request.email, &request.code, &state.deps).await?;
    Ok((StatusCode::OK, Json(verified)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anyhow_errors_map_to_variants() {
        let err: ApiError = anyhow::Error::from(VerificationFailedError).into();
        assert!(matches!(err, ApiError::VerificationFailed(_)));

        let err: ApiError = anyhow::Error::from(DeliveryFailedError {
            reason: "smtp down".to_string(),
        })
        .into();
        assert!(matches!(err, ApiError::DeliveryFailed(_)));

        let err: ApiError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_status_codes() {
        let invalid = crate::domains::auth::normalize_email("nope").unwrap_err();
        assert_eq!(
            ApiError::from(invalid).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(VerificationFailedError).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
