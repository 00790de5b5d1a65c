//! Verify OTP action

use anyhow::Result;
use tracing::info;

use crate::domains::auth::models::{mask_email, normalize_email};
use crate::domains::auth::types::OtpVerified;
use crate::kernel::ServerDeps;

/// Error returned when OTP verification fails
///
/// Unknown email, expired code and wrong code all produce this same error.
#[derive(Debug, thiserror::Error)]
#[error("Invalid or expired code")]
pub struct VerificationFailedError;

/// Verify an OTP code and activate the account on success.
pub async fn verify_otp(email: &str, code: &str, deps: &ServerDeps) -> Result<OtpVerified> {
    let email = normalize_email(email)?;

    if !deps.otp_registry.verify(&email, code) {
        info!(email = %mask_email(&email), "OTP verification failed");
        return Err(VerificationFailedError.into());
    }

    deps.accounts.activate(&email).await?;
    info!(email = %mask_email(&email), "OTP verified, account activated");

    Ok(OtpVerified {
        email,
        activated: true,
    })
}
