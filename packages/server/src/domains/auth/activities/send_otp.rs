//! Send OTP action

use anyhow::Result;
use tracing::{error, info};

use crate::domains::auth::email_template::render_otp_email;
use crate::domains::auth::models::{mask_email, normalize_email, IssueOutcome};
use crate::domains::auth::types::OtpSent;
use crate::kernel::ServerDeps;

/// Error returned when the verification email could not be delivered
///
/// The issued code stays valid; a resend goes through cooldown like any
/// other issue request.
#[derive(Debug, thiserror::Error)]
#[error("Failed to deliver verification email: {reason}")]
pub struct DeliveryFailedError {
    pub reason: String,
}

/// Issue an OTP for an email address and deliver it.
///
/// Returns `OtpSent { sent: false, .. }` when the previous code is still
/// cooling down; nothing is sent in that case.
pub async fn send_otp(email: &str, deps: &ServerDeps) -> Result<OtpSent> {
    let email = normalize_email(email)?;

    let code = match deps.otp_registry.issue(&email) {
        IssueOutcome::Issued { code } => code,
        IssueOutcome::CoolingDown { seconds_remaining } => {
            info!(
                email = %mask_email(&email),
                seconds_remaining,
                "OTP resend requested during cooldown"
            );
            return Ok(OtpSent {
                email,
                sent: false,
                seconds_remaining,
            });
        }
    };

    let message = render_otp_email(&code, deps.otp_registry.policy().validity);

    if let Err(e) = deps
        .notifier
        .send_message(&email, &message.subject, &message.html)
        .await
    {
        error!(email = %mask_email(&email), error = %e, "Failed to send OTP email");
        return Err(DeliveryFailedError {
            reason: e.to_string(),
        }
        .into());
    }

    info!(email = %mask_email(&email), "OTP sent");
    Ok(OtpSent {
        email,
        sent: true,
        seconds_remaining: 0,
    })
}
