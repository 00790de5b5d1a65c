//! Auth domain - account activation via email OTP
//!
//! Architecture:
//!   HTTP handler → activity → OtpRegistry (issue/verify)
//!                           → BaseNotifier (deliver code)
//!                           → BaseAccountStore (activate account)
//!
//! Responsibilities:
//! - Issuing and checking short-lived verification codes with cooldown
//! - Rendering the verification email
//! - Email normalization for registry keys

pub mod activities;
pub mod email_template;
pub mod models;
pub mod types;

pub use activities::{send_otp, verify_otp, DeliveryFailedError, VerificationFailedError};
pub use models::{
    mask_email, normalize_email, InvalidEmailError, IssueOutcome, OtpPolicy, OtpRegistry,
};
pub use types::{OtpSent, OtpVerified};
