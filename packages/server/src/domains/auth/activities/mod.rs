//! Auth domain activities - business logic functions
//!
//! Activities are the callers of the OTP registry. HTTP handlers call them
//! directly with the shared `ServerDeps`.

mod send_otp;
mod verify_otp;

pub use send_otp::{send_otp, DeliveryFailedError};
pub use verify_otp::{verify_otp, VerificationFailedError};
