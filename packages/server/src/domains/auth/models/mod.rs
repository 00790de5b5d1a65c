pub mod identifier;
pub mod otp;

pub use identifier::{mask_email, normalize_email, InvalidEmailError};
pub use otp::{IssueOutcome, OtpPolicy, OtpRegistry};
