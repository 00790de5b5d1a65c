//! Auth domain data types
//!
//! Simple, serializable types returned by auth activities.

use serde::{Deserialize, Serialize};

/// Result of requesting an OTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpSent {
    pub email: String,
    /// False when the request landed inside the cooldown window
    pub sent: bool,
    pub seconds_remaining: u64,
}

/// Result of verifying an OTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerified {
    pub email: String,
    pub activated: bool,
}
