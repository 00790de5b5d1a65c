// HTTP routes
pub mod health;
pub mod otp;

pub use health::*;
pub use otp::*;
