// Rate limiting middleware using tower-governor
//
// Configuration:
// - Burst of 20 requests per client IP, then one more every 10 seconds
// - Client IP comes from X-Forwarded-For / X-Real-IP / Forwarded, then the peer address
// - The OTP registry's own cooldown still applies per email on top of this
//
// Applied in app.rs as a layer on the production router

/// Seconds until one request of the quota is replenished
pub const RATE_LIMIT_REPLENISH_SECONDS: u64 = 10;

/// Requests allowed in a burst before the replenish interval applies
pub const RATE_LIMIT_BURST: u32 = 20;
