use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::domains::auth::OtpPolicy;

/// Longest accepted resend cooldown (1 hour)
pub const MAX_OTP_COOLDOWN_SECONDS: i64 = 60 * 60;

/// Longest accepted code validity (24 hours)
pub const MAX_OTP_VALIDITY_SECONDS: i64 = 24 * 60 * 60;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_from_name: String,
    pub otp_cooldown_seconds: i64,
    pub otp_validity_seconds: i64,
    /// Periodic purge of dead OTP entries; `None` keeps expiry purely lazy
    pub otp_sweep_interval: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (process env in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let otp_cooldown_seconds: i64 = var_or("OTP_COOLDOWN_SECONDS", "30")
            .parse()
            .context("OTP_COOLDOWN_SECONDS must be a valid number")?;
        let otp_validity_seconds: i64 = var_or("OTP_VALIDITY_SECONDS", "300")
            .parse()
            .context("OTP_VALIDITY_SECONDS must be a valid number")?;

        if !(0..=MAX_OTP_COOLDOWN_SECONDS).contains(&otp_cooldown_seconds) {
            anyhow::bail!(
                "OTP_COOLDOWN_SECONDS must be between 0 and {}",
                MAX_OTP_COOLDOWN_SECONDS
            );
        }
        if !(1..=MAX_OTP_VALIDITY_SECONDS).contains(&otp_validity_seconds) {
            anyhow::bail!(
                "OTP_VALIDITY_SECONDS must be between 1 and {}",
                MAX_OTP_VALIDITY_SECONDS
            );
        }

        let otp_sweep_interval = match lookup("OTP_SWEEP_INTERVAL_SECONDS") {
            Some(value) if !value.trim().is_empty() => {
                let secs: u64 = value
                    .trim()
                    .parse()
                    .context("OTP_SWEEP_INTERVAL_SECONDS must be a valid number")?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            _ => None,
        };

        Ok(Self {
            port: var_or("PORT", "8080")
                .parse()
                .context("PORT must be a valid number")?,
            smtp_host: lookup("SMTP_HOST").context("SMTP_HOST must be set")?,
            smtp_port: var_or("SMTP_PORT", "587")
                .parse()
                .context("SMTP_PORT must be a valid number")?,
            smtp_username: lookup("SMTP_USERNAME").context("SMTP_USERNAME must be set")?,
            smtp_password: lookup("SMTP_PASSWORD").context("SMTP_PASSWORD must be set")?,
            smtp_from_name: var_or("SMTP_FROM_NAME", "Sistema Subsidios"),
            otp_cooldown_seconds,
            otp_validity_seconds,
            otp_sweep_interval,
        })
    }

    pub fn otp_policy(&self) -> Result<OtpPolicy> {
        Ok(OtpPolicy {
            cooldown: chrono::TimeDelta::try_seconds(self.otp_cooldown_seconds)
                .context("OTP_COOLDOWN_SECONDS is out of range")?,
            validity: chrono::TimeDelta::try_seconds(self.otp_validity_seconds)
                .context("OTP_VALIDITY_SECONDS is out of range")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn required() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USERNAME", "noreply@example.com"),
            ("SMTP_PASSWORD", "secret"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config> {
        Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    fn load_with(key: &'static str, value: &'static str) -> Result<Config> {
        let mut vars = required();
        vars.insert(key, value);
        load(&vars)
    }

    #[test]
    fn test_defaults() {
        let config = load(&required()).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.smtp_from_name, "Sistema Subsidios");
        assert_eq!(config.otp_cooldown_seconds, 30);
        assert_eq!(config.otp_validity_seconds, 300);
        assert_eq!(config.otp_sweep_interval, None);
        assert_eq!(config.otp_policy().unwrap(), OtpPolicy::default());
    }

    #[test]
    fn test_missing_smtp_host_fails() {
        let mut vars = required();
        vars.remove("SMTP_HOST");

        let err = load(&vars).unwrap_err();
        assert!(err.to_string().contains("SMTP_HOST"));
    }

    #[test]
    fn test_custom_policy() {
        let mut vars = required();
        vars.insert("OTP_COOLDOWN_SECONDS", "60");
        vars.insert("OTP_VALIDITY_SECONDS", "600");

        let policy = load(&vars).unwrap().otp_policy().unwrap();
        assert_eq!(policy.cooldown, chrono::Duration::seconds(60));
        assert_eq!(policy.validity, chrono::Duration::minutes(10));
    }

    #[test]
    fn test_zero_cooldown_allowed() {
        let config = load_with("OTP_COOLDOWN_SECONDS", "0").unwrap();
        assert_eq!(config.otp_cooldown_seconds, 0);
    }

    #[test]
    fn test_negative_cooldown_rejected() {
        assert!(load_with("OTP_COOLDOWN_SECONDS", "-1").is_err());
    }

    #[test]
    fn test_zero_validity_rejected() {
        assert!(load_with("OTP_VALIDITY_SECONDS", "0").is_err());
    }

    #[test]
    fn test_oversized_durations_rejected() {
        assert!(load_with("OTP_VALIDITY_SECONDS", "100000000000000000").is_err());
        assert!(load_with("OTP_VALIDITY_SECONDS", "86401").is_err());
        assert!(load_with("OTP_COOLDOWN_SECONDS", "3601").is_err());

        assert!(load_with("OTP_VALIDITY_SECONDS", "86400").is_ok());
        assert!(load_with("OTP_COOLDOWN_SECONDS", "3600").is_ok());
    }

    #[test]
    fn test_unparseable_number_rejected() {
        assert!(load_with("OTP_COOLDOWN_SECONDS", "thirty").is_err());
        assert!(load_with("PORT", "http").is_err());
    }

    #[test]
    fn test_otp_policy_out_of_range_is_error() {
        let mut config = load(&required()).unwrap();
        config.otp_validity_seconds = i64::MAX;

        assert!(config.otp_policy().is_err());
    }

    #[test]
    fn test_sweep_interval() {
        let config = load_with("OTP_SWEEP_INTERVAL_SECONDS", "60").unwrap();
        assert_eq!(config.otp_sweep_interval, Some(Duration::from_secs(60)));

        let config = load_with("OTP_SWEEP_INTERVAL_SECONDS", " 15 ").unwrap();
        assert_eq!(config.otp_sweep_interval, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_sweep_disabled_by_zero_or_empty() {
        assert_eq!(
            load_with("OTP_SWEEP_INTERVAL_SECONDS", "0")
                .unwrap()
                .otp_sweep_interval,
            None
        );
        assert_eq!(
            load_with("OTP_SWEEP_INTERVAL_SECONDS", "")
                .unwrap()
                .otp_sweep_interval,
            None
        );
        assert!(load_with("OTP_SWEEP_INTERVAL_SECONDS", "soon").is_err());
    }
}
