//! Server dependencies for activities (using traits for testability)
//!
//! This module provides the central dependency container used by the auth
//! activities and HTTP handlers. External services sit behind trait objects.

use anyhow::Result;
use async_trait::async_trait;
use mailer::SmtpMailer;
use std::sync::Arc;

use crate::domains::auth::OtpRegistry;
use crate::kernel::{BaseAccountStore, BaseNotifier};

// =============================================================================
// SmtpMailer Adapter (implements BaseNotifier trait)
// =============================================================================

/// Wrapper around SmtpMailer that implements BaseNotifier trait
pub struct SmtpAdapter(pub Arc<SmtpMailer>);

impl SmtpAdapter {
    pub fn new(mailer: Arc<SmtpMailer>) -> Self {
        Self(mailer)
    }
}

#[async_trait]
impl BaseNotifier for SmtpAdapter {
    async fn send_message(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        self.0
            .send_html(to, subject, html_body.to_string())
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to activities (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    /// Process-wide OTP registry, created once at startup
    pub otp_registry: Arc<OtpRegistry>,
    pub notifier: Arc<dyn BaseNotifier>,
    pub accounts: Arc<dyn BaseAccountStore>,
}

impl ServerDeps {
    pub fn new(
        otp_registry: Arc<OtpRegistry>,
        notifier: Arc<dyn BaseNotifier>,
        accounts: Arc<dyn BaseAccountStore>,
    ) -> Self {
        Self {
            otp_registry,
            notifier,
            accounts,
        }
    }
}
