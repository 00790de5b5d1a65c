// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (issuing and checking codes) lives in the auth domain and
// talks to the outside world through these traits.
//
// Naming convention: Base* for trait names (e.g., BaseNotifier)

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// Notifier Trait (Infrastructure - outbound messages)
// =============================================================================

#[async_trait]
pub trait BaseNotifier: Send + Sync {
    /// Send an HTML message to a single address
    async fn send_message(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}

// =============================================================================
// Account Store Trait (Infrastructure - account activation)
// =============================================================================

#[async_trait]
pub trait BaseAccountStore: Send + Sync {
    /// Mark the account identified by `email` as active
    async fn activate(&self, email: &str) -> Result<()>;

    /// Whether the account identified by `email` has been activated
    async fn is_active(&self, email: &str) -> Result<bool>;
}
