//! In-memory account activation store.
//!
//! Keeps activation status per normalized email. Durable account records live
//! in the host application; this store is what the standalone server uses.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::kernel::BaseAccountStore;

#[derive(Default)]
pub struct InMemoryAccountStore {
    activated: DashMap<String, DateTime<Utc>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When the account was activated, if it has been
    pub fn activated_at(&self, email: &str) -> Option<DateTime<Utc>> {
        self.activated.get(email).map(|at| *at)
    }

    pub fn active_count(&self) -> usize {
        self.activated.len()
    }
}

#[async_trait]
impl BaseAccountStore for InMemoryAccountStore {
    async fn activate(&self, email: &str) -> Result<()> {
        // First activation time wins; re-activation is a no-op.
        self.activated
            .entry(email.to_string())
            .or_insert_with(Utc::now);
        Ok(())
    }

    async fn is_active(&self, email: &str) -> Result<bool> {
        Ok(self.activated.contains_key(email))
    }
}
