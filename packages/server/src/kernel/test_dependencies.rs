// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{BaseNotifier, InMemoryAccountStore, ServerDeps};
use crate::common::ManualClock;
use crate::domains::auth::{OtpPolicy, OtpRegistry};

// =============================================================================
// Mock Notifier
// =============================================================================

/// A message captured by [`MockNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

impl SentMessage {
    /// First run of exactly six digits in the body (the verification code)
    pub fn code(&self) -> Option<String> {
        find_six_digit_run(&self.html_body)
    }
}

pub struct MockNotifier {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failing: AtomicBool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: AtomicBool::new(false),
        }
    }

    /// Notifier whose every send fails (simulates SMTP outage)
    pub fn failing() -> Self {
        let notifier = Self::new();
        notifier.set_failing(true);
        notifier
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get all messages that were sent
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Get the last message sent to an address
    pub fn last_message_to(&self, to: &str) -> Option<SentMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.to == to)
            .cloned()
    }

    /// Get the last verification code sent to an address
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.last_message_to(to).and_then(|m| m.code())
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseNotifier for MockNotifier {
    async fn send_message(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("mock notifier configured to fail");
        }

        self.sent.lock().unwrap().push(SentMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

fn find_six_digit_run(text: &str) -> Option<String> {
    let mut run = String::new();
    for c in text.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_digit() {
            run.push(c);
        } else {
            if run.len() == 6 {
                return Some(run);
            }
            run.clear();
        }
    }
    None
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<MockNotifier>,
    pub accounts: Arc<InMemoryAccountStore>,
    pub policy: OtpPolicy,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(ManualClock::starting_now()),
            notifier: Arc::new(MockNotifier::new()),
            accounts: Arc::new(InMemoryAccountStore::new()),
            policy: OtpPolicy::default(),
        }
    }

    /// Set a mock notifier
    pub fn mock_notifier(mut self, notifier: MockNotifier) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Override the OTP timing policy
    pub fn policy(mut self, policy: OtpPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build ServerDeps backed by a fresh registry on the manual clock
    pub fn build_deps(&self) -> ServerDeps {
        let registry = OtpRegistry::new(self.policy, self.clock.clone());
        ServerDeps::new(
            Arc::new(registry),
            self.notifier.clone(),
            self.accounts.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_six_digit_run() {
        assert_eq!(
            find_six_digit_run("color #0033A0; code 482913 done"),
            Some("482913".to_string())
        );
        assert_eq!(find_six_digit_run("<div>\n  111222\n</div>"), Some("111222".to_string()));
        assert_eq!(find_six_digit_run("1234567 and 12345"), None);
        assert_eq!(find_six_digit_run("ends with 654321"), Some("654321".to_string()));
    }

    #[tokio::test]
    async fn test_failing_notifier_records_nothing() {
        let notifier = MockNotifier::failing();
        assert!(notifier
            .send_message("ana@example.com", "subject", "body")
            .await
            .is_err());
        assert!(notifier.sent_messages().is_empty());
    }
}
