//! In-memory one-time code registry.
//!
//! Holds at most one live code per identity key. A single entry is both the
//! live code and the cooldown anchor for the next issuance, so a rejected
//! `issue` during cooldown leaves the current code usable.
//!
//! Per-key atomicity comes from `DashMap` shard locks: `issue` works through
//! `entry()` and `verify` through `remove_if()`, so an entry is always read and
//! replaced as one unit and unrelated keys rarely share a lock.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::Rng;
use tracing::debug;

use crate::common::{Clock, SystemClock};

/// Codes are drawn from this range, so they never start with a zero.
const CODE_RANGE: std::ops::RangeInclusive<u32> = 100_000..=999_999;

/// Timing rules for issuance and verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpPolicy {
    /// Minimum time between two successful issues for the same key.
    pub cooldown: Duration,
    /// How long a code stays verifiable after issuance.
    pub validity: Duration,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            cooldown: Duration::seconds(30),
            validity: Duration::minutes(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OtpEntry {
    pub(crate) code: String,
    pub(crate) issued_at: DateTime<Utc>,
    pub(crate) expires_at: DateTime<Utc>,
}

impl OtpEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    fn cooldown_ends(&self, cooldown: Duration) -> DateTime<Utc> {
        saturating_add(self.issued_at, cooldown)
    }
}

/// Result of [`OtpRegistry::issue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    /// A fresh code was stored; the caller is expected to deliver it.
    Issued { code: String },
    /// The previous code is still inside its cooldown window.
    CoolingDown { seconds_remaining: u64 },
}

impl IssueOutcome {
    pub fn permitted(&self) -> bool {
        matches!(self, IssueOutcome::Issued { .. })
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            IssueOutcome::Issued { code } => Some(code),
            IssueOutcome::CoolingDown { .. } => None,
        }
    }

    pub fn seconds_remaining(&self) -> u64 {
        match self {
            IssueOutcome::Issued { .. } => 0,
            IssueOutcome::CoolingDown { seconds_remaining } => *seconds_remaining,
        }
    }
}

pub struct OtpRegistry {
    entries: DashMap<String, OtpEntry>,
    policy: OtpPolicy,
    clock: Arc<dyn Clock>,
}

impl OtpRegistry {
    pub fn new(policy: OtpPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            policy,
            clock,
        }
    }

    /// 30 second cooldown, 5 minute validity, wall clock.
    pub fn with_defaults() -> Self {
        Self::new(OtpPolicy::default(), Arc::new(SystemClock))
    }

    pub fn policy(&self) -> OtpPolicy {
        self.policy
    }

    /// Issue a new code for `key`, unless the current one is still cooling down.
    ///
    /// `key` must be non-empty and already normalized by the caller.
    pub fn issue(&self, key: &str) -> IssueOutcome {
        debug_assert!(!key.is_empty(), "OTP key must not be empty");

        let now = self.clock.now();

        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(mut occupied) => {
                let ready_at = occupied.get().cooldown_ends(self.policy.cooldown);
                if now < ready_at {
                    let seconds_remaining = ceil_seconds(ready_at - now);
                    debug!(seconds_remaining, "OTP issue rejected during cooldown");
                    return IssueOutcome::CoolingDown { seconds_remaining };
                }

                let entry = self.fresh_entry(now);
                let code = entry.code.clone();
                occupied.insert(entry);
                debug!("OTP re-issued, previous code superseded");
                IssueOutcome::Issued { code }
            }
            Entry::Vacant(vacant) => {
                let entry = self.fresh_entry(now);
                let code = entry.code.clone();
                vacant.insert(entry);
                debug!("OTP issued");
                IssueOutcome::Issued { code }
            }
        }
    }

    /// Check `submitted` against the live code for `key`.
    ///
    /// A match consumes the entry. An expired entry is purged and never
    /// matches. A wrong guess leaves the entry in place. Unknown key, expired
    /// code and wrong code all return `false`.
    pub fn verify(&self, key: &str, submitted: &str) -> bool {
        let now = self.clock.now();

        let removed = self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(now) || entry.code == submitted);

        match removed {
            Some((_, entry)) if entry.is_expired(now) => {
                debug!("OTP expired, entry purged");
                false
            }
            Some(_) => {
                debug!("OTP verified and consumed");
                true
            }
            None => {
                debug!("OTP verification failed");
                false
            }
        }
    }

    /// Drop entries that can no longer verify and no longer hold a cooldown.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let cooldown = self.policy.cooldown;
        let mut purged = 0;

        self.entries.retain(|_, entry| {
            let dead = entry.is_expired(now) && now >= entry.cooldown_ends(cooldown);
            if dead {
                purged += 1;
            }
            !dead
        });

        purged
    }

    /// Number of keys currently holding an entry (live or not yet purged).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn fresh_entry(&self, now: DateTime<Utc>) -> OtpEntry {
        OtpEntry {
            code: generate_code(),
            issued_at: now,
            expires_at: saturating_add(now, self.policy.validity),
        }
    }
}

impl Default for OtpRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

pub(crate) fn generate_code() -> String {
    rand::thread_rng().gen_range(CODE_RANGE).to_string()
}

/// Out-of-range sums clamp to the latest representable instant.
fn saturating_add(at: DateTime<Utc>, delta: Duration) -> DateTime<Utc> {
    at.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn ceil_seconds(delta: Duration) -> u64 {
    let whole = delta.num_seconds();
    let has_fraction = delta - Duration::seconds(whole) > Duration::zero();
    (whole + i64::from(has_fraction)).max(0) as u64
}
