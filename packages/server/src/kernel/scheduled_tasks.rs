//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! The OTP registry expires entries lazily on `verify`. Keys that are issued
//! and never verified stay in memory until restart unless the sweep below is
//! enabled. The sweep runs independently of request handling and does not
//! change the issue/verify contract.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::auth::OtpRegistry;

/// Start the periodic OTP sweep
pub async fn start_scheduler(registry: Arc<OtpRegistry>, every: Duration) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let sweep_job = Job::new_repeated_async(every, move |_uuid, _lock| {
        let registry = registry.clone();
        Box::pin(async move {
            run_otp_sweep(&registry);
        })
    })?;

    scheduler.add(sweep_job).await?;
    scheduler.start().await?;

    tracing::info!(interval_secs = every.as_secs(), "OTP sweep scheduled");
    Ok(scheduler)
}

/// Remove dead OTP entries
///
/// Returns the number of entries purged.
pub fn run_otp_sweep(registry: &OtpRegistry) -> usize {
    let purged = registry.purge_expired();
    if purged > 0 {
        tracing::info!(purged, remaining = registry.len(), "OTP sweep purged expired codes");
    } else {
        tracing::debug!(remaining = registry.len(), "OTP sweep found nothing to purge");
    }
    purged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ManualClock;
    use crate::domains::auth::OtpPolicy;

    #[test]
    fn test_run_otp_sweep() {
        let clock = Arc::new(ManualClock::starting_now());
        let registry = OtpRegistry::new(OtpPolicy::default(), clock.clone());
        registry.issue("ana@example.com");
        registry.issue("luis@example.com");

        assert_eq!(run_otp_sweep(&registry), 0);

        clock.advance(chrono::Duration::minutes(6));
        assert_eq!(run_otp_sweep(&registry), 2);
        assert!(registry.is_empty());
    }
}
