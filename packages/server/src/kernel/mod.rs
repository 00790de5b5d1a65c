//! Kernel module - server infrastructure and dependencies.

pub mod accounts;
pub mod deps;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use accounts::InMemoryAccountStore;
pub use deps::{ServerDeps, SmtpAdapter};
pub use scheduled_tasks::{run_otp_sweep, start_scheduler};
pub use test_dependencies::{MockNotifier, SentMessage, TestDependencies};
pub use traits::*;
