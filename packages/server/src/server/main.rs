// Main entry point for the OTP verification server

use std::sync::Arc;

use anyhow::{Context, Result};
use mailer::{SmtpMailer, SmtpOptions};
use server_core::common::SystemClock;
use server_core::domains::auth::OtpRegistry;
use server_core::kernel::{start_scheduler, InMemoryAccountStore, ServerDeps, SmtpAdapter};
use server_core::{server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Sistema Subsidios OTP server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        cooldown_secs = config.otp_cooldown_seconds,
        validity_secs = config.otp_validity_seconds,
        "Configuration loaded"
    );

    // Create SMTP mailer (used by the notifier adapter)
    let mailer = SmtpMailer::new(SmtpOptions {
        host: config.smtp_host.clone(),
        port: config.smtp_port,
        username: config.smtp_username.clone(),
        password: config.smtp_password.clone(),
        from_name: config.smtp_from_name.clone(),
    })
    .context("Failed to configure SMTP transport")?;

    // One registry for the whole process
    let otp_registry = Arc::new(OtpRegistry::new(
        config.otp_policy()?,
        Arc::new(SystemClock),
    ));

    let server_deps = Arc::new(ServerDeps::new(
        otp_registry.clone(),
        Arc::new(SmtpAdapter::new(Arc::new(mailer))),
        Arc::new(InMemoryAccountStore::new()),
    ));

    // Optional sweep of dead OTP entries; kept alive for the life of main
    let _scheduler = match config.otp_sweep_interval {
        Some(every) => Some(
            start_scheduler(otp_registry.clone(), every)
                .await
                .context("Failed to start OTP sweep")?,
        ),
        None => {
            tracing::info!("OTP sweep disabled, expired codes are purged on verify");
            None
        }
    };

    // Build application
    let app = build_app(server_deps)?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
