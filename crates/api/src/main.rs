use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bmcwatch_bmc::{BmcClient, BmcConfig, ProbeExecutor};
use bmcwatch_events::{EmailConfig, EmailDelivery, LogOnlyNotifier, Notifier, TemplateContext};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bmcwatch_api::background::temperature_check;
use bmcwatch_api::config::{MonitorConfig, ServerConfig};
use bmcwatch_api::monitor::TemperatureMonitor;
use bmcwatch_api::router::build_app_router;
use bmcwatch_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "bmcwatch_api=info,bmcwatch_bmc=info,bmcwatch_events=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting BMC temperature monitor");

    // --- Configuration ---
    let server_config = ServerConfig::from_env().expect("Invalid server configuration");
    let monitor_config = MonitorConfig::from_env().expect("Invalid monitoring configuration");
    let bmc_config = BmcConfig::from_env().expect("Invalid BMC configuration");
    tracing::info!(
        host = %server_config.host,
        port = server_config.port,
        bmc_url = %bmc_config.base_url,
        warning = monitor_config.thresholds.warning,
        critical = monitor_config.thresholds.critical,
        calibration_offset = monitor_config.calibration.offset,
        check_interval_minutes = monitor_config.check_interval_minutes,
        "Loaded configuration"
    );

    // --- Controller client ---
    let bmc_url = bmc_config.base_url.clone();
    let bmc = Arc::new(BmcClient::new(bmc_config).expect("Failed to build BMC HTTP client"));
    let probe = ProbeExecutor::from_catalog(Arc::clone(&bmc), monitor_config.calibration);

    // --- Notifier ---
    let templates = TemplateContext {
        thresholds: monitor_config.thresholds,
        bmc_url,
        check_interval_minutes: monitor_config.check_interval_minutes,
    };
    let notifier: Arc<dyn Notifier> =
        match EmailConfig::from_env().expect("Invalid SMTP configuration") {
            Some(email_config) => {
                tracing::info!(
                    smtp_host = %email_config.smtp_host,
                    recipients = email_config.recipients.len(),
                    "Email notifications enabled"
                );
                Arc::new(EmailDelivery::new(email_config, templates))
            }
            None => {
                tracing::warn!("SMTP_HOST not set, notifications will only be logged");
                Arc::new(LogOnlyNotifier)
            }
        };

    let monitor = Arc::new(TemperatureMonitor::new(probe, notifier, &monitor_config));

    // --- Startup probe ---
    tracing::info!("Testing BMC connection");
    match monitor.probe_once().await {
        Ok(reading) => tracing::info!(
            temperature_c = reading.temperature_c(),
            source = %reading.source(),
            "Initial temperature reading"
        ),
        Err(e) => tracing::warn!(error = %e, "Initial temperature reading failed"),
    }

    // --- Scheduler ---
    let scheduler_cancel = CancellationToken::new();
    let scheduler_handle = tokio::spawn(temperature_check::run(
        Arc::clone(&monitor),
        monitor_config.check_interval(),
        scheduler_cancel.clone(),
    ));

    // --- Router ---
    let state = AppState { monitor, bmc };
    let app = build_app_router(state, &server_config);

    // --- Start server ---
    let addr = SocketAddr::new(
        server_config.host.parse().expect("Invalid HOST address"),
        server_config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    scheduler_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), scheduler_handle).await;
    tracing::info!("Temperature check scheduler stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
