//! Scheduled temperature checks.
//!
//! Runs [`TemperatureMonitor::run_cycle`] every check interval. The first
//! check happens one full interval after start; the startup probe in `main`
//! covers the moment of launch.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::monitor::TemperatureMonitor;

/// Run the check loop until `cancel` is triggered.
///
/// The monitor reports itself as active for exactly as long as this loop
/// is running.
pub async fn run(monitor: Arc<TemperatureMonitor>, period: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_minutes = period.as_secs() / 60,
        "Temperature check scheduler started"
    );
    monitor.set_monitoring_active(true);

    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Temperature check scheduler stopping");
                break;
            }
            _ = interval.tick() => {
                tracing::info!("Checking temperature");
                match monitor.run_cycle().await {
                    Ok(report) => {
                        tracing::debug!(
                            temperature_c = report.reading.temperature_c(),
                            notified = ?report.notification,
                            "Scheduled check complete"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Scheduled check could not read temperature");
                    }
                }
            }
        }
    }

    monitor.set_monitoring_active(false);
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bmcwatch_bmc::{ProbeExecutor, ProbeStrategy, StrategyFailure};
    use bmcwatch_core::catalog::StrategyKind;
    use bmcwatch_core::reading::Reading;
    use bmcwatch_events::LogOnlyNotifier;

    use super::*;
    use crate::config::MonitorConfig;

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl ProbeStrategy for Counting {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Sensor
        }

        async fn attempt(&self) -> Result<Reading, StrategyFailure> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Reading::new(24, StrategyKind::Sensor, "/counting")
                .ok_or_else(|| StrategyFailure::new(StrategyKind::Sensor, "unreachable"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_every_period_and_stops_on_cancel() {
        let calls = Arc::new(AtomicUsize::new(0));
        let probe = ProbeExecutor::new(vec![Box::new(Counting(Arc::clone(&calls)))]);
        let monitor = Arc::new(TemperatureMonitor::new(
            probe,
            Arc::new(LogOnlyNotifier),
            &MonitorConfig::default(),
        ));
        let cancel = CancellationToken::new();
        let period = Duration::from_secs(60);

        let handle = tokio::spawn(run(Arc::clone(&monitor), period, cancel.clone()));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(monitor.is_monitoring_active());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        cancel.cancel();
        handle.await.unwrap();
        assert!(!monitor.is_monitoring_active());
    }
}
