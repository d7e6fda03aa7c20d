//! The temperature monitor: cached state plus one end-to-end probe cycle.
//!
//! Both the scheduler and on-demand HTTP queries call
//! [`TemperatureMonitor::run_cycle`]. State is behind a single async mutex
//! that is only held while it is read or mutated; controller calls and
//! notifier dispatch happen with the lock released.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bmcwatch_bmc::{AggregatedFailure, ProbeExecutor};
use bmcwatch_core::alert::{NotificationCategory, TemperatureStatus, STATUS_UNKNOWN};
use bmcwatch_core::hardware::thresholds::Thresholds;
use bmcwatch_core::hardware::throttle::NotificationThrottle;
use bmcwatch_core::history::{HistoryBuffer, HistoryEntry};
use bmcwatch_core::reading::Reading;
use bmcwatch_core::types::{Celsius, Timestamp};
use bmcwatch_events::{NotificationMessage, Notifier};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::MonitorConfig;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct MonitorState {
    last_reading: Option<Reading>,
    last_status: Option<TemperatureStatus>,
    history: HistoryBuffer,
    throttle: NotificationThrottle,
}

impl MonitorState {
    /// Append to history in completion order. The cached reading only moves
    /// forward in time, so a slower cycle that started earlier cannot
    /// overwrite a newer reading.
    fn record(&mut self, reading: &Reading, status: TemperatureStatus) {
        self.history.append(HistoryEntry {
            timestamp: reading.timestamp(),
            temperature_c: reading.temperature_c(),
            status,
        });

        let is_newer = self
            .last_reading
            .as_ref()
            .is_none_or(|last| last.timestamp() <= reading.timestamp());
        if is_newer {
            self.last_reading = Some(reading.clone());
            self.last_status = Some(status);
        }
    }
}

/// What a notification attempt during a cycle resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotificationOutcome {
    pub category: NotificationCategory,
    pub delivered: bool,
}

/// Result of a successful cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub reading: Reading,
    pub status: TemperatureStatus,
    /// `None` when no category applied or the throttle suppressed it.
    pub notification: Option<NotificationOutcome>,
}

/// Cached view served without probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub last_temperature: Option<Celsius>,
    pub last_status: String,
    pub last_check: Option<Timestamp>,
    pub monitoring_active: bool,
    pub check_interval: u64,
}

// ---------------------------------------------------------------------------
// TemperatureMonitor
// ---------------------------------------------------------------------------

pub struct TemperatureMonitor {
    probe: ProbeExecutor,
    notifier: Arc<dyn Notifier>,
    thresholds: Thresholds,
    check_interval_minutes: u64,
    state: Mutex<MonitorState>,
    monitoring_active: AtomicBool,
}

impl TemperatureMonitor {
    pub fn new(probe: ProbeExecutor, notifier: Arc<dyn Notifier>, config: &MonitorConfig) -> Self {
        Self {
            probe,
            notifier,
            thresholds: config.thresholds,
            check_interval_minutes: config.check_interval_minutes,
            state: Mutex::new(MonitorState {
                last_reading: None,
                last_status: None,
                history: HistoryBuffer::with_capacity(config.history_capacity),
                throttle: NotificationThrottle::new(config.throttle),
            }),
            monitoring_active: AtomicBool::new(false),
        }
    }

    /// Run one probe without touching cached state or notifying anyone.
    pub async fn probe_once(&self) -> Result<Reading, AggregatedFailure> {
        self.probe.probe().await
    }

    /// Probe, record the reading, and dispatch at most one notification.
    ///
    /// On failure the cached reading, status and history are left as they
    /// were.
    pub async fn run_cycle(&self) -> Result<CycleReport, AggregatedFailure> {
        let reading = match self.probe.probe().await {
            Ok(reading) => reading,
            Err(failure) => {
                tracing::error!(error = %failure, "Temperature unavailable");
                return Err(failure);
            }
        };

        let temperature_c = reading.temperature_c();
        let status = self.thresholds.classify(temperature_c);
        let now = Utc::now();

        let category = {
            let mut state = self.state.lock().await;
            state.record(&reading, status);

            let regular_enabled = state.throttle.policy().send_regular;
            NotificationCategory::for_status(status, regular_enabled)
                .filter(|category| state.throttle.should_notify(*category, now))
        };

        tracing::info!(
            temperature_c,
            status = %status,
            source = %reading.source(),
            "Temperature check complete"
        );

        let notification = match category {
            Some(category) => {
                let message = NotificationMessage::alert(category, temperature_c, status, now);
                let delivered = self.dispatch(&message).await;
                Some(NotificationOutcome {
                    category,
                    delivered,
                })
            }
            None => None,
        };

        Ok(CycleReport {
            reading,
            status,
            notification,
        })
    }

    /// Send a test notification carrying the latest cached values.
    ///
    /// Test notifications are never throttled.
    pub async fn send_test_notification(&self) -> bool {
        let now = Utc::now();
        let message = {
            let state = self.state.lock().await;
            NotificationMessage::test(
                state.last_reading.as_ref().map(Reading::temperature_c),
                state.last_status,
                now,
            )
        };
        self.dispatch(&message).await
    }

    pub async fn status(&self) -> StatusSnapshot {
        let state = self.state.lock().await;
        StatusSnapshot {
            last_temperature: state.last_reading.as_ref().map(Reading::temperature_c),
            last_status: state
                .last_status
                .map_or(STATUS_UNKNOWN, TemperatureStatus::as_str)
                .to_string(),
            last_check: state.history.latest().map(|entry| entry.timestamp),
            monitoring_active: self.is_monitoring_active(),
            check_interval: self.check_interval_minutes,
        }
    }

    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.state.lock().await.history.snapshot()
    }

    pub async fn last_reading(&self) -> Option<Reading> {
        self.state.lock().await.last_reading.clone()
    }

    pub fn is_monitoring_active(&self) -> bool {
        self.monitoring_active.load(Ordering::Relaxed)
    }

    pub fn set_monitoring_active(&self, active: bool) {
        self.monitoring_active.store(active, Ordering::Relaxed);
    }

    pub fn check_interval_minutes(&self) -> u64 {
        self.check_interval_minutes
    }

    async fn dispatch(&self, message: &NotificationMessage) -> bool {
        match self.notifier.send(message).await {
            Ok(()) => {
                self.state
                    .lock()
                    .await
                    .throttle
                    .record_delivery(message.category, Utc::now());
                tracing::info!(category = %message.category, "Notification sent");
                true
            }
            Err(e) => {
                tracing::warn!(category = %message.category, error = %e, "Notification failed");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use bmcwatch_bmc::{ProbeStrategy, StrategyFailure};
    use bmcwatch_core::catalog::StrategyKind;
    use bmcwatch_core::hardware::throttle::CommitPolicy;
    use bmcwatch_events::NotifyError;
    use chrono::TimeDelta;
    use tokio::sync::Notify;
    use tokio::time::timeout;

    use super::*;

    const LOCK_WAIT: Duration = Duration::from_secs(1);

    /// Yields the queued temperatures in order; `None` entries fail.
    struct Scripted {
        script: StdMutex<Vec<Option<Celsius>>>,
    }

    #[async_trait]
    impl ProbeStrategy for Scripted {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Redfish
        }

        async fn attempt(&self) -> Result<Reading, StrategyFailure> {
            let next = self.script.lock().unwrap().remove(0);
            next.and_then(|t| Reading::new(t, StrategyKind::Redfish, "/scripted"))
                .ok_or_else(|| StrategyFailure::new(StrategyKind::Redfish, "scripted failure"))
        }
    }

    #[derive(Default)]
    struct Recording {
        sent: StdMutex<Vec<NotificationMessage>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for Recording {
        async fn send(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(message.clone());
            if self.fail {
                Err(NotifyError::NotConfigured)
            } else {
                Ok(())
            }
        }
    }

    impl Recording {
        fn categories(&self) -> Vec<NotificationCategory> {
            self.sent.lock().unwrap().iter().map(|m| m.category).collect()
        }
    }

    fn monitor_with(
        script: Vec<Option<Celsius>>,
        notifier: Arc<Recording>,
        config: MonitorConfig,
    ) -> TemperatureMonitor {
        let probe = ProbeExecutor::new(vec![Box::new(Scripted {
            script: StdMutex::new(script),
        })]);
        TemperatureMonitor::new(probe, notifier, &config)
    }

    #[tokio::test]
    async fn warning_reading_is_cached_and_notified() {
        let notifier = Arc::new(Recording::default());
        let monitor = monitor_with(vec![Some(27)], Arc::clone(&notifier), MonitorConfig::default());

        let report = monitor.run_cycle().await.unwrap();
        assert_eq!(report.status, TemperatureStatus::Warning);
        assert_eq!(
            report.notification,
            Some(NotificationOutcome {
                category: NotificationCategory::Warning,
                delivered: true,
            })
        );
        assert_eq!(notifier.categories(), vec![NotificationCategory::Warning]);

        let status = monitor.status().await;
        assert_eq!(status.last_temperature, Some(27));
        assert_eq!(status.last_status, "WARNING");
        assert!(status.last_check.is_some());
        assert_eq!(monitor.history().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_cycle_keeps_cached_state() {
        let notifier = Arc::new(Recording::default());
        let monitor = monitor_with(
            vec![Some(31), None],
            Arc::clone(&notifier),
            MonitorConfig::default(),
        );

        monitor.run_cycle().await.unwrap();
        let failure = monitor.run_cycle().await.unwrap_err();
        assert_eq!(failure.failures.len(), 1);

        let status = monitor.status().await;
        assert_eq!(status.last_temperature, Some(31));
        assert_eq!(status.last_status, "CRITICAL");
        assert_eq!(monitor.history().await.len(), 1);
        assert_eq!(notifier.categories(), vec![NotificationCategory::Critical]);
    }

    #[tokio::test]
    async fn status_before_first_reading_is_unknown() {
        let monitor = monitor_with(vec![], Arc::new(Recording::default()), MonitorConfig::default());
        let status = monitor.status().await;
        assert_eq!(status.last_temperature, None);
        assert_eq!(status.last_status, STATUS_UNKNOWN);
        assert_eq!(status.last_check, None);
        assert!(!status.monitoring_active);
        assert_eq!(status.check_interval, 60);
    }

    #[tokio::test]
    async fn repeated_category_is_throttled() {
        let notifier = Arc::new(Recording::default());
        let monitor = monitor_with(
            vec![Some(28), Some(29), Some(30)],
            Arc::clone(&notifier),
            MonitorConfig::default(),
        );

        assert!(monitor.run_cycle().await.unwrap().notification.is_some());
        assert!(monitor.run_cycle().await.unwrap().notification.is_none());
        // Critical has its own cooldown.
        assert!(monitor.run_cycle().await.unwrap().notification.is_some());
        assert_eq!(
            notifier.categories(),
            vec![NotificationCategory::Warning, NotificationCategory::Critical]
        );
        assert_eq!(monitor.history().await.len(), 3);
    }

    #[tokio::test]
    async fn normal_reading_without_regular_reports_sends_nothing() {
        let notifier = Arc::new(Recording::default());
        let mut config = MonitorConfig::default();
        config.throttle.send_regular = false;
        let monitor = monitor_with(vec![Some(22)], Arc::clone(&notifier), config);

        let report = monitor.run_cycle().await.unwrap();
        assert_eq!(report.status, TemperatureStatus::Normal);
        assert!(report.notification.is_none());
        assert!(notifier.categories().is_empty());
    }

    #[tokio::test]
    async fn failed_delivery_holds_cooldown_on_decision() {
        let notifier = Arc::new(Recording {
            fail: true,
            ..Default::default()
        });
        let monitor = monitor_with(
            vec![Some(22), Some(22)],
            Arc::clone(&notifier),
            MonitorConfig::default(),
        );

        let first = monitor.run_cycle().await.unwrap();
        assert_eq!(first.notification.map(|n| n.delivered), Some(false));
        assert!(monitor.run_cycle().await.unwrap().notification.is_none());
    }

    #[tokio::test]
    async fn failed_delivery_retries_on_delivery_policy() {
        let notifier = Arc::new(Recording {
            fail: true,
            ..Default::default()
        });
        let mut config = MonitorConfig::default();
        config.throttle.commit = CommitPolicy::OnDelivery;
        let monitor = monitor_with(vec![Some(22), Some(22)], Arc::clone(&notifier), config);

        monitor.run_cycle().await.unwrap();
        let second = monitor.run_cycle().await.unwrap();
        assert_eq!(
            second.notification.map(|n| n.category),
            Some(NotificationCategory::Regular)
        );
        assert_eq!(notifier.categories().len(), 2);
    }

    #[tokio::test]
    async fn test_notification_uses_cached_values_and_bypasses_throttle() {
        let notifier = Arc::new(Recording::default());
        let monitor = monitor_with(vec![Some(25)], Arc::clone(&notifier), MonitorConfig::default());

        assert!(monitor.send_test_notification().await);
        monitor.run_cycle().await.unwrap();
        assert!(monitor.send_test_notification().await);

        let sent = notifier.sent.lock().unwrap().clone();
        let tests: Vec<_> = sent.iter().filter(|m| m.is_test()).collect();
        assert_eq!(tests.len(), 2);
        assert_eq!(tests[0].temperature_c, None);
        assert_eq!(tests[1].temperature_c, Some(25));
        assert_eq!(tests[1].status, Some(TemperatureStatus::Normal));
    }

    #[tokio::test]
    async fn probe_once_leaves_state_untouched() {
        let notifier = Arc::new(Recording::default());
        let monitor = monitor_with(vec![Some(29)], Arc::clone(&notifier), MonitorConfig::default());

        assert_eq!(monitor.probe_once().await.unwrap().temperature_c(), 29);
        assert!(monitor.last_reading().await.is_none());
        assert!(monitor.history().await.is_empty());
        assert!(notifier.categories().is_empty());
    }

    #[tokio::test]
    async fn history_is_bounded_by_configured_capacity() {
        let mut config = MonitorConfig::default();
        config.history_capacity = 2;
        config.throttle.send_regular = false;
        let monitor = monitor_with(
            vec![Some(20), Some(21), Some(22)],
            Arc::new(Recording::default()),
            config,
        );

        for _ in 0..3 {
            monitor.run_cycle().await.unwrap();
        }
        let temps: Vec<_> = monitor.history().await.iter().map(|e| e.temperature_c).collect();
        assert_eq!(temps, vec![21, 22]);
    }

    // -----------------------------------------------------------------------
    // Lock scope
    // -----------------------------------------------------------------------

    /// Signals `entered` once called, then blocks until `release` fires.
    #[derive(Default)]
    struct Gate {
        entered: Notify,
        release: Notify,
    }

    struct GatedStrategy(Arc<Gate>);

    #[async_trait]
    impl ProbeStrategy for GatedStrategy {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Redfish
        }

        async fn attempt(&self) -> Result<Reading, StrategyFailure> {
            self.0.entered.notify_one();
            self.0.release.notified().await;
            Reading::new(27, StrategyKind::Redfish, "/gated")
                .ok_or_else(|| StrategyFailure::new(StrategyKind::Redfish, "out of range"))
        }
    }

    struct GatedNotifier(Arc<Gate>);

    #[async_trait]
    impl Notifier for GatedNotifier {
        async fn send(&self, _message: &NotificationMessage) -> Result<(), NotifyError> {
            self.0.entered.notify_one();
            self.0.release.notified().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn state_is_readable_while_controller_call_is_in_flight() {
        let gate = Arc::new(Gate::default());
        let probe = ProbeExecutor::new(vec![Box::new(GatedStrategy(Arc::clone(&gate)))]);
        let monitor = Arc::new(TemperatureMonitor::new(
            probe,
            Arc::new(Recording::default()),
            &MonitorConfig::default(),
        ));

        let cycle = tokio::spawn({
            let monitor = Arc::clone(&monitor);
            async move { monitor.run_cycle().await }
        });
        gate.entered.notified().await;

        let status = timeout(LOCK_WAIT, monitor.status())
            .await
            .expect("status blocked by controller call");
        assert_eq!(status.last_status, STATUS_UNKNOWN);
        assert!(timeout(LOCK_WAIT, monitor.history())
            .await
            .expect("history blocked by controller call")
            .is_empty());

        gate.release.notify_one();
        let report = cycle.await.unwrap().unwrap();
        assert_eq!(report.reading.temperature_c(), 27);
    }

    #[tokio::test]
    async fn state_is_readable_while_notification_is_in_flight() {
        let gate = Arc::new(Gate::default());
        let probe = ProbeExecutor::new(vec![Box::new(Scripted {
            script: StdMutex::new(vec![Some(31)]),
        })]);
        let monitor = Arc::new(TemperatureMonitor::new(
            probe,
            Arc::new(GatedNotifier(Arc::clone(&gate))),
            &MonitorConfig::default(),
        ));

        let cycle = tokio::spawn({
            let monitor = Arc::clone(&monitor);
            async move { monitor.run_cycle().await }
        });
        gate.entered.notified().await;

        let status = timeout(LOCK_WAIT, monitor.status())
            .await
            .expect("status blocked by notifier");
        assert_eq!(status.last_temperature, Some(31));
        assert_eq!(status.last_status, "CRITICAL");
        assert_eq!(
            timeout(LOCK_WAIT, monitor.history())
                .await
                .expect("history blocked by notifier")
                .len(),
            1
        );

        gate.release.notify_one();
        let report = cycle.await.unwrap().unwrap();
        assert_eq!(report.notification.map(|n| n.delivered), Some(true));
    }

    // -----------------------------------------------------------------------
    // Out-of-order completion
    // -----------------------------------------------------------------------

    #[test]
    fn older_reading_does_not_replace_cached_one() {
        let mut state = MonitorState {
            last_reading: None,
            last_status: None,
            history: HistoryBuffer::with_capacity(10),
            throttle: NotificationThrottle::default(),
        };
        let now = Utc::now();
        let newer = Reading::at(31, StrategyKind::Redfish, "/a", now).unwrap();
        let older =
            Reading::at(24, StrategyKind::Legacy, "/b", now - TimeDelta::seconds(5)).unwrap();

        state.record(&newer, TemperatureStatus::Critical);
        state.record(&older, TemperatureStatus::Normal);

        assert_eq!(state.last_reading.as_ref().map(Reading::temperature_c), Some(31));
        assert_eq!(state.last_status, Some(TemperatureStatus::Critical));
        let temps: Vec<_> = state.history.snapshot().iter().map(|e| e.temperature_c).collect();
        assert_eq!(temps, vec![31, 24]);
    }
}
