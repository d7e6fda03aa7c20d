//! Ordered fallback over retrieval strategies.

use std::sync::Arc;

use bmcwatch_core::catalog::PROBE_ORDER;
use bmcwatch_core::hardware::calibration::Calibration;
use bmcwatch_core::reading::Reading;

use crate::client::BmcClient;
use crate::strategy::{CatalogStrategy, ProbeStrategy, StrategyFailure};

/// Every strategy failed. Carries one failure per strategy, in probe order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("All temperature retrieval methods failed: {}", format_failures(.failures))]
pub struct AggregatedFailure {
    pub failures: Vec<StrategyFailure>,
}

fn format_failures(failures: &[StrategyFailure]) -> String {
    if failures.is_empty() {
        return "no strategies configured".to_string();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Runs strategies in priority order and stops at the first success.
pub struct ProbeExecutor {
    strategies: Vec<Box<dyn ProbeStrategy>>,
}

impl ProbeExecutor {
    pub fn new(strategies: Vec<Box<dyn ProbeStrategy>>) -> Self {
        Self { strategies }
    }

    /// The production chain: one [`CatalogStrategy`] per kind in
    /// [`PROBE_ORDER`], all sharing one client.
    pub fn from_catalog(client: Arc<BmcClient>, calibration: Calibration) -> Self {
        let strategies = PROBE_ORDER
            .iter()
            .map(|kind| {
                Box::new(CatalogStrategy::new(*kind, Arc::clone(&client), calibration))
                    as Box<dyn ProbeStrategy>
            })
            .collect();
        Self::new(strategies)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub async fn probe(&self) -> Result<Reading, AggregatedFailure> {
        let mut failures = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            match strategy.attempt().await {
                Ok(reading) => {
                    tracing::info!(
                        strategy = %strategy.kind(),
                        endpoint = reading.endpoint(),
                        temperature_c = reading.temperature_c(),
                        "Temperature retrieved"
                    );
                    return Ok(reading);
                }
                Err(failure) => {
                    tracing::warn!(strategy = %strategy.kind(), reason = %failure.reason, "Strategy failed");
                    failures.push(failure);
                }
            }
        }

        Err(AggregatedFailure { failures })
    }
}
