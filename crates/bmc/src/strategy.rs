//! Retrieval strategies for the probe fallback chain.
//!
//! A [`ProbeStrategy`] either produces a validated [`Reading`] or explains
//! why it could not. [`CatalogStrategy`] is the production implementation:
//! it walks the endpoints the catalog lists for its [`StrategyKind`] and
//! applies that kind's parser to each response, stopping at the first
//! endpoint that yields a plausible temperature.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bmcwatch_core::catalog::StrategyKind;
use bmcwatch_core::extract::{legacy, redfish, text};
use bmcwatch_core::hardware::calibration::Calibration;
use bmcwatch_core::reading::Reading;
use bmcwatch_core::types::Celsius;

use crate::client::{BmcClient, BmcError};

/// Length of the payload preview written to debug logs.
const PAYLOAD_PREVIEW_CHARS: usize = 500;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// One strategy produced no usable reading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{strategy}: {reason}")]
pub struct StrategyFailure {
    pub strategy: StrategyKind,
    pub reason: String,
}

impl StrategyFailure {
    pub fn new(strategy: StrategyKind, reason: impl Into<String>) -> Self {
        Self {
            strategy,
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A single step in the probe fallback chain.
#[async_trait]
pub trait ProbeStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Try to obtain a reading. Must not panic on controller misbehaviour;
    /// every failure is reported as a [`StrategyFailure`].
    async fn attempt(&self) -> Result<Reading, StrategyFailure>;
}

// ---------------------------------------------------------------------------
// CatalogStrategy
// ---------------------------------------------------------------------------

/// Outcome of probing one endpoint.
enum EndpointOutcome {
    Found(Celsius),
    NoCandidate,
}

/// Catalog-driven strategy backed by a live controller client.
pub struct CatalogStrategy {
    kind: StrategyKind,
    client: Arc<BmcClient>,
    calibration: Calibration,
}

impl CatalogStrategy {
    pub fn new(kind: StrategyKind, client: Arc<BmcClient>, calibration: Calibration) -> Self {
        Self {
            kind,
            client,
            calibration,
        }
    }

    async fn probe_endpoint(&self, endpoint: &str) -> Result<EndpointOutcome, BmcError> {
        let body = self.client.fetch_text(endpoint).await?;
        tracing::debug!(
            strategy = %self.kind,
            endpoint,
            preview = %preview(&body),
            "Controller response received"
        );

        let found = match self.kind {
            StrategyKind::Redfish => {
                let payload = serde_json::from_str(&body)?;
                redfish::extract(&payload, &self.calibration).map(|m| {
                    tracing::debug!(
                        sensor = %m.sensor_name,
                        tier = ?m.tier,
                        temperature_c = m.temperature_c,
                        "Redfish sensor accepted"
                    );
                    m.temperature_c
                })
            }
            StrategyKind::Legacy => legacy::extract(&body, &self.calibration),
            StrategyKind::Html | StrategyKind::Sensor => text::extract(&body, &self.calibration),
        };

        Ok(found.map_or(EndpointOutcome::NoCandidate, EndpointOutcome::Found))
    }
}

#[async_trait]
impl ProbeStrategy for CatalogStrategy {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    async fn attempt(&self) -> Result<Reading, StrategyFailure> {
        let mut errors = Vec::new();

        for endpoint in self.kind.endpoints() {
            match self.probe_endpoint(endpoint).await {
                Ok(EndpointOutcome::Found(temperature_c)) => {
                    if let Some(reading) = Reading::new(temperature_c, self.kind, *endpoint) {
                        return Ok(reading);
                    }
                    errors.push(format!("{endpoint}: implausible temperature {temperature_c}"));
                }
                Ok(EndpointOutcome::NoCandidate) => {
                    tracing::debug!(strategy = %self.kind, endpoint, "No valid temperature in response");
                    errors.push(format!("{endpoint}: no valid temperature"));
                }
                Err(e) => {
                    tracing::warn!(strategy = %self.kind, endpoint, error = %e, "Endpoint failed");
                    errors.push(format!("{endpoint}: {e}"));
                }
            }
        }

        Err(StrategyFailure::new(
            self.kind,
            format!("{} unavailable ({})", self.kind, errors.join("; ")),
        ))
    }
}

impl fmt::Debug for CatalogStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogStrategy")
            .field("kind", &self.kind)
            .field("base_url", &self.client.base_url())
            .field("calibration", &self.calibration)
            .finish()
    }
}

fn preview(body: &str) -> String {
    body.chars().take(PAYLOAD_PREVIEW_CHARS).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
