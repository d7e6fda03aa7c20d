//! Validated temperature readings.

use chrono::Utc;
use serde::Serialize;

use crate::catalog::StrategyKind;
use crate::hardware::calibration::{PLAUSIBLE_MAX_C, PLAUSIBLE_MIN_C};
use crate::types::{Celsius, Timestamp};

/// A calibrated chassis temperature together with where it came from.
///
/// The temperature is always within the plausible range; construction
/// through [`Reading::new`] refuses anything outside it, so an out-of-range
/// value is a parse failure rather than a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    temperature_c: Celsius,
    timestamp: Timestamp,
    source: StrategyKind,
    endpoint: String,
}

impl Reading {
    /// Build a reading stamped with the current time.
    ///
    /// Returns `None` if `temperature_c` lies outside the plausible range.
    pub fn new(
        temperature_c: Celsius,
        source: StrategyKind,
        endpoint: impl Into<String>,
    ) -> Option<Self> {
        Self::at(temperature_c, source, endpoint, Utc::now())
    }

    /// Build a reading with an explicit timestamp.
    pub fn at(
        temperature_c: Celsius,
        source: StrategyKind,
        endpoint: impl Into<String>,
        timestamp: Timestamp,
    ) -> Option<Self> {
        if !(PLAUSIBLE_MIN_C..=PLAUSIBLE_MAX_C).contains(&temperature_c) {
            return None;
        }
        Some(Self {
            temperature_c,
            timestamp,
            source,
            endpoint: endpoint.into(),
        })
    }

    pub fn temperature_c(&self) -> Celsius {
        self.temperature_c
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Strategy that produced this reading.
    pub fn source(&self) -> StrategyKind {
        self.source
    }

    /// Controller path the winning payload was fetched from.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
