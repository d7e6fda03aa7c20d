//! Threshold classification for calibrated chassis temperatures.
//!
//! Pure logic. The caller loads the thresholds from configuration and passes
//! readings in.

use crate::alert::TemperatureStatus;
use crate::error::CoreError;
use crate::types::Celsius;

/// Default warning threshold in degrees Celsius.
pub const DEFAULT_WARNING_THRESHOLD: Celsius = 27;

/// Default critical threshold in degrees Celsius.
pub const DEFAULT_CRITICAL_THRESHOLD: Celsius = 30;

/// Warning and critical boundaries (both inclusive lower bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub warning: Celsius,
    pub critical: Celsius,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: DEFAULT_WARNING_THRESHOLD,
            critical: DEFAULT_CRITICAL_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Build a threshold pair, rejecting a warning level above the critical one.
    pub fn new(warning: Celsius, critical: Celsius) -> Result<Self, CoreError> {
        if warning > critical {
            return Err(CoreError::Validation(format!(
                "Warning threshold ({warning}) must not exceed critical threshold ({critical})"
            )));
        }
        Ok(Self { warning, critical })
    }

    /// Map a calibrated temperature to its severity.
    pub fn classify(&self, temperature_c: Celsius) -> TemperatureStatus {
        if temperature_c >= self.critical {
            TemperatureStatus::Critical
        } else if temperature_c >= self.warning {
            TemperatureStatus::Warning
        } else {
            TemperatureStatus::Normal
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn below_warning_is_normal() {
        assert_eq!(Thresholds::default().classify(26), TemperatureStatus::Normal);
    }

    #[test]
    fn warning_boundary_is_inclusive() {
        let t = Thresholds::default();
        assert_eq!(t.classify(27), TemperatureStatus::Warning);
        assert_eq!(t.classify(29), TemperatureStatus::Warning);
    }

    #[test]
    fn critical_boundary_is_inclusive() {
        let t = Thresholds::default();
        assert_eq!(t.classify(30), TemperatureStatus::Critical);
        assert_eq!(t.classify(95), TemperatureStatus::Critical);
    }

    #[test]
    fn custom_thresholds_are_respected() {
        let t = Thresholds::new(40, 50).unwrap();
        assert_eq!(t.classify(39), TemperatureStatus::Normal);
        assert_eq!(t.classify(45), TemperatureStatus::Warning);
        assert_eq!(t.classify(50), TemperatureStatus::Critical);
    }

    #[test]
    fn equal_thresholds_skip_warning() {
        let t = Thresholds::new(30, 30).unwrap();
        assert_eq!(t.classify(30), TemperatureStatus::Critical);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        assert_matches!(Thresholds::new(31, 30), Err(CoreError::Validation(_)));
    }
}
