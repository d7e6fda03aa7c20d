//! Raw candidate calibration and plausibility filtering.
//!
//! The controller firmware this was built against reports chassis readings
//! with a constant bias. The offset is hardware-specific and must be checked
//! against real hardware before being reused elsewhere, hence it is
//! configurable rather than baked in.

use crate::error::CoreError;
use crate::types::Celsius;

/// Offset subtracted from every raw candidate unless configured otherwise.
pub const DEFAULT_CALIBRATION_OFFSET: f64 = 60.0;

/// Lowest calibrated temperature accepted as a reading.
pub const PLAUSIBLE_MIN_C: Celsius = 0;

/// Highest calibrated temperature accepted as a reading.
pub const PLAUSIBLE_MAX_C: Celsius = 100;

/// Turns raw candidates into calibrated temperatures, or rejects them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Subtracted from each raw candidate before range checking.
    pub offset: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            offset: DEFAULT_CALIBRATION_OFFSET,
        }
    }
}

impl Calibration {
    pub fn new(offset: f64) -> Result<Self, CoreError> {
        if !offset.is_finite() {
            return Err(CoreError::Validation(format!(
                "Calibration offset must be a finite number (got {offset})"
            )));
        }
        Ok(Self { offset })
    }

    /// Apply the offset and keep the result only if it is plausible.
    ///
    /// The adjusted value is rounded to whole degrees before the
    /// `[PLAUSIBLE_MIN_C, PLAUSIBLE_MAX_C]` check.
    pub fn normalize(&self, raw: f64) -> Option<Celsius> {
        let adjusted = (raw - self.offset).round();
        if !adjusted.is_finite() {
            return None;
        }
        if adjusted < f64::from(PLAUSIBLE_MIN_C) || adjusted > f64::from(PLAUSIBLE_MAX_C) {
            return None;
        }
        Some(adjusted as Celsius)
    }
}
