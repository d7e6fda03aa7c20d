//! Temperature evaluation domain logic.
//!
//! Calibration of raw controller candidates, threshold classification and
//! the per-category notification throttle. All logic in this module is
//! pure (no network, no clock reads except where a `now` is passed in) so it
//! can be tested in isolation.

pub mod calibration;
pub mod thresholds;
pub mod throttle;
