//! Per-strategy temperature extraction.
//!
//! Each parser takes a controller response (decoded JSON or raw text) and a
//! [`Calibration`](crate::hardware::calibration::Calibration), and returns
//! the first calibrated candidate its heuristics accept. A parser never
//! returns an implausible value; "nothing usable" is `None`.

pub mod legacy;
pub mod redfish;
pub mod text;
