//! Legacy `/data?get=` endpoint extraction.
//!
//! Older firmware answers with either a small JSON object keyed by the
//! requested field or a loosely formatted text/XML body. JSON bodies are only
//! searched for the known keys; anything that does not decode as JSON falls
//! back to the free-text patterns.

use serde_json::Value;

use crate::extract::text;
use crate::hardware::calibration::Calibration;
use crate::types::Celsius;

/// Keys checked, in order, on a decoded legacy JSON body.
pub const LEGACY_KEYS: &[&str] = &["tempReading", "thermalReading"];

/// Extract a calibrated temperature from a raw legacy response body.
pub fn extract(body: &str, calibration: &Calibration) -> Option<Celsius> {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => extract_json(&json, calibration),
        Err(_) => text::extract(body, calibration),
    }
}

fn extract_json(json: &Value, calibration: &Calibration) -> Option<Celsius> {
    LEGACY_KEYS.iter().find_map(|key| {
        let raw = match json.get(*key)? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        calibration.normalize(raw)
    })
}
