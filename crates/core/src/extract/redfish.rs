//! Redfish thermal payload extraction.
//!
//! Three heuristic tiers, each run across every sensor entry before the next
//! tier is considered:
//!
//! 1. `ReadingCelsius` on any `Temperatures[]` entry.
//! 2. A generic `Reading` on any `Temperatures[]` or `Readings[]` entry;
//!    numbers are used directly, strings are scanned for their first integer.
//! 3. Ambient/inlet-named sensors only, accepting either field in either
//!    representation.
//!
//! Every candidate goes through the [`Calibration`] before it is accepted.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::hardware::calibration::Calibration;
use crate::types::Celsius;

/// Name fragments identifying chassis ambient/inlet sensors.
pub const AMBIENT_SENSOR_NAMES: &[&str] = &["Ambient", "Inlet", "System Board Inlet", "Inlet Temp"];

static EMBEDDED_INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Which tier produced a Redfish candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedfishTier {
    ReadingCelsius,
    GenericReading,
    AmbientSensor,
}

/// A calibrated Redfish temperature and the sensor it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedfishMatch {
    pub temperature_c: Celsius,
    pub sensor_name: String,
    pub tier: RedfishTier,
}

/// Extract a calibrated temperature from a decoded Redfish payload.
pub fn extract(payload: &Value, calibration: &Calibration) -> Option<RedfishMatch> {
    let temperatures = sensor_entries(payload, "Temperatures");
    let readings = sensor_entries(payload, "Readings");

    let tier_one = temperatures.iter().find_map(|sensor| {
        let raw = sensor.get("ReadingCelsius").and_then(Value::as_f64)?;
        accept(sensor, raw, RedfishTier::ReadingCelsius, calibration)
    });
    if tier_one.is_some() {
        return tier_one;
    }

    let tier_two = temperatures.iter().chain(readings.iter()).find_map(|sensor| {
        let raw = sensor.get("Reading").and_then(lenient_number)?;
        accept(sensor, raw, RedfishTier::GenericReading, calibration)
    });
    if tier_two.is_some() {
        return tier_two;
    }

    temperatures
        .iter()
        .chain(readings.iter())
        .filter(|sensor| is_ambient(sensor_name(sensor)))
        .find_map(|sensor| {
            ["ReadingCelsius", "Reading"].iter().find_map(|field| {
                let raw = sensor.get(*field).and_then(lenient_number)?;
                accept(sensor, raw, RedfishTier::AmbientSensor, calibration)
            })
        })
}

fn sensor_entries<'a>(payload: &'a Value, key: &str) -> Vec<&'a Value> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter(|e| e.is_object()).collect())
        .unwrap_or_default()
}

fn sensor_name(sensor: &Value) -> &str {
    sensor.get("Name").and_then(Value::as_str).unwrap_or("Unknown")
}

fn is_ambient(name: &str) -> bool {
    AMBIENT_SENSOR_NAMES.iter().any(|fragment| name.contains(fragment))
}

/// Numbers as-is; strings by their first embedded integer.
fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => EMBEDDED_INTEGER_RE
            .find(s)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .map(f64::from),
        _ => None,
    }
}

fn accept(
    sensor: &Value,
    raw: f64,
    tier: RedfishTier,
    calibration: &Calibration,
) -> Option<RedfishMatch> {
    calibration.normalize(raw).map(|temperature_c| RedfishMatch {
        temperature_c,
        sensor_name: sensor_name(sensor).to_string(),
        tier,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
