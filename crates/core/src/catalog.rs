//! Static catalog of controller retrieval strategies.
//!
//! Controller firmware differs across hardware generations, so no single
//! endpoint is guaranteed to exist. Each [`StrategyKind`] names a group of
//! candidate paths sharing one parsing heuristic; [`PROBE_ORDER`] fixes the
//! order in which strategies are attempted (earlier is more authoritative).

use std::fmt;

use serde::Serialize;

/// A retrieval strategy and its parsing heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Redfish JSON thermal/sensor schema.
    Redfish,
    /// Older `/data?get=` style JSON or text endpoints.
    Legacy,
    /// Web UI pages scraped as free text.
    Html,
    /// Miscellaneous info endpoints scanned as free text.
    Sensor,
}

/// Priority order of the fallback chain.
pub const PROBE_ORDER: [StrategyKind; 4] = [
    StrategyKind::Redfish,
    StrategyKind::Legacy,
    StrategyKind::Html,
    StrategyKind::Sensor,
];

const REDFISH_ENDPOINTS: &[&str] = &[
    "/redfish/v1/Chassis/System.Embedded.1/Thermal",
    "/redfish/v1/Chassis/1/Thermal",
    "/redfish/v1/Chassis/Self/Thermal",
    "/redfish/v1/Chassis/System.Embedded.1/Sensors",
];

const LEGACY_ENDPOINTS: &[&str] = &[
    "/data?get=tempReading,thermalReading",
    "/data?get=tempReading",
    "/data?get=thermalReading",
    "/sysmgmt/2012/server/temperature",
    "/data?get=sensorData",
];

const HTML_ENDPOINTS: &[&str] = &[
    "/",
    "/index.html",
    "/main.html",
    "/restgui/start.html",
    "/sysmgmt/2012/server/dashboard",
];

const SENSOR_ENDPOINTS: &[&str] = &[
    "/sysmgmt/2015/bmc/info",
    "/sysmgmt/2012/server/info",
    "/data?get=ambientTemp",
    "/data?get=cpuTemp",
];

/// Default path used when fetching a raw Redfish payload for inspection.
pub const DEFAULT_DEBUG_ENDPOINT: &str = REDFISH_ENDPOINTS[0];

impl StrategyKind {
    /// Controller paths tried by this strategy, in order.
    pub fn endpoints(self) -> &'static [&'static str] {
        match self {
            Self::Redfish => REDFISH_ENDPOINTS,
            Self::Legacy => LEGACY_ENDPOINTS,
            Self::Html => HTML_ENDPOINTS,
            Self::Sensor => SENSOR_ENDPOINTS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Redfish => "redfish",
            Self::Legacy => "legacy",
            Self::Html => "html",
            Self::Sensor => "sensor",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
