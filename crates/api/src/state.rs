use std::sync::Arc;

use bmcwatch_bmc::BmcClient;

use crate::monitor::TemperatureMonitor;

/// Shared application state available to all Axum handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<TemperatureMonitor>,
    /// Raw controller access for the debug passthrough.
    pub bmc: Arc<BmcClient>,
}
