//! Handlers for the temperature query surface.

use axum::extract::{Query, State};
use axum::Json;
use bmcwatch_core::alert::TemperatureStatus;
use bmcwatch_core::catalog::{StrategyKind, DEFAULT_DEBUG_ENDPOINT};
use bmcwatch_core::history::HistoryEntry;
use bmcwatch_core::types::{Celsius, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::monitor::{NotificationOutcome, StatusSnapshot};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct TemperatureResponse {
    pub success: bool,
    pub temperature: Option<Celsius>,
    pub status: Option<TemperatureStatus>,
    pub source: Option<StrategyKind>,
    pub notification: Option<NotificationOutcome>,
    pub timestamp: Timestamp,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Only return the most recent `limit` entries.
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DebugQuery {
    pub endpoint: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/temperature -- run a fresh cycle and report its outcome.
pub async fn get_temperature(State(state): State<AppState>) -> Json<TemperatureResponse> {
    let response = match state.monitor.run_cycle().await {
        Ok(report) => TemperatureResponse {
            success: true,
            temperature: Some(report.reading.temperature_c()),
            status: Some(report.status),
            source: Some(report.reading.source()),
            notification: report.notification,
            timestamp: report.reading.timestamp(),
            message: "Temperature retrieved successfully".to_string(),
        },
        Err(failure) => TemperatureResponse {
            success: false,
            temperature: None,
            status: None,
            source: None,
            notification: None,
            timestamp: Utc::now(),
            message: failure.to_string(),
        },
    };
    Json(response)
}

/// GET /api/status -- cached state, no probing.
pub async fn get_status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.monitor.status().await)
}

/// GET /api/history -- recorded readings, oldest first.
pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<HistoryEntry>>>> {
    let mut entries = state.monitor.history().await;
    if let Some(limit) = params.limit {
        if limit == 0 {
            return Err(AppError::BadRequest("limit must be at least 1".to_string()));
        }
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
    }
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/send-test-email -- unthrottled test notification.
pub async fn send_test_email(State(state): State<AppState>) -> Json<ActionResponse> {
    let success = state.monitor.send_test_notification().await;
    Json(ActionResponse {
        success,
        message: if success {
            "Test email sent successfully"
        } else {
            "Failed to send test email"
        },
    })
}

/// GET /api/debug-redfish -- raw structured payload from the controller.
pub async fn debug_redfish(
    State(state): State<AppState>,
    Query(params): Query<DebugQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let endpoint = params
        .endpoint
        .unwrap_or_else(|| DEFAULT_DEBUG_ENDPOINT.to_string());
    if !endpoint.starts_with('/') {
        return Err(AppError::BadRequest(
            "endpoint must be an absolute controller path".to_string(),
        ));
    }

    let body = match state.bmc.fetch_json(&endpoint).await {
        Ok(data) => {
            tracing::info!(endpoint = %endpoint, "Fetched raw Redfish payload");
            serde_json::json!({
                "success": true,
                "endpoint": endpoint,
                "data": data,
            })
        }
        Err(e) => {
            tracing::error!(endpoint = %endpoint, error = %e, "Redfish debug request failed");
            serde_json::json!({
                "success": false,
                "endpoint": endpoint,
                "message": format!("Failed to get Redfish data: {e}"),
            })
        }
    };
    Ok(Json(body))
}
