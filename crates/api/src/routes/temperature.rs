use axum::routing::{get, post};
use axum::Router;

use crate::handlers::temperature;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/temperature", get(temperature::get_temperature))
        .route("/status", get(temperature::get_status))
        .route("/history", get(temperature::get_history))
        .route("/send-test-email", post(temperature::send_test_email))
        .route("/debug-redfish", get(temperature::debug_redfish))
}
