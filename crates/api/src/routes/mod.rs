pub mod health;
pub mod temperature;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /temperature          fresh check (GET)
/// /status               cached state (GET)
/// /history              recorded readings (GET, ?limit=N)
/// /send-test-email      test notification (POST)
/// /debug-redfish        raw controller payload (GET, ?endpoint=/path)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(temperature::router())
}
