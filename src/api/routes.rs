/*
 * Responsibility
 * - URL structure served by this process
 * - Business endpoints (bookings, invoices, housekeeping, ...) live elsewhere;
 *   unknown paths end in the JSON 404 fallback, after the gate has run
 */
use axum::{Router, routing::get};

use crate::api::handlers::{fallback::not_found, health::health, me::me};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/me", get(me))
        .fallback(not_found)
}
