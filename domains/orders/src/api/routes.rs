//! Route definitions for Orders domain API

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{allocations, orders};
use super::middleware::OrdersState;

/// Create all Orders domain API routes
pub fn routes() -> Router<OrdersState> {
    Router::new()
        .route("/v1/allocations/preview", post(allocations::preview_allocation))
        .route("/v1/orders", post(orders::create_order))
        .route("/v1/orders/{id}", get(orders::get_order))
        .route("/v1/orders/{id}/transitions", get(orders::get_transitions))
        .route("/v1/orders/{id}/status", patch(orders::change_status))
        .route("/v1/orders/{id}/history", get(orders::get_history))
}
