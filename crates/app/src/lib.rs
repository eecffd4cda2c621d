//! Keepsake application composition root
//!
//! Composes all domain routers into a single application.

use axum::Router;
use keepsake_allocation::{AllocationOptions, LineLimits};
use keepsake_common::Config;
use keepsake_orders::{InMemoryOrderStore, OrderStateMachine, OrdersState};
use std::sync::Arc;

/// Create the main application router with all routes and middleware
///
/// Fails when the order transition table is incomplete or inconsistent, so
/// a broken table never serves a request.
pub fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let machine = Arc::new(
        OrderStateMachine::standard()
            .map_err(|e| anyhow::anyhow!("Invalid order transition table: {}", e))?,
    );

    let orders_state = OrdersState {
        store: Arc::new(InMemoryOrderStore::new(machine.clone())),
        machine,
        limits: LineLimits::from(config.limits),
        options: AllocationOptions {
            allow_zero_total: config.limits.allow_zero_total,
        },
    };

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Keepsake API v0.0.1-SNAPSHOT" }),
        )
        .merge(keepsake_orders::routes().with_state(orders_state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
