//! Orders domain state

use keepsake_allocation::{AllocationOptions, LineLimits};
use std::sync::Arc;

use crate::domain::state::OrderStateMachine;
use crate::repository::OrderStore;

/// Application state for the Orders domain
#[derive(Clone)]
pub struct OrdersState {
    pub store: Arc<dyn OrderStore>,
    pub machine: Arc<OrderStateMachine>,
    pub limits: LineLimits,
    pub options: AllocationOptions,
}
