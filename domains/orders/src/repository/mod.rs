//! Order stores
//!
//! The store is the only place an order's status changes. Implementations
//! must validate and apply a change against the status they hold, not the one
//! a caller read earlier, so two concurrent requests cannot both pass the
//! check.

pub mod memory;

use async_trait::async_trait;
use keepsake_common::Result;
use uuid::Uuid;

use crate::domain::entities::{Actor, Order, TransitionRecord};
use crate::domain::state::OrderStatus;

pub use memory::InMemoryOrderStore;

/// A requested status change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub order_id: Uuid,
    pub new_status: OrderStatus,
    pub actor: Actor,
    /// Version the caller last saw; `None` applies against whatever is current
    pub expected_version: Option<u64>,
    pub note: Option<String>,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Store a new order
    async fn insert(&self, order: Order) -> Result<Order>;

    /// Find order by ID
    async fn find(&self, id: Uuid) -> Result<Option<Order>>;

    /// Transition history of an order, oldest first
    async fn history(&self, id: Uuid) -> Result<Vec<TransitionRecord>>;

    /// Validate and apply a status change, appending exactly one record
    ///
    /// Nothing changes when the transition is illegal, the order is missing
    /// or `expected_version` is stale.
    async fn change_status(&self, change: StatusChange) -> Result<(Order, TransitionRecord)>;
}
