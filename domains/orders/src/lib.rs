//! Orders domain: order status transitions, transition history, order line allocation API

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use api::{routes, OrdersState};
pub use domain::entities::{Actor, Order, TransitionRecord};
pub use domain::state::{
    ActorRole, OrderStateMachine, OrderStatus, StateError, TableError, TransitionTable,
};
pub use repository::{InMemoryOrderStore, OrderStore, StatusChange};
