//! Allocation domain: project ranges, quantity allocation, cart line reconciliation

pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::allocator::{
    allocate, allocate_with, rebalance, split_evenly, Allocation, AllocationMode,
    AllocationOptions, ProjectQuantity,
};
pub use domain::error::{AllocationError, AllocationErrorKind};
pub use domain::limits::LineLimits;
pub use domain::projects::{
    parse_projects, parse_projects_lenient, parse_projects_with_limits, LenientParse, ProjectSet,
};
pub use domain::quantity::{parse_total, QuantitySpec};
pub use domain::reconciler::{CartLine, OrderLineQuantities, QuantitySource};
