pub mod allocator;
pub mod error;
pub mod limits;
pub mod projects;
pub mod quantity;
pub mod reconciler;
