//! HTTP handlers for the Orders domain

pub mod allocations;
pub mod orders;
