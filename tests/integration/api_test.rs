//! API endpoint integration tests
//!
//! Drives the composed router end to end: allocation preview, order status
//! changes and transition history.

#![allow(dead_code)]

mod allocations;
mod common;
mod orders;
