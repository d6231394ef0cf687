//! Host world adapters.
//!
//! The runtime only talks to the host through [`crate::HostWorld`]. This module
//! ships an in-memory implementation used by the console host and tests.

mod memory;

pub use memory::InMemoryWorld;
