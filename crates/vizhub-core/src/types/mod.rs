//! Shared types used across VizHub crates.

pub mod call_order;

pub use call_order::{CallOrder, CallOrderEntry};
