//! # vizhub-core
//!
//! Core crate for VizHub. Contains the unified error system, shared types
//! (the persistable call-order record), and configuration schemas.
//!
//! This crate has **no** internal dependencies on other VizHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
