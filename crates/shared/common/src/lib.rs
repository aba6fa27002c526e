//! Common utilities shared by the account store crates.
//!
//! This crate provides:
//! - The store error taxonomy and the classification of database failures
//! - Configuration structures
//! - Per-call deadlines and cancellation

pub mod config;
pub mod context;
pub mod error;

pub use config::*;
pub use context::CallContext;
pub use error::{StoreError, StoreResult};
