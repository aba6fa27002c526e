//! Domain layer - Account records and the rules that hold for them.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod account;
pub mod constants;
pub mod error;
pub mod password;

pub use account::{normalize_email, Account, AccountRole};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::{hash_password, verify_password};
