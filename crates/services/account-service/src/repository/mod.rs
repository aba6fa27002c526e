//! Repository layer for data access.

pub mod entities;
mod account_repository;

#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountStore};
