//! Account service - account registration and lookup on top of the repository.

use async_trait::async_trait;
use std::sync::Arc;

use common::{CallContext, StoreResult};
use domain::{hash_password, Account};

use crate::repository::AccountRepository;

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Hash `password` and create an account for `email`.
    async fn register(&self, ctx: &CallContext, email: &str, password: &str) -> StoreResult<i64>;

    /// Get an account by email.
    async fn get_account(&self, ctx: &CallContext, email: &str) -> StoreResult<Account>;
}

/// Concrete implementation of AccountService using repository.
pub struct AccountManager {
    repo: Arc<dyn AccountRepository>,
}

impl AccountManager {
    /// Create new account service instance with repository
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn register(&self, ctx: &CallContext, email: &str, password: &str) -> StoreResult<i64> {
        let password_hash = hash_password(password)?;
        self.repo.create_account(ctx, email, &password_hash).await
    }

    async fn get_account(&self, ctx: &CallContext, email: &str) -> StoreResult<Account> {
        self.repo.find_account_by_email(ctx, email).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use common::StoreError;
    use domain::{verify_password, AccountRole};

    use super::*;
    use crate::repository::MockAccountRepository;

    fn account(email: &str) -> Account {
        Account {
            id: 1,
            email: email.to_string(),
            password_hash: "hashed".to_string(),
            role: AccountRole::Default,
            is_active: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_passes_hash_not_password() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create_account()
            .withf(|_, email, hash| {
                email.to_string() == "a@x.com"
                    && verify_password("Password123!", hash).unwrap_or(false)
            })
            .times(1)
            .returning(|_, _, _| Ok(1));

        let service = AccountManager::new(Arc::new(repo));
        let id = service
            .register(&CallContext::new(), "a@x.com", "Password123!")
            .await;

        assert_eq!(id, Ok(1));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password_before_store() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create_account().never();

        let service = AccountManager::new(Arc::new(repo));
        let err = service
            .register(&CallContext::new(), "a@x.com", "short")
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Internal(_)));
    }

    #[tokio::test]
    async fn test_register_surfaces_already_exists() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create_account()
            .returning(|_, _, _| Err(StoreError::already_exists("account_store.create_account")));

        let service = AccountManager::new(Arc::new(repo));
        let err = service
            .register(&CallContext::new(), "a@x.com", "Password123!")
            .await
            .unwrap_err();

        assert!(err.is_already_exists());
    }

    #[tokio::test]
    async fn test_get_account_success() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_account_by_email()
            .withf(|_, email| email.to_string() == "a@x.com")
            .times(1)
            .returning(|_, email| Ok(account(email)));

        let service = AccountManager::new(Arc::new(repo));
        let found = service
            .get_account(&CallContext::new(), "a@x.com")
            .await
            .unwrap();

        assert_eq!(found.email, "a@x.com");
        assert_eq!(found.role, AccountRole::Default);
    }

    #[tokio::test]
    async fn test_get_account_not_found() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_account_by_email()
            .returning(|_, _| Err(StoreError::not_found("account_store.find_account_by_email")));

        let service = AccountManager::new(Arc::new(repo));
        let result = service.get_account(&CallContext::new(), "b@x.com").await;

        assert!(result.unwrap_err().is_not_found());
    }
}
