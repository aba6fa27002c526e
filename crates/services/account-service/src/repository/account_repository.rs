//! Account repository backed by a transactional SQL store.

use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbBackend, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use crate::infra::Database;
use common::{CallContext, DatabaseConfig, StoreError, StoreResult};
use domain::{normalize_email, Account, AccountRole, DEFAULT_IS_ACTIVE};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const OP_CREATE: &str = "account_store.create_account";
const OP_FIND: &str = "account_store.find_account_by_email";
const OP_SHUTDOWN: &str = "account_store.shutdown";

/// Account repository trait for dependency injection.
///
/// Emails are normalized (trimmed, ASCII-lowercased) before they reach the
/// store, so lookups are case-insensitive.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create an account and return its store-assigned id.
    ///
    /// Fails with `AlreadyExists` when the email is taken; no row is written
    /// on any error path.
    async fn create_account(
        &self,
        ctx: &CallContext,
        email: &str,
        password_hash: &str,
    ) -> StoreResult<i64>;

    /// Find an account by email, `NotFound` if there is none.
    async fn find_account_by_email(&self, ctx: &CallContext, email: &str)
        -> StoreResult<Account>;
}

/// Concrete implementation of AccountRepository
pub struct AccountStore {
    db: DatabaseConnection,
    operation_timeout: Duration,
}

impl AccountStore {
    /// Create a repository over an existing connection.
    ///
    /// `operation_timeout` bounds calls whose context carries no deadline.
    pub fn new(db: DatabaseConnection, operation_timeout: Duration) -> Self {
        Self {
            db,
            operation_timeout,
        }
    }

    /// Connect to the store described by `config` and apply pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let database = Database::connect(config).await?;
        Ok(Self::new(
            database.into_connection(),
            config.operation_timeout(),
        ))
    }

    /// Release the connection pool.
    pub async fn shutdown(self) -> StoreResult<()> {
        self.db
            .close()
            .await
            .map_err(|e| StoreError::from_db(OP_SHUTDOWN, e))?;
        tracing::info!("Account store shut down");
        Ok(())
    }

    async fn create_in_transaction(&self, email: &str, password_hash: &str) -> StoreResult<i64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| StoreError::from_db(OP_CREATE, e))?;

        match insert_if_absent(&txn, email, password_hash).await {
            Ok(id) => {
                txn.commit()
                    .await
                    .map_err(|e| StoreError::from_db(OP_CREATE, e))?;
                tracing::debug!(account_id = id, "account created");
                Ok(id)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Check-then-insert inside `txn`.
///
/// The unique index on `email` stays the final arbiter: a racing insert that
/// slips past the check fails with a constraint violation, which maps to
/// `AlreadyExists` as well.
async fn insert_if_absent(
    txn: &DatabaseTransaction,
    email: &str,
    password_hash: &str,
) -> StoreResult<i64> {
    if txn.get_database_backend() == DbBackend::Sqlite {
        take_sqlite_write_lock(txn, email).await?;
    }

    let existing = AccountEntity::find()
        .filter(account::Column::Email.eq(email))
        .count(txn)
        .await
        .map_err(|e| StoreError::from_db(OP_CREATE, e))?;

    if existing > 0 {
        tracing::warn!("account creation rejected: email already registered");
        return Err(StoreError::already_exists(OP_CREATE));
    }

    let active_model = ActiveModel {
        id: NotSet,
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        role: Set(AccountRole::Default.code()),
        is_active: Set(DEFAULT_IS_ACTIVE),
        created_at: NotSet,
    };

    let result = AccountEntity::insert(active_model)
        .exec(txn)
        .await
        .map_err(|e| StoreError::from_db(OP_CREATE, e))?;

    Ok(result.last_insert_id)
}

/// Make a write the first statement of a SQLite transaction.
///
/// A deferred SQLite transaction that reads first cannot upgrade to a write
/// lock while another connection holds one, and fails with "database is
/// locked" without waiting. Writing first makes the busy timeout apply, so
/// concurrent creators queue up like `BEGIN IMMEDIATE` and the losers see the
/// winner's committed row.
async fn take_sqlite_write_lock(txn: &DatabaseTransaction, email: &str) -> StoreResult<()> {
    AccountEntity::update_many()
        .col_expr(account::Column::Email, Expr::col(account::Column::Email).into())
        .filter(account::Column::Email.eq(email))
        .exec(txn)
        .await
        .map_err(|e| StoreError::from_db(OP_CREATE, e))?;
    Ok(())
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn create_account(
        &self,
        ctx: &CallContext,
        email: &str,
        password_hash: &str,
    ) -> StoreResult<i64> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(StoreError::internal(OP_CREATE, "email must not be empty"));
        }
        if password_hash.is_empty() {
            return Err(StoreError::internal(
                OP_CREATE,
                "password hash must not be empty",
            ));
        }

        ctx.run(
            OP_CREATE,
            self.operation_timeout,
            self.create_in_transaction(&email, password_hash),
        )
        .await
    }

    async fn find_account_by_email(
        &self,
        ctx: &CallContext,
        email: &str,
    ) -> StoreResult<Account> {
        let email = normalize_email(email);

        ctx.run(OP_FIND, self.operation_timeout, async {
            let model = AccountEntity::find()
                .filter(account::Column::Email.eq(email.as_str()))
                .one(&self.db)
                .await
                .map_err(|e| StoreError::from_db(OP_FIND, e))?
                .ok_or_else(|| StoreError::not_found(OP_FIND))?;

            Account::try_from(model).map_err(|e| StoreError::internal(OP_FIND, e))
        })
        .await
    }
}
