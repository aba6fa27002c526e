//! Account Service Library
//!
//! Durable account records for the single-sign-on service: atomic creation
//! with duplicate detection and lookup by email, backed by a SQL store.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::{CallContext, StoreError, StoreResult};

use crate::config::AccountServiceConfig;
use crate::infra::Database;
use crate::repository::AccountStore;
use crate::service::{AccountManager, AccountService};

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = AccountServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    db.close().await?;
    Ok(())
}

/// Account action type.
#[derive(Debug, Clone)]
pub enum AccountAction {
    Create { email: String, password: String },
    Find { email: String },
}

/// Run a single account operation against the configured store (for CLI commands).
pub async fn run_account_action(action: AccountAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = AccountServiceConfig::from_env();
    let store = Arc::new(AccountStore::connect(&config.database).await?);
    let service = AccountManager::new(store.clone());
    let ctx = CallContext::new();

    let outcome = execute(&service, &ctx, action).await;

    // The service holds the other reference; drop it before shutting down.
    drop(service);
    release_store(store).await?;

    println!("{}", outcome?);
    Ok(())
}

/// Shut the store down if `store` is the last handle to it.
///
/// Returns `false`, after a warning, when another handle is still alive; its
/// pool then closes when that handle drops.
async fn release_store(store: Arc<AccountStore>) -> StoreResult<bool> {
    match Arc::try_unwrap(store) {
        Ok(store) => {
            store.shutdown().await?;
            Ok(true)
        }
        Err(shared) => {
            tracing::warn!(
                handles = Arc::strong_count(&shared),
                "Account store still shared; skipping shutdown"
            );
            Ok(false)
        }
    }
}

async fn execute(
    service: &dyn AccountService,
    ctx: &CallContext,
    action: AccountAction,
) -> StoreResult<String> {
    match action {
        AccountAction::Create { email, password } => {
            let id = service.register(ctx, &email, &password).await?;
            info!(account_id = id, "Account created");
            Ok(id.to_string())
        }
        AccountAction::Find { email } => {
            let account = service.get_account(ctx, &email).await?;
            serde_json::to_string_pretty(&account)
                .map_err(|e| StoreError::internal("account.find", e))
        }
    }
}
