//! Database connection and initialization.

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement,
};
use sea_orm_migration::MigratorTrait;

use common::{DatabaseConfig, StoreError, StoreResult};

use super::migrations::Migrator;

const OP_CONNECT: &str = "database.connect";

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the connection pool and apply pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let db = Self::connect_without_migrations(config).await?;

        db.run_migrations()
            .await
            .map_err(|e| StoreError::from_db(OP_CONNECT, e))?;
        tracing::info!("Database connected and migrations applied");

        Ok(db)
    }

    /// Connect without running migrations (for CLI commands).
    ///
    /// The whole attempt, including a ping, is bounded by the configured
    /// connect timeout; an unreachable store yields [`StoreError::Unavailable`].
    pub async fn connect_without_migrations(config: &DatabaseConfig) -> StoreResult<Self> {
        let timeout = config.connect_timeout();
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(timeout)
            .acquire_timeout(timeout)
            .sqlx_logging(false);

        let established = async {
            let db = Self {
                connection: SeaDatabase::connect(options).await?,
            };
            db.ping().await?;
            Ok::<_, DbErr>(db)
        };

        tokio::time::timeout(timeout, established)
            .await
            .map_err(|_| {
                StoreError::unavailable(
                    OP_CONNECT,
                    format!("no connection within {}ms", timeout.as_millis()),
                )
            })?
            .map_err(|e| StoreError::from_db(OP_CONNECT, e))
    }

    /// Give up the wrapper and keep the connection.
    pub fn into_connection(self) -> DatabaseConnection {
        self.connection
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Rollback the last migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Get migration status (list all migrations with applied status).
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        use sea_orm::{EntityTrait, QueryOrder};
        use sea_orm_migration::seaql_migrations;

        let applied: std::collections::HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect())
    }

    /// Reset database and run all migrations fresh.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Check database connectivity by executing a simple query.
    async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }

    /// Close every pooled connection.
    pub async fn close(self) -> Result<(), DbErr> {
        self.connection.close().await
    }
}
