//! Store error taxonomy.
//!
//! Every failure leaving the account store is one of four kinds. Database
//! driver errors are classified here and never cross the store boundary.

use domain::DomainError;
use thiserror::Error;

/// Errors surfaced by the account store.
///
/// Each variant carries a message prefixed with the operation that failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}: account already exists")]
    AlreadyExists(String),

    #[error("{0}: account not found")]
    NotFound(String),

    #[error("{0}: store unavailable")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl StoreError {
    /// Get error code for callers
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::AlreadyExists(_) => "ALREADY_EXISTS",
            StoreError::NotFound(_) => "NOT_FOUND",
            StoreError::Unavailable(_) => "UNAVAILABLE",
            StoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Convenience constructors
impl StoreError {
    pub fn already_exists(op: &str) -> Self {
        StoreError::AlreadyExists(op.to_string())
    }

    pub fn not_found(op: &str) -> Self {
        StoreError::NotFound(op.to_string())
    }

    pub fn unavailable(op: &str, reason: impl std::fmt::Display) -> Self {
        StoreError::Unavailable(format!("{}: {}", op, reason))
    }

    pub fn internal(op: &str, detail: impl std::fmt::Display) -> Self {
        StoreError::Internal(format!("{}: {}", op, detail))
    }
}

// =============================================================================
// Database Error Classification (SeaORM)
// =============================================================================

#[cfg(feature = "database")]
mod database {
    use sea_orm::{sqlx, DbErr, RuntimeErr, SqlErr};

    use super::StoreError;

    impl StoreError {
        /// Classify a database error raised while running `op`.
        pub fn from_db(op: &str, err: DbErr) -> Self {
            if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
                tracing::debug!(op, %detail, "unique constraint violation");
                return StoreError::already_exists(op);
            }

            match &err {
                DbErr::RecordNotFound(_) => StoreError::not_found(op),
                DbErr::ConnectionAcquire(reason) => StoreError::unavailable(op, reason),
                DbErr::Conn(RuntimeErr::SqlxError(e))
                | DbErr::Exec(RuntimeErr::SqlxError(e))
                | DbErr::Query(RuntimeErr::SqlxError(e))
                    if is_connectivity(e) =>
                {
                    StoreError::unavailable(op, e)
                }
                DbErr::Conn(_) => StoreError::unavailable(op, &err),
                _ => {
                    tracing::error!(op, error = %err, "database error");
                    StoreError::internal(op, &err)
                }
            }
        }
    }

    /// Driver errors meaning the store could not be reached or answered too late.
    fn is_connectivity(err: &sqlx::Error) -> bool {
        matches!(
            err,
            sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::WorkerCrashed
        )
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for StoreError {
    fn from(err: DomainError) -> Self {
        StoreError::Internal(format!("domain: {}", err))
    }
}

/// Result type alias
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_operation_prefix() {
        let err = StoreError::already_exists("account_store.create_account");
        assert_eq!(
            err.to_string(),
            "account_store.create_account: account already exists"
        );

        let err = StoreError::internal("account_store.find_account_by_email", "boom");
        assert_eq!(err.to_string(), "account_store.find_account_by_email: boom");
    }

    #[test]
    fn test_kinds_are_distinguishable() {
        assert!(StoreError::already_exists("op").is_already_exists());
        assert!(StoreError::not_found("op").is_not_found());
        assert!(StoreError::unavailable("op", "timeout").is_unavailable());
        assert!(!StoreError::internal("op", "x").is_not_found());
        assert_eq!(StoreError::not_found("op").code(), "NOT_FOUND");
        assert_eq!(StoreError::unavailable("op", "x").code(), "UNAVAILABLE");
    }

    #[test]
    fn test_domain_error_becomes_internal() {
        let err: StoreError = DomainError::UnknownRole(9).into();
        assert_eq!(err, StoreError::Internal("domain: Unknown role code: 9".into()));
    }

    #[cfg(feature = "database")]
    mod database {
        use sea_orm::{ConnAcquireErr, DbErr, RuntimeErr};

        use super::super::*;

        #[test]
        fn test_record_not_found_maps_to_not_found() {
            let err = StoreError::from_db("op", DbErr::RecordNotFound("accounts".into()));
            assert!(err.is_not_found());
        }

        #[test]
        fn test_acquire_timeout_maps_to_unavailable() {
            let err = StoreError::from_db("op", DbErr::ConnectionAcquire(ConnAcquireErr::Timeout));
            assert!(err.is_unavailable());
        }

        #[test]
        fn test_pool_timeout_maps_to_unavailable() {
            let err = StoreError::from_db(
                "op",
                DbErr::Query(RuntimeErr::SqlxError(sea_orm::sqlx::Error::PoolTimedOut.into())),
            );
            assert!(err.is_unavailable());
        }

        #[test]
        fn test_other_errors_map_to_internal() {
            let err = StoreError::from_db("op", DbErr::Custom("bad statement".into()));
            assert!(matches!(
                err,
                StoreError::Internal(ref msg) if msg.starts_with("op: ") && msg.contains("bad statement")
            ));
        }
    }
}
