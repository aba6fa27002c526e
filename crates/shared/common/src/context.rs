//! Per-call deadlines and cancellation.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{StoreError, StoreResult};

/// Deadline and cancellation signal a caller attaches to one store operation.
///
/// An empty context means "use the store's default timeout".
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: Option<CancellationToken>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context expiring `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancel: None,
        }
    }

    /// Attach a cancellation token; cancelling it aborts the operation.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Time left for the operation, falling back to `default` without a deadline.
    pub fn budget(&self, default: Duration) -> Duration {
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => default,
        }
    }

    /// Drive `fut` within this context.
    ///
    /// Expiry and cancellation both surface as [`StoreError::Unavailable`];
    /// `fut` is dropped at that point, so any resources it holds are released.
    pub async fn run<T, F>(&self, op: &str, default_timeout: Duration, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        if self.is_cancelled() {
            return Err(StoreError::unavailable(op, "cancelled by caller"));
        }

        let budget = self.budget(default_timeout);
        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(StoreError::unavailable(op, "cancelled by caller")),
            res = tokio::time::timeout(budget, fut) => res.unwrap_or_else(|_| {
                Err(StoreError::unavailable(
                    op,
                    format!("deadline of {}ms exceeded", budget.as_millis()),
                ))
            }),
        }
    }
}
