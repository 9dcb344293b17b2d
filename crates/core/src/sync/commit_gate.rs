//! Cancellation hand-off between the syncer and the storage write.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::errors::{Result, SyncError};

/// Passed to [`CoinStorageTrait::update`](crate::coins::CoinStorageTrait::update)
/// so the write can honour a `stop()` that arrives while it is queued or running.
///
/// Storage calls [`CommitGate::try_commit`] inside its transaction, after the
/// writes and before committing. An `Err` there must roll everything back.
/// Once `try_commit` succeeds the cycle can no longer be cancelled.
#[derive(Clone)]
pub struct CommitGate {
    cancel_rx: watch::Receiver<bool>,
    claim: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl CommitGate {
    /// `claim` returns true when the commit may proceed and marks it as
    /// proceeding; it is called at most once per successful commit.
    pub fn new(
        cancel_rx: watch::Receiver<bool>,
        claim: impl Fn() -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            cancel_rx,
            claim: Arc::new(claim),
        }
    }

    /// A gate that never cancels, for writes outside a sync cycle.
    pub fn open() -> Self {
        let (_tx, cancel_rx) = watch::channel(false);
        Self::new(cancel_rx, || true)
    }

    /// Cheap early check; storage may skip its work when this is true.
    pub fn is_cancelled(&self) -> bool {
        *self.cancel_rx.borrow()
    }

    /// Claims the commit. Fails with [`SyncError::Cancelled`] if the cycle was stopped.
    pub fn try_commit(&self) -> Result<()> {
        if !self.is_cancelled() && (self.claim)() {
            Ok(())
        } else {
            Err(SyncError::Cancelled.into())
        }
    }
}

impl fmt::Debug for CommitGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitGate")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
