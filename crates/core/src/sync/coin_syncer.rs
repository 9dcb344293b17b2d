//! Conditional refresh of the coin/blockchain/token tables.
//!
//! A cycle only runs when at least one of the three version tokens passed to
//! [`CoinSyncer::sync`] differs from the stored marker. It then fetches the
//! three remote lists concurrently, maps them, appends the override list, and
//! replaces the stored dataset together with the new markers.
//!
//! One cycle at a time: a `sync` call made while another is in flight is
//! rejected with [`SyncError::AlreadyRunning`], until the in-flight cycle has
//! fully exited. [`CoinSyncer::stop`] cancels the in-flight cycle. The storage
//! write claims its commit through a [`CommitGate`] inside its transaction, and
//! the claim and `stop()` share one lock: a stop that wins rolls the write back,
//! a stop that loses arrived after the commit point.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use log::{debug, error, info, warn};
use tokio::sync::watch;

use marketkit_market_data::CoinDataProvider;

use super::coin_mapper::merge_with_overrides;
use super::commit_gate::CommitGate;
use super::sync_state_model::{
    SyncInfo, SyncOutcome, SyncTimestamps, KEY_BLOCKCHAINS_LAST_SYNC_TIMESTAMP,
    KEY_COINS_LAST_SYNC_TIMESTAMP, KEY_TOKENS_LAST_SYNC_TIMESTAMP,
};
use super::sync_state_traits::SyncerStateRepositoryTrait;
use crate::coins::{CoinOverrides, CoinStorageTrait};
use crate::errors::{Error, Result, SyncError};
use crate::events::{MarketEvent, MarketEventSink};

/// Bookkeeping for the cycle currently in flight.
struct InFlight {
    id: u64,
    cancel: watch::Sender<bool>,
    committing: bool,
}

struct SyncerInner {
    provider: Arc<dyn CoinDataProvider>,
    storage: Arc<dyn CoinStorageTrait>,
    state_repository: Arc<dyn SyncerStateRepositoryTrait>,
    overrides: Arc<CoinOverrides>,
    event_sink: Arc<dyn MarketEventSink>,
    in_flight: Mutex<Option<InFlight>>,
    next_id: AtomicU64,
}

/// Synchronizes the local reference dataset with the remote lists.
///
/// Cheap to clone; clones share the same in-flight state, so `stop()` on any
/// clone cancels a cycle started from another.
#[derive(Clone)]
pub struct CoinSyncer {
    inner: Arc<SyncerInner>,
}

impl CoinSyncer {
    pub fn new(
        provider: Arc<dyn CoinDataProvider>,
        storage: Arc<dyn CoinStorageTrait>,
        state_repository: Arc<dyn SyncerStateRepositoryTrait>,
        overrides: Arc<CoinOverrides>,
        event_sink: Arc<dyn MarketEventSink>,
    ) -> Self {
        Self {
            inner: Arc::new(SyncerInner {
                provider,
                storage,
                state_repository,
                overrides,
                event_sink,
                in_flight: Mutex::new(None),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Brings the local dataset up to the given list versions.
    ///
    /// Returns [`SyncOutcome::UpToDate`] without any I/O beyond the marker
    /// reads when nothing changed. Fetch and store failures are logged and
    /// returned; the stored dataset and markers are left as they were, so
    /// calling again with the same versions retries.
    pub async fn sync(
        &self,
        coins_timestamp: i64,
        blockchains_timestamp: i64,
        tokens_timestamp: i64,
    ) -> Result<SyncOutcome> {
        let requested =
            SyncTimestamps::new(coins_timestamp, blockchains_timestamp, tokens_timestamp);

        if !self.inner.is_outdated(&requested)? {
            debug!("Coin lists up to date at {:?}", requested);
            return Ok(SyncOutcome::UpToDate);
        }

        let (id, cancel_rx) = self.inner.begin()?;
        info!("Coin sync #{} started for {:?}", id, requested);

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let _guard = InFlightGuard {
                inner: Arc::clone(&inner),
                id,
            };
            inner.run_cycle(id, requested, cancel_rx).await
        });

        match handle.await {
            Ok(result) => result,
            Err(join_error) => {
                error!("Coin sync #{} task failed: {}", id, join_error);
                Err(SyncError::TaskFailed(join_error.to_string()).into())
            }
        }
    }

    /// Cancels the in-flight cycle, if any.
    ///
    /// Safe to call from any thread, with or without a runtime. After it
    /// returns the cancelled cycle cannot claim its commit, so the store is
    /// left as it was. The cycle keeps its slot until it has exited; `sync`
    /// calls made before then are still rejected.
    pub fn stop(&self) {
        let slot = self.inner.lock_in_flight();
        if let Some(in_flight) = slot.as_ref() {
            if in_flight.committing {
                warn!(
                    "Coin sync #{} stop requested after its commit was claimed",
                    in_flight.id
                );
            } else {
                info!("Coin sync #{} stopped", in_flight.id);
            }
            in_flight.cancel.send_replace(true);
        }
    }

    /// Whether a cycle is currently in flight, including one that was
    /// stopped but has not exited yet.
    pub fn is_syncing(&self) -> bool {
        self.inner.lock_in_flight().is_some()
    }

    /// The three stored markers, each absent until its first successful sync.
    pub fn sync_info(&self) -> Result<SyncInfo> {
        let repo = &self.inner.state_repository;
        Ok(SyncInfo {
            coins_timestamp: repo.get(KEY_COINS_LAST_SYNC_TIMESTAMP)?,
            blockchains_timestamp: repo.get(KEY_BLOCKCHAINS_LAST_SYNC_TIMESTAMP)?,
            tokens_timestamp: repo.get(KEY_TOKENS_LAST_SYNC_TIMESTAMP)?,
        })
    }
}

impl SyncerInner {
    fn lock_in_flight(&self) -> MutexGuard<'_, Option<InFlight>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reads a marker as a number. Absent counts as 0, garbage as `None`.
    fn last_sync_timestamp(&self, key: &str) -> Result<Option<i64>> {
        match self.state_repository.get(key)? {
            None => Ok(Some(0)),
            Some(value) => match value.trim().parse::<i64>() {
                Ok(ts) => Ok(Some(ts)),
                Err(_) => {
                    warn!("Ignoring unparseable sync marker {}={:?}", key, value);
                    Ok(None)
                }
            },
        }
    }

    fn is_outdated(&self, requested: &SyncTimestamps) -> Result<bool> {
        let coins = self.last_sync_timestamp(KEY_COINS_LAST_SYNC_TIMESTAMP)?;
        let blockchains = self.last_sync_timestamp(KEY_BLOCKCHAINS_LAST_SYNC_TIMESTAMP)?;
        let tokens = self.last_sync_timestamp(KEY_TOKENS_LAST_SYNC_TIMESTAMP)?;

        Ok(coins != Some(requested.coins)
            || blockchains != Some(requested.blockchains)
            || tokens != Some(requested.tokens))
    }

    fn begin(&self) -> Result<(u64, watch::Receiver<bool>)> {
        let mut slot = self.lock_in_flight();
        if let Some(current) = slot.as_ref() {
            debug!("Rejecting coin sync while #{} is in flight", current.id);
            return Err(SyncError::AlreadyRunning.into());
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (cancel, cancel_rx) = watch::channel(false);
        *slot = Some(InFlight {
            id,
            cancel,
            committing: false,
        });
        Ok((id, cancel_rx))
    }

    /// Marks cycle `id` as committing unless it was stopped first.
    ///
    /// Runs on the storage writer, inside the write transaction.
    fn try_start_commit(&self, id: u64) -> bool {
        let mut slot = self.lock_in_flight();
        match slot.as_mut() {
            Some(in_flight) if in_flight.id == id && !*in_flight.cancel.borrow() => {
                in_flight.committing = true;
                true
            }
            _ => false,
        }
    }

    fn finish(&self, id: u64) {
        let mut slot = self.lock_in_flight();
        if slot.as_ref().is_some_and(|f| f.id == id) {
            *slot = None;
        }
    }

    async fn run_cycle(
        self: &Arc<Self>,
        id: u64,
        requested: SyncTimestamps,
        mut cancel_rx: watch::Receiver<bool>,
    ) -> Result<SyncOutcome> {
        let started = Instant::now();
        let provider = &self.provider;

        let fetch = async {
            futures::try_join!(
                provider.all_coins(),
                provider.all_blockchains(),
                provider.all_tokens()
            )
        };

        let fetched = tokio::select! {
            biased;
            _ = wait_cancelled(&mut cancel_rx) => {
                debug!("Coin sync #{} discarded its fetch", id);
                return Ok(SyncOutcome::Cancelled);
            }
            result = fetch => result,
        };

        let (coins, blockchains, tokens) = match fetched {
            Ok(lists) => lists,
            Err(e) => {
                error!("Coin sync #{} fetch error: {}", id, e);
                return Err(e.into());
            }
        };

        debug!(
            "Coin sync #{} fetched {} coins, {} blockchains, {} tokens in {:?}",
            id,
            coins.len(),
            blockchains.len(),
            tokens.len(),
            started.elapsed()
        );

        let dataset = merge_with_overrides(coins, blockchains, tokens, &self.overrides);
        let outcome = SyncOutcome::Updated {
            coins: dataset.coins.len(),
            blockchains: dataset.blockchains.len(),
            tokens: dataset.tokens.len(),
        };

        if *cancel_rx.borrow() {
            debug!("Coin sync #{} stopped before its write was queued", id);
            return Ok(SyncOutcome::Cancelled);
        }

        let gate = {
            let inner = Arc::clone(self);
            CommitGate::new(cancel_rx.clone(), move || inner.try_start_commit(id))
        };

        match self.storage.update(dataset, requested.to_markers(), gate).await {
            Ok(()) => {}
            Err(Error::Sync(SyncError::Cancelled)) => {
                debug!("Coin sync #{} stopped before commit, write rolled back", id);
                return Ok(SyncOutcome::Cancelled);
            }
            Err(e) => {
                error!("Coin sync #{} store error: {}", id, e);
                return Err(e);
            }
        }

        self.event_sink.emit(MarketEvent::FullCoinsUpdated);
        info!(
            "Coin sync #{} finished in {:?}: {:?}",
            id,
            started.elapsed(),
            outcome
        );
        Ok(outcome)
    }
}

/// Clears the in-flight slot when the cycle ends, including on panic.
struct InFlightGuard {
    inner: Arc<SyncerInner>,
    id: u64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.inner.finish(self.id);
    }
}

/// Resolves once the cycle is cancelled.
///
/// The sender lives in the in-flight slot until the cycle exits, so `wait_for`
/// only returns once `stop()` has set the flag.
async fn wait_cancelled(cancel_rx: &mut watch::Receiver<bool>) {
    let _ = cancel_rx.wait_for(|cancelled| *cancelled).await;
}
