//! Background scheduler for periodic coin sync.
//!
//! Each tick asks the API for the current list versions and hands them to the
//! synchronizer, which does nothing when they match what is stored. A transient
//! failure gets one early retry instead of waiting a full interval.

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use marketkit_core::coins::CoinStorageTrait;
use marketkit_core::errors::{Error, SyncError};
use marketkit_core::events::MarketEvent;
use marketkit_core::sync::SyncOutcome;
use marketkit_market_data::RetryClass;

use crate::main_lib::AppState;

/// Delay before the early retry of a transiently failed sync.
const RETRY_DELAY_SECS: u64 = 60;

/// Starts the background coin sync scheduler. The first tick is immediate.
pub fn start_coin_sync_scheduler(state: Arc<AppState>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Coin sync scheduler started ({:?} interval)", period);

        let mut sync_interval = interval(period);
        sync_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            sync_interval.tick().await;
            if run_scheduled_sync(&state).await == RetryClass::WithBackoff {
                tokio::time::sleep(Duration::from_secs(RETRY_DELAY_SECS)).await;
                run_scheduled_sync(&state).await;
            }
        }
    })
}

/// Runs a single scheduled sync operation.
///
/// Returns whether the failure, if any, is worth retrying before the next tick.
async fn run_scheduled_sync(state: &Arc<AppState>) -> RetryClass {
    let status = match state.provider.status().await {
        Ok(status) => status,
        Err(e) => {
            warn!("Could not fetch list versions: {}", e);
            return e.retry_class();
        }
    };
    debug!("Remote list versions: {:?}", status);

    match state
        .syncer
        .sync(status.coins, status.blockchains, status.tokens)
        .await
    {
        Ok(SyncOutcome::UpToDate) => debug!("Coin lists already up to date"),
        Ok(SyncOutcome::Updated {
            coins,
            blockchains,
            tokens,
        }) => info!(
            "Coin lists updated: {} coins, {} blockchains, {} tokens",
            coins, blockchains, tokens
        ),
        Ok(SyncOutcome::Cancelled) => info!("Coin sync cancelled"),
        Err(Error::Sync(SyncError::AlreadyRunning)) => {
            debug!("Scheduled sync skipped: previous sync still running")
        }
        Err(Error::MarketData(e)) => {
            warn!("Scheduled coin sync fetch failed: {}", e);
            return e.retry_class();
        }
        Err(e) => warn!("Scheduled coin sync failed: {}", e),
    }
    RetryClass::Never
}

/// Logs the stored coin count whenever a sync lands.
pub fn log_coin_updates(state: &Arc<AppState>) {
    let mut events = state.event_sink.subscribe();
    let repository = state.coin_repository.clone();

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(MarketEvent::FullCoinsUpdated) => match repository.coin_count() {
                    Ok(count) => info!("Coin table now holds {} coins", count),
                    Err(e) => warn!("Could not count coins: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    debug!("Coin update listener skipped {} events", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
