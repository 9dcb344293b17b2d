mod config;
mod main_lib;
mod scheduler;

use config::Config;
use main_lib::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing();
    let state = build_state(&config).await?;

    let scheduler = scheduler::start_coin_sync_scheduler(state.clone(), config.sync_interval);
    scheduler::log_coin_updates(&state);

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    state.syncer.stop();
    scheduler.abort();
    Ok(())
}
