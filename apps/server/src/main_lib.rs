use std::sync::Arc;

use crate::config::Config;
use marketkit_core::{
    coins::{CoinOverrides, CoinStorageTrait},
    events::BroadcastMarketEventSink,
    sync::{CoinSyncer, SyncerStateRepositoryTrait},
};
use marketkit_market_data::{CoinDataProvider, HsProvider};
use marketkit_storage_sqlite::{
    coins::CoinRepository,
    db::{self, bootstrap},
    sync_state::SyncerStateRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub syncer: CoinSyncer,
    pub provider: Arc<dyn CoinDataProvider>,
    pub coin_repository: Arc<CoinRepository>,
    pub event_sink: Arc<BroadcastMarketEventSink>,
}

pub fn init_tracing() {
    let log_format = std::env::var("MK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&db::get_db_path(Some(&config.db_path)))?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;

    let initial_coins = bootstrap::read_initial_coins(config.initial_coins_path.as_deref())?;
    let seeded = bootstrap::seed_if_empty(&pool, &initial_coins)?;
    if seeded > 0 {
        tracing::info!("Seeded {} initial coin statements", seeded);
    }

    let writer = db::spawn_writer((*pool).clone());

    let coin_repository = Arc::new(CoinRepository::new(pool.clone(), writer.clone()));
    let state_repository: Arc<dyn SyncerStateRepositoryTrait> =
        Arc::new(SyncerStateRepository::new(pool.clone(), writer.clone()));

    let overrides = match &config.overrides_path {
        Some(path) => CoinOverrides::from_path(path)?,
        None => CoinOverrides::bundled()?,
    };
    tracing::info!(
        "Override list: {} coins, {} tokens",
        overrides.coins.len(),
        overrides.tokens.len()
    );

    let provider: Arc<dyn CoinDataProvider> = Arc::new(HsProvider::with_timeout(
        config.api_url.clone(),
        config.api_key.clone(),
        config.request_timeout,
    )?);
    let event_sink = Arc::new(BroadcastMarketEventSink::default());

    let syncer = CoinSyncer::new(
        provider.clone(),
        coin_repository.clone() as Arc<dyn CoinStorageTrait>,
        state_repository,
        Arc::new(overrides),
        event_sink.clone(),
    );

    Ok(Arc::new(AppState {
        syncer,
        provider,
        coin_repository,
        event_sink,
    }))
}
