pub mod config;
pub mod hub;
pub mod job;
pub mod log;
pub mod price;
pub mod tile;

use crate::config::AppConfig;
use crate::hub::HttpNotificationHub;
use crate::price::CoinbaseClient;
use anyhow::Result;
use std::time::Duration;
use tracing::{debug, error, info};

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
}

/// Runs exactly one tick, for external schedulers (cron, systemd timers).
/// Only startup problems (unreadable config) surface as errors; everything
/// inside the tick is logged and swallowed.
pub async fn run_once(config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");
    tick(&config).await;
    Ok(())
}

/// Built-in scheduler: one tick every `interval_secs`, forever. A failed tick
/// never delays or skips the next one.
pub async fn watch(config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");
    info!(interval_secs = config.interval_secs, "Watching spot prices");

    let mut interval = tokio::time::interval(Duration::from_secs(config.interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        tick(&config).await;
    }
}

async fn tick(config: &AppConfig) {
    info!(symbols = ?config.symbols, "Tick starting");
    if let Err(e) = try_tick(config).await {
        // Tick boundary: the scheduler always sees a clean return.
        error!("Tick failed unexpectedly: {e:#}");
    }
}

async fn try_tick(config: &AppConfig) -> Result<()> {
    let client = CoinbaseClient::new(
        &config.provider.base_url,
        &config.provider.api_version,
        &config.quote_currency,
    )?;
    let hub = HttpNotificationHub::new(
        &config.hub.url,
        &config.hub.platform,
        config.hub.api_key.as_deref(),
    )?;

    let report = job::run_tick(config, &client, &hub).await;
    debug!(?report, "Tick finished");
    Ok(())
}
