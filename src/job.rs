use crate::config::AppConfig;
use crate::hub::NotificationHub;
use crate::price::SpotPriceClient;
use crate::tile;
use futures::future::join_all;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Outcome of one tick, for logging and tests. Nothing carries over to the
/// next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub quotes: usize,
    pub failures: usize,
    pub dispatched: bool,
}

/// Runs one fetch → build → dispatch tick. Every per-symbol failure is logged
/// and isolated; the tick itself never fails.
pub async fn run_tick(
    config: &AppConfig,
    client: &dyn SpotPriceClient,
    hub: &dyn NotificationHub,
) -> TickReport {
    let deadline = Instant::now() + Duration::from_secs(config.fetch_timeout_secs);

    let fetches = config
        .symbols
        .iter()
        .map(|symbol| client.fetch_spot(symbol, deadline));
    let outcomes = join_all(fetches).await;

    // join_all preserves input order, so quotes stay in configured symbol order.
    let mut quotes = Vec::new();
    let mut failures = 0usize;
    for outcome in outcomes {
        match outcome {
            Ok(quote) => quotes.push(quote),
            Err(e) => {
                failures += 1;
                warn!(symbol = %e.symbol, kind = %e.kind, "Fetch failed: {}", e.message);
            }
        }
    }

    if quotes.is_empty() {
        info!(failures, "No quotes obtained this tick, skipping dispatch");
        return TickReport {
            quotes: 0,
            failures,
            dispatched: false,
        };
    }

    let dispatched = match tile::build_payload(&quotes) {
        Ok(payload) => match hub.submit(&payload).await {
            Ok(()) => {
                info!(quotes = quotes.len(), failures, "Tile payload submitted to hub");
                true
            }
            Err(e) => {
                error!("Failed to submit tile payload: {e:#}");
                false
            }
        },
        Err(e) => {
            error!("Failed to build tile payload: {e:#}");
            false
        }
    };

    TickReport {
        quotes: quotes.len(),
        failures,
        dispatched,
    }
}
