use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::state::AppState;

/// Pings the document store every `minutes` so hosted instances that idle
/// out stay warm. The first ping fires one full period after start.
pub fn spawn_keepalive(state: AppState, minutes: u64) -> JoinHandle<()> {
    let period = Duration::from_secs(minutes.max(1) * 60);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        loop {
            ticker.tick().await;
            match state.db.ping().await {
                Ok(()) => info!("keep-alive ping ok"),
                Err(e) => error!(error = ?e, "keep-alive ping failed"),
            }
        }
    })
}
