use std::sync::Arc;

use tokio::time::{sleep, Duration};
use tracing::info;

use crate::state::AppState;

/// Background sweep that expires orders left unclaimed past the token
/// TTL. Races with claims resolve through the store's conditional
/// update, so a claim landing mid-sweep keeps its order.
pub async fn run_expiry_sweeper(state: Arc<AppState>, period: Duration) {
    info!("expiry sweeper started");

    loop {
        sleep(period).await;

        let expired = state.coordinator.expire_stale_orders();
        if expired > 0 {
            info!(count = expired, "expired unclaimed orders");
        }
    }
}
