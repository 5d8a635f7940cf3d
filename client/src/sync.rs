//! Background task that keeps the cached campaign view fresh.
//!
//! Whatever campaign is currently in the [`Store`] (the one a consumer last
//! fetched) gets re-fetched on an interval, together with its donation and
//! withdrawal lists. The task is tied to a [`CancellationToken`] so the
//! owner can stop it cleanly instead of leaving a request loop running past
//! its lifetime.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use solana_sdk::pubkey::Pubkey;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::errors::{ClientError, Result};
use crate::provider::Provider;
use crate::reads;
use crate::store::Store;

pub struct SyncState {
    pub provider: Provider,
    pub store: Store,
    pub config: Config,
}

/// Run the refresh loop until `shutdown` is cancelled.
pub async fn run(state: Arc<SyncState>, shutdown: CancellationToken) {
    info!(
        "Refresher starting — program: {}, interval: {}s",
        state.config.program_id, state.config.refresh_interval_secs
    );

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Refresher stopped");
                return;
            }
            _ = tokio::time::sleep(Duration::from_secs(state.config.refresh_interval_secs)) => {}
        }

        if let Err(e) = refresh_once(&state).await {
            error!("Refresh error: {e}");
        }
    }
}

/// Re-fetch the cached campaign and its transaction lists, if any campaign
/// has been fetched at all.
async fn refresh_once(state: &SyncState) -> Result<()> {
    let Some(campaign) = state.store.campaign().await else {
        return Ok(());
    };

    let address = Pubkey::from_str(&campaign.public_key)
        .map_err(|_| ClientError::Decode(format!("bad cached address {}", campaign.public_key)))?;

    reads::fetch_campaign(&state.provider, &state.store, &address).await?;
    reads::fetch_all_transactions(&state.provider, &state.store, &address).await?;
    reads::fetch_all_withdraw_transactions(&state.provider, &state.store, &address).await?;

    debug!("Refreshed campaign {}", campaign.public_key);
    Ok(())
}
