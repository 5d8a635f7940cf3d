//! In-memory cache of the last-fetched remote state.
//!
//! A [`Store`] handle is created once at startup and passed explicitly to the
//! read operations and the API state; there is no process-wide singleton. The
//! remote program stays the single source of truth — the cache is a read-only
//! mirror, refreshed as a side effect of reads, and never persisted.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{CampaignInfo, ProgramStateInfo, TransactionInfo};

#[derive(Debug, Default)]
struct CacheState {
    campaign: Option<CampaignInfo>,
    donations: Vec<TransactionInfo>,
    withdrawals: Vec<TransactionInfo>,
    program_state: Option<ProgramStateInfo>,
}

/// Cheaply clonable handle to the shared cache.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<CacheState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_campaign(&self, campaign: CampaignInfo) {
        self.inner.write().await.campaign = Some(campaign);
    }

    pub async fn set_donations(&self, donations: Vec<TransactionInfo>) {
        self.inner.write().await.donations = donations;
    }

    pub async fn set_withdrawals(&self, withdrawals: Vec<TransactionInfo>) {
        self.inner.write().await.withdrawals = withdrawals;
    }

    pub async fn set_program_state(&self, state: ProgramStateInfo) {
        self.inner.write().await.program_state = Some(state);
    }

    pub async fn campaign(&self) -> Option<CampaignInfo> {
        self.inner.read().await.campaign.clone()
    }

    pub async fn donations(&self) -> Vec<TransactionInfo> {
        self.inner.read().await.donations.clone()
    }

    pub async fn withdrawals(&self) -> Vec<TransactionInfo> {
        self.inner.read().await.withdrawals.clone()
    }

    pub async fn program_state(&self) -> Option<ProgramStateInfo> {
        self.inner.read().await.program_state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty() {
        let store = Store::new();
        assert!(store.campaign().await.is_none());
        assert!(store.donations().await.is_empty());
        assert!(store.withdrawals().await.is_empty());
        assert!(store.program_state().await.is_none());
    }

    #[tokio::test]
    async fn set_and_read_back() {
        let store = Store::new();
        store
            .set_program_state(ProgramStateInfo {
                platform_address: "addr".to_string(),
                campaign_count: 4,
                platform_fee: 5,
            })
            .await;
        let state = store.program_state().await.unwrap();
        assert_eq!(state.campaign_count, 4);
        assert_eq!(state.platform_fee, 5);
    }

    #[tokio::test]
    async fn clones_share_the_same_cache() {
        let store = Store::new();
        let handle = store.clone();
        handle
            .set_donations(vec![TransactionInfo {
                public_key: "pk".to_string(),
                cid: 1,
                owner: "o".to_string(),
                amount: 1.0,
                timestamp: 0,
                credited: true,
            }])
            .await;
        assert_eq!(store.donations().await.len(), 1);
    }
}
