//! Display-ready read models.
//!
//! Raw account layouts carry lamport amounts, `Pubkey`s and chain-native
//! second timestamps. The serializers here produce the plain records the API
//! and cache hold: base58 address strings, SOL amounts, millisecond
//! timestamps. Timestamps are millisecond-resolution on every path — the
//! single-fetch and list-fetch conversions go through the same functions.

use serde::Serialize;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;

use crate::accounts::{Campaign, ProgramState, Transaction};

#[derive(Debug, Clone, Serialize)]
pub struct CampaignInfo {
    /// Campaign account address, base58.
    pub public_key: String,
    pub cid: u64,
    pub creator: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    /// Funding goal in SOL.
    pub goal: f64,
    /// Total donated over the campaign's lifetime, in SOL.
    pub amount_raised: f64,
    /// Current withdrawable balance in SOL.
    pub balance: f64,
    pub donors: u64,
    pub withdrawals: u64,
    /// Creation time, Unix milliseconds.
    pub timestamp: i64,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionInfo {
    /// Transaction record address, base58.
    pub public_key: String,
    pub cid: u64,
    pub owner: String,
    /// Amount in SOL.
    pub amount: f64,
    /// Record time, Unix milliseconds.
    pub timestamp: i64,
    /// True for donations, false for withdrawals.
    pub credited: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgramStateInfo {
    pub platform_address: String,
    pub campaign_count: u64,
    /// Platform fee in percent.
    pub platform_fee: u64,
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

pub fn campaign_info(address: &Pubkey, campaign: &Campaign) -> CampaignInfo {
    CampaignInfo {
        public_key: address.to_string(),
        cid: campaign.cid,
        creator: campaign.creator.to_string(),
        title: campaign.title.clone(),
        description: campaign.description.clone(),
        image_url: campaign.image_url.clone(),
        goal: lamports_to_sol(campaign.goal),
        amount_raised: lamports_to_sol(campaign.amount_raised),
        balance: lamports_to_sol(campaign.balance),
        donors: campaign.donors,
        withdrawals: campaign.withdrawals,
        timestamp: campaign.timestamp as i64 * 1000,
        active: campaign.active,
    }
}

pub fn transaction_info(address: &Pubkey, tx: &Transaction) -> TransactionInfo {
    TransactionInfo {
        public_key: address.to_string(),
        cid: tx.cid,
        owner: tx.owner.to_string(),
        amount: lamports_to_sol(tx.amount),
        timestamp: tx.timestamp as i64 * 1000,
        credited: tx.credited,
    }
}

pub fn program_state_info(state: &ProgramState) -> ProgramStateInfo {
    ProgramStateInfo {
        platform_address: state.platform_address.to_string(),
        campaign_count: state.campaign_count,
        platform_fee: state.platform_fee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_campaign() -> Campaign {
        Campaign {
            cid: 1,
            creator: Pubkey::new_unique(),
            title: "t".to_string(),
            description: "d".to_string(),
            image_url: "u".to_string(),
            goal: 20_000_000_000,
            amount_raised: 9_000_000_000,
            timestamp: 1_704_067_200,
            donors: 2,
            withdrawals: 0,
            balance: 9_000_000_000,
            active: true,
        }
    }

    #[test]
    fn amounts_scale_to_sol() {
        let info = campaign_info(&Pubkey::new_unique(), &raw_campaign());
        assert_eq!(info.amount_raised, 9.0);
        assert_eq!(info.goal, 20.0);
        assert_eq!(info.balance, 9.0);
    }

    #[test]
    fn counts_are_not_scaled() {
        let info = campaign_info(&Pubkey::new_unique(), &raw_campaign());
        assert_eq!(info.donors, 2);
        assert_eq!(info.withdrawals, 0);
    }

    #[test]
    fn timestamps_are_milliseconds_on_both_paths() {
        let address = Pubkey::new_unique();
        let info = campaign_info(&address, &raw_campaign());
        assert_eq!(info.timestamp, 1_704_067_200_000);

        let tx = Transaction {
            owner: Pubkey::new_unique(),
            cid: 1,
            amount: 500_000_000,
            timestamp: 1_704_067_200,
            credited: true,
        };
        let tx_info = transaction_info(&address, &tx);
        assert_eq!(tx_info.timestamp, 1_704_067_200_000);
    }

    #[test]
    fn fractional_amounts_survive() {
        let tx = Transaction {
            owner: Pubkey::new_unique(),
            cid: 1,
            amount: 1_500_000_000,
            timestamp: 0,
            credited: false,
        };
        let info = transaction_info(&Pubkey::new_unique(), &tx);
        assert_eq!(info.amount, 1.5);
    }

    #[test]
    fn addresses_render_as_base58() {
        let address = Pubkey::new_unique();
        let info = campaign_info(&address, &raw_campaign());
        assert_eq!(info.public_key, address.to_string());
    }
}
