//! Read operations against the crowdfunding program.
//!
//! Every fetch decodes raw accounts (failing closed on a discriminator or
//! shape mismatch), serializes them into display records, and — where the
//! result is the "current" campaign view — mirrors them into the injected
//! [`Store`]. Account-not-found conditions propagate to the caller
//! unmodified.
//!
//! List fetches pull *all* accounts of a type and filter locally. That is an
//! O(total accounts) scan per call, acceptable while the program keeps
//! overall volume small; pagination is out of scope.

use solana_account_decoder::UiAccountEncoding;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::accounts::{decode_account, AccountType, Campaign, ProgramState, Transaction};
use crate::errors::Result;
use crate::models::{
    campaign_info, program_state_info, transaction_info, CampaignInfo, ProgramStateInfo,
    TransactionInfo,
};
use crate::pda;
use crate::provider::Provider;
use crate::store::Store;

/// Fetch a single campaign by address, cache it, and return it.
pub async fn fetch_campaign(
    provider: &Provider,
    store: &Store,
    address: &Pubkey,
) -> Result<CampaignInfo> {
    let account = provider.rpc().get_account(address).await?;
    let campaign = decode_account::<Campaign>(&account.data)?;
    let info = campaign_info(address, &campaign);
    store.set_campaign(info.clone()).await;
    Ok(info)
}

/// Fetch every campaign whose `active` flag is set.
pub async fn fetch_active_campaigns(provider: &Provider) -> Result<Vec<CampaignInfo>> {
    let campaigns = fetch_accounts::<Campaign>(provider).await?;
    Ok(active_only(&campaigns))
}

/// Fetch every campaign created by `creator`.
pub async fn fetch_user_campaigns(
    provider: &Provider,
    creator: &Pubkey,
) -> Result<Vec<CampaignInfo>> {
    let campaigns = fetch_accounts::<Campaign>(provider).await?;
    Ok(by_creator(&campaigns, creator))
}

/// Fetch the donation records of the campaign at `address`, cache and return
/// them.
pub async fn fetch_all_transactions(
    provider: &Provider,
    store: &Store,
    address: &Pubkey,
) -> Result<Vec<TransactionInfo>> {
    let donations = fetch_campaign_transactions(provider, address, true).await?;
    store.set_donations(donations.clone()).await;
    Ok(donations)
}

/// Fetch the withdrawal records of the campaign at `address`, cache and
/// return them.
pub async fn fetch_all_withdraw_transactions(
    provider: &Provider,
    store: &Store,
    address: &Pubkey,
) -> Result<Vec<TransactionInfo>> {
    let withdrawals = fetch_campaign_transactions(provider, address, false).await?;
    store.set_withdrawals(withdrawals.clone()).await;
    Ok(withdrawals)
}

/// Fetch the singleton platform state, cache it, and return it.
pub async fn fetch_program_state(provider: &Provider, store: &Store) -> Result<ProgramStateInfo> {
    let address = pda::program_state_pda(&provider.program_id);
    let account = provider.rpc().get_account(&address).await?;
    let state = decode_account::<ProgramState>(&account.data)?;
    let info = program_state_info(&state);
    store.set_program_state(info.clone()).await;
    Ok(info)
}

/// The platform administrator's address, base58.
pub async fn program_owner(provider: &Provider) -> Result<String> {
    let address = pda::program_state_pda(&provider.program_id);
    let account = provider.rpc().get_account(&address).await?;
    let state = decode_account::<ProgramState>(&account.data)?;
    Ok(state.platform_address.to_string())
}

async fn fetch_campaign_transactions(
    provider: &Provider,
    address: &Pubkey,
    credited: bool,
) -> Result<Vec<TransactionInfo>> {
    let account = provider.rpc().get_account(address).await?;
    let campaign = decode_account::<Campaign>(&account.data)?;
    let records = fetch_accounts::<Transaction>(provider).await?;
    Ok(select_transactions(&records, campaign.cid, credited))
}

/// Fetch and decode every account of type `T` owned by the program, using a
/// discriminator memcmp filter so other account types never reach the
/// decoder.
async fn fetch_accounts<T: AccountType>(provider: &Provider) -> Result<Vec<(Pubkey, T)>> {
    let config = RpcProgramAccountsConfig {
        filters: Some(vec![RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
            0,
            &T::discriminator(),
        ))]),
        account_config: RpcAccountInfoConfig {
            encoding: Some(UiAccountEncoding::Base64),
            ..Default::default()
        },
        ..Default::default()
    };

    let accounts = provider
        .rpc()
        .get_program_accounts_with_config(&provider.program_id, config)
        .await?;
    debug!("Fetched {} {} accounts", accounts.len(), T::NAME);

    accounts
        .iter()
        .map(|(address, account)| decode_account::<T>(&account.data).map(|v| (*address, v)))
        .collect()
}

fn active_only(campaigns: &[(Pubkey, Campaign)]) -> Vec<CampaignInfo> {
    campaigns
        .iter()
        .filter(|(_, c)| c.active)
        .map(|(address, c)| campaign_info(address, c))
        .collect()
}

fn by_creator(campaigns: &[(Pubkey, Campaign)], creator: &Pubkey) -> Vec<CampaignInfo> {
    campaigns
        .iter()
        .filter(|(_, c)| c.creator == *creator)
        .map(|(address, c)| campaign_info(address, c))
        .collect()
}

/// Keep the records of one campaign, split by the credited flag
/// (true = donations, false = withdrawals).
fn select_transactions(
    records: &[(Pubkey, Transaction)],
    cid: u64,
    credited: bool,
) -> Vec<TransactionInfo> {
    records
        .iter()
        .filter(|(_, tx)| tx.cid == cid && tx.credited == credited)
        .map(|(address, tx)| transaction_info(address, tx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(creator: Pubkey, active: bool) -> Campaign {
        Campaign {
            cid: 1,
            creator,
            title: "t".to_string(),
            description: "d".to_string(),
            image_url: "u".to_string(),
            goal: 1_000_000_000,
            amount_raised: 0,
            timestamp: 0,
            donors: 0,
            withdrawals: 0,
            balance: 0,
            active,
        }
    }

    fn record(cid: u64, credited: bool) -> (Pubkey, Transaction) {
        (
            Pubkey::new_unique(),
            Transaction {
                owner: Pubkey::new_unique(),
                cid,
                amount: 1_000_000_000,
                timestamp: 0,
                credited,
            },
        )
    }

    #[test]
    fn active_filter_drops_closed_campaigns() {
        let creator = Pubkey::new_unique();
        let campaigns = vec![
            (Pubkey::new_unique(), campaign(creator, true)),
            (Pubkey::new_unique(), campaign(creator, false)),
            (Pubkey::new_unique(), campaign(creator, true)),
        ];
        assert_eq!(active_only(&campaigns).len(), 2);
    }

    #[test]
    fn creator_filter_matches_identity() {
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let campaigns = vec![
            (Pubkey::new_unique(), campaign(alice, true)),
            (Pubkey::new_unique(), campaign(bob, false)),
            (Pubkey::new_unique(), campaign(alice, false)),
        ];
        let mine = by_creator(&campaigns, &alice);
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|c| c.creator == alice.to_string()));
    }

    #[test]
    fn credited_flag_partitions_exactly() {
        let records = vec![
            record(1, true),
            record(1, false),
            record(1, true),
            record(2, true),
            record(1, false),
        ];

        let donations = select_transactions(&records, 1, true);
        let withdrawals = select_transactions(&records, 1, false);

        assert_eq!(donations.len(), 2);
        assert_eq!(withdrawals.len(), 2);
        assert!(donations.iter().all(|t| t.credited));
        assert!(withdrawals.iter().all(|t| !t.credited));

        // Disjoint, and together they cover every record with cid == 1.
        let total_for_cid = records.iter().filter(|(_, t)| t.cid == 1).count();
        assert_eq!(donations.len() + withdrawals.len(), total_for_cid);
        assert!(donations
            .iter()
            .all(|d| withdrawals.iter().all(|w| w.public_key != d.public_key)));
    }
}
