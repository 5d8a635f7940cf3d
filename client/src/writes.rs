//! Write operations: build one instruction, submit it, await finalization.
//!
//! Each operation derives the remote addresses it touches from the program's
//! seed rules, reads whatever counter state it needs to key a *new* record
//! (donations and withdrawals are uniquely keyed by actor, campaign and
//! sequence number), converts the user's decimal SOL amount to lamports
//! rounding down, and submits exactly one instruction. Remote rejections
//! (insufficient funds, unauthorized actor, inactive campaign, fee bound)
//! propagate unmodified — business rules are decided on-chain, and nothing
//! here retries.
//!
//! The sole client-side validation is the platform fee upper bound, checked
//! before any RPC round trip.
//!
//! Known hazard, inherited from the program's keying scheme: two
//! near-simultaneous donations from the same actor both read the same
//! `donors` counter and derive the same next-record address; the second
//! submission fails closed on-chain. Serializing that is the program's job,
//! not this client's.

use std::time::Duration;

use borsh::BorshSerialize;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::signer::Signer;
use solana_sdk::system_program;
use solana_sdk::transaction::Transaction as SolanaTransaction;
use tracing::info;

use crate::accounts::{anchor_discriminator, decode_account, Campaign, ProgramState};
use crate::errors::{ClientError, Result};
use crate::helpers::to_lamports;
use crate::pda;
use crate::provider::Provider;

/// Upper bound on the platform fee percentage, checked client-side to avoid
/// a wasted round trip.
pub const MAX_PLATFORM_FEE: u64 = 10;

const CONFIRM_ATTEMPTS: u32 = 60;
const CONFIRM_INTERVAL: Duration = Duration::from_secs(2);

#[derive(BorshSerialize)]
struct CreateCampaignArgs {
    title: String,
    description: String,
    image_url: String,
    goal: u64,
}

#[derive(BorshSerialize)]
struct UpdateCampaignArgs {
    cid: u64,
    title: String,
    description: String,
    image_url: String,
    goal: u64,
}

#[derive(BorshSerialize)]
#[cfg_attr(test, derive(borsh::BorshDeserialize))]
struct AmountArgs {
    cid: u64,
    amount: u64,
}

#[derive(BorshSerialize)]
struct DeleteCampaignArgs {
    cid: u64,
}

#[derive(BorshSerialize)]
struct UpdatePlatformSettingsArgs {
    new_fee: u64,
}

/// Create a new campaign. The next content id comes from the platform
/// state's running counter.
pub async fn create_campaign(
    provider: &Provider,
    title: String,
    description: String,
    image_url: String,
    goal_sol: f64,
) -> Result<Signature> {
    let state_pda = pda::program_state_pda(&provider.program_id);
    let state = fetch_state(provider, &state_pda).await?;
    let cid = state.campaign_count + 1;
    let campaign_pda = pda::campaign_pda(&provider.program_id, cid);

    let instruction = Instruction {
        program_id: provider.program_id,
        accounts: vec![
            AccountMeta::new(state_pda, false),
            AccountMeta::new(campaign_pda, false),
            AccountMeta::new(provider.identity(), true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: instruction_data(
            "create_campaign",
            &CreateCampaignArgs {
                title,
                description,
                image_url,
                goal: to_lamports(goal_sol),
            },
        ),
    };

    submit(provider, instruction, true).await
}

/// Update the title, description, image and goal of an existing campaign.
pub async fn update_campaign(
    provider: &Provider,
    address: &Pubkey,
    title: String,
    description: String,
    image_url: String,
    goal_sol: f64,
) -> Result<Signature> {
    let campaign = fetch_campaign(provider, address).await?;
    let campaign_pda = pda::campaign_pda(&provider.program_id, campaign.cid);

    let instruction = Instruction {
        program_id: provider.program_id,
        accounts: vec![
            AccountMeta::new(campaign_pda, false),
            AccountMeta::new(provider.identity(), true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: instruction_data(
            "update_campaign",
            &UpdateCampaignArgs {
                cid: campaign.cid,
                title,
                description,
                image_url,
                goal: to_lamports(goal_sol),
            },
        ),
    };

    submit(provider, instruction, true).await
}

/// Donate `amount_sol` to the campaign at `address`. The donation record's
/// address is keyed by this donor's next sequence number.
pub async fn donate_to_campaign(
    provider: &Provider,
    address: &Pubkey,
    amount_sol: f64,
) -> Result<Signature> {
    let campaign = fetch_campaign(provider, address).await?;
    let campaign_pda = pda::campaign_pda(&provider.program_id, campaign.cid);
    let transaction_pda = pda::donation_pda(
        &provider.program_id,
        &provider.identity(),
        campaign.cid,
        campaign.donors + 1,
    );

    let instruction = Instruction {
        program_id: provider.program_id,
        accounts: vec![
            AccountMeta::new(campaign_pda, false),
            AccountMeta::new(transaction_pda, false),
            AccountMeta::new(provider.identity(), true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: instruction_data(
            "donate",
            &AmountArgs {
                cid: campaign.cid,
                amount: to_lamports(amount_sol),
            },
        ),
    };

    submit(provider, instruction, true).await
}

/// Withdraw `amount_sol` from a campaign the caller created. The platform
/// fee account comes from the program state.
pub async fn withdraw_from_campaign(
    provider: &Provider,
    address: &Pubkey,
    amount_sol: f64,
) -> Result<Signature> {
    let campaign = fetch_campaign(provider, address).await?;
    let campaign_pda = pda::campaign_pda(&provider.program_id, campaign.cid);
    let transaction_pda = pda::withdrawal_pda(
        &provider.program_id,
        &provider.identity(),
        campaign.cid,
        campaign.withdrawals + 1,
    );
    let state_pda = pda::program_state_pda(&provider.program_id);
    let state = fetch_state(provider, &state_pda).await?;

    let instruction = Instruction {
        program_id: provider.program_id,
        accounts: vec![
            AccountMeta::new(campaign_pda, false),
            AccountMeta::new(transaction_pda, false),
            AccountMeta::new(provider.identity(), true),
            AccountMeta::new(state_pda, false),
            AccountMeta::new(state.platform_address, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: instruction_data(
            "withdraw",
            &AmountArgs {
                cid: campaign.cid,
                amount: to_lamports(amount_sol),
            },
        ),
    };

    submit(provider, instruction, true).await
}

/// Close a campaign. After this the program rejects further donations and
/// withdrawals; the signature is returned without waiting for finalization.
pub async fn close_campaign(provider: &Provider, address: &Pubkey) -> Result<Signature> {
    let campaign = fetch_campaign(provider, address).await?;
    let campaign_pda = pda::campaign_pda(&provider.program_id, campaign.cid);

    let instruction = Instruction {
        program_id: provider.program_id,
        accounts: vec![
            AccountMeta::new(provider.identity(), true),
            AccountMeta::new(campaign_pda, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: instruction_data("delete_campaign", &DeleteCampaignArgs { cid: campaign.cid }),
    };

    submit(provider, instruction, false).await
}

/// Set the platform fee percentage. Bounded client-side before any RPC call;
/// authorization is decided by the program.
pub async fn update_platform_fee(provider: &Provider, fee_percent: u64) -> Result<Signature> {
    if fee_percent > MAX_PLATFORM_FEE {
        return Err(ClientError::Validation(format!(
            "platform fee must be at most {MAX_PLATFORM_FEE}%, got {fee_percent}%"
        )));
    }

    let state_pda = pda::program_state_pda(&provider.program_id);

    let instruction = Instruction {
        program_id: provider.program_id,
        accounts: vec![
            AccountMeta::new(provider.identity(), true),
            AccountMeta::new(state_pda, false),
        ],
        data: instruction_data(
            "update_platform_settings",
            &UpdatePlatformSettingsArgs {
                new_fee: fee_percent,
            },
        ),
    };

    submit(provider, instruction, false).await
}

/// Anchor instruction encoding: 8-byte method discriminator followed by the
/// Borsh-serialized arguments.
fn instruction_data<T: BorshSerialize>(method: &str, args: &T) -> Vec<u8> {
    let mut data = anchor_discriminator("global", method).to_vec();
    data.extend(borsh::to_vec(args).expect("borsh encoding of instruction args"));
    data
}

async fn fetch_campaign(provider: &Provider, address: &Pubkey) -> Result<Campaign> {
    let account = provider.rpc().get_account(address).await?;
    decode_account::<Campaign>(&account.data)
}

async fn fetch_state(provider: &Provider, address: &Pubkey) -> Result<ProgramState> {
    let account = provider.rpc().get_account(address).await?;
    decode_account::<ProgramState>(&account.data)
}

/// Sign, submit, and optionally wait for the finalized commitment level.
/// At-most-once: a confirmation timeout is reported, never resubmitted.
async fn submit(
    provider: &Provider,
    instruction: Instruction,
    wait_finalized: bool,
) -> Result<Signature> {
    let payer = provider.signer()?;
    let blockhash = provider.rpc().get_latest_blockhash().await?;
    let transaction = SolanaTransaction::new_signed_with_payer(
        &[instruction],
        Some(&payer.pubkey()),
        &[payer],
        blockhash,
    );

    let signature = provider.rpc().send_transaction(&transaction).await?;
    info!("Submitted transaction {signature}");

    if wait_finalized {
        confirm_finalized(provider, &signature).await?;
    }
    Ok(signature)
}

async fn confirm_finalized(provider: &Provider, signature: &Signature) -> Result<()> {
    for _ in 0..CONFIRM_ATTEMPTS {
        let confirmed = provider
            .rpc()
            .confirm_transaction_with_commitment(signature, CommitmentConfig::finalized())
            .await?;
        if confirmed.value {
            info!("Transaction {signature} finalized");
            return Ok(());
        }
        tokio::time::sleep(CONFIRM_INTERVAL).await;
    }
    Err(ClientError::ConfirmTimeout(signature.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::provider::get_provider_readonly;
    use borsh::BorshDeserialize;
    use std::str::FromStr;

    fn offline_provider() -> Provider {
        // Nothing listens here; tests below must fail before any RPC call.
        get_provider_readonly(&Config {
            rpc_url: "http://127.0.0.1:1".to_string(),
            program_id: Pubkey::from_str("11111111111111111111111111111111").unwrap(),
            wallet_keypair: None,
            api_port: 0,
            refresh_interval_secs: 1,
            cluster: "devnet".to_string(),
        })
    }

    #[tokio::test]
    async fn fee_above_bound_is_rejected_before_submission() {
        let err = update_platform_fee(&offline_provider(), 11).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn fee_at_bound_passes_validation() {
        // 10% clears the bound check and reaches the signing step, which on
        // a read-only provider surfaces a capability error.
        let err = update_platform_fee(&offline_provider(), 10).await.unwrap_err();
        assert!(matches!(err, ClientError::Capability(_)));
    }

    #[tokio::test]
    async fn readonly_provider_never_reaches_the_network() {
        let err = update_platform_fee(&offline_provider(), 0).await.unwrap_err();
        assert!(matches!(err, ClientError::Capability(_)));
    }

    #[test]
    fn instruction_data_layout() {
        let args = AmountArgs {
            cid: 3,
            amount: 2_500_000_000,
        };
        let data = instruction_data("donate", &args);

        assert_eq!(data[..8], anchor_discriminator("global", "donate"));
        let decoded = AmountArgs::try_from_slice(&data[8..]).unwrap();
        assert_eq!(decoded.cid, 3);
        assert_eq!(decoded.amount, 2_500_000_000);
    }
}
