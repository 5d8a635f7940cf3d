//! On-chain account layouts owned by the crowdfunding program.
//!
//! These mirror the program's Anchor account structs byte for byte: an 8-byte
//! discriminator (`sha256("account:<Name>")[..8]`) followed by the Borsh
//! encoding of the fields in declaration order. Decoding checks the
//! discriminator and fails closed on any mismatch rather than propagating a
//! wrongly-typed record.

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;

use crate::errors::{ClientError, Result};

/// Singleton platform state, kept at the `"program_state"` PDA.
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct ProgramState {
    pub initialized: bool,
    pub campaign_count: u64,
    pub platform_fee: u64,
    pub platform_address: Pubkey,
}

/// One crowdfunding campaign, keyed by its content id (`cid`).
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct Campaign {
    pub cid: u64,
    pub creator: Pubkey,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub goal: u64,
    pub amount_raised: u64,
    pub timestamp: u64,
    pub donors: u64,
    pub withdrawals: u64,
    pub balance: u64,
    pub active: bool,
}

/// A donation or withdrawal record. `credited` is true for donations and
/// false for withdrawals; both live in the same account type on-chain.
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct Transaction {
    pub owner: Pubkey,
    pub cid: u64,
    pub amount: u64,
    pub timestamp: u64,
    pub credited: bool,
}

/// Marker trait tying a layout to its Anchor account name.
pub trait AccountType: BorshDeserialize {
    const NAME: &'static str;

    fn discriminator() -> [u8; 8] {
        anchor_discriminator("account", Self::NAME)
    }
}

impl AccountType for ProgramState {
    const NAME: &'static str = "ProgramState";
}

impl AccountType for Campaign {
    const NAME: &'static str = "Campaign";
}

impl AccountType for Transaction {
    const NAME: &'static str = "Transaction";
}

/// Compute an Anchor discriminator, e.g. `account:Campaign` or
/// `global:donate`.
pub fn anchor_discriminator(namespace: &str, name: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(format!("{namespace}:{name}").as_bytes());
    let hash = hasher.finalize();
    let mut disc = [0u8; 8];
    disc.copy_from_slice(&hash[..8]);
    disc
}

/// Decode raw account data into `T`, verifying the discriminator first.
///
/// Anchor pads accounts to their allocated size, so trailing bytes after the
/// Borsh payload are expected and ignored.
pub fn decode_account<T: AccountType>(data: &[u8]) -> Result<T> {
    if data.len() < 8 {
        return Err(ClientError::Decode(format!(
            "{}: account data too short ({} bytes)",
            T::NAME,
            data.len()
        )));
    }
    if data[..8] != T::discriminator() {
        return Err(ClientError::Decode(format!(
            "{}: discriminator mismatch",
            T::NAME
        )));
    }
    let mut payload = &data[8..];
    T::deserialize(&mut payload)
        .map_err(|e| ClientError::Decode(format!("{}: {e}", T::NAME)))
}

/// Encode `value` the way the program stores it (discriminator + Borsh).
#[cfg(test)]
pub fn encode_account<T: AccountType + BorshSerialize>(value: &T) -> Vec<u8> {
    let mut data = T::discriminator().to_vec();
    data.extend(borsh::to_vec(value).expect("borsh encoding"));
    data
}
