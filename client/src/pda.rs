//! Deterministic program-derived addresses.
//!
//! The seed strings and component ordering here must stay bit-exact with the
//! on-chain program's `seeds = [..]` constraints; a mismatch makes the remote
//! call fail closed. All numeric components are little-endian `u64`.

use solana_sdk::pubkey::Pubkey;

pub const PROGRAM_STATE_SEED: &[u8] = b"program_state";
pub const CAMPAIGN_SEED: &[u8] = b"campaign";
pub const DONOR_SEED: &[u8] = b"donor";
pub const WITHDRAW_SEED: &[u8] = b"withdraw";

/// PDA of the singleton platform state.
pub fn program_state_pda(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[PROGRAM_STATE_SEED], program_id).0
}

/// PDA of the campaign with content id `cid`.
pub fn campaign_pda(program_id: &Pubkey, cid: u64) -> Pubkey {
    Pubkey::find_program_address(&[CAMPAIGN_SEED, &cid.to_le_bytes()], program_id).0
}

/// PDA of a donation record, keyed by (donor, campaign, sequence number).
pub fn donation_pda(program_id: &Pubkey, donor: &Pubkey, cid: u64, seq: u64) -> Pubkey {
    Pubkey::find_program_address(
        &[
            DONOR_SEED,
            donor.as_ref(),
            &cid.to_le_bytes(),
            &seq.to_le_bytes(),
        ],
        program_id,
    )
    .0
}

/// PDA of a withdrawal record, keyed by (creator, campaign, sequence number).
pub fn withdrawal_pda(program_id: &Pubkey, creator: &Pubkey, cid: u64, seq: u64) -> Pubkey {
    Pubkey::find_program_address(
        &[
            WITHDRAW_SEED,
            creator.as_ref(),
            &cid.to_le_bytes(),
            &seq.to_le_bytes(),
        ],
        program_id,
    )
    .0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let program_id = Pubkey::new_unique();
        let donor = Pubkey::new_unique();
        let a = donation_pda(&program_id, &donor, 3, 4);
        let b = donation_pda(&program_id, &donor, 3, 4);
        assert_eq!(a, b);

        assert_eq!(
            campaign_pda(&program_id, 11),
            campaign_pda(&program_id, 11)
        );
        assert_eq!(program_state_pda(&program_id), program_state_pda(&program_id));
    }

    #[test]
    fn donation_and_withdrawal_namespaces_are_disjoint() {
        let program_id = Pubkey::new_unique();
        let actor = Pubkey::new_unique();
        assert_ne!(
            donation_pda(&program_id, &actor, 1, 1),
            withdrawal_pda(&program_id, &actor, 1, 1)
        );
    }

    #[test]
    fn sequence_number_changes_the_address() {
        let program_id = Pubkey::new_unique();
        let donor = Pubkey::new_unique();
        assert_ne!(
            donation_pda(&program_id, &donor, 1, 1),
            donation_pda(&program_id, &donor, 1, 2)
        );
    }

    #[test]
    fn campaigns_are_keyed_by_cid() {
        let program_id = Pubkey::new_unique();
        assert_ne!(campaign_pda(&program_id, 1), campaign_pda(&program_id, 2));
    }
}
