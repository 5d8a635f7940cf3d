//! Provider selection.
//!
//! Two constructions exist, mirroring how browsing and mutating differ:
//! [`get_provider`] needs a wallet and returns `None` without one (callers
//! must treat that as "operation unavailable"), while
//! [`get_provider_readonly`] always succeeds but fails any signing attempt
//! with a capability error.

use std::sync::Arc;

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair};
use solana_sdk::signer::Signer;

use crate::config::Config;
use crate::errors::{ClientError, Result};

/// Connection to the crowdfunding program: RPC client, program id, and an
/// optional signing keypair.
#[derive(Clone)]
pub struct Provider {
    rpc: Arc<RpcClient>,
    pub program_id: Pubkey,
    wallet: Option<Arc<Keypair>>,
}

impl Provider {
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// The connected identity, or the default placeholder for read-only use.
    pub fn identity(&self) -> Pubkey {
        self.wallet
            .as_ref()
            .map(|w| w.pubkey())
            .unwrap_or_default()
    }

    pub fn can_sign(&self) -> bool {
        self.wallet.is_some()
    }

    /// The signing keypair, or a capability error on a read-only provider.
    pub fn signer(&self) -> Result<&Keypair> {
        self.wallet
            .as_deref()
            .ok_or_else(|| ClientError::Capability(
                "read-only provider cannot sign transactions".to_string(),
            ))
    }
}

/// Build a signing-capable provider. Returns `None` when no wallet is
/// available; no remote call should ever be attempted in that case.
pub fn get_provider(config: &Config, wallet: Option<Arc<Keypair>>) -> Option<Provider> {
    let wallet = wallet?;
    Some(Provider {
        rpc: Arc::new(rpc_client(config)),
        program_id: config.program_id,
        wallet: Some(wallet),
    })
}

/// Build a read-only provider backed by a placeholder identity.
pub fn get_provider_readonly(config: &Config) -> Provider {
    Provider {
        rpc: Arc::new(rpc_client(config)),
        program_id: config.program_id,
        wallet: None,
    }
}

/// Load the wallet keypair named by the config, if any.
pub fn load_wallet(config: &Config) -> Result<Option<Arc<Keypair>>> {
    match &config.wallet_keypair {
        None => Ok(None),
        Some(path) => {
            let keypair = read_keypair_file(path).map_err(|e| {
                ClientError::Config(format!("failed to read keypair {path}: {e}"))
            })?;
            Ok(Some(Arc::new(keypair)))
        }
    }
}

fn rpc_client(config: &Config) -> RpcClient {
    RpcClient::new_with_commitment(config.rpc_url.clone(), CommitmentConfig::confirmed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn test_config() -> Config {
        Config {
            rpc_url: "http://localhost:8899".to_string(),
            program_id: Pubkey::from_str("11111111111111111111111111111111").unwrap(),
            wallet_keypair: None,
            api_port: 3001,
            refresh_interval_secs: 15,
            cluster: "devnet".to_string(),
        }
    }

    #[test]
    fn no_wallet_means_no_provider() {
        assert!(get_provider(&test_config(), None).is_none());
    }

    #[test]
    fn wallet_yields_signing_provider() {
        let wallet = Arc::new(Keypair::new());
        let provider = get_provider(&test_config(), Some(wallet.clone())).unwrap();
        assert!(provider.can_sign());
        assert_eq!(provider.identity(), wallet.pubkey());
        assert!(provider.signer().is_ok());
    }

    #[test]
    fn readonly_provider_cannot_sign() {
        let provider = get_provider_readonly(&test_config());
        assert!(!provider.can_sign());
        assert_eq!(provider.identity(), Pubkey::default());
        let err = provider.signer().unwrap_err();
        assert!(matches!(err, ClientError::Capability(_)));
    }
}
