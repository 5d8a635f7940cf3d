//! Application configuration loaded from environment variables.

use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

use crate::errors::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Solana JSON-RPC endpoint (e.g. https://api.devnet.solana.com)
    pub rpc_url: String,
    /// Address of the crowdfunding program
    pub program_id: Pubkey,
    /// Optional path to a JSON keypair file; absent means read-only deployment
    pub wallet_keypair: Option<String>,
    /// Port for the REST API server
    pub api_port: u16,
    /// How often (in seconds) the background task re-fetches the cached campaign
    pub refresh_interval_secs: u64,
    /// Cluster label used in block-explorer links
    pub cluster: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let program_id = env_var("PROGRAM_ID").map_err(|_| {
            ClientError::Config("PROGRAM_ID environment variable is required".to_string())
        })?;

        Ok(Config {
            rpc_url: env_var("RPC_URL")
                .unwrap_or_else(|_| "https://api.devnet.solana.com".to_string()),
            program_id: Pubkey::from_str(&program_id)
                .map_err(|_| ClientError::Config("Invalid PROGRAM_ID".to_string()))?,
            wallet_keypair: env_var("WALLET_KEYPAIR").ok(),
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| ClientError::Config("Invalid API_PORT".to_string()))?,
            refresh_interval_secs: env_var("REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .map_err(|_| ClientError::Config("Invalid REFRESH_INTERVAL_SECS".to_string()))?,
            cluster: env_var("CLUSTER").unwrap_or_else(|_| "devnet".to_string()),
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ClientError::Config(format!("Missing env var: {key}")))
}
