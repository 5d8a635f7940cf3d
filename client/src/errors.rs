//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Account decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Capability error: {0}")]
    Capability(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Confirmation timed out for signature {0}")]
    ConfirmTimeout(String),
}

impl ClientError {
    /// True when the underlying RPC failure was an account lookup miss.
    /// The node reports these as `AccountNotFound` in the error payload.
    pub fn is_not_found(&self) -> bool {
        match self {
            ClientError::Rpc(e) => e.to_string().contains("AccountNotFound"),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
