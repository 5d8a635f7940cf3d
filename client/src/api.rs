//! Axum REST API handlers.
//!
//! Read endpoints work against the read-only provider and are always
//! available. Write endpoints need the signing provider; when no wallet is
//! configured they answer 503 without touching the network. Write handlers
//! do not pre-check the campaign's `active` flag — the program is the
//! arbiter, and an inactive-campaign rejection comes back like any other
//! remote error.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

use crate::errors::{ClientError, Result};
use crate::helpers::explorer_tx_url;
use crate::models::{CampaignInfo, ProgramStateInfo, TransactionInfo};
use crate::provider::Provider;
use crate::store::Store;
use crate::{reads, writes};

pub struct ApiState {
    /// Always present; used by every read endpoint.
    pub reader: Provider,
    /// Present only when a wallet keypair is configured.
    pub signer: Option<Provider>,
    pub store: Store,
    pub cluster: String,
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CampaignRequest {
    pub title: String,
    pub description: String,
    pub image_url: String,
    /// Funding goal in SOL.
    pub goal: f64,
}

#[derive(Deserialize)]
pub struct AmountRequest {
    /// Amount in SOL.
    pub amount: f64,
}

#[derive(Deserialize)]
pub struct FeeRequest {
    /// Platform fee in percent.
    pub fee: u64,
}

#[derive(Serialize)]
pub struct CampaignsResponse {
    pub count: usize,
    pub campaigns: Vec<CampaignInfo>,
}

#[derive(Serialize)]
pub struct CampaignResponse {
    pub created_at: String,
    #[serde(flatten)]
    pub campaign: CampaignInfo,
}

#[derive(Serialize)]
pub struct TransactionsResponse {
    pub campaign: String,
    pub count: usize,
    pub transactions: Vec<TransactionInfo>,
}

#[derive(Serialize)]
pub struct StateResponse {
    #[serde(flatten)]
    pub state: ProgramStateInfo,
}

#[derive(Serialize)]
pub struct OwnerResponse {
    pub owner: String,
}

#[derive(Serialize)]
pub struct SubmittedResponse {
    pub signature: String,
    pub explorer_url: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ─────────────────────────────────────────────────────────
// Read handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /campaigns` — every campaign still accepting donations.
pub async fn get_active_campaigns(State(state): State<Arc<ApiState>>) -> Response {
    match reads::fetch_active_campaigns(&state.reader).await {
        Ok(campaigns) => Json(CampaignsResponse {
            count: campaigns.len(),
            campaigns,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /campaigns/:pda`
pub async fn get_campaign(
    State(state): State<Arc<ApiState>>,
    Path(pda): Path<String>,
) -> Response {
    let result = async {
        let address = parse_address(&pda)?;
        reads::fetch_campaign(&state.reader, &state.store, &address).await
    }
    .await;

    match result {
        Ok(campaign) => Json(CampaignResponse {
            created_at: rfc3339(campaign.timestamp),
            campaign,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /campaigns/:pda/donations`
pub async fn get_donations(
    State(state): State<Arc<ApiState>>,
    Path(pda): Path<String>,
) -> Response {
    let result = async {
        let address = parse_address(&pda)?;
        reads::fetch_all_transactions(&state.reader, &state.store, &address).await
    }
    .await;
    transactions_response(pda, result)
}

/// `GET /campaigns/:pda/withdrawals`
pub async fn get_withdrawals(
    State(state): State<Arc<ApiState>>,
    Path(pda): Path<String>,
) -> Response {
    let result = async {
        let address = parse_address(&pda)?;
        reads::fetch_all_withdraw_transactions(&state.reader, &state.store, &address).await
    }
    .await;
    transactions_response(pda, result)
}

/// `GET /creators/:pubkey/campaigns`
pub async fn get_creator_campaigns(
    State(state): State<Arc<ApiState>>,
    Path(pubkey): Path<String>,
) -> Response {
    let result = async {
        let creator = parse_address(&pubkey)?;
        reads::fetch_user_campaigns(&state.reader, &creator).await
    }
    .await;

    match result {
        Ok(campaigns) => Json(CampaignsResponse {
            count: campaigns.len(),
            campaigns,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /state` — platform administrator, campaign counter, fee.
pub async fn get_program_state(State(state): State<Arc<ApiState>>) -> Response {
    match reads::fetch_program_state(&state.reader, &state.store).await {
        Ok(info) => Json(StateResponse { state: info }).into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /state/owner` — just the platform administrator's address, for
/// admin gating in consumers.
pub async fn get_program_owner(State(state): State<Arc<ApiState>>) -> Response {
    match reads::program_owner(&state.reader).await {
        Ok(owner) => Json(OwnerResponse { owner }).into_response(),
        Err(e) => error_response(e),
    }
}

// ─────────────────────────────────────────────────────────
// Write handlers
// ─────────────────────────────────────────────────────────

/// `POST /campaigns`
pub async fn create_campaign(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<CampaignRequest>,
) -> Response {
    let result = async {
        let provider = signing_provider(&state)?;
        writes::create_campaign(provider, req.title, req.description, req.image_url, req.goal)
            .await
    }
    .await;
    submitted_response(&state, result)
}

/// `PUT /campaigns/:pda`
pub async fn update_campaign(
    State(state): State<Arc<ApiState>>,
    Path(pda): Path<String>,
    Json(req): Json<CampaignRequest>,
) -> Response {
    let result = async {
        let provider = signing_provider(&state)?;
        let address = parse_address(&pda)?;
        writes::update_campaign(
            provider,
            &address,
            req.title,
            req.description,
            req.image_url,
            req.goal,
        )
        .await
    }
    .await;
    submitted_response(&state, result)
}

/// `POST /campaigns/:pda/donations`
pub async fn donate(
    State(state): State<Arc<ApiState>>,
    Path(pda): Path<String>,
    Json(req): Json<AmountRequest>,
) -> Response {
    let result = async {
        let provider = signing_provider(&state)?;
        let address = parse_address(&pda)?;
        writes::donate_to_campaign(provider, &address, req.amount).await
    }
    .await;
    submitted_response(&state, result)
}

/// `POST /campaigns/:pda/withdrawals`
pub async fn withdraw(
    State(state): State<Arc<ApiState>>,
    Path(pda): Path<String>,
    Json(req): Json<AmountRequest>,
) -> Response {
    let result = async {
        let provider = signing_provider(&state)?;
        let address = parse_address(&pda)?;
        writes::withdraw_from_campaign(provider, &address, req.amount).await
    }
    .await;
    submitted_response(&state, result)
}

/// `DELETE /campaigns/:pda`
pub async fn close_campaign(
    State(state): State<Arc<ApiState>>,
    Path(pda): Path<String>,
) -> Response {
    let result = async {
        let provider = signing_provider(&state)?;
        let address = parse_address(&pda)?;
        writes::close_campaign(provider, &address).await
    }
    .await;
    submitted_response(&state, result)
}

/// `PUT /state/fee`
pub async fn update_platform_fee(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<FeeRequest>,
) -> Response {
    let result = async {
        let provider = signing_provider(&state)?;
        writes::update_platform_fee(provider, req.fee).await
    }
    .await;
    submitted_response(&state, result)
}

// ─────────────────────────────────────────────────────────
// Shared plumbing
// ─────────────────────────────────────────────────────────

fn signing_provider(state: &ApiState) -> Result<&Provider> {
    state.signer.as_ref().ok_or_else(|| {
        ClientError::Capability("no wallet configured; write operations are unavailable".to_string())
    })
}

fn parse_address(value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value)
        .map_err(|_| ClientError::Validation(format!("invalid address: {value}")))
}

fn rfc3339(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

fn transactions_response(campaign: String, result: Result<Vec<TransactionInfo>>) -> Response {
    match result {
        Ok(transactions) => Json(TransactionsResponse {
            campaign,
            count: transactions.len(),
            transactions,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

fn submitted_response(state: &ApiState, result: Result<Signature>) -> Response {
    match result {
        Ok(signature) => {
            let signature = signature.to_string();
            let explorer_url = explorer_tx_url(&signature, &state.cluster);
            Json(SubmittedResponse {
                signature,
                explorer_url,
            })
            .into_response()
        }
        Err(e) => error_response(e),
    }
}

fn error_response(e: ClientError) -> Response {
    let status = if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        match e {
            ClientError::Validation(_) => StatusCode::BAD_REQUEST,
            ClientError::Capability(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_addresses_are_validation_errors() {
        let err = parse_address("not-base58!").unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn valid_addresses_parse() {
        assert!(parse_address("11111111111111111111111111111111").is_ok());
    }

    #[test]
    fn rfc3339_renders_millisecond_timestamps() {
        assert_eq!(rfc3339(1_704_067_200_000), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn error_statuses() {
        let v = error_response(ClientError::Validation("x".to_string()));
        assert_eq!(v.status(), StatusCode::BAD_REQUEST);

        let c = error_response(ClientError::Capability("x".to_string()));
        assert_eq!(c.status(), StatusCode::SERVICE_UNAVAILABLE);

        let d = error_response(ClientError::Decode("x".to_string()));
        assert_eq!(d.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
