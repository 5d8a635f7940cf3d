//! Crowdfunding client — entry point.
//!
//! Builds a read-only provider (and a signing one when a wallet keypair is
//! configured), starts the background campaign refresher, and serves the
//! Axum REST API for frontend / admin consumption.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cfund_client::api::{self, ApiState};
use cfund_client::config::Config;
use cfund_client::provider::{get_provider, get_provider_readonly, load_wallet};
use cfund_client::store::Store;
use cfund_client::sync::{self, SyncState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    // Load config from environment.
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Providers: reads always work; writes need the configured wallet.
    let reader = get_provider_readonly(&config);
    let wallet = load_wallet(&config).map_err(|e| anyhow::anyhow!("{e}"))?;
    let signer = get_provider(&config, wallet);
    if signer.is_none() {
        info!("No wallet configured — running read-only");
    }

    let store = Store::new();

    // ─── Background refresher ─────────────────────────────
    let shutdown = CancellationToken::new();
    let sync_state = Arc::new(SyncState {
        provider: reader.clone(),
        store: store.clone(),
        config: config.clone(),
    });
    tokio::spawn(sync::run(sync_state, shutdown.clone()));

    // ─── REST API ─────────────────────────────────────────
    let api_state = Arc::new(ApiState {
        reader,
        signer,
        store,
        cluster: config.cluster.clone(),
    });

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/campaigns", get(api::get_active_campaigns))
        .route("/campaigns", post(api::create_campaign))
        .route("/campaigns/:pda", get(api::get_campaign))
        .route("/campaigns/:pda", put(api::update_campaign))
        .route("/campaigns/:pda", delete(api::close_campaign))
        .route("/campaigns/:pda/donations", get(api::get_donations))
        .route("/campaigns/:pda/donations", post(api::donate))
        .route("/campaigns/:pda/withdrawals", get(api::get_withdrawals))
        .route("/campaigns/:pda/withdrawals", post(api::withdraw))
        .route("/creators/:pubkey/campaigns", get(api::get_creator_campaigns))
        .route("/state", get(api::get_program_state))
        .route("/state/owner", get(api::get_program_owner))
        .route("/state/fee", put(api::update_platform_fee))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(api_state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            shutdown.cancel();
        })
        .await?;

    Ok(())
}
