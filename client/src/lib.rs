//! Client for the on-chain crowdfunding program.
//!
//! The program owns the ledger and every business rule (donation accounting,
//! withdrawal limits, fee enforcement); this crate renders its state into
//! plain read models, derives the deterministic account addresses it needs,
//! builds and submits signed instructions, and keeps a small in-memory
//! mirror of the last-fetched campaign. See `reads`/`writes` for the
//! operation surface and `api` for the REST layer the binary serves.

pub mod accounts;
pub mod api;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod models;
pub mod pda;
pub mod provider;
pub mod reads;
pub mod store;
pub mod sync;
pub mod writes;
