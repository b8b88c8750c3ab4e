//! Application layer containing the ledger's business rules.
//!
//! `WalletLedger` owns the wallet state transitions; `dispatch` maps external
//! function names and positional string arguments onto them.

pub mod dispatch;
pub mod engine;
