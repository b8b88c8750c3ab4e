//! Engine configuration.

use serde::{Deserialize, Serialize};

/// What `init_wallet` does when the account key already holds a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExistingWalletPolicy {
    /// Replace the wallet with a fresh zero-balance one.
    #[default]
    Overwrite,
    /// Fail with `AlreadyExists` and leave the wallet untouched.
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub on_existing_wallet: ExistingWalletPolicy,
}

impl LedgerConfig {
    pub fn with_existing_wallet_policy(mut self, policy: ExistingWalletPolicy) -> Self {
        self.on_existing_wallet = policy;
        self
    }
}
