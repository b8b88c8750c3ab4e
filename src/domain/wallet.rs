use super::transaction::{TxInfo, TxType};
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};

/// The state stored under an account key.
///
/// Each write of a wallet is one store revision, so `tx_info` only holds the
/// latest event; the key's revision history is the transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wallet {
    pub balance: u64,
    #[serde(rename = "txInfo")]
    pub tx_info: TxInfo,
}

impl Wallet {
    /// A fresh wallet with zero balance and the creation sentinel.
    pub fn open(counterparty: &str, date: &str) -> Self {
        Self {
            balance: 0,
            tx_info: TxInfo {
                trader: counterparty.to_string(),
                amount: 0,
                date: date.to_string(),
                tx_type: TxType::Init,
            },
        }
    }

    /// Adds `amount` and records the event. `owner` names the wallet in errors.
    pub fn credit(&mut self, owner: &str, amount: u64, tx_info: TxInfo) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow(owner.to_string()))?;
        self.tx_info = tx_info;
        Ok(())
    }

    /// Removes `amount` if the balance covers it; leaves the wallet untouched otherwise.
    pub fn debit(&mut self, owner: &str, amount: u64, tx_info: TxInfo) -> Result<()> {
        if self.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                account: owner.to_string(),
                balance: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        self.tx_info = tx_info;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(trader: &str, amount: u64, tx_type: TxType) -> TxInfo {
        TxInfo {
            trader: trader.to_string(),
            amount,
            date: "20240101".to_string(),
            tx_type,
        }
    }

    #[test]
    fn test_open_wallet() {
        let wallet = Wallet::open("admin", "20240101");
        assert_eq!(wallet.balance, 0);
        assert_eq!(wallet.tx_info.tx_type, TxType::Init);
        assert_eq!(wallet.tx_info.trader, "admin");
    }

    #[test]
    fn test_credit_and_debit() {
        let mut wallet = Wallet::open("admin", "d");
        wallet
            .credit("alice", 100, info("admin", 100, TxType::Publish))
            .unwrap();
        wallet
            .debit("alice", 40, info("bob", 40, TxType::PaymentSent))
            .unwrap();
        assert_eq!(wallet.balance, 60);
        assert_eq!(wallet.tx_info.trader, "bob");
        assert_eq!(wallet.tx_info.tx_type, TxType::PaymentSent);
    }

    #[test]
    fn test_debit_insufficient_leaves_wallet_untouched() {
        let mut wallet = Wallet::open("admin", "d");
        wallet
            .credit("alice", 10, info("admin", 10, TxType::Publish))
            .unwrap();
        let before = wallet.clone();

        let result = wallet.debit("alice", 11, info("bob", 11, TxType::PaymentSent));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds {
                balance: 10,
                requested: 11,
                ..
            })
        ));
        assert_eq!(wallet, before);
    }

    #[test]
    fn test_credit_overflow() {
        let mut wallet = Wallet::open("admin", "d");
        wallet.balance = u64::MAX;
        let result = wallet.credit("alice", 1, info("admin", 1, TxType::Publish));
        assert!(matches!(result, Err(LedgerError::Overflow(_))));
        assert_eq!(wallet.balance, u64::MAX);
        assert_eq!(wallet.tx_info.tx_type, TxType::Init);
    }

    #[test]
    fn test_persisted_shape() {
        let wallet = Wallet::open("admin", "20240101");
        let json: serde_json::Value = serde_json::from_slice(&wallet.to_bytes().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "balance": 0,
                "txInfo": {"trader": "admin", "amount": 0, "date": "20240101", "txType": "10"}
            })
        );
    }
}
