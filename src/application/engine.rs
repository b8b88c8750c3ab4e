use super::dispatch::Function;
use crate::config::{ExistingWalletPolicy, LedgerConfig};
use crate::domain::ports::{HistoryProviderBox, LedgerStoreBox, RevisionId, WriteSet};
use crate::domain::transaction::{TransferKind, TxInfo, TxType, parse_decimal};
use crate::domain::wallet::Wallet;
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};

/// One replayed revision of a wallet.
///
/// A deleted revision carries `Wallet::default()`: zero balance, empty strings,
/// and the `Init` type (code `"10"`), the same as a freshly created wallet.
/// `is_delete` is the only field that tells a tombstone apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "txId")]
    pub tx_id: RevisionId,
    pub value: Wallet,
    #[serde(rename = "isDelete")]
    pub is_delete: bool,
}

/// The wallet ledger: validates caller arguments and applies the state
/// transitions through the store.
///
/// Multi-wallet updates (mint, transfer) are written as one commit guarded by
/// the revisions they were computed from, so they either land on both wallets
/// or on neither.
pub struct WalletLedger {
    store: LedgerStoreBox,
    history: HistoryProviderBox,
    config: LedgerConfig,
}

impl WalletLedger {
    /// Creates a new `WalletLedger`.
    ///
    /// # Arguments
    ///
    /// * `store` - Current-value access and atomic commits.
    /// * `history` - Revision log replay for `read_history`.
    /// * `config` - Engine behavior switches.
    pub fn new(store: LedgerStoreBox, history: HistoryProviderBox, config: LedgerConfig) -> Self {
        Self {
            store,
            history,
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// `accountId, counterparty, date`: writes a zero-balance wallet.
    pub async fn create_wallet(&self, args: &[String]) -> Result<()> {
        let [account, counterparty, date] = expect_args::<3>(Function::InitWallet, args)?;
        if account.is_empty() {
            return Err(LedgerError::InvalidArgument {
                name: "account id",
                value: account.clone(),
                reason: "must not be empty".to_string(),
            });
        }

        let mut set = WriteSet::new();
        if self.config.on_existing_wallet == ExistingWalletPolicy::Reject {
            if self.store.get(account).await?.is_some() {
                tracing::warn!(%account, "Rejected init_wallet on existing wallet");
                return Err(LedgerError::AlreadyExists(account.clone()));
            }
            set = set.require(account, None);
        }

        let wallet = Wallet::open(counterparty, date);
        let revision = self.store.commit(set.put(account, wallet.to_bytes()?)).await?;

        tracing::info!(%account, %revision, "Wallet created");
        Ok(())
    }

    /// `accountId, issuerId, amount, date`: credits both the target and the issuer.
    ///
    /// The issuer wallet doubles as the running record of everything it minted.
    pub async fn mint(&self, args: &[String]) -> Result<()> {
        let [account, issuer, amount, date] = expect_args::<4>(Function::Publish, args)?;
        let amount = parse_amount(amount)?;

        let (mut issuer_wallet, issuer_revision) = self.load(issuer).await?;
        let (mut target, target_revision) = self.load(account).await?;

        issuer_wallet.credit(
            issuer,
            amount,
            TxInfo {
                trader: account.clone(),
                amount,
                date: date.clone(),
                tx_type: TxType::Publish,
            },
        )?;
        target.credit(
            account,
            amount,
            TxInfo {
                trader: issuer.clone(),
                amount,
                date: date.clone(),
                tx_type: TxType::Publish,
            },
        )?;

        let set = WriteSet::new()
            .require(issuer, Some(issuer_revision))
            .require(account, Some(target_revision))
            .put(issuer, issuer_wallet.to_bytes()?)
            .put(account, target.to_bytes()?);
        let revision = self.store.commit(set).await?;

        tracing::info!(%account, %issuer, amount, %revision, "Minted");
        Ok(())
    }

    /// `senderId, receiverId, amount, type, date`: moves funds between two wallets.
    ///
    /// Returns the commit's revision id as the receipt.
    pub async fn transfer(&self, args: &[String]) -> Result<RevisionId> {
        let [sender, receiver, amount, tx_type, date] =
            expect_args::<5>(Function::Transfer, args)?;
        let amount = parse_amount(amount)?;
        let kind: TransferKind = tx_type.parse()?;
        if sender == receiver {
            return Err(LedgerError::InvalidArgument {
                name: "receiver id",
                value: receiver.clone(),
                reason: "sender and receiver must differ".to_string(),
            });
        }

        let (mut sender_wallet, sender_revision) = self.load(sender).await?;
        let (mut receiver_wallet, receiver_revision) = self.load(receiver).await?;

        if let Err(e) = sender_wallet.debit(
            sender,
            amount,
            TxInfo {
                trader: receiver.clone(),
                amount,
                date: date.clone(),
                tx_type: kind.sent(),
            },
        ) {
            tracing::warn!(%sender, %receiver, amount, "Transfer rejected: {e}");
            return Err(e);
        }
        receiver_wallet.credit(
            receiver,
            amount,
            TxInfo {
                trader: sender.clone(),
                amount,
                date: date.clone(),
                tx_type: kind.received(),
            },
        )?;

        let set = WriteSet::new()
            .require(sender, Some(sender_revision))
            .require(receiver, Some(receiver_revision))
            .put(sender, sender_wallet.to_bytes()?)
            .put(receiver, receiver_wallet.to_bytes()?);
        let revision = self.store.commit(set).await?;

        tracing::info!(%sender, %receiver, amount, ?kind, %revision, "Transferred");
        Ok(revision)
    }

    /// `accountId`: the balance as a decimal string.
    pub async fn read_balance(&self, args: &[String]) -> Result<String> {
        let [account] = expect_args::<1>(Function::GetAccount, args)?;
        let (wallet, _) = self.load(account).await?;
        tracing::debug!(%account, balance = wallet.balance, "Balance read");
        Ok(wallet.balance.to_string())
    }

    /// `accountId`: every stored revision of the wallet, oldest first.
    ///
    /// A deleted revision replays as a zero-value wallet. Any failure while
    /// replaying discards the entries read so far.
    pub async fn read_history(&self, args: &[String]) -> Result<Vec<HistoryEntry>> {
        let [account] = expect_args::<1>(Function::GetTxList, args)?;

        let entries = self
            .history
            .history(account)
            .await?
            .map(|revision| -> Result<HistoryEntry> {
                let revision = revision?;
                let entry = match revision.value {
                    Some(bytes) => HistoryEntry {
                        tx_id: revision.revision,
                        value: Wallet::from_bytes(&bytes)?,
                        is_delete: false,
                    },
                    None => HistoryEntry {
                        tx_id: revision.revision,
                        value: Wallet::default(),
                        is_delete: true,
                    },
                };
                Ok(entry)
            })
            .collect::<Result<Vec<_>>>()?;

        if entries.is_empty() {
            return Err(LedgerError::NotFound(account.clone()));
        }
        tracing::debug!(%account, revisions = entries.len(), "History replayed");
        Ok(entries)
    }

    async fn load(&self, account: &str) -> Result<(Wallet, RevisionId)> {
        let current = self
            .store
            .get(account)
            .await?
            .ok_or_else(|| LedgerError::NotFound(account.to_string()))?;
        Ok((Wallet::from_bytes(&current.value)?, current.revision))
    }
}

fn expect_args<const N: usize>(function: Function, args: &[String]) -> Result<&[String; N]> {
    args.try_into().map_err(|_| LedgerError::Arity {
        function: function.name(),
        expected: N,
        actual: args.len(),
    })
}

fn parse_amount(value: &str) -> Result<u64> {
    parse_decimal("amount", value)
}
