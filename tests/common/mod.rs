use std::io::Write;
use tempfile::NamedTempFile;
use walletledger::application::engine::WalletLedger;
use walletledger::config::LedgerConfig;
use walletledger::infrastructure::in_memory::InMemoryLedgerStore;

pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn ledger() -> (InMemoryLedgerStore, WalletLedger) {
    let store = InMemoryLedgerStore::new();
    let ledger = WalletLedger::new(
        Box::new(store.clone()),
        Box::new(store.clone()),
        LedgerConfig::default(),
    );
    (store, ledger)
}

/// Creates `admin` plus the given accounts and mints `amount` into each account.
pub async fn funded_ledger(accounts: &[&str], amount: u64) -> (InMemoryLedgerStore, WalletLedger) {
    let (store, ledger) = ledger();
    ledger
        .create_wallet(&args(&["admin", "admin", "20240101"]))
        .await
        .unwrap();
    for account in accounts {
        ledger
            .create_wallet(&args(&[account, "admin", "20240101"]))
            .await
            .unwrap();
        ledger
            .mint(&args(&[account, "admin", &amount.to_string(), "20240102"]))
            .await
            .unwrap();
    }
    (store, ledger)
}

pub async fn balance(ledger: &WalletLedger, account: &str) -> u64 {
    ledger
        .read_balance(&args(&[account]))
        .await
        .unwrap()
        .parse()
        .unwrap()
}

pub fn invocations_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}
