#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: create wallets and mint
    let csv1 = common::invocations_file(&[
        "init_wallet,admin,admin,d",
        "init_wallet,alice,admin,d",
        "init_wallet,bob,admin,d",
        "publish,alice,admin,100,d",
    ]);
    let output1 = Command::new(cargo_bin!("walletledger"))
        .arg("--db-path")
        .arg(&db_path)
        .arg("batch")
        .arg(csv1.path())
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());

    // 2. Second run: the wallets are recovered from the same DB path
    let output2 = Command::new(cargo_bin!("walletledger"))
        .arg("--db-path")
        .arg(&db_path)
        .args(["invoke", "transfer", "alice", "bob", "40", "1", "d"])
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());
    let receipt = String::from_utf8_lossy(&output2.stdout).trim().to_string();
    assert!(!receipt.is_empty());

    // 3. History replays every revision, the transfer under its receipt
    let output3 = Command::new(cargo_bin!("walletledger"))
        .arg("--db-path")
        .arg(&db_path)
        .args(["invoke", "get_txList", "bob"])
        .output()
        .expect("Failed to execute command");
    assert!(output3.status.success());
    let history: serde_json::Value = serde_json::from_slice(&output3.stdout).unwrap();
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["txId"], receipt.as_str());
    assert_eq!(entries[1]["value"]["balance"], 40);
    assert_eq!(entries[1]["value"]["txInfo"]["txType"], "2");
}
