use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let file = common::invocations_file(&["init_wallet,alice,admin,d", "get_account,alice"]);

    let mut cmd = Command::new(cargo_bin!("walletledger"));
    cmd.arg("--db-path").arg("some_db").arg("batch").arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "'storage-rocksdb' feature is not enabled. Falling back to in-memory storage.",
        ))
        .stdout(predicate::str::contains("get_account,ok,0"));
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let file = common::invocations_file(&["init_wallet,alice,admin,d"]);

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let mut cmd = Command::new(cargo_bin!("walletledger"));
    cmd.arg("--db-path").arg(&db_path).arg("batch").arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Falling back").not());
}
