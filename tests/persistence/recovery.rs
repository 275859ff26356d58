//! Opening a store from an existing, missing or damaged snapshot

use crate::common::*;
use rowstore::{JsonRow, Page, Recovery, RowStore, StoreConfig};
use std::fs;

#[test]
fn test_first_open_is_fresh() {
    let (_dir, path) = snapshot_path();
    let store: RowStore<JsonRow> = RowStore::open(&path).unwrap();

    assert_eq!(store.recovery(), &Recovery::Fresh);
    assert!(store.table_names().is_empty());
    assert!(!path.exists());
}

#[test]
fn test_reopen_restores_content() {
    let (_dir, path) = snapshot_path();
    {
        let store: RowStore<JsonRow> = RowStore::builder()
            .snapshot_path(&path)
            .table("users")
            .open()
            .unwrap();
        store.add_row("users", "1", named("a")).unwrap();
        store.add_row("users", "2", named("b")).unwrap();
        store.snapshot_now().unwrap();
    }

    let store: RowStore<JsonRow> = RowStore::open(&path).unwrap();
    assert_eq!(store.recovery(), &Recovery::Restored { tables: 1, rows: 2 });
    assert_eq!(
        store.get_all_rows("users", Page::all()).unwrap(),
        vec![named("a"), named("b")]
    );
}

#[test]
fn test_corrupt_snapshot_starts_empty() {
    let (_dir, path) = snapshot_path();
    fs::write(&path, b"ROWSTORE-SNAPSHOT 1 00000000 2\n{}").unwrap();

    let store: RowStore<JsonRow> = RowStore::builder()
        .snapshot_path(&path)
        .table("users")
        .open()
        .unwrap();

    assert!(matches!(store.recovery(), Recovery::Discarded { .. }));
    assert_eq!(store.get_row_count("users").unwrap(), 0);
}

#[test]
fn test_damaged_body_starts_empty() {
    let (_dir, path) = snapshot_path();
    let store: RowStore<JsonRow> = RowStore::builder()
        .snapshot_path(&path)
        .table("users")
        .open()
        .unwrap();
    store.add_row("users", "1", named("a")).unwrap();
    store.snapshot_now().unwrap();

    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 2;
    bytes[last] ^= 0xff;
    fs::write(&path, &bytes).unwrap();

    let reopened: RowStore<JsonRow> = RowStore::open(&path).unwrap();
    assert!(matches!(reopened.recovery(), Recovery::Discarded { .. }));
    assert!(reopened.table_names().is_empty());
}

#[test]
fn test_config_file_drives_open() {
    let dir = tempfile::tempdir().unwrap();
    let snap = dir.path().join("state").join("db.snap");
    let config_path = dir.path().join("store.toml");
    fs::write(
        &config_path,
        format!(
            "snapshot_path = {:?}\n\
             tables = [\"users\", \"public_messages\", \"private_messages\"]\n",
            snap.display().to_string()
        ),
    )
    .unwrap();

    let config = StoreConfig::from_file(&config_path).unwrap();
    let store: RowStore<JsonRow> = RowStore::from_config(config).unwrap();

    assert_eq!(store.table_names().len(), 3);
    store.add_row("public_messages", "1", named("hi")).unwrap();

    let report = store.snapshot_now().unwrap().unwrap();
    assert_eq!(report.path, snap);
    assert_eq!(report.tables, 3);
}

#[test]
fn test_bad_config_is_config_error() {
    let err = StoreConfig::from_toml_str("tables = 3").unwrap_err();
    let err: rowstore::Error = err.into();
    assert!(matches!(err, rowstore::Error::Config(_)));
    assert!(!err.is_persistence());
}
