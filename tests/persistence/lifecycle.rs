//! Shutdown snapshot lifecycle through the store facade

use crate::common::*;
use rowstore::{JsonRow, LifecycleState, Page, Recovery, RowStore, ShutdownOutcome};
use std::sync::Arc;
use tokio::sync::oneshot;

fn trigger() -> (oneshot::Sender<()>, impl std::future::Future<Output = ()> + Send + 'static) {
    let (tx, rx) = oneshot::channel::<()>();
    (tx, async move {
        let _ = rx.await;
    })
}

#[tokio::test]
async fn test_shutdown_then_restart() {
    let (_dir, path) = snapshot_path();
    let (fire, signal) = trigger();

    let store: RowStore<JsonRow> = RowStore::builder()
        .snapshot_path(&path)
        .table("users")
        .open()
        .unwrap();
    let handle = store.on_shutdown(signal);

    store.add_row("users", "1", named("a")).unwrap();
    store.add_row("users", "2", named("b")).unwrap();
    assert_eq!(handle.state(), LifecycleState::Idle);

    fire.send(()).unwrap();
    let outcome = handle.wait().await.unwrap();
    assert!(matches!(outcome, ShutdownOutcome::Saved(ref r) if r.rows == 2));
    drop(store);

    let restarted: RowStore<JsonRow> = RowStore::open(&path).unwrap();
    assert_eq!(restarted.recovery(), &Recovery::Restored { tables: 1, rows: 2 });
    assert_eq!(
        restarted.get_all_rows("users", Page::all()).unwrap(),
        vec![named("a"), named("b")]
    );
}

#[tokio::test]
async fn test_writers_continue_during_shutdown() {
    let (_dir, path) = snapshot_path();
    let (fire, signal) = trigger();

    let store: RowStore<JsonRow> = RowStore::builder()
        .snapshot_path(&path)
        .table("users")
        .open()
        .unwrap();
    for i in 0..500 {
        store.add_row("users", &i.to_string(), named("x")).unwrap();
    }
    let handle = store.on_shutdown(signal);
    fire.send(()).unwrap();

    // The database stays usable whatever the controller is doing
    let db = Arc::clone(store.db());
    let writer = tokio::task::spawn_blocking(move || {
        for i in 500..600 {
            db.add_row("users", &i.to_string(), named("y")).unwrap();
        }
    });

    let outcome = handle.wait().await.unwrap();
    writer.await.unwrap();

    let ShutdownOutcome::Saved(report) = outcome else {
        panic!("expected a saved snapshot");
    };
    assert!(report.rows >= 500 && report.rows <= 600);
    assert_eq!(store.get_row_count("users").unwrap(), 600);
}

#[tokio::test]
async fn test_failed_shutdown_write_is_reported() {
    let (_dir, path) = snapshot_path();
    let (fire, signal) = trigger();

    let store: RowStore<JsonRow> = RowStore::builder()
        .snapshot_path(&path)
        .table("users")
        .open()
        .unwrap();
    store.add_row("users", "1", named("a")).unwrap();

    // A directory at the target makes the final rename fail
    std::fs::create_dir(&path).unwrap();

    let handle = store.on_shutdown(signal);
    fire.send(()).unwrap();

    let err: rowstore::Error = handle.wait().await.unwrap_err().into();
    assert!(err.is_persistence());
    assert_eq!(store.get_row("users", "1").unwrap(), named("a"));
}

#[tokio::test]
async fn test_ephemeral_shutdown_skips() {
    let (fire, signal) = trigger();
    let store = users_store();
    let handle = store.on_shutdown(signal);

    fire.send(()).unwrap();
    assert_eq!(handle.wait().await.unwrap(), ShutdownOutcome::Skipped);
}

#[tokio::test]
async fn test_manual_snapshots_overlap_shutdown_write() {
    let (_dir, path) = snapshot_path();
    let (fire, signal) = trigger();

    let store: Arc<RowStore<JsonRow>> = Arc::new(
        RowStore::builder()
            .snapshot_path(&path)
            .table("users")
            .open()
            .unwrap(),
    );
    store.add_row("users", "1", named("a")).unwrap();
    let handle = store.on_shutdown(signal);

    let manual = {
        let store = Arc::clone(&store);
        tokio::task::spawn_blocking(move || {
            for _ in 0..50 {
                store.snapshot_now().unwrap();
            }
        })
    };
    fire.send(()).unwrap();

    assert!(matches!(handle.wait().await.unwrap(), ShutdownOutcome::Saved(_)));
    manual.await.unwrap();

    let restarted: RowStore<JsonRow> = RowStore::open(&path).unwrap();
    assert_eq!(restarted.get_row_count("users").unwrap(), 1);
}
