//! Pagination tests

use crate::common::*;
use rowstore::{Database, JsonRow, Page};

fn numbered(n: usize) -> Database<JsonRow> {
    let db = Database::new();
    db.create_table("t");
    for i in 0..n {
        db.add_row("t", &i.to_string(), serde_json::json!(i)).unwrap();
    }
    db
}

#[test]
fn test_window_inside_table() {
    let db = numbered(10);
    let rows = db.get_all_rows("t", Page::new(3, 4)).unwrap();
    let expected: Vec<_> = (3..7).map(|i| serde_json::json!(i)).collect();
    assert_eq!(rows, expected);
}

#[test]
fn test_window_truncated_at_end() {
    let db = numbered(10);
    assert_eq!(db.get_all_rows("t", Page::new(8, 5)).unwrap().len(), 2);
}

#[test]
fn test_offset_at_or_past_end_is_empty() {
    let db = numbered(3);
    assert!(db.get_all_rows("t", Page::new(3, 1)).unwrap().is_empty());
    assert!(db.get_all_rows("t", Page::new(100, 1)).unwrap().is_empty());
}

#[test]
fn test_zero_limit_is_empty() {
    let db = numbered(3);
    assert!(db.get_all_rows("t", Page::new(0, 0)).unwrap().is_empty());
}

#[test]
fn test_unbounded_limit() {
    let db = numbered(5);
    assert_eq!(db.get_all_rows("t", Page::new(2, usize::MAX)).unwrap().len(), 3);
    assert_eq!(db.get_all_rows("t", Page::default()).unwrap().len(), 5);
}

#[test]
fn test_pages_skip_deleted_rows() {
    let db = abc_db();
    db.drop_row("users", "1").unwrap();
    assert_eq!(
        db.get_all_rows("users", Page::new(0, 1)).unwrap(),
        vec![named("b")]
    );
}

#[test]
fn test_order_stable_across_many_deletes() {
    let db = numbered(200);
    for i in (0..200).filter(|i| i % 3 != 0) {
        db.drop_row("t", &i.to_string()).unwrap();
    }

    let rows = db.get_all_rows("t", Page::all()).unwrap();
    let expected: Vec<_> = (0..200)
        .filter(|i| i % 3 == 0)
        .map(|i| serde_json::json!(i))
        .collect();
    assert_eq!(rows, expected);
    assert_eq!(
        db.get_all_rows("t", Page::new(10, 2)).unwrap(),
        vec![serde_json::json!(30), serde_json::json!(33)]
    );
}

#[test]
fn test_readding_deleted_id_goes_to_end() {
    let db = abc_db();
    db.drop_row("users", "1").unwrap();
    db.add_row("users", "1", named("a2")).unwrap();

    assert_eq!(
        db.get_all_rows("users", Page::all()).unwrap(),
        vec![named("b"), named("c"), named("a2")]
    );
}
