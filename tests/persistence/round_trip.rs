//! serialize / restore round trips

use crate::common::*;
use proptest::prelude::*;
use rowstore::{restore, serialize, Database, JsonRow, Page};

#[test]
fn test_scenario_survives_round_trip() {
    let db = abc_db();
    db.drop_row("users", "2").unwrap();
    db.create_table("empty");

    let restored: Database<JsonRow> = restore(&serialize(&db).unwrap()).unwrap();

    assert_eq!(dump(&restored), dump(&db));
    assert_eq!(restored.table_counter("users").unwrap(), 3);
    assert_eq!(restored.get_row_count("empty").unwrap(), 0);
}

#[test]
fn test_restored_order_includes_replacements() {
    let db = abc_db();
    db.alter_row("users", "1", named("a2")).unwrap();
    db.add_row("users", "2", named("b2")).unwrap();

    let restored: Database<JsonRow> = restore(&serialize(&db).unwrap()).unwrap();
    assert_eq!(
        restored.get_all_rows("users", Page::all()).unwrap(),
        vec![named("a2"), named("b2"), named("c")]
    );
}

#[test]
fn test_restored_database_keeps_working() {
    let db = abc_db();
    let restored: Database<JsonRow> = restore(&serialize(&db).unwrap()).unwrap();

    restored.add_row("users", "4", named("d")).unwrap();
    assert_eq!(restored.table_counter("users").unwrap(), 4);
    assert_eq!(
        restored.get_all_rows("users", Page::new(3, 1)).unwrap(),
        vec![named("d")]
    );
}

#[test]
fn test_typed_rows_round_trip() {
    let db: Database<User> = Database::new();
    db.create_table("users");
    db.add_row("users", "1", user(1, "ada")).unwrap();

    let restored: Database<User> = restore(&serialize(&db).unwrap()).unwrap();
    assert_eq!(restored.get_row("users", "1").unwrap(), user(1, "ada"));
}

#[test]
fn test_wrong_row_type_is_decode_error() {
    let db = abc_db();
    let bytes = serialize(&db).unwrap();

    // JSON objects named {name} do not decode as User
    let err = restore::<User>(&bytes).unwrap_err();
    assert!(err.is_decode());
}

#[test]
fn test_truncated_bytes_rejected() {
    let bytes = serialize(&abc_db()).unwrap();
    let err = restore::<JsonRow>(&bytes[..bytes.len() - 5]).unwrap_err();
    assert!(err.is_decode());
}

#[derive(Debug, Clone)]
enum Op {
    Add(u8, u8),
    Alter(u8, u8),
    Drop(u8),
    DropTable,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..16, any::<u8>()).prop_map(|(id, v)| Op::Add(id, v)),
        2 => (0u8..16, any::<u8>()).prop_map(|(id, v)| Op::Alter(id, v)),
        2 => (0u8..16).prop_map(Op::Drop),
        1 => Just(Op::DropTable),
    ]
}

proptest! {
    #[test]
    fn prop_round_trip_preserves_every_table(
        ops in proptest::collection::vec((0u8..3, op()), 0..80)
    ) {
        let db: Database<JsonRow> = Database::new();
        for (table, op) in ops {
            let table = format!("t{}", table);
            db.create_table(&table);
            match op {
                Op::Add(id, v) => {
                    db.add_row(&table, &id.to_string(), serde_json::json!(v)).unwrap();
                }
                Op::Alter(id, v) => {
                    // Missing rows are a RowNotFound, which is fine here
                    let _ = db.alter_row(&table, &id.to_string(), serde_json::json!(v));
                }
                Op::Drop(id) => {
                    db.drop_row(&table, &id.to_string()).unwrap();
                }
                Op::DropTable => {
                    db.drop_table(&table);
                }
            }
        }

        let restored: Database<JsonRow> = restore(&serialize(&db).unwrap()).unwrap();
        prop_assert_eq!(dump(&restored), dump(&db));
        for stats in db.stats() {
            prop_assert_eq!(restored.table_counter(&stats.name).unwrap(), stats.inserted);
        }
    }
}
