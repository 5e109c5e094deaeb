use rd_checklist_db::schema::{create_schema, get_schema_version, CURRENT_VERSION};
use rd_checklist_db::{open_database, open_memory, SchemaError};

#[test]
fn create_schema_in_memory() {
    let conn = open_memory().unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn schema_is_idempotent() {
    let conn = open_memory().unwrap();
    create_schema(&conn).unwrap();
    create_schema(&conn).unwrap();

    let rows: i32 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn foreign_keys_enabled() {
    let conn = open_memory().unwrap();
    let fk: i32 = conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(fk, 1);
}

#[test]
fn all_tables_exist() {
    let conn = open_memory().unwrap();
    let tables = [
        "schema_version",
        "card_sets",
        "cards",
        "card_variants",
        "card_set_overrides",
        "card_overrides",
        "override_log",
    ];
    for table in tables {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "table '{}' should exist", table);
    }
}

#[test]
fn owned_count_check_constraint() {
    let conn = open_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO card_sets (set_id, product_type) VALUES ('S1', 'booster');
         INSERT INTO cards (card_id, set_id) VALUES ('C1', 'S1');",
    )
    .unwrap();
    let result = conn.execute(
        "INSERT INTO card_variants (card_id, rarity, owned_count) VALUES ('C1', 'N', -1)",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn open_database_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("checklist.db");

    let conn = open_database(&path).unwrap();
    assert!(path.exists());
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
    drop(conn);

    // Reopening an existing database keeps its schema.
    let conn = open_database(&path).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn open_database_rejects_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checklist.db");

    let conn = open_database(&path).unwrap();
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [CURRENT_VERSION + 1],
    )
    .unwrap();
    drop(conn);

    match open_database(&path) {
        Err(SchemaError::VersionMismatch { expected, found }) => {
            assert_eq!(expected, CURRENT_VERSION);
            assert_eq!(found, CURRENT_VERSION + 1);
        }
        other => panic!("expected VersionMismatch, got {other:?}"),
    }
}
