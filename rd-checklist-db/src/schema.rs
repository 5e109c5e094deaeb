//! SQLite schema creation and version tracking.

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Schema version mismatch: expected at most {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 1;

/// Create all tables and indexes if they don't exist.
///
/// This is idempotent, safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    if get_schema_version(conn)? < CURRENT_VERSION {
        set_schema_version(conn, CURRENT_VERSION)?;
    }
    Ok(())
}

/// Open or create a checklist database at the given path.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;

    let version = get_schema_version(&conn)?;
    if version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: version,
        });
    }
    if version < CURRENT_VERSION {
        log::debug!(
            "Creating schema v{} in {} (found v{})",
            CURRENT_VERSION,
            path.display(),
            version,
        );
        create_schema(&conn)?;
    }

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
pub fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Product releases
CREATE TABLE IF NOT EXISTS card_sets (
    set_id TEXT PRIMARY KEY,
    set_name_jp TEXT NOT NULL DEFAULT '',
    set_name_zh TEXT NOT NULL DEFAULT '',
    product_type TEXT NOT NULL,
    release_date TEXT,
    post_url TEXT NOT NULL DEFAULT '',
    total_cards INTEGER NOT NULL DEFAULT 0,
    rarity_distribution TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_card_sets_product_type ON card_sets(product_type);

-- Cards, as imported
CREATE TABLE IF NOT EXISTS cards (
    card_id TEXT PRIMARY KEY,
    set_id TEXT NOT NULL REFERENCES card_sets(set_id),
    name_jp TEXT NOT NULL DEFAULT '',
    name_zh TEXT NOT NULL DEFAULT '',
    card_type TEXT NOT NULL DEFAULT '',
    attribute TEXT,
    monster_type TEXT,
    level INTEGER,
    atk TEXT,
    defense TEXT,
    summon_condition TEXT,
    condition TEXT,
    effect TEXT,
    continuous_effect TEXT,
    is_legend BOOLEAN NOT NULL DEFAULT 0,
    original_rarity_string TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_cards_set ON cards(set_id);
CREATE INDEX IF NOT EXISTS idx_cards_type ON cards(card_type);

-- One row per printing (card x rarity); the unit of ownership
CREATE TABLE IF NOT EXISTS card_variants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    card_id TEXT NOT NULL REFERENCES cards(card_id),
    rarity TEXT NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0,
    image_source TEXT,
    image_path TEXT,
    owned_count INTEGER NOT NULL DEFAULT 0 CHECK (owned_count >= 0),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(card_id, rarity)
);
CREATE INDEX IF NOT EXISTS idx_card_variants_card ON card_variants(card_id);

-- User overrides, one namespace per entity type
CREATE TABLE IF NOT EXISTS card_set_overrides (
    set_id TEXT NOT NULL REFERENCES card_sets(set_id),
    field_name TEXT NOT NULL,
    value TEXT,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (set_id, field_name)
);

CREATE TABLE IF NOT EXISTS card_overrides (
    card_id TEXT NOT NULL REFERENCES cards(card_id),
    field_name TEXT NOT NULL,
    value TEXT,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (card_id, field_name)
);

-- Edit history for both override namespaces
CREATE TABLE IF NOT EXISTS override_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    entity_kind TEXT NOT NULL,
    entity_id TEXT NOT NULL,
    field_name TEXT NOT NULL,
    action TEXT NOT NULL,
    old_value TEXT,
    new_value TEXT,
    changed_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_override_log_entity ON override_log(entity_kind, entity_id);
"#;
