//! Application settings (database path, config file location).
//!
//! The settings file is `~/.config/rd-checklist/settings.toml` (or the
//! platform equivalent). Only the `[database]` table is read here; other
//! keys are preserved on save.

use std::io;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the saved database path.
pub const DB_ENV_VAR: &str = "RD_CHECKLIST_DB";

/// Canonical path to the settings file: `<config_dir>/rd-checklist/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("rd-checklist").join("settings.toml")
}

/// Database location used when nothing else is configured.
pub fn default_database_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("rd-checklist").join("rd_checklist.db")
}

/// Resolve the database path using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. `RD_CHECKLIST_DB` environment variable
/// 3. Saved `database.path` in `settings.toml`
/// 4. [`default_database_path`]
pub fn resolve_database_path(cli_override: Option<PathBuf>) -> PathBuf {
    if let Some(p) = cli_override {
        return p;
    }
    if let Some(p) = std::env::var_os(DB_ENV_VAR).filter(|v| !v.is_empty()) {
        return PathBuf::from(p);
    }
    if let Some(p) = load_database_path() {
        return p;
    }
    default_database_path()
}

/// Read `database.path` from `settings.toml`, if set.
pub fn load_database_path() -> Option<PathBuf> {
    read_database_path(&settings_path())
}

fn read_database_path(settings: &Path) -> Option<PathBuf> {
    let contents = std::fs::read_to_string(settings).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    let path = doc.get("database")?.get("path")?.as_str()?;
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Save (or clear) the database path in `settings.toml`.
pub fn save_database_path(path: Option<&Path>) -> io::Result<()> {
    write_database_path(&settings_path(), path)
}

fn write_database_path(settings: &Path, path: Option<&Path>) -> io::Result<()> {
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(settings) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let database = table
        .entry("database")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let db_table = database
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[database] is not a table"))?;

    match path {
        Some(p) => {
            db_table.insert(
                "path".to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            db_table.remove("path");
        }
    }

    // Write atomically
    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, settings)?;

    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_has_no_path() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_database_path(&dir.path().join("settings.toml")), None);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("cfg").join("settings.toml");

        write_database_path(&settings, Some(Path::new("/data/cards.db"))).unwrap();
        assert_eq!(
            read_database_path(&settings),
            Some(PathBuf::from("/data/cards.db"))
        );

        write_database_path(&settings, None).unwrap();
        assert_eq!(read_database_path(&settings), None);
    }

    #[test]
    fn save_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.toml");
        std::fs::write(&settings, "[display]\nlanguage = \"zh\"\n").unwrap();

        write_database_path(&settings, Some(Path::new("cards.db"))).unwrap();

        let doc: toml::Value = std::fs::read_to_string(&settings)
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(doc["display"]["language"].as_str(), Some("zh"));
        assert_eq!(doc["database"]["path"].as_str(), Some("cards.db"));
    }

    #[test]
    fn empty_path_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.toml");
        std::fs::write(&settings, "[database]\npath = \"\"\n").unwrap();
        assert_eq!(read_database_path(&settings), None);
    }

    #[test]
    fn cli_override_wins() {
        let path = resolve_database_path(Some(PathBuf::from("explicit.db")));
        assert_eq!(path, PathBuf::from("explicit.db"));
    }
}
