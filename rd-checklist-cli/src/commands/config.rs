use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rd_checklist_lib::settings;

use crate::CliError;

/// Show the settings file and where the database path comes from.
pub(crate) fn run_config_show(db: Option<PathBuf>) -> Result<(), CliError> {
    let path = settings::settings_path();

    log::info!(
        "{}",
        "rd-checklist Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let source = if db.is_some() {
        "--db flag".to_string()
    } else if std::env::var_os(settings::DB_ENV_VAR).is_some_and(|v| !v.is_empty()) {
        format!("{} env var", settings::DB_ENV_VAR)
    } else if settings::load_database_path().is_some() {
        "settings file".to_string()
    } else {
        "default".to_string()
    };
    let db_path = settings::resolve_database_path(db);
    log::info!(
        "  Database:      {} {}",
        db_path.display().if_supports_color(Stdout, |t| t.cyan()),
        format!("({})", source).if_supports_color(Stdout, |t| t.dimmed()),
    );

    if let Some(contents) = settings::load_settings_string() {
        crate::log_blank();
        for line in contents.lines() {
            log::info!("  {}", line);
        }
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings::settings_path().display());
    Ok(())
}

pub(crate) fn run_config_set_db(path: &Path) -> Result<(), CliError> {
    let absolute = std::path::absolute(path)
        .map_err(|e| CliError::config(format!("Cannot resolve {}: {}", path.display(), e)))?;
    settings::save_database_path(Some(&absolute))
        .map_err(|e| CliError::config(format!("Failed to save settings: {}", e)))?;
    log::info!(
        "Default database set to {}",
        absolute.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

pub(crate) fn run_config_clear_db() -> Result<(), CliError> {
    settings::save_database_path(None)
        .map_err(|e| CliError::config(format!("Failed to save settings: {}", e)))?;
    log::info!(
        "Cleared saved database path; using {}",
        settings::resolve_database_path(None).display(),
    );
    Ok(())
}
