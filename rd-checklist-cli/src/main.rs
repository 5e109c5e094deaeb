//! rd-checklist CLI
//!
//! Command-line interface for browsing the card catalog, correcting
//! imported data with overrides, and tracking owned copies.

mod cli_types;
mod commands;
mod error;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use log::{Level, LevelFilter};

use rd_checklist_lib::Checklist;
use rd_checklist_lib::settings;

use cli_types::{CardAction, Cli, Commands, ConfigAction, SetAction};
pub(crate) use error::CliError;

/// Emit an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}

fn init_logging(quiet: bool, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_env("RD_CHECKLIST_LOG")
        .target(env_logger::Target::Stdout);

    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(
                buf,
                "{}: {}",
                level.as_str().to_lowercase(),
                record.args()
            ),
        });
    }
    builder.init();
}

/// Open the checklist database selected by `--db`, the environment, or
/// `settings.toml`.
pub(crate) fn open_checklist(db: Option<PathBuf>) -> Result<Checklist, CliError> {
    let path = settings::resolve_database_path(db);
    log::debug!("Using database {}", path.display());
    Checklist::open(&path)
        .map_err(|e| CliError::database(format!("Failed to open {}: {}", path.display(), e)))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let db = cli.db;
    let result = match cli.command {
        Commands::ProductTypes => commands::sets::run_product_types(db),
        Commands::Sets { action } => match action {
            SetAction::List { product_type } => {
                commands::sets::run_sets_list(db, product_type.as_deref())
            }
            SetAction::Show { set_id, json } => commands::sets::run_set_show(db, &set_id, json),
            SetAction::Edit { set_id, fields } => {
                commands::sets::run_set_edit(db, &set_id, &fields)
            }
            SetAction::Overrides { set_id } => commands::sets::run_set_overrides(db, &set_id),
            SetAction::Reset { set_id, field } => {
                commands::sets::run_set_reset(db, &set_id, &field)
            }
            SetAction::History { set_id, limit } => {
                commands::sets::run_set_history(db, &set_id, limit)
            }
        },
        Commands::Cards { action } => match action {
            CardAction::Show { card_id, json } => {
                commands::cards::run_card_show(db, &card_id, json)
            }
            CardAction::Edit { card_id, fields } => {
                commands::cards::run_card_edit(db, &card_id, &fields)
            }
            CardAction::Overrides { card_id } => {
                commands::cards::run_card_overrides(db, &card_id)
            }
            CardAction::Reset { card_id, field } => {
                commands::cards::run_card_reset(db, &card_id, &field)
            }
            CardAction::History { card_id, limit } => {
                commands::cards::run_card_history(db, &card_id, limit)
            }
        },
        Commands::Own {
            card_id,
            rarity,
            count,
        } => commands::ownership::run_own(db, &card_id, &rarity, count),
        Commands::OwnBatch { file } => commands::ownership::run_own_batch(db, &file),
        Commands::Stats { set_id } => commands::ownership::run_stats(db, set_id.as_deref()),
        Commands::Search(args) => commands::search::run_search(db, args),
        Commands::Import { file } => commands::import::run_import(db, &file),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(db),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::SetDb { path } => commands::config::run_config_set_db(&path),
            ConfigAction::ClearDb => commands::config::run_config_clear_db(),
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
