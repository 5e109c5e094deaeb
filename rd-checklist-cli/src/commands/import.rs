use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rd_checklist_lib::catalog::CardSetWithCards;

use crate::CliError;

/// Import sets and their cards from a JSON array of set objects.
///
/// The whole file is written in one transaction. Existing sets and cards
/// are refreshed in place; owned counts and overrides survive a re-import.
pub(crate) fn run_import(db: Option<PathBuf>, file: &Path) -> Result<(), CliError> {
    let contents = std::fs::read_to_string(file)?;
    let sets: Vec<CardSetWithCards> = serde_json::from_str(&contents)?;

    let checklist = crate::open_checklist(db)?;
    let card_count = checklist.import_sets(&sets)?;

    for CardSetWithCards { set, cards } in &sets {
        log::info!(
            "  {} {} card(s)",
            set.set_id.if_supports_color(Stdout, |t| t.bold()),
            cards.len(),
        );
    }

    crate::log_blank();
    log::info!(
        "{} {} card(s) from {}",
        "Imported".if_supports_color(Stdout, |t| t.green()),
        card_count,
        file.display(),
    );
    Ok(())
}
