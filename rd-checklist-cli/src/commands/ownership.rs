use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rd_checklist_lib::catalog::{OwnershipStats, OwnershipUpdate};

use crate::CliError;

pub(crate) fn run_own(
    db: Option<PathBuf>,
    card_id: &str,
    rarity: &str,
    count: i64,
) -> Result<(), CliError> {
    let checklist = crate::open_checklist(db)?;
    let variant = checklist.set_owned_count(card_id, rarity, count)?;
    log::info!(
        "{} ({}): {} owned",
        variant.card_id.if_supports_color(Stdout, |t| t.bold()),
        variant.rarity,
        variant.owned_count.if_supports_color(Stdout, |t| t.green()),
    );
    Ok(())
}

pub(crate) fn run_own_batch(db: Option<PathBuf>, file: &Path) -> Result<(), CliError> {
    let contents = std::fs::read_to_string(file)?;
    let updates: Vec<OwnershipUpdate> = serde_json::from_str(&contents)?;
    if updates.is_empty() {
        log::info!("{} contains no updates.", file.display());
        return Ok(());
    }

    let checklist = crate::open_checklist(db)?;
    let variants = checklist.set_owned_counts(&updates)?;
    for variant in &variants {
        log::debug!(
            "{} ({}) = {}",
            variant.card_id,
            variant.rarity,
            variant.owned_count
        );
    }
    log::info!(
        "{} {} variant(s)",
        "Updated".if_supports_color(Stdout, |t| t.green()),
        variants.len(),
    );
    Ok(())
}

pub(crate) fn run_stats(db: Option<PathBuf>, set_id: Option<&str>) -> Result<(), CliError> {
    let checklist = crate::open_checklist(db)?;

    let (title, stats) = match set_id {
        Some(id) => (format!("Set {}", id), checklist.ownership_stats(id)?),
        None => ("Collection".to_string(), checklist.collection_stats()?),
    };

    log::info!("{}", title.if_supports_color(Stdout, |t| t.bold()));
    log_stats(&stats);
    Ok(())
}

fn log_stats(stats: &OwnershipStats) {
    log::info!("  Variants:      {:>8}", stats.total_variants);
    log::info!("  Owned:         {:>8}", stats.owned_variants);
    log::info!("  Missing:       {:>8}", stats.total_variants - stats.owned_variants);
    log::info!("  Copies:        {:>8}", stats.total_owned_copies);
    log::info!("  Completion:    {:>7.1}%", stats.completion_percent());
}
