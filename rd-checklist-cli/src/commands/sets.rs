use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rd_checklist_lib::catalog::{product_type_label, CardSet, EntityKind, OwnershipStats};

use crate::CliError;
use crate::cli_types::FieldEditArgs;

use super::{
    field_patch, hint_overridable_fields, log_card_line, log_history, log_overrides, truncate_str,
};

pub(crate) fn run_product_types(db: Option<PathBuf>) -> Result<(), CliError> {
    let checklist = crate::open_checklist(db)?;
    let types = checklist.product_types()?;

    if types.is_empty() {
        log::info!("No card sets imported yet.");
        return Ok(());
    }

    log::info!("{}", "Product types".if_supports_color(Stdout, |t| t.bold()));
    for pt in &types {
        log::info!(
            "  {:<20} {:<28} {:>4} sets",
            pt.product_type.if_supports_color(Stdout, |t| t.cyan()),
            pt.display_name,
            pt.set_count,
        );
    }
    Ok(())
}

pub(crate) fn run_sets_list(
    db: Option<PathBuf>,
    product_type: Option<&str>,
) -> Result<(), CliError> {
    let checklist = crate::open_checklist(db)?;
    let sets = checklist.card_sets(product_type)?;

    if sets.is_empty() {
        match product_type {
            Some(pt) => log::info!("No sets with product type '{}'.", pt),
            None => log::info!("No card sets imported yet."),
        }
        return Ok(());
    }

    for set in &sets {
        log::info!(
            "  {:<12} {:<10} {:<32} {}",
            set.set_id.if_supports_color(Stdout, |t| t.bold()),
            set.release_date.as_deref().unwrap_or("-"),
            truncate_str(set_title(set), 32),
            product_type_label(&set.product_type).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();
    log::info!("{} sets", sets.len());
    Ok(())
}

pub(crate) fn run_set_show(db: Option<PathBuf>, set_id: &str, json: bool) -> Result<(), CliError> {
    let checklist = crate::open_checklist(db)?;
    let detail = checklist.card_set(set_id)?;

    if json {
        log::info!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let set = &detail.set;
    log_set_header(set);
    let stats = OwnershipStats::from_cards(&detail.cards);
    log::info!(
        "  Owned:        {}/{} variants ({:.1}%), {} copies",
        stats.owned_variants,
        stats.total_variants,
        stats.completion_percent(),
        stats.total_owned_copies,
    );
    crate::log_blank();

    if detail.cards.is_empty() {
        log::info!("  (no cards)");
    }
    for card in &detail.cards {
        log_card_line(card);
    }
    Ok(())
}

pub(crate) fn run_set_edit(
    db: Option<PathBuf>,
    set_id: &str,
    fields: &FieldEditArgs,
) -> Result<(), CliError> {
    let patch = field_patch(fields)?;
    let checklist = crate::open_checklist(db)?;
    let set = checklist
        .patch_card_set(set_id, &patch)
        .inspect_err(|e| hint_overridable_fields(e, EntityKind::CardSet))?;

    log::info!(
        "{} {} field(s) on {}",
        "Updated".if_supports_color(Stdout, |t| t.green()),
        patch.len(),
        set_id,
    );
    crate::log_blank();
    log_set_header(&set);
    Ok(())
}

pub(crate) fn run_set_overrides(db: Option<PathBuf>, set_id: &str) -> Result<(), CliError> {
    let checklist = crate::open_checklist(db)?;
    let overrides = checklist.card_set_overrides(set_id)?;
    log_overrides(&format!("set {}", set_id), &overrides);
    Ok(())
}

pub(crate) fn run_set_reset(db: Option<PathBuf>, set_id: &str, field: &str) -> Result<(), CliError> {
    let checklist = crate::open_checklist(db)?;
    let removed = checklist
        .delete_card_set_override(set_id, field)
        .inspect_err(|e| hint_overridable_fields(e, EntityKind::CardSet))?;
    if removed {
        log::info!("Restored imported value of {} on set {}.", field, set_id);
    } else {
        log::info!("Set {} has no override for {}.", set_id, field);
    }
    Ok(())
}

pub(crate) fn run_set_history(db: Option<PathBuf>, set_id: &str, limit: u32) -> Result<(), CliError> {
    let checklist = crate::open_checklist(db)?;
    let events = checklist.override_history(EntityKind::CardSet, set_id, Some(limit))?;
    log_history(&format!("set {}", set_id), &events);
    Ok(())
}

fn set_title(set: &CardSet) -> &str {
    if set.set_name_zh.is_empty() {
        &set.set_name_jp
    } else {
        &set.set_name_zh
    }
}

fn log_set_header(set: &CardSet) {
    log::info!(
        "{} {}",
        set.set_id.if_supports_color(Stdout, |t| t.bold()),
        set_title(set).if_supports_color(Stdout, |t| t.bold()),
    );
    if !set.set_name_jp.is_empty() && set.set_name_jp != set_title(set) {
        log::info!("  Japanese:     {}", set.set_name_jp);
    }
    log::info!(
        "  Product type: {} ({})",
        product_type_label(&set.product_type),
        set.product_type,
    );
    log::info!(
        "  Released:     {}",
        set.release_date.as_deref().unwrap_or("unknown"),
    );
    log::info!("  Cards:        {}", set.total_cards);
    if let Some(dist) = &set.rarity_distribution {
        log::info!("  Rarities:     {}", dist);
    }
    if !set.post_url.is_empty() {
        log::info!("  Source:       {}", set.post_url);
    }
}
