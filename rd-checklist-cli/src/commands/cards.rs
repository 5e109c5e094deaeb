use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rd_checklist_lib::catalog::{Card, EntityKind};

use crate::CliError;
use crate::cli_types::FieldEditArgs;

use super::{
    field_patch, format_variants, hint_overridable_fields, log_history, log_overrides,
};

pub(crate) fn run_card_show(db: Option<PathBuf>, card_id: &str, json: bool) -> Result<(), CliError> {
    let checklist = crate::open_checklist(db)?;
    let card = checklist.card(card_id)?;

    if json {
        log::info!("{}", serde_json::to_string_pretty(&card)?);
        return Ok(());
    }

    log_card_detail(&card);
    Ok(())
}

pub(crate) fn run_card_edit(
    db: Option<PathBuf>,
    card_id: &str,
    fields: &FieldEditArgs,
) -> Result<(), CliError> {
    let patch = field_patch(fields)?;
    let checklist = crate::open_checklist(db)?;
    let card = checklist
        .patch_card(card_id, &patch)
        .inspect_err(|e| hint_overridable_fields(e, EntityKind::Card))?;

    log::info!(
        "{} {} field(s) on {}",
        "Updated".if_supports_color(Stdout, |t| t.green()),
        patch.len(),
        card_id,
    );
    crate::log_blank();
    log_card_detail(&card);
    Ok(())
}

pub(crate) fn run_card_overrides(db: Option<PathBuf>, card_id: &str) -> Result<(), CliError> {
    let checklist = crate::open_checklist(db)?;
    let overrides = checklist.card_overrides(card_id)?;
    log_overrides(&format!("card {}", card_id), &overrides);
    Ok(())
}

pub(crate) fn run_card_reset(db: Option<PathBuf>, card_id: &str, field: &str) -> Result<(), CliError> {
    let checklist = crate::open_checklist(db)?;
    let removed = checklist
        .delete_card_override(card_id, field)
        .inspect_err(|e| hint_overridable_fields(e, EntityKind::Card))?;
    if removed {
        log::info!("Restored imported value of {} on card {}.", field, card_id);
    } else {
        log::info!("Card {} has no override for {}.", card_id, field);
    }
    Ok(())
}

pub(crate) fn run_card_history(
    db: Option<PathBuf>,
    card_id: &str,
    limit: u32,
) -> Result<(), CliError> {
    let checklist = crate::open_checklist(db)?;
    let events = checklist.override_history(EntityKind::Card, card_id, Some(limit))?;
    log_history(&format!("card {}", card_id), &events);
    Ok(())
}

fn log_card_detail(card: &Card) {
    log::info!(
        "{} {}",
        card.card_id.if_supports_color(Stdout, |t| t.bold()),
        card.name_zh.if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Japanese:  {}", card.name_jp);
    log::info!("  Set:       {}", card.set_id);

    let mut kind = card.card_type.clone();
    if let Some(attribute) = &card.attribute {
        kind.push_str(&format!(" / {}", attribute));
    }
    if let Some(monster_type) = &card.monster_type {
        kind.push_str(&format!(" / {}", monster_type));
    }
    if card.is_legend {
        kind.push_str(&format!(" {}", "LEGEND".if_supports_color(Stdout, |t| t.yellow())));
    }
    log::info!("  Type:      {}", kind);

    if let Some(level) = card.level {
        log::info!(
            "  Level:     {}  ATK {}  DEF {}",
            level,
            card.atk.as_deref().unwrap_or("-"),
            card.defense.as_deref().unwrap_or("-"),
        );
    }

    let texts = [
        ("Summon", &card.summon_condition),
        ("Condition", &card.condition),
        ("Effect", &card.effect),
        ("Continuous", &card.continuous_effect),
    ];
    for (label, text) in texts {
        if let Some(text) = text {
            log::info!("  {:<10} {}", format!("{}:", label), text);
        }
    }

    if card.variants.is_empty() {
        log::info!("  Variants:  (none)");
    } else {
        log::info!("  Variants:  {}", format_variants(&card.variants));
    }
}
