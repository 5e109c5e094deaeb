pub(crate) mod cards;
pub(crate) mod config;
pub(crate) mod import;
pub(crate) mod ownership;
pub(crate) mod search;
pub(crate) mod sets;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rd_checklist_lib::catalog::{
    Card, CardVariant, EntityKind, Override, OverrideAction, OverrideEvent,
};
use rd_checklist_lib::{ChecklistError, ErrorKind, FieldPatch};

use crate::CliError;
use crate::cli_types::FieldEditArgs;

/// Truncate a string to a maximum width in characters, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}

/// Build a field patch from `--set FIELD=VALUE` and `--clear FIELD` arguments.
pub(crate) fn field_patch(args: &FieldEditArgs) -> Result<FieldPatch, CliError> {
    let mut patch = FieldPatch::new();
    for assignment in &args.assignments {
        let (field, value) = assignment.split_once('=').ok_or_else(|| {
            CliError::invalid_argument(format!("expected FIELD=VALUE, got '{}'", assignment))
        })?;
        patch.insert(field.trim().to_string(), Some(value.to_string()));
    }
    for field in &args.clear {
        patch.insert(field.trim().to_string(), None);
    }
    if patch.is_empty() {
        return Err(CliError::invalid_argument(
            "nothing to change (use --set FIELD=VALUE or --clear FIELD)",
        ));
    }
    Ok(patch)
}

/// After a rejected edit, list the fields that can be overridden.
pub(crate) fn hint_overridable_fields(err: &ChecklistError, kind: EntityKind) {
    if err.kind() == ErrorKind::InvalidField {
        log::warn!(
            "Overridable {} fields: {}",
            kind,
            kind.field_names().join(", ")
        );
    }
}

/// Render an optional field value, dimming explicit clears.
pub(crate) fn display_value(value: Option<&str>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "(cleared)"
            .if_supports_color(Stdout, |t| t.dimmed())
            .to_string(),
    }
}

/// `N×0  SR×2`, with owned variants highlighted.
pub(crate) fn format_variants(variants: &[CardVariant]) -> String {
    variants
        .iter()
        .map(|v| {
            let label = format!("{}×{}", v.rarity, v.owned_count);
            if v.is_owned() {
                label.if_supports_color(Stdout, |t| t.green()).to_string()
            } else {
                label.if_supports_color(Stdout, |t| t.dimmed()).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// One-line summary of a card, used by set listings and search results.
pub(crate) fn log_card_line(card: &Card) {
    let name = if card.name_zh.is_empty() {
        &card.name_jp
    } else {
        &card.name_zh
    };
    log::info!(
        "  {:<18} {:<28} {:<8} {}",
        card.card_id.if_supports_color(Stdout, |t| t.bold()),
        truncate_str(name, 28),
        card.card_type,
        format_variants(&card.variants),
    );
}

pub(crate) fn log_overrides(entity: &str, overrides: &[Override]) {
    if overrides.is_empty() {
        log::info!("No overrides for {}.", entity);
        return;
    }
    log::info!(
        "{}",
        format!("Overrides for {}", entity).if_supports_color(Stdout, |t| t.bold()),
    );
    for ov in overrides {
        log::info!(
            "  {:<20} = {}  {}",
            ov.field_name.if_supports_color(Stdout, |t| t.cyan()),
            display_value(ov.value.as_deref()),
            format_timestamp(&ov.updated_at).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

pub(crate) fn log_history(entity: &str, events: &[OverrideEvent]) {
    if events.is_empty() {
        log::info!("No edits recorded for {}.", entity);
        return;
    }
    log::info!(
        "{}",
        format!("Edit history for {}", entity).if_supports_color(Stdout, |t| t.bold()),
    );
    for event in events {
        let action = match event.action {
            OverrideAction::Set => "set".if_supports_color(Stdout, |t| t.yellow()).to_string(),
            OverrideAction::Removed => "reset".if_supports_color(Stdout, |t| t.blue()).to_string(),
        };
        log::info!(
            "  {}  {:<7} {:<20} {} -> {}",
            format_timestamp(&event.changed_at).if_supports_color(Stdout, |t| t.dimmed()),
            action,
            event.field_name,
            display_value(event.old_value.as_deref()),
            display_value(event.new_value.as_deref()),
        );
    }
}

/// Local-time rendering of a stored RFC 3339 timestamp.
pub(crate) fn format_timestamp(ts: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(ts)
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate_str("短い名前", 10), "短い名前");
        assert_eq!(truncate_str("abcdefghij", 6), "abc...");
        assert_eq!(truncate_str("青眼の白龍青眼の白龍", 5), "青眼...");
        assert_eq!(truncate_str("abcdef", 2), "ab");
    }

    #[test]
    fn field_patch_from_args() {
        let args = FieldEditArgs {
            assignments: vec!["name_zh=新名稱".to_string(), "atk=1500=x".to_string()],
            clear: vec!["effect".to_string()],
        };
        let patch = field_patch(&args).unwrap();
        assert_eq!(patch["name_zh"].as_deref(), Some("新名稱"));
        assert_eq!(patch["atk"].as_deref(), Some("1500=x"));
        assert_eq!(patch["effect"], None);
    }

    #[test]
    fn field_patch_rejects_bare_field() {
        let args = FieldEditArgs {
            assignments: vec!["name_zh".to_string()],
            clear: vec![],
        };
        assert!(field_patch(&args).is_err());

        let empty = FieldEditArgs {
            assignments: vec![],
            clear: vec![],
        };
        assert!(field_patch(&empty).is_err());
    }

    #[test]
    fn timestamp_falls_back_to_raw() {
        assert_eq!(format_timestamp("not a time"), "not a time");
    }
}
