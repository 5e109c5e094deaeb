//! Write operations: catalog upserts, override upsert/removal, ownership.
//!
//! Canonical rows are only written by the upsert functions. User edits go to
//! the override tables and never modify `card_sets` or `cards`.

use std::collections::BTreeMap;

use rd_checklist_catalog::types::*;
use rd_checklist_catalog::{EntityKind, ValidationError};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use thiserror::Error;

use crate::queries;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
    #[error("Field '{field}' is not overridable on a {entity_type}")]
    InvalidField { entity_type: String, field: String },
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

impl OperationError {
    pub(crate) fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

impl From<ValidationError> for OperationError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::InvalidField { entity, field } => Self::InvalidField {
                entity_type: entity.as_str().to_string(),
                field,
            },
            e @ ValidationError::InvalidValue { .. } => Self::InvalidValue(e.to_string()),
        }
    }
}

// ── Transactions ────────────────────────────────────────────────────────────

/// Run `f` inside a transaction, or directly if one is already open.
///
/// Reads use a deferred transaction so every statement sees the same
/// snapshot; writes take the write lock up front.
pub(crate) fn with_transaction<T>(
    conn: &Connection,
    behavior: TransactionBehavior,
    f: impl FnOnce(&Connection) -> Result<T, OperationError>,
) -> Result<T, OperationError> {
    if !conn.is_autocommit() {
        return f(conn);
    }
    let tx = Transaction::new_unchecked(conn, behavior)?;
    let out = f(&tx)?;
    tx.commit()?;
    Ok(out)
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

// ── Catalog Operations ──────────────────────────────────────────────────────

/// Insert or update a card set's canonical row. Overrides are untouched.
pub fn upsert_card_set(conn: &Connection, set: &CardSet) -> Result<(), OperationError> {
    if set.total_cards < 0 {
        return Err(OperationError::InvalidValue(format!(
            "total_cards of set '{}' is negative",
            set.set_id
        )));
    }
    conn.execute(
        "INSERT INTO card_sets (set_id, set_name_jp, set_name_zh, product_type, release_date,
             post_url, total_cards, rarity_distribution)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(set_id) DO UPDATE SET
             set_name_jp = excluded.set_name_jp,
             set_name_zh = excluded.set_name_zh,
             product_type = excluded.product_type,
             release_date = excluded.release_date,
             post_url = excluded.post_url,
             total_cards = excluded.total_cards,
             rarity_distribution = excluded.rarity_distribution,
             updated_at = datetime('now')",
        params![
            set.set_id,
            set.set_name_jp,
            set.set_name_zh,
            set.product_type,
            set.release_date,
            set.post_url,
            set.total_cards,
            set.rarity_distribution,
        ],
    )?;
    Ok(())
}

/// Insert or update a card's canonical row and its variants.
///
/// Existing variants keep their `owned_count`; only display data is
/// refreshed. New variants start at the count given in `card`.
pub fn upsert_card(conn: &Connection, card: &Card) -> Result<(), OperationError> {
    if let Some(v) = card.variants.iter().find(|v| v.owned_count < 0) {
        return Err(OperationError::InvalidValue(format!(
            "owned_count of {} ({}) is negative",
            card.card_id, v.rarity
        )));
    }

    with_transaction(conn, TransactionBehavior::Immediate, |conn| {
        conn.execute(
            "INSERT INTO cards (card_id, set_id, name_jp, name_zh, card_type, attribute,
                 monster_type, level, atk, defense, summon_condition, condition, effect,
                 continuous_effect, is_legend, original_rarity_string)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
             ON CONFLICT(card_id) DO UPDATE SET
                 set_id = excluded.set_id,
                 name_jp = excluded.name_jp,
                 name_zh = excluded.name_zh,
                 card_type = excluded.card_type,
                 attribute = excluded.attribute,
                 monster_type = excluded.monster_type,
                 level = excluded.level,
                 atk = excluded.atk,
                 defense = excluded.defense,
                 summon_condition = excluded.summon_condition,
                 condition = excluded.condition,
                 effect = excluded.effect,
                 continuous_effect = excluded.continuous_effect,
                 is_legend = excluded.is_legend,
                 original_rarity_string = excluded.original_rarity_string,
                 updated_at = datetime('now')",
            params![
                card.card_id,
                card.set_id,
                card.name_jp,
                card.name_zh,
                card.card_type,
                card.attribute,
                card.monster_type,
                card.level,
                card.atk,
                card.defense,
                card.summon_condition,
                card.condition,
                card.effect,
                card.continuous_effect,
                card.is_legend,
                card.original_rarity_string,
            ],
        )?;

        for variant in &card.variants {
            conn.execute(
                "INSERT INTO card_variants (card_id, rarity, sort_order, image_source,
                     image_path, owned_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(card_id, rarity) DO UPDATE SET
                     sort_order = excluded.sort_order,
                     image_source = excluded.image_source,
                     image_path = excluded.image_path,
                     updated_at = datetime('now')",
                params![
                    card.card_id,
                    variant.rarity,
                    variant.sort_order,
                    variant.image_source,
                    variant.image_path,
                    variant.owned_count,
                ],
            )?;
        }
        Ok(())
    })
}

/// Import sets with their nested cards in one transaction.
///
/// A card without a `set_id` belongs to the enclosing set; a card naming a
/// different set is rejected. Any failure leaves the database untouched.
/// Returns the number of cards written.
pub fn import_card_sets(
    conn: &Connection,
    sets: &[CardSetWithCards],
) -> Result<usize, OperationError> {
    with_transaction(conn, TransactionBehavior::Immediate, |conn| {
        let mut card_count = 0;
        for CardSetWithCards { set, cards } in sets {
            upsert_card_set(conn, set)?;
            for card in cards {
                if card.set_id.is_empty() {
                    let card = Card {
                        set_id: set.set_id.clone(),
                        ..card.clone()
                    };
                    upsert_card(conn, &card)?;
                } else if card.set_id == set.set_id {
                    upsert_card(conn, card)?;
                } else {
                    return Err(OperationError::InvalidValue(format!(
                        "card '{}' names set '{}' but is nested under '{}'",
                        card.card_id, card.set_id, set.set_id
                    )));
                }
                card_count += 1;
            }
            log::debug!("Imported set {} ({} cards)", set.set_id, cards.len());
        }
        Ok(card_count)
    })
}

// ── Override Operations ─────────────────────────────────────────────────────

/// Table and key column holding overrides for `kind`.
pub(crate) fn override_table(kind: EntityKind) -> (&'static str, &'static str) {
    match kind {
        EntityKind::CardSet => ("card_set_overrides", "set_id"),
        EntityKind::Card => ("card_overrides", "card_id"),
    }
}

/// Set (or replace) the override for one field.
///
/// The field must be in the entity's overridable table and the value must
/// fit its type. Applying the same value twice leaves the same row behind;
/// only `updated_at` moves, and the edit log records nothing.
pub fn apply_override(
    conn: &Connection,
    kind: EntityKind,
    entity_id: &str,
    field_name: &str,
    value: Option<&str>,
) -> Result<Override, OperationError> {
    let field = kind.validate(field_name, value)?;
    with_transaction(conn, TransactionBehavior::Immediate, |conn| {
        queries::ensure_exists(conn, kind, entity_id)?;
        write_override(conn, kind, entity_id, field, value)
    })
}

/// Apply a partial field map in one transaction.
///
/// Every field and value is validated before anything is written, so an
/// unknown field rejects the whole map.
pub fn apply_overrides(
    conn: &Connection,
    kind: EntityKind,
    entity_id: &str,
    fields: &BTreeMap<String, Option<String>>,
) -> Result<Vec<Override>, OperationError> {
    let validated = fields
        .iter()
        .map(|(name, value)| Ok((kind.validate(name, value.as_deref())?, value.as_deref())))
        .collect::<Result<Vec<_>, ValidationError>>()?;

    with_transaction(conn, TransactionBehavior::Immediate, |conn| {
        queries::ensure_exists(conn, kind, entity_id)?;
        validated
            .into_iter()
            .map(|(field, value)| write_override(conn, kind, entity_id, field, value))
            .collect()
    })
}

fn write_override(
    conn: &Connection,
    kind: EntityKind,
    entity_id: &str,
    field: &'static str,
    value: Option<&str>,
) -> Result<Override, OperationError> {
    let (table, id_column) = override_table(kind);
    let old_value = queries::effective_field_value(conn, kind, entity_id, field)?;
    let updated_at = now();

    conn.execute(
        &format!(
            "INSERT INTO {table} ({id_column}, field_name, value, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT({id_column}, field_name) DO UPDATE SET
                 value = excluded.value,
                 updated_at = excluded.updated_at"
        ),
        params![entity_id, field, value, updated_at],
    )?;
    if old_value.as_deref() != value {
        insert_override_event(
            conn,
            kind,
            entity_id,
            field,
            OverrideAction::Set,
            old_value.as_deref(),
            value,
            &updated_at,
        )?;
    }

    log::debug!("Override {} {}.{} = {:?}", kind.as_str(), entity_id, field, value);

    Ok(Override {
        entity_id: entity_id.to_string(),
        field_name: field.to_string(),
        value: value.map(str::to_string),
        updated_at,
    })
}

/// Delete the override for one field, restoring the canonical value.
///
/// Returns whether a row was removed; removing an absent override is a
/// no-op. The entity must exist and the field must be overridable.
pub fn remove_override(
    conn: &Connection,
    kind: EntityKind,
    entity_id: &str,
    field_name: &str,
) -> Result<bool, OperationError> {
    let field = kind.validate_field(field_name)?;
    let (table, id_column) = override_table(kind);

    with_transaction(conn, TransactionBehavior::Immediate, |conn| {
        queries::ensure_exists(conn, kind, entity_id)?;
        let old_value = queries::effective_field_value(conn, kind, entity_id, field)?;
        let removed = conn.execute(
            &format!("DELETE FROM {table} WHERE {id_column} = ?1 AND field_name = ?2"),
            params![entity_id, field],
        )?;
        if removed == 0 {
            return Ok(false);
        }

        let new_value = queries::effective_field_value(conn, kind, entity_id, field)?;
        insert_override_event(
            conn,
            kind,
            entity_id,
            field,
            OverrideAction::Removed,
            old_value.as_deref(),
            new_value.as_deref(),
            &now(),
        )?;
        log::debug!("Removed override {} {}.{}", kind.as_str(), entity_id, field);
        Ok(true)
    })
}

#[allow(clippy::too_many_arguments)]
fn insert_override_event(
    conn: &Connection,
    kind: EntityKind,
    entity_id: &str,
    field: &str,
    action: OverrideAction,
    old_value: Option<&str>,
    new_value: Option<&str>,
    changed_at: &str,
) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO override_log (entity_kind, entity_id, field_name, action, old_value,
             new_value, changed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            kind.as_str(),
            entity_id,
            field,
            action.as_str(),
            old_value,
            new_value,
            changed_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// ── Ownership Operations ────────────────────────────────────────────────────

/// Overwrite the owned count of one variant and return the updated row.
///
/// This is the only write path for ownership; variants are never created
/// or deleted here.
pub fn set_owned_count(
    conn: &Connection,
    card_id: &str,
    rarity: &str,
    count: i64,
) -> Result<CardVariant, OperationError> {
    with_transaction(conn, TransactionBehavior::Immediate, |conn| {
        write_owned_count(conn, card_id, rarity, count)
    })
}

/// Apply several ownership updates atomically. Any failing entry aborts
/// the whole batch.
pub fn set_owned_counts(
    conn: &Connection,
    updates: &[OwnershipUpdate],
) -> Result<Vec<CardVariant>, OperationError> {
    with_transaction(conn, TransactionBehavior::Immediate, |conn| {
        updates
            .iter()
            .map(|u| write_owned_count(conn, &u.card_id, &u.rarity, u.owned_count))
            .collect()
    })
}

fn write_owned_count(
    conn: &Connection,
    card_id: &str,
    rarity: &str,
    count: i64,
) -> Result<CardVariant, OperationError> {
    if count < 0 {
        return Err(OperationError::InvalidValue(format!(
            "owned_count for {card_id} ({rarity}) must not be negative, got {count}"
        )));
    }

    let changed = conn.execute(
        "UPDATE card_variants SET owned_count = ?3, updated_at = datetime('now')
         WHERE card_id = ?1 AND rarity = ?2",
        params![card_id, rarity, count],
    )?;
    if changed == 0 {
        return Err(OperationError::not_found(
            "card_variant",
            format!("{card_id} ({rarity})"),
        ));
    }

    log::debug!("Owned count {} ({}) = {}", card_id, rarity, count);

    queries::find_variant(conn, card_id, rarity)?
        .ok_or_else(|| OperationError::not_found("card_variant", format!("{card_id} ({rarity})")))
}
