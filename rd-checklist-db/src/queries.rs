//! Read queries for the checklist database.
//!
//! Every set or card handed out here is resolved against its overrides.
//! Public queries that issue more than one statement run inside a single
//! read transaction so they see one consistent snapshot.

use std::collections::HashMap;

use rd_checklist_catalog::types::*;
use rd_checklist_catalog::{
    resolve, resolve_all, search, summarize_product_types, CardField, EntityKind, Overridable,
    OverridableField, SearchParams, SetField,
};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::operations::{override_table, with_transaction, OperationError};

const CARD_SET_COLUMNS: &str = "set_id, set_name_jp, set_name_zh, product_type, release_date,
    post_url, total_cards, rarity_distribution";

const CARD_COLUMNS: &str = "c.card_id, c.set_id, c.name_jp, c.name_zh, c.card_type, c.attribute,
    c.monster_type, c.level, c.atk, c.defense, c.summon_condition, c.condition, c.effect,
    c.continuous_effect, c.is_legend, c.original_rarity_string";

const VARIANT_COLUMNS: &str = "v.id, v.card_id, v.rarity, v.sort_order, v.image_source,
    v.image_path, v.owned_count";

fn read<T>(
    conn: &Connection,
    f: impl FnOnce(&Connection) -> Result<T, OperationError>,
) -> Result<T, OperationError> {
    with_transaction(conn, TransactionBehavior::Deferred, f)
}

// ── Existence ───────────────────────────────────────────────────────────────

pub(crate) fn ensure_exists(
    conn: &Connection,
    kind: EntityKind,
    entity_id: &str,
) -> Result<(), OperationError> {
    let sql = match kind {
        EntityKind::CardSet => "SELECT EXISTS(SELECT 1 FROM card_sets WHERE set_id = ?1)",
        EntityKind::Card => "SELECT EXISTS(SELECT 1 FROM cards WHERE card_id = ?1)",
    };
    let exists: bool = conn.query_row(sql, params![entity_id], |row| row.get(0))?;
    if exists {
        Ok(())
    } else {
        Err(OperationError::not_found(kind.as_str(), entity_id))
    }
}

// ── Card Sets ───────────────────────────────────────────────────────────────

/// Get one resolved card set.
pub fn get_card_set(conn: &Connection, set_id: &str) -> Result<CardSet, OperationError> {
    read(conn, |conn| fetch_card_set(conn, set_id))
}

fn fetch_card_set(conn: &Connection, set_id: &str) -> Result<CardSet, OperationError> {
    let canonical = conn
        .query_row(
            &format!("SELECT {CARD_SET_COLUMNS} FROM card_sets WHERE set_id = ?1"),
            params![set_id],
            row_to_card_set,
        )
        .optional()?
        .ok_or_else(|| OperationError::not_found(EntityKind::CardSet.as_str(), set_id))?;
    let overrides = overrides_for(conn, EntityKind::CardSet, set_id)?;
    Ok(resolve(&canonical, &overrides))
}

/// List resolved card sets, optionally only those of one product type.
///
/// The filter applies to the resolved product type. Ordered by release date
/// (newest first, undated last), then `set_id`.
pub fn list_card_sets(
    conn: &Connection,
    product_type: Option<&str>,
) -> Result<Vec<CardSet>, OperationError> {
    let mut sets = read(conn, fetch_all_card_sets)?;
    if let Some(pt) = product_type.filter(|pt| !pt.is_empty()) {
        sets.retain(|s| s.product_type == pt);
    }
    sets.sort_by(|a, b| match (&a.release_date, &b.release_date) {
        (Some(x), Some(y)) => y.cmp(x).then_with(|| a.set_id.cmp(&b.set_id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.set_id.cmp(&b.set_id),
    });
    Ok(sets)
}

fn fetch_all_card_sets(conn: &Connection) -> Result<Vec<CardSet>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CARD_SET_COLUMNS} FROM card_sets ORDER BY set_id"
    ))?;
    let canonical = stmt
        .query_map([], row_to_card_set)?
        .collect::<Result<Vec<_>, _>>()?;
    let overrides = all_overrides(conn, EntityKind::CardSet, None)?;
    Ok(resolve_all(&canonical, &overrides))
}

/// A resolved set with all of its resolved cards, ordered by `card_id`.
pub fn card_set_with_cards(
    conn: &Connection,
    set_id: &str,
) -> Result<CardSetWithCards, OperationError> {
    read(conn, |conn| {
        let set = fetch_card_set(conn, set_id)?;
        let cards = fetch_cards(conn, Some(set_id))?;
        Ok(CardSetWithCards { set, cards })
    })
}

/// One entry per distinct resolved product type, with set counts.
pub fn list_product_types(conn: &Connection) -> Result<Vec<ProductType>, OperationError> {
    let sets = read(conn, fetch_all_card_sets)?;
    Ok(summarize_product_types(&sets))
}

// ── Cards ───────────────────────────────────────────────────────────────────

/// Get one resolved card with its variants.
pub fn get_card(conn: &Connection, card_id: &str) -> Result<Card, OperationError> {
    read(conn, |conn| fetch_card(conn, card_id))
}

fn fetch_card(conn: &Connection, card_id: &str) -> Result<Card, OperationError> {
    let mut canonical = conn
        .query_row(
            &format!("SELECT {CARD_COLUMNS} FROM cards c WHERE c.card_id = ?1"),
            params![card_id],
            row_to_card,
        )
        .optional()?
        .ok_or_else(|| OperationError::not_found(EntityKind::Card.as_str(), card_id))?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {VARIANT_COLUMNS} FROM card_variants v
         WHERE v.card_id = ?1 ORDER BY v.sort_order, v.rarity"
    ))?;
    canonical.variants = stmt
        .query_map(params![card_id], row_to_variant)?
        .collect::<Result<Vec<_>, _>>()?;

    let overrides = overrides_for(conn, EntityKind::Card, card_id)?;
    Ok(resolve(&canonical, &overrides))
}

/// Resolved cards with variants, for one set or the whole catalog.
fn fetch_cards(conn: &Connection, set_id: Option<&str>) -> Result<Vec<Card>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CARD_COLUMNS} FROM cards c
         WHERE (?1 IS NULL OR c.set_id = ?1)
         ORDER BY c.set_id, c.card_id"
    ))?;
    let mut cards = stmt
        .query_map(params![set_id], row_to_card)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut by_card: HashMap<String, Vec<CardVariant>> = HashMap::new();
    for variant in fetch_variants(conn, set_id)? {
        by_card.entry(variant.card_id.clone()).or_default().push(variant);
    }
    for card in &mut cards {
        if let Some(variants) = by_card.remove(&card.card_id) {
            card.variants = variants;
        }
    }

    let overrides = all_overrides(conn, EntityKind::Card, set_id)?;
    Ok(resolve_all(&cards, &overrides))
}

/// Variants of every card in one set (or all sets), in display order.
fn fetch_variants(
    conn: &Connection,
    set_id: Option<&str>,
) -> Result<Vec<CardVariant>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {VARIANT_COLUMNS} FROM card_variants v
         JOIN cards c ON c.card_id = v.card_id
         WHERE (?1 IS NULL OR c.set_id = ?1)
         ORDER BY v.card_id, v.sort_order, v.rarity"
    ))?;
    let rows = stmt.query_map(params![set_id], row_to_variant)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub(crate) fn find_variant(
    conn: &Connection,
    card_id: &str,
    rarity: &str,
) -> Result<Option<CardVariant>, OperationError> {
    conn.query_row(
        &format!(
            "SELECT {VARIANT_COLUMNS} FROM card_variants v WHERE v.card_id = ?1 AND v.rarity = ?2"
        ),
        params![card_id, rarity],
        row_to_variant,
    )
    .optional()
    .map_err(Into::into)
}

// ── Search ──────────────────────────────────────────────────────────────────

/// Search resolved cards. See [`rd_checklist_catalog::search`] for the
/// predicate semantics and ordering.
pub fn search_cards(
    conn: &Connection,
    params: &SearchParams,
) -> Result<Vec<Card>, OperationError> {
    params.page_size()?;
    // set_id is not overridable, so it can narrow the load in SQL.
    let cards = read(conn, |conn| fetch_cards(conn, params.set_filter()))?;
    Ok(search(&cards, params)?)
}

// ── Ownership Statistics ────────────────────────────────────────────────────

/// Ownership totals for one set, folded from its current variant rows.
pub fn ownership_stats(conn: &Connection, set_id: &str) -> Result<OwnershipStats, OperationError> {
    read(conn, |conn| {
        ensure_exists(conn, EntityKind::CardSet, set_id)?;
        let variants = fetch_variants(conn, Some(set_id))?;
        Ok(OwnershipStats::from_variants(&variants))
    })
}

/// Ownership totals across the whole collection.
pub fn collection_stats(conn: &Connection) -> Result<OwnershipStats, OperationError> {
    let variants = read(conn, |conn| fetch_variants(conn, None))?;
    Ok(OwnershipStats::from_variants(&variants))
}

// ── Overrides ───────────────────────────────────────────────────────────────

/// All overrides of one set or card, ordered by field name.
pub fn list_overrides(
    conn: &Connection,
    kind: EntityKind,
    entity_id: &str,
) -> Result<Vec<Override>, OperationError> {
    read(conn, |conn| {
        ensure_exists(conn, kind, entity_id)?;
        overrides_for(conn, kind, entity_id)
    })
}

fn overrides_for(
    conn: &Connection,
    kind: EntityKind,
    entity_id: &str,
) -> Result<Vec<Override>, OperationError> {
    let (table, id_column) = override_table(kind);
    let mut stmt = conn.prepare(&format!(
        "SELECT {id_column}, field_name, value, updated_at FROM {table}
         WHERE {id_column} = ?1 ORDER BY field_name"
    ))?;
    let rows = stmt.query_map(params![entity_id], row_to_override)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Every override in a namespace, optionally limited to one set's entities.
fn all_overrides(
    conn: &Connection,
    kind: EntityKind,
    set_id: Option<&str>,
) -> Result<Vec<Override>, OperationError> {
    let sql = match kind {
        EntityKind::CardSet => {
            "SELECT o.set_id, o.field_name, o.value, o.updated_at FROM card_set_overrides o
             WHERE (?1 IS NULL OR o.set_id = ?1)
             ORDER BY o.set_id, o.field_name"
        }
        EntityKind::Card => {
            "SELECT o.card_id, o.field_name, o.value, o.updated_at FROM card_overrides o
             JOIN cards c ON c.card_id = o.card_id
             WHERE (?1 IS NULL OR c.set_id = ?1)
             ORDER BY o.card_id, o.field_name"
        }
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![set_id], row_to_override)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Current effective value of one overridable field.
pub(crate) fn effective_field_value(
    conn: &Connection,
    kind: EntityKind,
    entity_id: &str,
    field_name: &str,
) -> Result<Option<String>, OperationError> {
    match kind {
        EntityKind::CardSet => {
            let field = SetField::parse(field_name)?;
            Ok(fetch_card_set(conn, entity_id)?.field_value(field))
        }
        EntityKind::Card => {
            let field = CardField::parse(field_name)?;
            Ok(fetch_card(conn, entity_id)?.field_value(field))
        }
    }
}

/// Edit history of one set or card, newest first.
pub fn list_override_events(
    conn: &Connection,
    kind: EntityKind,
    entity_id: &str,
    limit: Option<u32>,
) -> Result<Vec<OverrideEvent>, OperationError> {
    read(conn, |conn| {
        ensure_exists(conn, kind, entity_id)?;
        fetch_override_events(conn, kind, entity_id, limit.unwrap_or(50))
    })
}

fn fetch_override_events(
    conn: &Connection,
    kind: EntityKind,
    entity_id: &str,
    limit: u32,
) -> Result<Vec<OverrideEvent>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, entity_kind, entity_id, field_name, action, old_value, new_value, changed_at
         FROM override_log WHERE entity_kind = ?1 AND entity_id = ?2
         ORDER BY id DESC LIMIT {limit}"
    ))?;
    let rows = stmt.query_map(params![kind.as_str(), entity_id], |row| {
        let kind_str: String = row.get(1)?;
        let action_str: String = row.get(4)?;
        let Some(action) = OverrideAction::from_str_loose(&action_str) else {
            let id: i64 = row.get(0)?;
            log::warn!("Skipping override log entry {} with unknown action '{}'", id, action_str);
            return Ok(None);
        };
        Ok(Some(OverrideEvent {
            id: row.get(0)?,
            entity_kind: EntityKind::from_str_loose(&kind_str).unwrap_or(kind),
            entity_id: row.get(2)?,
            field_name: row.get(3)?,
            action,
            old_value: row.get(5)?,
            new_value: row.get(6)?,
            changed_at: row.get(7)?,
        }))
    })?;
    let events = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(events.into_iter().flatten().collect())
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

fn row_to_card_set(row: &rusqlite::Row<'_>) -> rusqlite::Result<CardSet> {
    Ok(CardSet {
        set_id: row.get(0)?,
        set_name_jp: row.get(1)?,
        set_name_zh: row.get(2)?,
        product_type: row.get(3)?,
        release_date: row.get(4)?,
        post_url: row.get(5)?,
        total_cards: row.get(6)?,
        rarity_distribution: row.get(7)?,
    })
}

fn row_to_card(row: &rusqlite::Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        card_id: row.get(0)?,
        set_id: row.get(1)?,
        name_jp: row.get(2)?,
        name_zh: row.get(3)?,
        card_type: row.get(4)?,
        attribute: row.get(5)?,
        monster_type: row.get(6)?,
        level: row.get(7)?,
        atk: row.get(8)?,
        defense: row.get(9)?,
        summon_condition: row.get(10)?,
        condition: row.get(11)?,
        effect: row.get(12)?,
        continuous_effect: row.get(13)?,
        is_legend: row.get(14)?,
        original_rarity_string: row.get(15)?,
        variants: Vec::new(),
    })
}

fn row_to_variant(row: &rusqlite::Row<'_>) -> rusqlite::Result<CardVariant> {
    Ok(CardVariant {
        id: row.get(0)?,
        card_id: row.get(1)?,
        rarity: row.get(2)?,
        sort_order: row.get(3)?,
        image_source: row.get(4)?,
        image_path: row.get(5)?,
        owned_count: row.get(6)?,
    })
}

fn row_to_override(row: &rusqlite::Row<'_>) -> rusqlite::Result<Override> {
    Ok(Override {
        entity_id: row.get(0)?,
        field_name: row.get(1)?,
        value: row.get(2)?,
        updated_at: row.get(3)?,
    })
}
