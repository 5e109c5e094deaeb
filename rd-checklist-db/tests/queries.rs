use rd_checklist_catalog::types::*;
use rd_checklist_catalog::{EntityKind, OwnedFilter, SearchParams};
use rd_checklist_db::*;
use rusqlite::Connection;

fn card_set(set_id: &str, product_type: &str, release_date: Option<&str>) -> CardSet {
    CardSet {
        set_id: set_id.to_string(),
        set_name_jp: format!("{set_id} JP"),
        set_name_zh: format!("{set_id} ZH"),
        product_type: product_type.to_string(),
        release_date: release_date.map(str::to_string),
        post_url: String::new(),
        total_cards: 0,
        rarity_distribution: None,
    }
}

fn variant(card_id: &str, rarity: &str, sort_order: i32, owned_count: i64) -> CardVariant {
    CardVariant {
        id: 0,
        card_id: card_id.to_string(),
        rarity: rarity.to_string(),
        sort_order,
        image_source: None,
        image_path: None,
        owned_count,
    }
}

fn card(card_id: &str, set_id: &str, card_type: &str, variants: Vec<CardVariant>) -> Card {
    Card {
        card_id: card_id.to_string(),
        set_id: set_id.to_string(),
        name_jp: format!("{card_id} JP"),
        name_zh: format!("{card_id} ZH"),
        card_type: card_type.to_string(),
        attribute: None,
        monster_type: None,
        level: None,
        atk: None,
        defense: None,
        summon_condition: None,
        condition: None,
        effect: None,
        continuous_effect: None,
        is_legend: false,
        original_rarity_string: String::new(),
        variants,
    }
}

/// S1 holds C1 (N unowned, SR x2) and C2, which has no variants yet.
fn worked_example() -> Connection {
    let conn = open_memory().unwrap();
    upsert_card_set(&conn, &card_set("S1", "booster", Some("2023-04-01"))).unwrap();
    upsert_card(
        &conn,
        &card(
            "C1",
            "S1",
            "Monster",
            vec![variant("C1", "N", 0, 0), variant("C1", "SR", 1, 2)],
        ),
    )
    .unwrap();
    upsert_card(&conn, &card("C2", "S1", "Spell", vec![])).unwrap();
    conn
}

fn ids(cards: &[Card]) -> Vec<&str> {
    cards.iter().map(|c| c.card_id.as_str()).collect()
}

// ── Sets ────────────────────────────────────────────────────────────────────

#[test]
fn get_card_set_resolves_overrides() {
    let conn = worked_example();
    apply_override(&conn, EntityKind::CardSet, "S1", "set_name_zh", Some("X")).unwrap();

    let set = get_card_set(&conn, "S1").unwrap();
    assert_eq!(set.set_name_zh, "X");
    assert_eq!(set.set_name_jp, "S1 JP");
}

#[test]
fn get_card_set_not_found() {
    let conn = worked_example();
    assert!(matches!(
        get_card_set(&conn, "S9"),
        Err(OperationError::NotFound { .. })
    ));
}

#[test]
fn list_card_sets_orders_newest_first() {
    let conn = open_memory().unwrap();
    upsert_card_set(&conn, &card_set("A", "booster", Some("2022-01-01"))).unwrap();
    upsert_card_set(&conn, &card_set("B", "booster", None)).unwrap();
    upsert_card_set(&conn, &card_set("C", "starter", Some("2024-06-01"))).unwrap();

    let sets = list_card_sets(&conn, None).unwrap();
    let order: Vec<_> = sets.iter().map(|s| s.set_id.as_str()).collect();
    assert_eq!(order, ["C", "A", "B"]);
}

#[test]
fn list_card_sets_filters_on_resolved_product_type() {
    let conn = open_memory().unwrap();
    upsert_card_set(&conn, &card_set("A", "booster", None)).unwrap();
    upsert_card_set(&conn, &card_set("B", "booster", None)).unwrap();
    apply_override(&conn, EntityKind::CardSet, "B", "product_type", Some("promo")).unwrap();

    let boosters = list_card_sets(&conn, Some("booster")).unwrap();
    assert_eq!(boosters.len(), 1);
    assert_eq!(boosters[0].set_id, "A");

    let promos = list_card_sets(&conn, Some("promo")).unwrap();
    assert_eq!(promos.len(), 1);
    assert_eq!(promos[0].set_id, "B");
}

#[test]
fn card_set_with_cards_includes_variants() {
    let conn = worked_example();
    let detail = card_set_with_cards(&conn, "S1").unwrap();
    assert_eq!(detail.set.set_id, "S1");
    assert_eq!(ids(&detail.cards), ["C1", "C2"]);

    let rarities: Vec<_> = detail.cards[0]
        .variants
        .iter()
        .map(|v| v.rarity.as_str())
        .collect();
    assert_eq!(rarities, ["N", "SR"]);
    assert!(detail.cards[1].variants.is_empty());
}

#[test]
fn product_types_follow_overrides() {
    let conn = open_memory().unwrap();
    upsert_card_set(&conn, &card_set("A", "booster", None)).unwrap();
    upsert_card_set(&conn, &card_set("B", "booster", None)).unwrap();
    upsert_card_set(&conn, &card_set("C", "starter", None)).unwrap();

    let types = list_product_types(&conn).unwrap();
    let booster = types.iter().find(|t| t.product_type == "booster").unwrap();
    assert_eq!(booster.set_count, 2);

    apply_override(&conn, EntityKind::CardSet, "A", "product_type", Some("starter")).unwrap();
    let types = list_product_types(&conn).unwrap();
    let booster = types.iter().find(|t| t.product_type == "booster").unwrap();
    let starter = types.iter().find(|t| t.product_type == "starter").unwrap();
    assert_eq!(booster.set_count, 1);
    assert_eq!(starter.set_count, 2);
    assert_eq!(types.iter().map(|t| t.set_count).sum::<i64>(), 3);
}

#[test]
fn product_types_empty_catalog() {
    let conn = open_memory().unwrap();
    assert!(list_product_types(&conn).unwrap().is_empty());
}

// ── Cards ───────────────────────────────────────────────────────────────────

#[test]
fn get_card_not_found() {
    let conn = worked_example();
    assert!(matches!(
        get_card(&conn, "C9"),
        Err(OperationError::NotFound { .. })
    ));
}

#[test]
fn cleared_override_hides_canonical_value() {
    let conn = worked_example();
    conn.execute("UPDATE cards SET effect = 'Draw 1' WHERE card_id = 'C2'", [])
        .unwrap();
    apply_override(&conn, EntityKind::Card, "C2", "effect", None).unwrap();

    assert_eq!(get_card(&conn, "C2").unwrap().effect, None);
    let overrides = list_overrides(&conn, EntityKind::Card, "C2").unwrap();
    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides[0].value, None);
}

#[test]
fn list_overrides_unknown_entity() {
    let conn = worked_example();
    assert!(matches!(
        list_overrides(&conn, EntityKind::CardSet, "S9"),
        Err(OperationError::NotFound { .. })
    ));
    assert!(list_overrides(&conn, EntityKind::CardSet, "S1")
        .unwrap()
        .is_empty());
}

// ── Search ──────────────────────────────────────────────────────────────────

#[test]
fn search_any_owned_in_set() {
    let conn = worked_example();
    let params = SearchParams {
        set_id: Some("S1".to_string()),
        owned: Some(OwnedFilter::AnyOwned),
        ..Default::default()
    };
    assert_eq!(ids(&search_cards(&conn, &params).unwrap()), ["C1"]);
}

#[test]
fn search_unowned_in_set() {
    let conn = worked_example();
    let params = SearchParams {
        set_id: Some("S1".to_string()),
        owned: Some(OwnedFilter::Unowned),
        ..Default::default()
    };
    assert_eq!(ids(&search_cards(&conn, &params).unwrap()), ["C2"]);
}

#[test]
fn search_sees_overridden_values() {
    let conn = worked_example();
    apply_override(&conn, EntityKind::Card, "C2", "card_type", Some("Trap")).unwrap();

    let params = SearchParams {
        card_type: Some("Trap".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&search_cards(&conn, &params).unwrap()), ["C2"]);

    let params = SearchParams {
        card_type: Some("Spell".to_string()),
        ..Default::default()
    };
    assert!(search_cards(&conn, &params).unwrap().is_empty());
}

#[test]
fn search_by_rarity_and_text() {
    let conn = worked_example();
    let params = SearchParams {
        rarity: Some("SR".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&search_cards(&conn, &params).unwrap()), ["C1"]);

    let params = SearchParams {
        q: Some("c2 zh".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&search_cards(&conn, &params).unwrap()), ["C2"]);
}

#[test]
fn search_rejects_bad_limit() {
    let conn = worked_example();
    let params = SearchParams {
        limit: Some(0),
        ..Default::default()
    };
    assert!(matches!(
        search_cards(&conn, &params),
        Err(OperationError::InvalidValue(_))
    ));
}

#[test]
fn search_paginates_in_order() {
    let conn = worked_example();
    upsert_card_set(&conn, &card_set("S0", "promo", None)).unwrap();
    upsert_card(&conn, &card("P1", "S0", "Monster", vec![])).unwrap();

    let params = SearchParams {
        limit: Some(2),
        ..Default::default()
    };
    assert_eq!(ids(&search_cards(&conn, &params).unwrap()), ["P1", "C1"]);

    let params = SearchParams {
        limit: Some(2),
        offset: 2,
        ..Default::default()
    };
    assert_eq!(ids(&search_cards(&conn, &params).unwrap()), ["C2"]);
}

// ── Statistics ──────────────────────────────────────────────────────────────

#[test]
fn ownership_stats_worked_example() {
    let conn = worked_example();
    let stats = ownership_stats(&conn, "S1").unwrap();
    assert_eq!(
        stats,
        OwnershipStats {
            total_variants: 2,
            owned_variants: 1,
            total_owned_copies: 2,
        }
    );
}

#[test]
fn ownership_stats_tracks_updates() {
    let conn = worked_example();
    set_owned_count(&conn, "C1", "N", 1).unwrap();
    let stats = ownership_stats(&conn, "S1").unwrap();
    assert_eq!(stats.owned_variants, 2);
    assert_eq!(stats.total_owned_copies, 3);

    // Variants are never created by ownership writes.
    assert!(set_owned_count(&conn, "C2", "N", 1).is_err());
    assert_eq!(ownership_stats(&conn, "S1").unwrap().total_variants, 2);
}

#[test]
fn ownership_stats_empty_and_missing_sets() {
    let conn = worked_example();
    upsert_card_set(&conn, &card_set("S2", "booster", None)).unwrap();
    assert_eq!(ownership_stats(&conn, "S2").unwrap(), OwnershipStats::default());
    assert!(matches!(
        ownership_stats(&conn, "S9"),
        Err(OperationError::NotFound { .. })
    ));
}

#[test]
fn collection_stats_spans_sets() {
    let conn = worked_example();
    upsert_card_set(&conn, &card_set("S2", "starter", None)).unwrap();
    upsert_card(&conn, &card("D1", "S2", "Monster", vec![variant("D1", "R", 0, 4)])).unwrap();

    let stats = collection_stats(&conn).unwrap();
    assert_eq!(stats.total_variants, 3);
    assert_eq!(stats.owned_variants, 2);
    assert_eq!(stats.total_owned_copies, 6);
}

#[test]
fn override_history_is_scoped_and_limited() {
    let conn = worked_example();
    for value in ["a", "b", "c"] {
        apply_override(&conn, EntityKind::Card, "C1", "effect", Some(value)).unwrap();
    }
    apply_override(&conn, EntityKind::Card, "C2", "effect", Some("z")).unwrap();

    let events = list_override_events(&conn, EntityKind::Card, "C1", Some(2)).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].new_value.as_deref(), Some("c"));
    assert_eq!(events[1].new_value.as_deref(), Some("b"));
    assert!(events.iter().all(|e| e.entity_id == "C1"));
}

#[test]
fn override_history_skips_unknown_actions() {
    let conn = worked_example();
    apply_override(&conn, EntityKind::Card, "C1", "effect", Some("a")).unwrap();
    conn.execute(
        "INSERT INTO override_log (entity_kind, entity_id, field_name, action, changed_at)
         VALUES ('card', 'C1', 'effect', 'archived', '2024-01-01T00:00:00Z')",
        [],
    )
    .unwrap();

    let events = list_override_events(&conn, EntityKind::Card, "C1", None).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, OverrideAction::Set);
}

#[test]
fn worked_example_name_override_round_trip() {
    let conn = worked_example();
    let before = get_card(&conn, "C1").unwrap();

    apply_override(&conn, EntityKind::Card, "C1", "name_zh", Some("新名稱")).unwrap();
    let during = get_card(&conn, "C1").unwrap();
    assert_eq!(during.name_zh, "新名稱");
    assert_eq!(during.name_jp, before.name_jp);
    assert_eq!(during.variants, before.variants);

    remove_override(&conn, EntityKind::Card, "C1", "name_zh").unwrap();
    assert_eq!(get_card(&conn, "C1").unwrap(), before);
}

#[test]
fn override_history_unknown_entity() {
    let conn = worked_example();
    assert!(matches!(
        list_override_events(&conn, EntityKind::Card, "C9", None),
        Err(OperationError::NotFound { .. })
    ));
}
