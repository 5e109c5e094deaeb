use rd_checklist_catalog::*;

fn test_set() -> CardSet {
    CardSet {
        set_id: "KP01".to_string(),
        set_name_jp: "デッキ改造パック 超速のラッシュロード!!".to_string(),
        set_name_zh: "超速之疾行之路".to_string(),
        product_type: "booster".to_string(),
        release_date: Some("2020-04-04".to_string()),
        post_url: "https://example.invalid/kp01".to_string(),
        total_cards: 60,
        rarity_distribution: None,
    }
}

fn test_card() -> Card {
    Card {
        card_id: "RD/KP01-JP000".to_string(),
        set_id: "KP01".to_string(),
        name_jp: "セブンスロード・マジシャン".to_string(),
        name_zh: "七星道魔術師".to_string(),
        card_type: "效果怪獸".to_string(),
        attribute: Some("闇".to_string()),
        monster_type: Some("魔法使い族".to_string()),
        level: Some(7),
        atk: Some("2100".to_string()),
        defense: Some("1500".to_string()),
        summon_condition: None,
        condition: Some("手札を1枚墓地へ送って発動できる。".to_string()),
        effect: Some("攻撃力をアップする。".to_string()),
        continuous_effect: None,
        is_legend: false,
        original_rarity_string: "UR/SR".to_string(),
        variants: vec![],
    }
}

fn ovr(entity_id: &str, field: &str, value: Option<&str>) -> Override {
    Override {
        entity_id: entity_id.to_string(),
        field_name: field.to_string(),
        value: value.map(str::to_string),
        updated_at: "2024-01-01T00:00:00+00:00".to_string(),
    }
}

#[test]
fn no_overrides_returns_canonical() {
    let set = test_set();
    assert_eq!(resolve(&set, &[]), set);
}

#[test]
fn override_replaces_only_its_field() {
    let card = test_card();
    let resolved = resolve(&card, &[ovr(&card.card_id, "name_zh", Some("新名稱"))]);

    assert_eq!(resolved.name_zh, "新名稱");
    let mut expected = card.clone();
    expected.name_zh = "新名稱".to_string();
    assert_eq!(resolved, expected);
    // Canonical input untouched
    assert_eq!(card.name_zh, "七星道魔術師");
}

#[test]
fn null_override_clears_field() {
    let card = test_card();
    let resolved = resolve(
        &card,
        &[
            ovr(&card.card_id, "effect", None),
            ovr(&card.card_id, "name_jp", None),
            ovr(&card.card_id, "level", None),
        ],
    );
    assert_eq!(resolved.effect, None);
    assert_eq!(resolved.name_jp, "");
    assert_eq!(resolved.level, None);

    let set = test_set();
    let resolved = resolve(&set, &[ovr("KP01", "total_cards", None)]);
    assert_eq!(resolved.total_cards, 0);
}

#[test]
fn typed_fields_are_parsed() {
    let set = test_set();
    let resolved = resolve(&set, &[ovr("KP01", "total_cards", Some("66"))]);
    assert_eq!(resolved.total_cards, 66);

    let card = test_card();
    let resolved = resolve(&card, &[ovr(&card.card_id, "level", Some("8"))]);
    assert_eq!(resolved.level, Some(8));
}

#[test]
fn malformed_rows_are_skipped() {
    let set = test_set();
    let resolved = resolve(
        &set,
        &[
            ovr("KP01", "total_cards", Some("lots")),
            ovr("KP01", "post_url", Some("https://elsewhere")),
            ovr("KP01", "set_name_zh", Some("改名")),
        ],
    );
    assert_eq!(resolved.total_cards, 60);
    assert_eq!(resolved.post_url, set.post_url);
    assert_eq!(resolved.set_name_zh, "改名");
}

#[test]
fn rows_for_other_entities_are_ignored() {
    let set = test_set();
    let resolved = resolve(&set, &[ovr("KP02", "set_name_zh", Some("別的"))]);
    assert_eq!(resolved, set);
}

#[test]
fn resolve_all_keeps_order_and_routes_rows() {
    let mut other = test_set();
    other.set_id = "KP02".to_string();
    let sets = vec![test_set(), other];

    let resolved = resolve_all(
        &sets,
        &[
            ovr("KP02", "product_type", Some("starter")),
            ovr("KP01", "release_date", None),
        ],
    );
    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0].set_id, "KP01");
    assert_eq!(resolved[0].release_date, None);
    assert_eq!(resolved[0].product_type, "booster");
    assert_eq!(resolved[1].product_type, "starter");
}

#[test]
fn field_value_round_trips_through_set_field() {
    let card = test_card();
    for field in CardField::ALL {
        let mut copy = card.clone();
        let value = card.field_value(*field);
        copy.set_field(*field, value.as_deref()).unwrap();
        assert_eq!(copy, card, "field {}", field.as_str());
    }
}
