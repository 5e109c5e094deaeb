use rd_checklist_catalog::*;

#[test]
fn set_table_matches_known_fields() {
    assert_eq!(
        EntityKind::CardSet.field_names(),
        vec![
            "set_name_jp",
            "set_name_zh",
            "product_type",
            "release_date",
            "total_cards",
            "rarity_distribution",
        ]
    );
}

#[test]
fn card_table_excludes_identity_and_variants() {
    let names = EntityKind::Card.field_names();
    assert_eq!(names.len(), 12);
    for forbidden in ["card_id", "set_id", "is_legend", "original_rarity_string", "variants"] {
        assert!(!names.contains(&forbidden), "{forbidden} must not be overridable");
    }
}

#[test]
fn validate_rejects_unknown_field() {
    let err = EntityKind::CardSet.validate("post_url", Some("x")).unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidField {
            entity: EntityKind::CardSet,
            field: "post_url".to_string(),
        }
    );

    // Card fields are not set fields
    assert!(EntityKind::CardSet.validate("name_zh", Some("x")).is_err());
    assert!(EntityKind::Card.validate("name_zh", Some("x")).is_ok());
}

#[test]
fn validate_checks_value_types() {
    assert!(EntityKind::CardSet.validate("total_cards", Some("42")).is_ok());
    assert!(EntityKind::CardSet.validate("total_cards", None).is_ok());
    assert!(matches!(
        EntityKind::CardSet.validate("total_cards", Some("-1")),
        Err(ValidationError::InvalidValue { .. })
    ));
    assert!(matches!(
        EntityKind::Card.validate("level", Some("four")),
        Err(ValidationError::InvalidValue { .. })
    ));
    // Free text accepts anything
    assert!(EntityKind::Card.validate("atk", Some("?")).is_ok());
}

#[test]
fn validate_returns_static_name() {
    let name = EntityKind::Card.validate("continuous_effect", None).unwrap();
    assert_eq!(name, "continuous_effect");
}

#[test]
fn entity_kind_names() {
    assert_eq!(EntityKind::CardSet.as_str(), "card_set");
    assert_eq!(EntityKind::from_str_loose("set"), Some(EntityKind::CardSet));
    assert_eq!(EntityKind::from_str_loose("card"), Some(EntityKind::Card));
    assert_eq!(EntityKind::from_str_loose("variant"), None);
}

#[test]
fn override_action_names() {
    for action in [OverrideAction::Set, OverrideAction::Removed] {
        assert_eq!(OverrideAction::from_str_loose(action.as_str()), Some(action));
    }
    assert_eq!(OverrideAction::from_str_loose("deleted"), None);
}
