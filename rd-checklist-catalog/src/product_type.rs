//! Product-type summary view over card sets.

use std::collections::BTreeMap;

use crate::types::{CardSet, ProductType};

/// Display labels for the product types the importer emits.
const PRODUCT_TYPE_LABELS: &[(&str, &str)] = &[
    ("booster", "補充包 Booster Pack"),
    ("starter", "預組 Starter Deck"),
    ("structure_deck", "構築包 Structure Deck"),
    ("character_pack", "角色包 Character Pack"),
    ("go_rush_character", "Go Rush 角色包"),
    ("go_rush_deck", "Go Rush 預組"),
    ("battle_pack", "戰鬥包 Battle Pack"),
    ("maximum_pack", "Maximum 包"),
    ("extra_pack", "Extra 包"),
    ("legend_pack", "傳說包 Legend Pack"),
    ("vs_pack", "VS 包"),
    ("tournament_pack", "大會包 Tournament Pack"),
    ("advanced_pack", "進階包 Advanced Pack"),
    ("over_rush_pack", "Over Rush 包"),
    ("unknown", "其他"),
];

/// Label for a product type, falling back to the raw value.
pub fn product_type_label(product_type: &str) -> &str {
    PRODUCT_TYPE_LABELS
        .iter()
        .find(|(key, _)| *key == product_type)
        .map(|(_, label)| *label)
        .unwrap_or(product_type)
}

/// Count sets per product type.
///
/// One entry per distinct `product_type`, ordered by display name and then
/// by the raw type so two types sharing a label still sort deterministically.
pub fn summarize_product_types(sets: &[CardSet]) -> Vec<ProductType> {
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for set in sets {
        *counts.entry(set.product_type.as_str()).or_insert(0) += 1;
    }

    let mut types: Vec<ProductType> = counts
        .into_iter()
        .map(|(product_type, set_count)| ProductType {
            product_type: product_type.to_string(),
            display_name: product_type_label(product_type).to_string(),
            set_count,
        })
        .collect();
    types.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then_with(|| a.product_type.cmp(&b.product_type))
    });
    types
}
