//! Data model types for the card catalog.
//!
//! Canonical records (`CardSet`, `Card`, `CardVariant`) mirror what the
//! importer stored. User edits never touch them; they live as `Override`
//! rows and are merged at read time by [`crate::resolve`].

use serde::{Deserialize, Serialize};

// ── Card Set ────────────────────────────────────────────────────────────────

/// A product release (booster, starter deck, ...) containing a list of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSet {
    pub set_id: String,
    pub set_name_jp: String,
    pub set_name_zh: String,
    pub product_type: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub post_url: String,
    /// Number of cards the set is expected to contain.
    #[serde(default)]
    pub total_cards: i64,
    /// Serialized rarity-count breakdown, stored as imported.
    #[serde(default)]
    pub rarity_distribution: Option<String>,
}

/// A set together with all of its cards, as returned by the set detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSetWithCards {
    #[serde(flatten)]
    pub set: CardSet,
    pub cards: Vec<Card>,
}

// ── Card ────────────────────────────────────────────────────────────────────

/// A single card of a set. Ownership is tracked on its variants, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub card_id: String,
    #[serde(default)]
    pub set_id: String,
    pub name_jp: String,
    pub name_zh: String,
    pub card_type: String,
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub monster_type: Option<String>,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub atk: Option<String>,
    #[serde(default)]
    pub defense: Option<String>,
    #[serde(default)]
    pub summon_condition: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub continuous_effect: Option<String>,
    #[serde(default)]
    pub is_legend: bool,
    /// Rarity text exactly as it appeared in the import source.
    #[serde(default)]
    pub original_rarity_string: String,
    /// Printings of this card, ordered by `sort_order`.
    #[serde(default)]
    pub variants: Vec<CardVariant>,
}

impl Card {
    /// Look up the variant printed in `rarity`.
    pub fn variant(&self, rarity: &str) -> Option<&CardVariant> {
        self.variants.iter().find(|v| v.rarity == rarity)
    }
}

// ── Card Variant ────────────────────────────────────────────────────────────

/// One physical printing of a card (card x rarity), the unit of ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardVariant {
    /// Row id; `0` for variants that have not been stored yet.
    #[serde(default)]
    pub id: i64,
    /// Owning card. May be left empty on import, the card's id is used.
    #[serde(default)]
    pub card_id: String,
    pub rarity: String,
    #[serde(default)]
    pub sort_order: i32,
    /// `"scraper"` or `"user_upload"`.
    #[serde(default)]
    pub image_source: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub owned_count: i64,
}

impl CardVariant {
    pub fn is_owned(&self) -> bool {
        self.owned_count > 0
    }
}

// ── Overrides ───────────────────────────────────────────────────────────────

/// A user-supplied replacement for one field of one set or card.
///
/// `value == None` means the field was explicitly cleared, which is not the
/// same as having no override row at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    pub entity_id: String,
    pub field_name: String,
    pub value: Option<String>,
    pub updated_at: String,
}

/// What happened to an override in an [`OverrideEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideAction {
    Set,
    Removed,
}

impl OverrideAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Removed => "removed",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s {
            "set" => Some(Self::Set),
            "removed" => Some(Self::Removed),
            _ => None,
        }
    }
}

/// Edit log entry: the effective value of a field before and after an
/// override was applied or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEvent {
    pub id: i64,
    pub entity_kind: crate::fields::EntityKind,
    pub entity_id: String,
    pub field_name: String,
    pub action: OverrideAction,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_at: String,
}

// ── Derived Views ───────────────────────────────────────────────────────────

/// A product type with the number of sets that carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductType {
    pub product_type: String,
    pub display_name: String,
    pub set_count: i64,
}

/// Ownership totals over a group of variants. Always computed, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipStats {
    pub total_variants: i64,
    /// Variants with `owned_count > 0`.
    pub owned_variants: i64,
    /// Sum of `owned_count` across all variants.
    pub total_owned_copies: i64,
}

/// One entry of a batch ownership update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipUpdate {
    pub card_id: String,
    pub rarity: String,
    pub owned_count: i64,
}
