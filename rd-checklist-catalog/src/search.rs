//! Card search over resolved records.
//!
//! All predicates are optional and combine with AND. Results are ordered by
//! `(set_id, card_id)` before pagination, so the same input always yields
//! the same page.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fields::ValidationError;
use crate::types::{Card, CardVariant};

/// Page size used when the caller does not pass `limit`.
pub const DEFAULT_LIMIT: usize = 100;
/// Largest accepted `limit`.
pub const MAX_LIMIT: usize = 500;

// ── Ownership Filter ────────────────────────────────────────────────────────

/// Ownership predicate, evaluated against a card's variants.
///
/// - `all`: no filtering.
/// - `any_owned` (`owned`): at least one variant has `owned_count > 0`.
/// - `fully_owned`: the card has variants and every one is owned.
/// - `unowned` (`missing`): no variant is owned; cards without variants
///   count as unowned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnedFilter {
    #[default]
    All,
    AnyOwned,
    FullyOwned,
    Unowned,
}

impl OwnedFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::AnyOwned => "any_owned",
            Self::FullyOwned => "fully_owned",
            Self::Unowned => "unowned",
        }
    }

    pub fn matches(&self, variants: &[CardVariant]) -> bool {
        match self {
            Self::All => true,
            Self::AnyOwned => variants.iter().any(CardVariant::is_owned),
            Self::FullyOwned => !variants.is_empty() && variants.iter().all(CardVariant::is_owned),
            Self::Unowned => !variants.iter().any(CardVariant::is_owned),
        }
    }
}

impl FromStr for OwnedFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "any_owned" | "owned" => Ok(Self::AnyOwned),
            "fully_owned" => Ok(Self::FullyOwned),
            "unowned" | "missing" => Ok(Self::Unowned),
            _ => Err(ValidationError::invalid_value(
                "owned",
                s,
                "expected all, any_owned, fully_owned or unowned",
            )),
        }
    }
}

// ── Search Parameters ───────────────────────────────────────────────────────

/// Search predicates plus pagination. Empty strings count as "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Case-insensitive substring of `name_jp`, `name_zh` or `card_id`.
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub set_id: Option<String>,
    /// Matches when any variant carries this rarity.
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub owned: Option<OwnedFilter>,
    /// Defaults to [`DEFAULT_LIMIT`].
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

impl SearchParams {
    /// The `set_id` predicate, if one was given.
    pub fn set_filter(&self) -> Option<&str> {
        non_empty(&self.set_id)
    }

    /// Validated page size.
    pub fn page_size(&self) -> Result<usize, ValidationError> {
        match self.limit {
            None => Ok(DEFAULT_LIMIT),
            Some(n) if (1..=MAX_LIMIT).contains(&n) => Ok(n),
            Some(n) => Err(ValidationError::invalid_value(
                "limit",
                n.to_string(),
                format!("must be between 1 and {MAX_LIMIT}"),
            )),
        }
    }

    /// Whether `card` satisfies every given predicate.
    pub fn matches(&self, card: &Card) -> bool {
        if let Some(q) = non_empty(&self.q) {
            let needle = q.to_lowercase();
            let hit = [&card.name_jp, &card.name_zh, &card.card_id]
                .iter()
                .any(|s| s.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if let Some(card_type) = non_empty(&self.card_type) {
            if card.card_type != card_type {
                return false;
            }
        }
        if let Some(attribute) = non_empty(&self.attribute) {
            if card.attribute.as_deref() != Some(attribute) {
                return false;
            }
        }
        if let Some(level) = self.level {
            if card.level != Some(level) {
                return false;
            }
        }
        if let Some(set_id) = self.set_filter() {
            if card.set_id != set_id {
                return false;
            }
        }
        if let Some(rarity) = non_empty(&self.rarity) {
            if card.variant(rarity).is_none() {
                return false;
            }
        }
        if let Some(owned) = self.owned {
            if !owned.matches(&card.variants) {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Filter, order and paginate `cards`.
pub fn search(cards: &[Card], params: &SearchParams) -> Result<Vec<Card>, ValidationError> {
    let limit = params.page_size()?;

    let mut matched: Vec<&Card> = cards.iter().filter(|c| params.matches(c)).collect();
    matched.sort_by(|a, b| {
        a.set_id
            .cmp(&b.set_id)
            .then_with(|| a.card_id.cmp(&b.card_id))
    });

    Ok(matched
        .into_iter()
        .skip(params.offset)
        .take(limit)
        .cloned()
        .collect())
}
