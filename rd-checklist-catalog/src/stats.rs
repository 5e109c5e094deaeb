//! Ownership aggregation over card variants.

use crate::types::{Card, CardVariant, OwnershipStats};

impl OwnershipStats {
    /// Fold a group of variants into totals.
    pub fn from_variants<'a>(variants: impl IntoIterator<Item = &'a CardVariant>) -> Self {
        variants
            .into_iter()
            .fold(Self::default(), |mut acc, v| {
                acc.total_variants += 1;
                if v.is_owned() {
                    acc.owned_variants += 1;
                }
                acc.total_owned_copies += v.owned_count;
                acc
            })
    }

    /// Totals across every variant of every card given.
    pub fn from_cards(cards: &[Card]) -> Self {
        Self::from_variants(cards.iter().flat_map(|c| c.variants.iter()))
    }

    /// Owned variants as a percentage of all variants (0 when empty).
    pub fn completion_percent(&self) -> f64 {
        if self.total_variants == 0 {
            0.0
        } else {
            self.owned_variants as f64 * 100.0 / self.total_variants as f64
        }
    }
}
