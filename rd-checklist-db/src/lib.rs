//! SQLite persistence layer for the card checklist.
//!
//! Canonical catalog rows, the two override tables, and variant ownership
//! counts live here. Reads return resolved records: every query that hands
//! out a set or card runs it through `rd_checklist_catalog::resolve` first.

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    apply_override, apply_overrides, import_card_sets, remove_override, set_owned_count, set_owned_counts,
    upsert_card, upsert_card_set, OperationError,
};
pub use queries::{
    card_set_with_cards, collection_stats, get_card, get_card_set, list_card_sets,
    list_override_events, list_overrides, list_product_types, ownership_stats, search_cards,
};
pub use schema::{open_database, open_memory, SchemaError};
