//! Card catalog data model and the pure logic that sits on top of it.
//!
//! This crate has no database dependency. It defines the catalog records,
//! the fixed tables of user-overridable fields, and the functions that
//! merge overrides into canonical records, fold ownership counts into
//! statistics, and filter cards for search. `rd-checklist-db` feeds stored
//! rows through these functions.

pub mod fields;
pub mod product_type;
pub mod resolve;
pub mod search;
pub mod stats;
pub mod types;

pub use fields::{
    CardField, EntityKind, Overridable, OverridableField, SetField, ValidationError, ValueKind,
};
pub use product_type::{product_type_label, summarize_product_types};
pub use resolve::{resolve, resolve_all};
pub use search::{search, OwnedFilter, SearchParams, DEFAULT_LIMIT, MAX_LIMIT};
pub use types::*;
