//! The [`Checklist`] handle.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rd_checklist_catalog::types::*;
use rd_checklist_catalog::{EntityKind, SearchParams};
use rusqlite::Connection;

use crate::error::ChecklistError;

/// Partial field map for a PATCH-style edit. `None` clears the field.
pub type FieldPatch = BTreeMap<String, Option<String>>;

/// A card checklist backed by one SQLite connection.
///
/// All calls serialize on an internal mutex, so a `Checklist` can be shared
/// between threads (for example behind an `Arc`). Writes to the same
/// override key or variant are applied in lock order: the last call to
/// acquire the lock wins. Every read runs in a single transaction and never
/// observes half of a write.
pub struct Checklist {
    conn: Mutex<Connection>,
}

impl Checklist {
    /// Open (or create) the checklist database at `path`.
    pub fn open(path: &Path) -> Result<Self, ChecklistError> {
        log::debug!("Opening checklist database at {}", path.display());
        Ok(Self::from_connection(rd_checklist_db::open_database(path)?))
    }

    /// In-memory checklist, mostly for tests.
    pub fn open_memory() -> Result<Self, ChecklistError> {
        Ok(Self::from_connection(rd_checklist_db::open_memory()?))
    }

    /// Wrap an already opened connection. The schema must exist.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-call leaves no partial write behind: the transaction
        // guard rolls back on unwind.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Import ──────────────────────────────────────────────────────────

    /// Store or refresh a set's canonical record.
    pub fn import_card_set(&self, set: &CardSet) -> Result<(), ChecklistError> {
        rd_checklist_db::upsert_card_set(&self.conn(), set)?;
        Ok(())
    }

    /// Store or refresh a card and its variants. Owned counts of variants
    /// already present are kept.
    pub fn import_card(&self, card: &Card) -> Result<(), ChecklistError> {
        rd_checklist_db::upsert_card(&self.conn(), card)?;
        Ok(())
    }

    /// Import sets with their nested cards, all or nothing. Returns the
    /// number of cards written.
    pub fn import_sets(&self, sets: &[CardSetWithCards]) -> Result<usize, ChecklistError> {
        Ok(rd_checklist_db::import_card_sets(&self.conn(), sets)?)
    }

    // ── Catalog ─────────────────────────────────────────────────────────

    pub fn product_types(&self) -> Result<Vec<ProductType>, ChecklistError> {
        Ok(rd_checklist_db::list_product_types(&self.conn())?)
    }

    pub fn card_sets(&self, product_type: Option<&str>) -> Result<Vec<CardSet>, ChecklistError> {
        Ok(rd_checklist_db::list_card_sets(&self.conn(), product_type)?)
    }

    pub fn card_set(&self, set_id: &str) -> Result<CardSetWithCards, ChecklistError> {
        Ok(rd_checklist_db::card_set_with_cards(&self.conn(), set_id)?)
    }

    pub fn card(&self, card_id: &str) -> Result<Card, ChecklistError> {
        Ok(rd_checklist_db::get_card(&self.conn(), card_id)?)
    }

    pub fn search(&self, params: &SearchParams) -> Result<Vec<Card>, ChecklistError> {
        Ok(rd_checklist_db::search_cards(&self.conn(), params)?)
    }

    // ── Overrides ───────────────────────────────────────────────────────

    /// Apply overrides for every field in `patch` and return the resolved
    /// set. An unknown field or bad value rejects the whole patch.
    pub fn patch_card_set(
        &self,
        set_id: &str,
        patch: &FieldPatch,
    ) -> Result<CardSet, ChecklistError> {
        let conn = self.conn();
        rd_checklist_db::apply_overrides(&conn, EntityKind::CardSet, set_id, patch)?;
        Ok(rd_checklist_db::get_card_set(&conn, set_id)?)
    }

    /// Card counterpart of [`Self::patch_card_set`].
    pub fn patch_card(&self, card_id: &str, patch: &FieldPatch) -> Result<Card, ChecklistError> {
        let conn = self.conn();
        rd_checklist_db::apply_overrides(&conn, EntityKind::Card, card_id, patch)?;
        Ok(rd_checklist_db::get_card(&conn, card_id)?)
    }

    pub fn card_set_overrides(&self, set_id: &str) -> Result<Vec<Override>, ChecklistError> {
        Ok(rd_checklist_db::list_overrides(
            &self.conn(),
            EntityKind::CardSet,
            set_id,
        )?)
    }

    pub fn card_overrides(&self, card_id: &str) -> Result<Vec<Override>, ChecklistError> {
        Ok(rd_checklist_db::list_overrides(
            &self.conn(),
            EntityKind::Card,
            card_id,
        )?)
    }

    /// Remove one set override. Returns `false` if there was none.
    pub fn delete_card_set_override(
        &self,
        set_id: &str,
        field_name: &str,
    ) -> Result<bool, ChecklistError> {
        Ok(rd_checklist_db::remove_override(
            &self.conn(),
            EntityKind::CardSet,
            set_id,
            field_name,
        )?)
    }

    /// Remove one card override. Returns `false` if there was none.
    pub fn delete_card_override(
        &self,
        card_id: &str,
        field_name: &str,
    ) -> Result<bool, ChecklistError> {
        Ok(rd_checklist_db::remove_override(
            &self.conn(),
            EntityKind::Card,
            card_id,
            field_name,
        )?)
    }

    /// Edit history of one set or card, newest first.
    pub fn override_history(
        &self,
        kind: EntityKind,
        entity_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<OverrideEvent>, ChecklistError> {
        Ok(rd_checklist_db::list_override_events(
            &self.conn(),
            kind,
            entity_id,
            limit,
        )?)
    }

    // ── Ownership ───────────────────────────────────────────────────────

    pub fn set_owned_count(
        &self,
        card_id: &str,
        rarity: &str,
        owned_count: i64,
    ) -> Result<CardVariant, ChecklistError> {
        Ok(rd_checklist_db::set_owned_count(
            &self.conn(),
            card_id,
            rarity,
            owned_count,
        )?)
    }

    /// Apply a batch of ownership updates; nothing is written if any fails.
    pub fn set_owned_counts(
        &self,
        updates: &[OwnershipUpdate],
    ) -> Result<Vec<CardVariant>, ChecklistError> {
        Ok(rd_checklist_db::set_owned_counts(&self.conn(), updates)?)
    }

    pub fn ownership_stats(&self, set_id: &str) -> Result<OwnershipStats, ChecklistError> {
        Ok(rd_checklist_db::ownership_stats(&self.conn(), set_id)?)
    }

    pub fn collection_stats(&self) -> Result<OwnershipStats, ChecklistError> {
        Ok(rd_checklist_db::collection_stats(&self.conn())?)
    }
}
