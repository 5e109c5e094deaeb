//! Merge canonical records with user overrides.
//!
//! Overrides form a sparse layer keyed by (entity id, field name). The merge
//! copies the canonical record and substitutes every matching override
//! value; the canonical input is never modified, so dropping an override row
//! restores the imported value on the next read.

use std::collections::HashMap;

use crate::fields::{Overridable, OverridableField};
use crate::types::Override;

/// Produce the effective record for `canonical`.
///
/// Rows whose `entity_id` does not match are ignored. Rows naming a field
/// outside the entity's table, or carrying a value that does not parse for
/// the field's type, are skipped with a warning so resolution never fails.
/// Writes go through field validation, so such rows only exist if the
/// override tables were edited directly or the field tables changed since
/// the row was stored.
pub fn resolve<T: Overridable>(canonical: &T, overrides: &[Override]) -> T {
    let mut resolved = canonical.clone();
    for ovr in overrides
        .iter()
        .filter(|o| o.entity_id == canonical.entity_id())
    {
        apply_row(&mut resolved, ovr);
    }
    resolved
}

/// Resolve a batch of records against one override namespace.
///
/// Output order matches input order.
pub fn resolve_all<T: Overridable>(canonical: &[T], overrides: &[Override]) -> Vec<T> {
    let mut by_entity: HashMap<&str, Vec<&Override>> = HashMap::new();
    for ovr in overrides {
        by_entity.entry(ovr.entity_id.as_str()).or_default().push(ovr);
    }

    canonical
        .iter()
        .map(|record| {
            let mut resolved = record.clone();
            if let Some(rows) = by_entity.get(record.entity_id()) {
                for ovr in rows {
                    apply_row(&mut resolved, ovr);
                }
            }
            resolved
        })
        .collect()
}

fn apply_row<T: Overridable>(record: &mut T, ovr: &Override) {
    let Some(field) = T::Field::from_name(&ovr.field_name) else {
        log::warn!(
            "Ignoring override on non-overridable field {} of {} '{}'",
            ovr.field_name,
            T::Field::ENTITY,
            ovr.entity_id,
        );
        return;
    };
    if let Err(e) = record.set_field(field, ovr.value.as_deref()) {
        log::warn!(
            "Ignoring malformed override for {} '{}': {}",
            T::Field::ENTITY,
            ovr.entity_id,
            e,
        );
    }
}
