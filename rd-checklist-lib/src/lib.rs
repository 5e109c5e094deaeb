//! Application-facing checklist API.
//!
//! [`Checklist`] wraps one database connection behind a mutex and exposes
//! every catalog, override, ownership and search operation as a method
//! returning resolved records. Frontends (the CLI today) talk to this type
//! only; they never touch SQL or the override tables directly.

pub mod checklist;
pub mod error;
pub mod settings;

pub use checklist::{Checklist, FieldPatch};
pub use error::{ChecklistError, ErrorKind};

pub use rd_checklist_catalog as catalog;
