//! Tenant record store: the closed table set, dynamic field/value handling,
//! the generic scoped accessors and the declarative validation engine.

pub mod records;
pub mod spec;
pub mod table;
pub mod value;

pub use table::{RECORD_TABLES, Table};
pub use value::{Fields, SqlValue};
