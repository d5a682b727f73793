//! # Validation Engine
//!
//! Two read-only passes over a fully merged [`Dictionary`]:
//!
//! | Pass | Module | Checks |
//! |------|--------|--------|
//! | Schema | `schema` | unexpected fields, missing/blank/non-string mandatory fields |
//! | Referential | `references` | every reference resolves to an existing `(class, identity)` |
//!
//! Neither pass short-circuits, so a single run surfaces every defect.

pub mod references;
pub mod schema;

pub use references::validate_references;
pub use schema::validate_schema;

use crate::model::{Dictionary, Format};
use crate::report::Report;

/// Run both passes and combine their issues, schema first.
pub fn validate(dict: &Dictionary, format: Option<&Format>) -> Report {
    let mut report = validate_schema(dict, format);
    report.absorb(validate_references(dict));

    if !report.is_clean() {
        tracing::error!("there were {} error(s) found in the definition files", report.count());
    }
    report
}
