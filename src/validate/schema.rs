//! Schema conformance: record fields against an optional per-class [`Format`].

use crate::model::{Dictionary, Format, Value};
use crate::report::{Issue, Report};

/// Check every record of every class the format declares.
///
/// - `None` format: nothing to check, always clean.
/// - Classes in the format but absent from the dictionary are skipped.
/// - A field outside mandatory ∪ optional is one `UnexpectedField`.
/// - A mandatory field that is absent, null, or a blank string is one
///   `MissingMandatoryField`; present but not a string is one
///   `MandatoryFieldNotString`. Mandatory fields are only ever checked as
///   strings, whatever the schema says about them.
pub fn validate_schema(dict: &Dictionary, format: Option<&Format>) -> Report {
    let mut report = Report::new();
    let Some(format) = format else {
        return report;
    };

    for (class, schema) in &format.classes {
        let Some(bucket) = dict.class(class) else {
            tracing::debug!(class = %class, "class declared in format but not present in dictionary");
            continue;
        };
        let allowed = schema.allowed_fields();

        for (id, record) in bucket {
            for field in record.fields.keys() {
                if !allowed.contains(field.as_str()) {
                    report.record(Issue::UnexpectedField {
                        class: class.clone(),
                        id: id.clone(),
                        field: field.clone(),
                    });
                }
            }

            for field in schema.mandatory_fields.keys() {
                let missing = || Issue::MissingMandatoryField {
                    class: class.clone(),
                    id: id.clone(),
                    field: field.clone(),
                };
                match record.fields.get(field) {
                    None | Some(Value::Null) => report.record(missing()),
                    Some(value) if value.is_blank_string() => report.record(missing()),
                    Some(Value::String(_)) => {}
                    Some(other @ (Value::Bool(_) | Value::Int(_) | Value::Float(_))) => {
                        report.record(Issue::MandatoryFieldNotString {
                            class: class.clone(),
                            id: id.clone(),
                            field: field.clone(),
                            found: other.type_name(),
                        })
                    }
                }
            }
        }
    }

    report
}
