//! Referential integrity: every reference must resolve in the merged dictionary.

use crate::model::Dictionary;
use crate::report::{Issue, Report};

/// One issue per dangling reference: `UnknownClass` when no record of the
/// target class exists at all, otherwise `UnknownIdentity`.
///
/// Run only after every document has been merged; forward and
/// cross-directory references are expected to resolve by then.
pub fn validate_references(dict: &Dictionary) -> Report {
    let mut report = Report::new();

    for (class, id, record) in dict.records() {
        for reference in &record.references {
            if dict.resolves(reference) {
                continue;
            }
            let (target_class, target_id) = reference.target();
            if dict.contains_class(target_class) {
                report.record(Issue::UnknownIdentity {
                    class: class.to_string(),
                    id: id.to_string(),
                    target_class: target_class.to_string(),
                    target_id: target_id.to_string(),
                });
            } else {
                report.record(Issue::UnknownClass {
                    class: class.to_string(),
                    id: id.to_string(),
                    target_class: target_class.to_string(),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DictionaryRecord, Fields, Reference};

    fn record(refs: Vec<Reference>) -> DictionaryRecord {
        DictionaryRecord::new(Fields::new(), refs)
    }

    #[test]
    fn test_unknown_class() {
        let mut d = Dictionary::new();
        d.insert("Person", "Alice", record(vec![Reference::new("Foo", "x", "Likes")]));
        let report = validate_references(&d);
        assert_eq!(
            report.issues(),
            &[Issue::UnknownClass { class: "Person".into(), id: "Alice".into(), target_class: "Foo".into() }]
        );
    }

    #[test]
    fn test_unknown_identity() {
        let mut d = Dictionary::new();
        d.insert("Person", "Alice", record(vec![Reference::new("Person", "Bob", "Knows")]));
        let report = validate_references(&d);
        assert_eq!(report.count(), 1);
        assert!(matches!(
            &report.issues()[0],
            Issue::UnknownIdentity { target_id, .. } if target_id == "Bob"
        ));
    }

    #[test]
    fn test_resolving_references_are_clean() {
        let mut d = Dictionary::new();
        d.insert("Person", "Alice", record(vec![Reference::new("Person", "Bob", "Knows")]));
        d.insert("Person", "Bob", record(vec![Reference::new("Person", "Alice", "Knows")]));
        assert!(validate_references(&d).is_clean());
    }

    #[test]
    fn test_empty_bucket_turns_unknown_class_into_unknown_identity() {
        let mut d = Dictionary::new();
        d.bucket_mut("Band");
        d.insert("Person", "Alice", record(vec![Reference::new("Band", "X", "Member")]));
        let report = validate_references(&d);
        assert!(matches!(report.issues()[0], Issue::UnknownIdentity { .. }));
    }

    #[test]
    fn test_each_dangling_reference_counted() {
        let mut d = Dictionary::new();
        d.insert(
            "Person",
            "Alice",
            record(vec![
                Reference::new("Foo", "1", "A"),
                Reference::new("Foo", "2", "B"),
                Reference::new("Person", "Nobody", "C"),
            ]),
        );
        assert_eq!(validate_references(&d).count(), 3);
    }
}
