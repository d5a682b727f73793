//! Dictionary: the flattened, class-keyed, identity-keyed record set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Fields, Reference};

/// The merged form of a definition: its fields plus every reference it
/// owns, was broadcast, or was synthesized from its parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DictionaryRecord {
    pub fields: Fields,
    pub references: Vec<Reference>,
}

impl DictionaryRecord {
    pub fn new(fields: Fields, references: Vec<Reference>) -> Self {
        Self { fields, references }
    }
}

/// Records of one class, keyed by identity.
pub type ClassBucket = BTreeMap<String, DictionaryRecord>;

/// Class → identity → record.
///
/// Created once per run, grown by every merge, then handed read-only to the
/// validators and exporters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    classes: BTreeMap<String, ClassBucket>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bucket for `class`, created empty on first sight.
    pub fn bucket_mut(&mut self, class: &str) -> &mut ClassBucket {
        self.classes.entry(class.to_string()).or_default()
    }

    /// Insert or overwrite a record, returning the one it replaced.
    pub fn insert(
        &mut self,
        class: &str,
        id: impl Into<String>,
        record: DictionaryRecord,
    ) -> Option<DictionaryRecord> {
        self.bucket_mut(class).insert(id.into(), record)
    }

    pub fn class(&self, class: &str) -> Option<&ClassBucket> {
        self.classes.get(class)
    }

    pub fn get(&self, class: &str, id: &str) -> Option<&DictionaryRecord> {
        self.classes.get(class)?.get(id)
    }

    pub fn contains_class(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn contains(&self, class: &str, id: &str) -> bool {
        self.get(class, id).is_some()
    }

    /// Whether `reference` points at a record that exists.
    pub fn resolves(&self, reference: &Reference) -> bool {
        let (class, id) = reference.target();
        self.contains(class, id)
    }

    pub fn classes(&self) -> impl Iterator<Item = (&str, &ClassBucket)> {
        self.classes.iter().map(|(class, bucket)| (class.as_str(), bucket))
    }

    /// Every record as `(class, id, record)`, in class then identity order.
    pub fn records(&self) -> impl Iterator<Item = (&str, &str, &DictionaryRecord)> {
        self.classes.iter().flat_map(|(class, bucket)| {
            bucket.iter().map(move |(id, record)| (class.as_str(), id.as_str(), record))
        })
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Total records across all classes.
    pub fn len(&self) -> usize {
        self.classes.values().map(ClassBucket::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total references across all records.
    pub fn reference_count(&self) -> usize {
        self.records().map(|(_, _, record)| record.references.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{fields, Value};

    #[test]
    fn test_insert_and_get() {
        let mut d = Dictionary::new();
        assert!(d.insert("Person", "Alice", DictionaryRecord::default()).is_none());
        assert!(d.contains_class("Person"));
        assert!(d.contains("Person", "Alice"));
        assert!(!d.contains("Person", "Bob"));
        assert!(!d.contains_class("Band"));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_insert_returns_replaced_record() {
        let mut d = Dictionary::new();
        d.insert("Category", "compute", DictionaryRecord::new(fields([("Name", "first")]), vec![]));
        let old = d.insert("Category", "compute", DictionaryRecord::new(fields([("Name", "second")]), vec![]));
        assert_eq!(old.unwrap().fields["Name"], Value::from("first"));
        assert_eq!(d.get("Category", "compute").unwrap().fields["Name"], Value::from("second"));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_empty_bucket_counts_as_class() {
        let mut d = Dictionary::new();
        d.bucket_mut("Empty");
        assert!(d.contains_class("Empty"));
        assert_eq!(d.class_count(), 1);
        assert!(d.is_empty());
    }

    #[test]
    fn test_records_are_ordered() {
        let mut d = Dictionary::new();
        d.insert("B", "2", DictionaryRecord::default());
        d.insert("A", "9", DictionaryRecord::default());
        d.insert("B", "1", DictionaryRecord::default());
        let keys: Vec<_> = d.records().map(|(c, i, _)| (c, i)).collect();
        assert_eq!(keys, vec![("A", "9"), ("B", "1"), ("B", "2")]);
    }

    #[test]
    fn test_serializes_as_nested_map() {
        let mut d = Dictionary::new();
        d.insert(
            "Person",
            "Alice",
            DictionaryRecord::new(fields([("Name", "Alice")]), vec![Reference::new("Band", "X", "Member")]),
        );
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["Person"]["Alice"]["Fields"]["Name"], "Alice");
        assert_eq!(json["Person"]["Alice"]["References"][0]["ID"], "X");
    }
}
