//! # Dictionary Builder
//!
//! Flattens one `Specification` tree at a time into a shared [`Dictionary`].
//!
//! For every specification reached, each definition becomes a record holding
//! its own fields and references, then:
//!
//! 1. every specification-scoped reference is appended to every record of
//!    that specification, and
//! 2. if the specification was reached through `SubDefinitions[R]`, a
//!    reference `{parent class, parent identity, R}` is appended as well.
//!
//! Nested specifications are walked with an explicit stack instead of call
//! recursion, depth-first in declaration order, so the last-write-wins
//! outcome for a duplicate `(class, identity)` matches a recursive walk.
//! Depth is capped by [`BuildOptions::max_depth`].

use serde::{Deserialize, Serialize};

use crate::model::{Definition, Dictionary, DictionaryRecord, Reference, Specification};
use crate::report::{Issue, Report};

/// Nesting depth allowed when no limit is configured.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Engine-facing build settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Deepest `SubDefinitions` level merged; the top-level document is depth 0.
    pub max_depth: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

/// A specification waiting on the work stack.
struct Pending {
    spec: Specification,
    parent: Option<Reference>,
    depth: usize,
}

/// Merge `spec` (and everything nested in it) into `dict` with default options.
///
/// Never stops early: the returned report holds every duplicate identity and
/// depth overflow found across the whole tree. An empty report means clean.
pub fn merge(spec: Specification, dict: &mut Dictionary, parent: Option<Reference>) -> Report {
    merge_with(spec, dict, parent, &BuildOptions::default())
}

/// [`merge`] with explicit options.
pub fn merge_with(
    spec: Specification,
    dict: &mut Dictionary,
    parent: Option<Reference>,
    options: &BuildOptions,
) -> Report {
    let mut report = Report::new();

    if spec.class.is_empty() {
        tracing::warn!("specification without a class; definitions are filed under the empty class");
    }

    let mut stack = vec![Pending { spec, parent, depth: 0 }];
    while let Some(Pending { spec, parent, depth }) = stack.pop() {
        let children = merge_one(spec, dict, parent, &mut report);

        let depth = depth + 1;
        let mut admitted = Vec::with_capacity(children.len());
        for (child, link) in children {
            if depth > options.max_depth {
                report.record(Issue::DepthExceeded {
                    class: link.class,
                    id: link.id,
                    relationship: link.relationship,
                    max_depth: options.max_depth,
                });
                discard(child);
            } else {
                admitted.push(Pending { spec: child, parent: Some(link), depth });
            }
        }
        // Reversed so the first-declared child is popped first.
        stack.extend(admitted.into_iter().rev());
    }

    report
}

/// Drop a skipped subtree level by level. A plain drop recurses once per
/// nesting level and can exhaust the stack on the very inputs the depth
/// limit rejects.
fn discard(spec: Specification) {
    let mut graveyard = vec![spec];
    while let Some(spec) = graveyard.pop() {
        for definition in spec.definitions.into_values() {
            graveyard.extend(definition.sub_definitions.into_values());
        }
    }
}

/// Insert one specification's definitions and return its nested
/// specifications, each paired with the reference back to its parent.
fn merge_one(
    spec: Specification,
    dict: &mut Dictionary,
    parent: Option<Reference>,
    report: &mut Report,
) -> Vec<(Specification, Reference)> {
    let Specification { class, references, definitions } = spec;
    tracing::debug!(class = %class, definitions = definitions.len(), "merging specification");

    let bucket = dict.bucket_mut(&class);
    let mut inserted = Vec::with_capacity(definitions.len());
    let mut children = Vec::new();

    for (id, definition) in definitions {
        let Definition { fields, references: own, sub_definitions, .. } = definition;

        if bucket.contains_key(&id) {
            report.record(Issue::DuplicateIdentity { class: class.clone(), id: id.clone() });
        }
        bucket.insert(id.clone(), DictionaryRecord::new(fields, own));

        for (relationship, mut child) in sub_definitions {
            if child.class.is_empty() {
                child.class = class.clone();
            }
            children.push((child, Reference::new(class.as_str(), id.as_str(), relationship)));
        }
        inserted.push(id);
    }

    for id in &inserted {
        if let Some(record) = bucket.get_mut(id) {
            record.references.extend(references.iter().cloned());
            if let Some(parent) = &parent {
                record.references.push(parent.clone());
            }
        }
    }

    children
}

/// Accumulates many documents into one dictionary.
///
/// ```rust
/// use graphdict::builder::Builder;
/// use graphdict::model::{Definition, Specification};
///
/// let mut builder = Builder::new();
/// let spec = Specification::new("Person")
///     .with_definition("Alice", Definition::new().with_field("Name", "Alice"));
/// assert_eq!(builder.merge(spec), 0);
///
/// let (dictionary, report) = builder.finish();
/// assert!(report.is_clean());
/// assert!(dictionary.contains("Person", "Alice"));
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    dictionary: Dictionary,
    options: BuildOptions,
    report: Report,
    documents: usize,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self { options, ..Self::default() }
    }

    /// Merge one top-level document; returns the issues it alone produced.
    pub fn merge(&mut self, spec: Specification) -> usize {
        let report = merge_with(spec, &mut self.dictionary, None, &self.options);
        let count = report.count();
        self.report.absorb(report);
        self.documents += 1;
        count
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Documents merged so far.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// End the build phase; the dictionary is read-only from here on.
    pub fn finish(self) -> (Dictionary, Report) {
        (self.dictionary, self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{fields, Value};
    use crate::report::IssueKind;
    use pretty_assertions::assert_eq;

    fn person_spec() -> Specification {
        Specification::new("Person")
            .with_reference(Reference::new("Band", "X", "Member"))
            .with_definition("Alice", Definition::new().with_field("Name", "Alice"))
    }

    #[test]
    fn test_spec_reference_lands_on_single_record() {
        let mut d = Dictionary::new();
        let report = merge(person_spec(), &mut d, None);

        assert!(report.is_clean());
        assert_eq!(
            d.get("Person", "Alice").unwrap().references,
            vec![Reference::new("Band", "X", "Member")]
        );
    }

    #[test]
    fn test_duplicate_identity_last_write_wins() {
        let first = Specification::new("Category")
            .with_definition("compute", Definition::new().with_field("Name", "first"));
        let second = Specification::new("Category")
            .with_definition("compute", Definition::new().with_field("Name", "second").with_field("Tier", 2));

        let mut d = Dictionary::new();
        let mut issues = merge(first, &mut d, None).count();
        issues += merge(second, &mut d, None).count();

        assert_eq!(issues, 1);
        assert_eq!(
            d.get("Category", "compute").unwrap().fields,
            fields([("Name", Value::from("second")), ("Tier", Value::Int(2))])
        );
    }

    #[test]
    fn test_broadcast_reaches_every_definition() {
        let spec = Specification::new("Server")
            .with_reference(Reference::new("Rack", "r1", "InRack"))
            .with_reference(Reference::new("Owner", "ops", "OwnedBy"))
            .with_definition("a", Definition::new())
            .with_definition(
                "b",
                Definition::new().with_reference(Reference::new("Server", "a", "Peer")),
            );

        let mut d = Dictionary::new();
        merge(spec, &mut d, None);

        assert_eq!(
            d.get("Server", "a").unwrap().references,
            vec![Reference::new("Rack", "r1", "InRack"), Reference::new("Owner", "ops", "OwnedBy")]
        );
        assert_eq!(
            d.get("Server", "b").unwrap().references,
            vec![
                Reference::new("Server", "a", "Peer"),
                Reference::new("Rack", "r1", "InRack"),
                Reference::new("Owner", "ops", "OwnedBy"),
            ]
        );
    }

    #[test]
    fn test_broadcast_skips_records_from_earlier_documents() {
        let mut d = Dictionary::new();
        merge(Specification::new("Person").with_definition("Bob", Definition::new()), &mut d, None);
        merge(person_spec(), &mut d, None);

        assert!(d.get("Person", "Bob").unwrap().references.is_empty());
        assert_eq!(d.get("Person", "Alice").unwrap().references.len(), 1);
    }

    #[test]
    fn test_sub_definitions_link_to_parent() {
        let child = Specification::new("Service")
            .with_definition("vm", Definition::new())
            .with_definition("disk", Definition::new());
        let spec = Specification::new("Category")
            .with_definition("compute", Definition::new().with_sub_definition("PartOf", child));

        let mut d = Dictionary::new();
        let report = merge(spec, &mut d, None);

        assert!(report.is_clean());
        for id in ["vm", "disk"] {
            assert_eq!(
                d.get("Service", id).unwrap().references,
                vec![Reference::new("Category", "compute", "PartOf")]
            );
        }
        assert!(d.get("Category", "compute").unwrap().references.is_empty());
    }

    #[test]
    fn test_parent_reference_follows_broadcast() {
        let child = Specification::new("Track")
            .with_reference(Reference::new("Label", "indie", "ReleasedBy"))
            .with_definition("t1", Definition::new().with_reference(Reference::new("Artist", "a", "By")));
        let spec = Specification::new("Album")
            .with_definition("lp", Definition::new().with_sub_definition("OnAlbum", child));

        let mut d = Dictionary::new();
        merge(spec, &mut d, None);

        assert_eq!(
            d.get("Track", "t1").unwrap().references,
            vec![
                Reference::new("Artist", "a", "By"),
                Reference::new("Label", "indie", "ReleasedBy"),
                Reference::new("Album", "lp", "OnAlbum"),
            ]
        );
    }

    #[test]
    fn test_explicit_parent_argument() {
        let mut d = Dictionary::new();
        let parent = Reference::new("Org", "acme", "Employee");
        merge(person_spec(), &mut d, Some(parent.clone()));
        assert_eq!(d.get("Person", "Alice").unwrap().references.last(), Some(&parent));
    }

    #[test]
    fn test_deep_nesting_links_each_level() {
        let leaf = Specification::new("L3").with_definition("c", Definition::new());
        let mid = Specification::new("L2").with_definition("b", Definition::new().with_sub_definition("R3", leaf));
        let top = Specification::new("L1").with_definition("a", Definition::new().with_sub_definition("R2", mid));

        let mut d = Dictionary::new();
        merge(top, &mut d, None);

        assert_eq!(d.len(), 3);
        assert_eq!(d.get("L2", "b").unwrap().references, vec![Reference::new("L1", "a", "R2")]);
        assert_eq!(d.get("L3", "c").unwrap().references, vec![Reference::new("L2", "b", "R3")]);
    }

    #[test]
    fn test_nested_duplicate_counted_and_overwrites_in_order() {
        // The nested "x" is merged after its parent, so it wins.
        let child = Specification::new("Thing").with_definition("x", Definition::new().with_field("V", "child"));
        let spec = Specification::new("Thing")
            .with_definition("x", Definition::new().with_field("V", "parent").with_sub_definition("Self", child));

        let mut d = Dictionary::new();
        let report = merge(spec, &mut d, None);

        assert_eq!(report.count(), 1);
        assert_eq!(d.get("Thing", "x").unwrap().fields["V"], Value::from("child"));
        assert_eq!(d.get("Thing", "x").unwrap().references, vec![Reference::new("Thing", "x", "Self")]);
    }

    #[test]
    fn test_sibling_children_processed_in_declaration_order() {
        let first = Specification::new("Node").with_definition("n", Definition::new().with_field("From", "A"));
        let second = Specification::new("Node").with_definition("n", Definition::new().with_field("From", "B"));
        let spec = Specification::new("Root").with_definition(
            "r",
            Definition::new().with_sub_definition("A", first).with_sub_definition("B", second),
        );

        let mut d = Dictionary::new();
        let report = merge(spec, &mut d, None);

        assert_eq!(report.count(), 1);
        assert_eq!(d.get("Node", "n").unwrap().fields["From"], Value::from("B"));
    }

    #[test]
    fn test_empty_nested_class_inherits_parent_class() {
        let child = Specification::new("").with_definition("sub", Definition::new());
        let spec = Specification::new("Team").with_definition("core", Definition::new().with_sub_definition("ReportsTo", child));

        let mut d = Dictionary::new();
        merge(spec, &mut d, None);

        assert_eq!(d.get("Team", "sub").unwrap().references, vec![Reference::new("Team", "core", "ReportsTo")]);
        assert!(!d.contains_class(""));
    }

    #[test]
    fn test_depth_limit_skips_and_reports() {
        let leaf = Specification::new("L3").with_definition("c", Definition::new());
        let mid = Specification::new("L2").with_definition("b", Definition::new().with_sub_definition("R3", leaf));
        let top = Specification::new("L1").with_definition("a", Definition::new().with_sub_definition("R2", mid));

        let mut d = Dictionary::new();
        let report = merge_with(top, &mut d, None, &BuildOptions { max_depth: 1 });

        assert_eq!(report.count(), 1);
        assert_eq!(report.count_of(IssueKind::Merge), 1);
        assert_eq!(
            report.issues()[0],
            Issue::DepthExceeded { class: "L2".into(), id: "b".into(), relationship: "R3".into(), max_depth: 1 }
        );
        assert!(d.contains("L2", "b"));
        assert!(!d.contains_class("L3"));
    }

    #[test]
    fn test_zero_depth_merges_top_level_only() {
        let child = Specification::new("C").with_definition("c", Definition::new());
        let top = Specification::new("P").with_definition("p", Definition::new().with_sub_definition("R", child));

        let mut d = Dictionary::new();
        let report = merge_with(top, &mut d, None, &BuildOptions { max_depth: 0 });

        assert_eq!(report.count(), 1);
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_discard_unwinds_deep_subtree() {
        let mut spec = Specification::new("Level").with_definition("leaf", Definition::new());
        for i in 0..50_000 {
            spec = Specification::new("Level")
                .with_definition(format!("n{i}"), Definition::new().with_sub_definition("Next", spec));
        }
        discard(spec);
    }

    #[test]
    fn test_merge_leaves_unrelated_classes_alone() {
        let mut d = Dictionary::new();
        merge(Specification::new("Band").with_definition("X", Definition::new().with_field("Genre", "jazz")), &mut d, None);
        let before = d.class("Band").cloned();
        merge(person_spec(), &mut d, None);
        assert_eq!(d.class("Band").cloned(), before);
    }

    #[test]
    fn test_builder_accumulates() {
        let mut builder = Builder::new();
        assert_eq!(builder.merge(person_spec()), 0);
        assert_eq!(builder.merge(person_spec()), 1);
        assert_eq!(builder.documents(), 2);
        assert_eq!(builder.report().count(), 1);

        let (d, report) = builder.finish();
        assert_eq!(d.len(), 1);
        assert_eq!(report.count(), 1);
    }

    #[test]
    fn test_empty_specification_still_creates_bucket() {
        let mut d = Dictionary::new();
        let report = merge(Specification::new("Ghost"), &mut d, None);
        assert!(report.is_clean());
        assert!(d.contains_class("Ghost"));
        assert!(d.is_empty());
    }
}
