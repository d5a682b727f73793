//! Property tests for the builder and validators.

use std::collections::BTreeSet;

use graphdict::builder::merge;
use graphdict::model::{ClassSchema, Definition, Dictionary, Format, Reference, Specification};
use graphdict::{validate_references, validate_schema};
use proptest::prelude::*;

fn ids() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-z]{1,6}", 0..12)
}

/// A two-level specification: `Outer` definitions, each optionally
/// carrying a nested `Inner` specification with its own identities.
fn nested_spec() -> impl Strategy<Value = Specification> {
    prop::collection::btree_map("[a-z]{1,6}", prop::option::of(ids()), 0..8).prop_map(|outer| {
        let mut spec = Specification::new("Outer").with_reference(Reference::new("Hub", "h", "Into"));
        for (id, inner) in outer {
            let mut definition = Definition::new().with_field("Name", id.as_str());
            if let Some(inner) = inner {
                let mut child = Specification::new("Inner");
                for inner_id in inner {
                    // Prefix with the parent so nested identities never collide.
                    child = child.with_definition(format!("{id}-{inner_id}"), Definition::new());
                }
                definition = definition.with_sub_definition("ChildOf", child);
            }
            spec = spec.with_definition(id, definition);
        }
        spec
    })
}

proptest! {
    #[test]
    fn prop_one_record_per_distinct_definition(spec in nested_spec()) {
        let expected = spec.definition_count();
        let mut d = Dictionary::new();
        let report = merge(spec, &mut d, None);

        prop_assert!(report.is_clean());
        prop_assert_eq!(d.len(), expected);
    }

    #[test]
    fn prop_broadcast_reaches_exactly_the_specs_records(spec in nested_spec()) {
        let hub = Reference::new("Hub", "h", "Into");
        let mut d = Dictionary::new();
        merge(spec, &mut d, None);

        for (class, _, record) in d.records() {
            let has_hub = record.references.contains(&hub);
            prop_assert_eq!(has_hub, class == "Outer");
        }
    }

    #[test]
    fn prop_nested_records_link_to_their_parent(spec in nested_spec()) {
        let mut d = Dictionary::new();
        merge(spec, &mut d, None);

        if let Some(inner) = d.class("Inner") {
            for (id, record) in inner {
                let parent = id.split('-').next().unwrap_or_default();
                prop_assert_eq!(record.references.last(), Some(&Reference::new("Outer", parent, "ChildOf")));
            }
        }
    }

    #[test]
    fn prop_references_clean_iff_all_resolve(
        present in ids(),
        targets in prop::collection::vec("[a-z]{1,6}", 0..8),
    ) {
        let mut d = Dictionary::new();
        let mut targets_spec = Specification::new("Target");
        for id in &present {
            targets_spec = targets_spec.with_definition(id.as_str(), Definition::new());
        }
        merge(targets_spec, &mut d, None);

        let mut owner = Definition::new();
        for target in &targets {
            owner = owner.with_reference(Reference::new("Target", target.as_str(), "Points"));
        }
        merge(Specification::new("Owner").with_definition("o", owner), &mut d, None);

        let dangling = targets.iter().filter(|t| !present.contains(*t)).count();
        prop_assert_eq!(validate_references(&d).count(), dangling);
    }

    #[test]
    fn prop_schema_without_format_is_clean(spec in nested_spec()) {
        let mut d = Dictionary::new();
        merge(spec, &mut d, None);
        prop_assert!(validate_schema(&d, None).is_clean());
    }

    #[test]
    fn prop_schema_matching_format_is_clean(spec in nested_spec()) {
        let mut d = Dictionary::new();
        merge(spec, &mut d, None);
        let format = Format::new()
            .with_class("Outer", ClassSchema::new().mandatory("Name"))
            .with_class("Inner", ClassSchema::new());
        prop_assert!(validate_schema(&d, Some(&format)).is_clean());
    }
}
