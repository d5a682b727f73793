//! Issues: recoverable defects found while merging and validating.
//!
//! Nothing in the engine aborts on an issue. Each one is logged as it is
//! recorded and collected into a [`Report`]; the caller decides whether a
//! non-zero count fails the run.

use std::fmt;

/// A single recoverable defect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Issue {
    #[error("duplicate ID [{id}] for class [{class}] found; only the most recent definition will be kept")]
    DuplicateIdentity { class: String, id: String },

    #[error("subdefinitions [{relationship}] of ID [{id}] for class [{class}] exceed the maximum nesting depth of {max_depth}; skipped")]
    DepthExceeded { class: String, id: String, relationship: String, max_depth: usize },

    #[error("field [{field}] is not a valid field in definition ID [{id}] for class [{class}]")]
    UnexpectedField { class: String, id: String, field: String },

    #[error("mandatory field [{field}] missing in definition ID [{id}] for class [{class}]")]
    MissingMandatoryField { class: String, id: String, field: String },

    #[error("mandatory field [{field}] is not a string (found {found}) in definition ID [{id}] for class [{class}]")]
    MandatoryFieldNotString { class: String, id: String, field: String, found: &'static str },

    #[error("cannot find class [{target_class}] referenced by definition ID [{id}] for class [{class}]")]
    UnknownClass { class: String, id: String, target_class: String },

    #[error("cannot find definition ID [{target_id}] for class [{target_class}] referenced by definition ID [{id}] for class [{class}]")]
    UnknownIdentity { class: String, id: String, target_class: String, target_id: String },
}

/// Coarse classification of an [`Issue`], following the error taxonomy:
/// merge-level, schema-level and referential-level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    Merge,
    Schema,
    Referential,
}

impl Issue {
    pub fn kind(&self) -> IssueKind {
        match self {
            Issue::DuplicateIdentity { .. } | Issue::DepthExceeded { .. } => IssueKind::Merge,
            Issue::UnexpectedField { .. }
            | Issue::MissingMandatoryField { .. }
            | Issue::MandatoryFieldNotString { .. } => IssueKind::Schema,
            Issue::UnknownClass { .. } | Issue::UnknownIdentity { .. } => IssueKind::Referential,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Merge => write!(f, "merge"),
            IssueKind::Schema => write!(f, "schema"),
            IssueKind::Referential => write!(f, "referential"),
        }
    }
}

/// An ordered collection of issues. `count()` is the issue count the
/// builder and validators return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    issues: Vec<Issue>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log and keep an issue.
    pub fn record(&mut self, issue: Issue) {
        tracing::warn!(kind = %issue.kind(), "{issue}");
        self.issues.push(issue);
    }

    /// Append another report's issues. They were logged when first recorded.
    pub fn absorb(&mut self, other: Report) {
        self.issues.extend(other.issues);
    }

    pub fn count(&self) -> usize {
        self.issues.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn count_of(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind() == kind).count()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.issues.iter()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}
