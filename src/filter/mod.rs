//! List filtering.
//!
//! A constraint set maps field names to expected string values. Each
//! constraint picks its comparison by field:
//!
//! - `open`: `"true"` means `true`, every other string means `false`
//! - `created_on` / `updated_on`: compared against the wire rendering
//! - everything else: exact string equality
//!
//! Unknown field names never match, so they produce an empty listing.

use crate::model::{Issue, IssueField};

/// One parsed `field = value` constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Equality on a known field.
    Field { field: IssueField, expected: String },
    /// A field name no issue carries.
    Unknown { name: String },
}

impl Constraint {
    #[must_use]
    pub fn new(name: &str, expected: impl Into<String>) -> Self {
        let expected = expected.into();
        IssueField::parse(name).map_or_else(
            || Self::Unknown {
                name: name.to_string(),
            },
            |field| Self::Field { field, expected },
        )
    }

    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        match self {
            Self::Unknown { .. } => false,
            Self::Field { field, expected } => field_equals(issue, *field, expected),
        }
    }
}

fn field_equals(issue: &Issue, field: IssueField, expected: &str) -> bool {
    match field {
        IssueField::Open => issue.open == (expected == "true"),
        IssueField::Id => issue.id == expected,
        IssueField::CreatedOn | IssueField::UpdatedOn => issue.field_string(field) == expected,
        text => issue.text(text) == Some(expected),
    }
}

/// A conjunction of constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    constraints: Vec<Constraint>,
}

impl IssueFilter {
    /// The empty filter; matches every issue.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from `(name, value)` pairs as decoded from a query.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            constraints: pairs
                .into_iter()
                .map(|(name, value)| Constraint::new(name.as_ref(), value))
                .collect(),
        }
    }

    /// Add one constraint.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.constraints.push(Constraint::new(name, value));
        self
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// True if the filter references a field no issue has.
    #[must_use]
    pub fn has_unknown_fields(&self) -> bool {
        self.constraints
            .iter()
            .any(|constraint| matches!(constraint, Constraint::Unknown { .. }))
    }

    /// All constraints must hold.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        self.constraints
            .iter()
            .all(|constraint| constraint.matches(issue))
    }

    /// Matching issues in stored order.
    #[must_use]
    pub fn apply<'a, I>(&self, issues: I) -> Vec<Issue>
    where
        I: IntoIterator<Item = &'a Issue>,
    {
        issues
            .into_iter()
            .filter(|issue| self.matches(issue))
            .cloned()
            .collect()
    }
}
