//! Core data types for `issue_tracker`.
//!
//! This module defines the fundamental types used throughout the application:
//! - `Issue` - A single tracked work item
//! - `Project` - Named, ordered container of issues
//! - `IssueField` - The closed set of issue field names
//! - `FieldValue` / `Fields` - Flat submitted field mappings
//! - `Ack` - Success acknowledgment for update/delete

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Render a timestamp the way it appears on the wire.
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod wire_timestamp {
    use super::format_timestamp;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Issue field names as they appear in submissions and payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueField {
    Id,
    IssueTitle,
    IssueText,
    CreatedBy,
    AssignedTo,
    StatusText,
    Open,
    CreatedOn,
    UpdatedOn,
}

impl IssueField {
    pub const ALL: [Self; 9] = [
        Self::Id,
        Self::IssueTitle,
        Self::IssueText,
        Self::CreatedBy,
        Self::AssignedTo,
        Self::StatusText,
        Self::Open,
        Self::CreatedOn,
        Self::UpdatedOn,
    ];

    /// Fields that must be non-empty when an issue is created.
    pub const REQUIRED: [Self; 3] = [Self::IssueTitle, Self::IssueText, Self::CreatedBy];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "_id",
            Self::IssueTitle => "issue_title",
            Self::IssueText => "issue_text",
            Self::CreatedBy => "created_by",
            Self::AssignedTo => "assigned_to",
            Self::StatusText => "status_text",
            Self::Open => "open",
            Self::CreatedOn => "created_on",
            Self::UpdatedOn => "updated_on",
        }
    }

    /// Look up a field by its wire name. Unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    /// Free-text fields.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(
            self,
            Self::IssueTitle | Self::IssueText | Self::CreatedBy | Self::AssignedTo | Self::StatusText
        )
    }

    /// Fields a partial update may change.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        self.is_text() || matches!(self, Self::Open)
    }
}

impl fmt::Display for IssueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single submitted value: transports deliver strings or booleans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    /// Blank means "no value supplied" for both creation and update.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Flag(_) => None,
        }
    }

    /// Text rendering; booleans become `"true"` / `"false"`.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Flag(flag) => flag.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Flat, insertion-ordered mapping of field name to submitted value.
///
/// Inserting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Fields {
    entries: Vec<(String, FieldValue)>,
}

impl Fields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Text value of a known field, if submitted as a string.
    #[must_use]
    pub fn text(&self, field: IssueField) -> Option<&str> {
        self.get(field.as_str()).and_then(FieldValue::as_text)
    }

    /// The submitted `_id`, if present and non-empty.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.get(IssueField::Id.as_str())
            .map(FieldValue::to_text)
            .filter(|id| !id.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

impl TryFrom<Map<String, Value>> for Fields {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut fields = Self::new();
        for (name, value) in map {
            let value = match value {
                Value::Null => continue,
                Value::Bool(flag) => FieldValue::Flag(flag),
                Value::String(text) => FieldValue::Text(text),
                Value::Number(number) => FieldValue::Text(number.to_string()),
                Value::Array(_) | Value::Object(_) => {
                    return Err(format!("field '{name}' must be a string or boolean"));
                }
            };
            fields.insert(name, value);
        }
        Ok(fields)
    }
}

impl From<Fields> for Map<String, Value> {
    fn from(fields: Fields) -> Self {
        fields
            .entries
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    FieldValue::Flag(flag) => Value::Bool(flag),
                    FieldValue::Text(text) => Value::String(text),
                };
                (name, value)
            })
            .collect()
    }
}

/// The primary issue entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    /// Store-wide unique identifier.
    #[serde(rename = "_id")]
    pub id: String,

    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,

    #[serde(default)]
    pub assigned_to: String,

    #[serde(default)]
    pub status_text: String,

    pub open: bool,

    #[serde(with = "wire_timestamp")]
    pub created_on: DateTime<Utc>,

    #[serde(with = "wire_timestamp")]
    pub updated_on: DateTime<Utc>,
}

impl Issue {
    /// Current value of a text field; `None` for non-text fields.
    #[must_use]
    pub fn text(&self, field: IssueField) -> Option<&str> {
        match field {
            IssueField::IssueTitle => Some(&self.issue_title),
            IssueField::IssueText => Some(&self.issue_text),
            IssueField::CreatedBy => Some(&self.created_by),
            IssueField::AssignedTo => Some(&self.assigned_to),
            IssueField::StatusText => Some(&self.status_text),
            _ => None,
        }
    }

    /// Mutable slot for a text field.
    pub fn text_mut(&mut self, field: IssueField) -> Option<&mut String> {
        match field {
            IssueField::IssueTitle => Some(&mut self.issue_title),
            IssueField::IssueText => Some(&mut self.issue_text),
            IssueField::CreatedBy => Some(&mut self.created_by),
            IssueField::AssignedTo => Some(&mut self.assigned_to),
            IssueField::StatusText => Some(&mut self.status_text),
            _ => None,
        }
    }

    /// Any field rendered as its wire string.
    #[must_use]
    pub fn field_string(&self, field: IssueField) -> String {
        match field {
            IssueField::Id => self.id.clone(),
            IssueField::Open => self.open.to_string(),
            IssueField::CreatedOn => format_timestamp(&self.created_on),
            IssueField::UpdatedOn => format_timestamp(&self.updated_on),
            text => self.text(text).unwrap_or_default().to_string(),
        }
    }
}

/// A validated creation request, before the store assigns identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
}

impl NewIssue {
    /// Materialize the issue; new issues are always open.
    #[must_use]
    pub fn into_issue(self, id: String, now: DateTime<Utc>) -> Issue {
        Issue {
            id,
            issue_title: self.issue_title,
            issue_text: self.issue_text,
            created_by: self.created_by,
            assigned_to: self.assigned_to,
            status_text: self.status_text,
            open: true,
            created_on: now,
            updated_on: now,
        }
    }
}

/// A named, ordered container of issues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub project_name: String,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl Project {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            project_name: name.into(),
            issues: Vec::new(),
        }
    }

    /// Linear scan for an issue; ids are unique so the first match wins.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.issues.iter().position(|issue| issue.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Issue> {
        self.issues.iter_mut().find(|issue| issue.id == id)
    }

    /// Remove exactly one issue, preserving the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<Issue> {
        self.position(id).map(|index| self.issues.remove(index))
    }
}

/// Success acknowledgment for update and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub result: String,
    #[serde(rename = "_id")]
    pub id: String,
}

impl Ack {
    #[must_use]
    pub fn updated(id: impl Into<String>) -> Self {
        Self {
            result: "successfully updated".to_string(),
            id: id.into(),
        }
    }

    #[must_use]
    pub fn deleted(id: impl Into<String>) -> Self {
        Self {
            result: "successfully deleted".to_string(),
            id: id.into(),
        }
    }
}
