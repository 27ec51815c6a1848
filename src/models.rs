use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// A contact record as decoded at the ingestion boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub id: Option<String>,
    /// Lowercased; empty when the upstream record had none.
    pub email: String,
    pub membership_tags: BTreeSet<String>,
    /// First non-empty of `last_seen` and `engaged_at`, still unparsed.
    pub last_activity: Option<String>,
    /// Scalar custom properties only; nested values are dropped.
    pub custom_properties: BTreeMap<String, Value>,
}

/// Upstream person shape. Every field is optional and may carry any JSON
/// type; `Contact::from` decides what survives.
#[derive(Debug, Default, Deserialize)]
struct RawContact {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    email: Value,
    #[serde(default)]
    smart_groups: Value,
    #[serde(default)]
    last_seen: Value,
    #[serde(default)]
    engaged_at: Value,
    #[serde(default)]
    custom: Value,
}

impl Contact {
    /// Decode one element of a `list` page. Never fails: a record of the
    /// wrong shape becomes an empty contact and is dropped later for lack
    /// of an email.
    pub fn from_value(value: Value) -> Self {
        let raw: RawContact = serde_json::from_value(value).unwrap_or_default();
        Self::from(raw)
    }

    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.membership_tags.contains(tag)
    }

    pub fn custom_property(&self, name: &str) -> Option<&Value> {
        self.custom_properties.get(name)
    }
}

impl From<RawContact> for Contact {
    fn from(raw: RawContact) -> Self {
        let id = match raw.id {
            Value::String(id) if !id.is_empty() => Some(id),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        };

        let email = match raw.email {
            Value::String(email) => email.trim().to_lowercase(),
            _ => String::new(),
        };

        let membership_tags = match raw.smart_groups {
            Value::Array(tags) => tags
                .into_iter()
                .filter_map(|tag| match tag {
                    Value::String(tag) => Some(tag),
                    _ => None,
                })
                .collect(),
            _ => BTreeSet::new(),
        };

        let last_activity = [raw.last_seen, raw.engaged_at]
            .into_iter()
            .find_map(|value| match value {
                Value::Null | Value::Bool(false) => None,
                Value::String(text) if text.is_empty() => None,
                Value::String(text) => Some(text),
                other => Some(other.to_string()),
            });

        let custom_properties = match raw.custom {
            Value::Object(map) => map
                .into_iter()
                .filter(|(_, value)| !value.is_array() && !value.is_object())
                .collect(),
            _ => BTreeMap::new(),
        };

        Self {
            id,
            email,
            membership_tags,
            last_activity,
            custom_properties,
        }
    }
}

/// One entry of a contact's event feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEvent {
    pub name: String,
}

impl FeedEvent {
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: value
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// A scalar report value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Count(u64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(value) => f.write_str(value),
            Cell::Count(value) => write!(f, "{value}"),
        }
    }
}

/// Ordered column-name to value mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub fields: Vec<(&'static str, Cell)>,
}

impl ReportRow {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn with(mut self, column: &'static str, value: Cell) -> Self {
        self.fields.push((column, value));
        self
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }
}

impl Default for ReportRow {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows sharing one column set, plus the slug used for the file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub slug: &'static str,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn columns(&self) -> Vec<&'static str> {
        self.rows
            .first()
            .map(|row| row.columns().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl ReportRow {
    pub(crate) fn get(&self, column: &str) -> Option<&Cell> {
        self.fields
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub(crate) fn count(&self, column: &str) -> Option<u64> {
        match self.get(column)? {
            Cell::Count(value) => Some(*value),
            Cell::Text(_) => None,
        }
    }
}
