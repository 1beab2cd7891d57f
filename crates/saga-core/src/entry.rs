//! Entry types -- rule items and the edges between them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Database key of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<i64> for EntryId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Identifier shared by the alternatives of one OR-group.
pub type GroupId = i64;

/// A rule item (skill, feat, talent, ...) with its book citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,

    pub name: String,

    /// Node type name (serialised as "type" in JSON).
    #[serde(rename = "type")]
    pub entry_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Short title of the book the entry is printed in.
    pub book: String,

    pub page: i64,
}

impl Entry {
    /// Returns the `(type, name)` key of this entry.
    pub fn key(&self) -> EntryKey {
        EntryKey::new(&self.entry_type, &self.name)
    }
}

/// The natural `(type, name)` key of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryKey {
    #[serde(rename = "type")]
    pub entry_type: String,
    pub name: String,
}

impl EntryKey {
    pub fn new(entry_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entry_type, self.name)
    }
}

/// A user-supplied entry reference in compact form: `type:name` or a bare
/// `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef {
    pub entry_type: Option<String>,
    pub name: String,
}

impl EntryRef {
    /// Builds a reference from an optional type and a name.
    pub fn new(entry_type: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.map(str::to_string),
            name: name.into(),
        }
    }

    /// Parses a compact reference.
    ///
    /// The input is split at the first `:`. Without a colon the whole input
    /// is taken as the name. An empty type or an empty name is rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (entry_type, name) = match input.split_once(':') {
            Some((t, n)) => {
                let t = t.trim();
                if t.is_empty() {
                    return Err(CoreError::validation(format!(
                        "missing type in reference '{input}' (expected <type>:<name>)"
                    )));
                }
                (Some(t.to_string()), n.trim())
            }
            None => (None, input),
        };

        if name.is_empty() {
            return Err(CoreError::validation(format!(
                "missing name in reference '{input}' (expected <type>:<name>)"
            )));
        }

        Ok(Self {
            entry_type,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry_type {
            Some(t) => write!(f, "{t}:{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// One prerequisite edge as seen from its source entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRow {
    /// The required entry.
    pub depends: EntryId,

    /// Minimum value of the required entry (e.g. an ability score of 13).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,

    /// Minimum number of members taken from a required collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_count: Option<String>,
}

impl DependencyRow {
    /// An edge without annotations.
    pub fn plain(depends: EntryId) -> Self {
        Self {
            depends,
            min_value: None,
            min_count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_typed_reference() {
        let r = EntryRef::parse("Feat:Force Sensitivity").unwrap();
        assert_eq!(r.entry_type.as_deref(), Some("Feat"));
        assert_eq!(r.name, "Force Sensitivity");
    }

    #[test]
    fn parse_splits_at_first_colon() {
        let r = EntryRef::parse("Talent:Lineage: Noble").unwrap();
        assert_eq!(r.entry_type.as_deref(), Some("Talent"));
        assert_eq!(r.name, "Lineage: Noble");
    }

    #[test]
    fn parse_bare_name() {
        let r = EntryRef::parse("Pilot").unwrap();
        assert_eq!(r.entry_type, None);
        assert_eq!(r.to_string(), "Pilot");
    }

    #[test]
    fn parse_rejects_missing_parts() {
        for input in [":Pilot", "Skill:", "", "  :  "] {
            let err = EntryRef::parse(input).unwrap_err();
            assert!(matches!(err, CoreError::Validation { .. }), "{input:?}");
        }
    }

    #[test]
    fn entry_serializes_type_field() {
        let entry = Entry {
            id: EntryId(3),
            name: "Pilot".into(),
            entry_type: "Skill".into(),
            description: None,
            book: "Core Rulebook".into(),
            page: 71,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""type":"Skill""#));
        assert!(!json.contains("description"));
        assert_eq!(entry.key().to_string(), "Skill:Pilot");
    }
}
