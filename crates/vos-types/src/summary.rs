use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lightweight, per-kind projection of an object body.
///
/// Derived on every write and stored next to the version it was derived
/// from. Summaries are a best-effort cache for listing: they are never
/// mutated independently and a missing summary is not an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ObjectReference>,
}

impl Summary {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a reference, keeping the list sorted and free of duplicates.
    pub fn with_reference(mut self, reference: ObjectReference) -> Self {
        if let Err(pos) = self.references.binary_search(&reference) {
            self.references.insert(pos, reference);
        }
        self
    }

    /// Returns `true` if every `(key, value)` in `selector` is present in
    /// this summary's labels. An empty value in the selector matches any
    /// value for that key.
    pub fn matches_labels(&self, selector: &BTreeMap<String, String>) -> bool {
        selector.iter().all(|(k, v)| match self.labels.get(k) {
            Some(actual) => v.is_empty() || actual == v,
            None => false,
        })
    }
}

/// A dependency discovered in a body: another object, a datasource, a plugin.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectReference {
    pub kind: String,
    pub uid: String,
}

impl ObjectReference {
    pub fn new(kind: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            uid: uid.into(),
        }
    }
}
