//! The draft configuration of one deployment target.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A deployment target as held by an edit session.
///
/// Values are never patched in place once shared; edits go through
/// [`DeployTarget::with_field`], which builds the next draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DeployTarget {
    /// Assigned by the backend on first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Target kind, e.g. "tencent-cos".
    #[serde(default)]
    pub kind: String,

    /// Credential record used to authenticate against the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,

    /// Free-form, kind-specific parameters.
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl DeployTarget {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// A target nobody has saved yet. An empty id counts as unsaved.
    pub fn is_new(&self) -> bool {
        self.id.as_deref().map_or(true, str::is_empty)
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }

    /// Next draft with `key` set to `value`.
    pub fn with_field(&self, key: &str, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.config.insert(key.to_string(), value.into());
        next
    }

    /// Next draft with every absent key filled from `defaults`.
    ///
    /// Keys already present, even when empty, keep their value.
    pub fn with_defaults(&self, defaults: &[(&str, Value)]) -> Self {
        let mut next = self.clone();
        for (key, value) in defaults {
            if !next.config.contains_key(*key) {
                next.config.insert((*key).to_string(), value.clone());
            }
        }
        next
    }
}
