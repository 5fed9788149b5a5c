//! Per-field validation messages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name → message. `None` records a field that was checked and passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Option<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// The message for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|m| m.as_deref())
    }

    pub fn set(&mut self, field: impl Into<String>, message: Option<String>) {
        self.fields.insert(field.into(), message);
    }

    /// Overwrite the entries present in `other`; leave the rest alone.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.fields.extend(other.fields);
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Whether any field carries a message.
    pub fn has_errors(&self) -> bool {
        self.fields.values().any(Option::is_some)
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Number of fields with a message.
    pub fn error_count(&self) -> usize {
        self.fields.values().filter(|m| m.is_some()).count()
    }

    /// Failing fields and their messages, in field order.
    pub fn iter_errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter_map(|(field, message)| message.as_deref().map(|m| (field.as_str(), m)))
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unrelated_entries() {
        let mut current = ValidationErrors::new();
        current.set("access", Some("Please select a credential".to_string()));
        current.set("bucket", Some("Please enter bucket".to_string()));

        let mut pass = ValidationErrors::new();
        pass.set("bucket", None);
        pass.set("domain", Some("Please enter a valid domain".to_string()));
        current.merge(pass);

        assert_eq!(current.get("access"), Some("Please select a credential"));
        assert_eq!(current.get("bucket"), None);
        assert!(current.contains_field("bucket"));
        assert_eq!(current.error_count(), 2);
        let failing: Vec<_> = current.iter_errors().map(|(f, _)| f).collect();
        assert_eq!(failing, vec!["access", "domain"]);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut errors = ValidationErrors::new();
        errors.set("region", None);
        errors.set("bucket", Some("required".to_string()));
        assert_eq!(
            serde_json::to_string(&errors).unwrap(),
            r#"{"bucket":"required","region":null}"#
        );
        assert!(!errors.is_valid());

        errors.clear();
        assert!(errors.is_valid());
    }
}
