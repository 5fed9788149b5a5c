//! Localized strings keyed by dotted path.
//!
//! Catalogs are TOML documents; nested tables flatten into dotted keys, so
//! `[domain.deployment.form.domain] label = "Domain"` answers
//! `domain.deployment.form.domain.label`.

use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

const BUILTIN_EN: &str = include_str!("en.toml");

/// Resolves a dotted key to display text.
pub trait Translate: Send + Sync {
    /// Unknown keys resolve to the key itself.
    fn t(&self, key: &str) -> String;
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Key '{0}' must map to a string or table")]
    NotAString(String),
}

/// A flat key → text map.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    /// The English strings shipped with the crate.
    pub fn builtin() -> Self {
        // The embedded file is checked by tests
        Self::from_toml(BUILTIN_EN).unwrap_or_default()
    }

    /// Parse a catalog from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let table: toml::Table = content.parse()?;
        let mut entries = HashMap::new();
        flatten("", &table, &mut entries)?;
        Ok(Self { entries })
    }

    /// Built-in strings with the file at `path` layered on top.
    pub fn builtin_with_overrides(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let mut catalog = Self::builtin();
        catalog.merge(Self::from_toml(&content)?);
        Ok(catalog)
    }

    /// Entries in `other` replace ours.
    pub fn merge(&mut self, other: Catalog) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translate for Catalog {
    fn t(&self, key: &str) -> String {
        match self.get(key) {
            Some(text) => text.to_string(),
            None => {
                tracing::trace!(key, "Missing translation");
                key.to_string()
            }
        }
    }
}

fn flatten(
    prefix: &str,
    table: &toml::Table,
    out: &mut HashMap<String, String>,
) -> Result<(), CatalogError> {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::String(text) => {
                out.insert(path, text.clone());
            }
            toml::Value::Table(inner) => flatten(&path, inner, out)?,
            _ => return Err(CatalogError::NotAString(path)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        assert!(Catalog::from_toml(BUILTIN_EN).is_ok());
        let catalog = Catalog::builtin();
        assert_eq!(catalog.t("domain.deployment.form.tencent_cos_region.label"), "Region");
        assert_eq!(catalog.t("common.errmsg.domain_invalid"), "Please enter a valid domain");
    }

    #[test]
    fn test_unknown_key_echoes() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn test_overrides_replace_entries() {
        let mut catalog = Catalog::builtin();
        let before = catalog.len();
        catalog.merge(
            Catalog::from_toml("[common.errmsg]\ndomain_invalid = \"域名格式不正确\"\n").unwrap(),
        );
        assert_eq!(catalog.len(), before);
        assert_eq!(catalog.t("common.errmsg.domain_invalid"), "域名格式不正确");
    }

    #[test]
    fn test_non_string_leaf_rejected() {
        let err = Catalog::from_toml("[a]\nb = 3\n").unwrap_err();
        assert_eq!(err.to_string(), "Key 'a.b' must map to a string or table");
    }

    #[test]
    fn test_override_file() {
        let path = std::env::temp_dir().join("cert_console_catalog_test.toml");
        std::fs::write(&path, "[domain.deployment.form.domain]\nlabel = \"Custom domain\"\n").unwrap();

        let catalog = Catalog::builtin_with_overrides(&path).unwrap();
        assert_eq!(catalog.t("domain.deployment.form.domain.label"), "Custom domain");
        assert_eq!(catalog.t("domain.deployment.form.domain.placeholder"), "Please enter domain");

        std::fs::remove_file(&path).unwrap_or_default();
    }
}
