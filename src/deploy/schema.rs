//! Declarative field rules for deployment forms.
//!
//! A [`Schema`] lists fields in order, each with rules checked in order. The
//! first failing rule supplies the field's message; a field that is missing
//! or not a string fails every rule.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::deploy::errors::ValidationErrors;

/// Optional leading wildcard label, dot-separated labels, alphabetic TLD of 2+.
pub const DOMAIN_PATTERN: &str = r"^(?:\*\.)?([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}$";

/// Compiled [`DOMAIN_PATTERN`].
pub fn domain_regex() -> &'static Regex {
    static DOMAIN: OnceLock<Regex> = OnceLock::new();
    DOMAIN.get_or_init(|| Regex::new(DOMAIN_PATTERN).expect("DOMAIN_PATTERN compiles"))
}

#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Non-empty string.
    Required { message: String },
    /// String matching the expression.
    Pattern { regex: Regex, message: String },
}

impl FieldRule {
    fn check(&self, value: Option<&Value>) -> Result<(), &str> {
        let text = value.and_then(Value::as_str);
        match (self, text) {
            (FieldRule::Required { .. }, Some(s)) if !s.is_empty() => Ok(()),
            (FieldRule::Pattern { regex, .. }, Some(s)) if regex.is_match(s) => Ok(()),
            (FieldRule::Required { message }, _) | (FieldRule::Pattern { message, .. }, _) => {
                Err(message.as_str())
            }
        }
    }
}

#[derive(Debug, Clone)]
struct FieldSchema {
    field: &'static str,
    rules: Vec<FieldRule>,
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to `field`, registering the field on first use.
    pub fn rule(mut self, field: &'static str, rule: FieldRule) -> Self {
        match self.fields.iter_mut().find(|f| f.field == field) {
            Some(existing) => existing.rules.push(rule),
            None => self.fields.push(FieldSchema {
                field,
                rules: vec![rule],
            }),
        }
        self
    }

    pub fn required(self, field: &'static str, message: impl Into<String>) -> Self {
        self.rule(
            field,
            FieldRule::Required {
                message: message.into(),
            },
        )
    }

    pub fn pattern(self, field: &'static str, regex: &Regex, message: impl Into<String>) -> Self {
        self.rule(
            field,
            FieldRule::Pattern {
                regex: regex.clone(),
                message: message.into(),
            },
        )
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.field)
    }

    /// One entry per schema field: `None` when it passes.
    pub fn validate(&self, config: &Map<String, Value>) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for field in &self.fields {
            let value = config.get(field.field);
            let message = field
                .rules
                .iter()
                .find_map(|rule| rule.check(value).err())
                .map(str::to_string);
            errors.set(field.field, message);
        }
        errors
    }
}
