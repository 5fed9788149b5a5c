//! Named settings records.

use serde::{Deserialize, Serialize};

/// Name of the notification email settings record.
pub const EMAILS_SETTING: &str = "emails";

/// A settings record with typed content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Setting<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub content: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// Notification recipients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EmailsSetting {
    #[serde(default)]
    pub emails: Vec<String>,
}

impl EmailsSetting {
    /// Add an address, ignoring case-insensitive duplicates. Returns whether it was added.
    pub fn add(&mut self, email: &str) -> bool {
        let email = email.trim();
        if email.is_empty() || self.contains(email) {
            return false;
        }
        self.emails.push(email.to_string());
        true
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.iter().any(|e| e.eq_ignore_ascii_case(email.trim()))
    }
}

impl Setting<EmailsSetting> {
    /// The placeholder used before the backend has answered or when no record exists.
    pub fn empty_emails() -> Self {
        Self {
            id: None,
            name: None,
            content: EmailsSetting::default(),
            created: None,
            updated: None,
        }
    }
}
