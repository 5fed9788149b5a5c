//! Credential records and groups.

use serde::{Deserialize, Serialize};

/// What a credential may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessUsage {
    /// Certificate issuance (DNS challenges).
    Apply,
    /// Pushing certificates to deployment targets.
    Deploy,
    #[default]
    All,
}

impl AccessUsage {
    /// Whether a credential with this usage can back a deployment target.
    pub fn can_deploy(self) -> bool {
        matches!(self, AccessUsage::Deploy | AccessUsage::All)
    }
}

/// A stored set of provider authentication parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Access {
    pub id: String,
    pub name: String,
    /// Provider key, e.g. "tencent" or "aliyun".
    pub config_type: String,
    #[serde(default)]
    pub usage: AccessUsage,
    /// Owning credential group, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Provider-specific parameters.
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// Relations the backend expands inline on an [`AccessGroup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AccessGroupExpand {
    #[serde(default)]
    pub access: Vec<Access>,
}

/// A named collection of credential records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AccessGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Member credential ids.
    #[serde(default)]
    pub access: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<AccessGroupExpand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

impl AccessGroup {
    /// Number of member credentials.
    pub fn member_count(&self) -> usize {
        self.access.len()
    }
}
