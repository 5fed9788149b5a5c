//! Cached reference data and per-slice load status.

use serde::Serialize;

use crate::domain::{Access, AccessGroup, EmailsSetting, Setting};

/// The three independently fetched parts of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slice {
    Accesses,
    Emails,
    AccessGroups,
}

impl Slice {
    pub const ALL: [Slice; 3] = [Slice::Accesses, Slice::Emails, Slice::AccessGroups];

    /// Position in [`Slice::ALL`].
    pub fn index(self) -> usize {
        match self {
            Slice::Accesses => 0,
            Slice::Emails => 1,
            Slice::AccessGroups => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Slice::Accesses => "accesses",
            Slice::Emails => "emails",
            Slice::AccessGroups => "access_groups",
        }
    }
}

impl std::fmt::Display for Slice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a slice's data came from.
///
/// An empty collection under `Unloaded`/`Loading` means "not known yet",
/// not "confirmed empty".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    Unloaded,
    Loading,
    Ready,
    Failed(String),
}

impl LoadStatus {
    /// Whether the last fetch has finished, either way.
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadStatus::Ready | LoadStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct SliceStatus {
    pub accesses: LoadStatus,
    pub emails: LoadStatus,
    pub access_groups: LoadStatus,
}

impl SliceStatus {
    pub fn get(&self, slice: Slice) -> &LoadStatus {
        match slice {
            Slice::Accesses => &self.accesses,
            Slice::Emails => &self.emails,
            Slice::AccessGroups => &self.access_groups,
        }
    }

    pub fn get_mut(&mut self, slice: Slice) -> &mut LoadStatus {
        match slice {
            Slice::Accesses => &mut self.accesses,
            Slice::Emails => &mut self.emails,
            Slice::AccessGroups => &mut self.access_groups,
        }
    }

    pub fn all_settled(&self) -> bool {
        Slice::ALL.iter().all(|s| self.get(*s).is_settled())
    }
}

/// Everything the store holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigCacheState {
    pub accesses: Vec<Access>,
    pub emails: Setting<EmailsSetting>,
    pub access_groups: Vec<AccessGroup>,
    pub status: SliceStatus,
}

impl Default for ConfigCacheState {
    fn default() -> Self {
        Self {
            accesses: Vec::new(),
            emails: Setting::empty_emails(),
            access_groups: Vec::new(),
            status: SliceStatus::default(),
        }
    }
}

impl ConfigCacheState {
    pub fn access(&self, id: &str) -> Option<&Access> {
        self.accesses.iter().find(|a| a.id == id)
    }

    pub fn access_group(&self, id: &str) -> Option<&AccessGroup> {
        self.access_groups.iter().find(|g| g.id.as_deref() == Some(id))
    }

    /// Credentials of `config_type` usable for deployment, in display order.
    pub fn deploy_accesses<'a>(&'a self, config_type: &'a str) -> impl Iterator<Item = &'a Access> + 'a {
        self.accesses
            .iter()
            .filter(move |a| a.config_type == config_type && a.usage.can_deploy())
    }

    pub fn len(&self, slice: Slice) -> usize {
        match slice {
            Slice::Accesses => self.accesses.len(),
            Slice::Emails => self.emails.content.emails.len(),
            Slice::AccessGroups => self.access_groups.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccessUsage;

    fn access(id: &str, config_type: &str, usage: AccessUsage) -> Access {
        Access {
            id: id.to_string(),
            name: id.to_string(),
            config_type: config_type.to_string(),
            usage,
            group: None,
            config: serde_json::Value::Null,
            deleted: None,
            created: None,
            updated: None,
        }
    }

    #[test]
    fn test_initial_state_is_unloaded() {
        let state = ConfigCacheState::default();
        assert!(state.accesses.is_empty());
        assert!(state.emails.content.emails.is_empty());
        assert!(state.access_groups.is_empty());
        assert!(Slice::ALL.iter().all(|s| *state.status.get(*s) == LoadStatus::Unloaded));
        assert!(!state.status.all_settled());
    }

    #[test]
    fn test_deploy_accesses_filter() {
        let mut state = ConfigCacheState::default();
        state.accesses = vec![
            access("1", "tencent", AccessUsage::Deploy),
            access("2", "tencent", AccessUsage::Apply),
            access("3", "aliyun", AccessUsage::All),
            access("4", "tencent", AccessUsage::All),
        ];

        let ids: Vec<_> = state.deploy_accesses("tencent").map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(state.access("3").map(|a| a.config_type.as_str()), Some("aliyun"));
        assert!(state.access("9").is_none());
    }

    #[test]
    fn test_lookup_by_id() {
        let mut state = ConfigCacheState::default();
        state.accesses = vec![access("a1", "tencent", AccessUsage::Deploy)];
        state.access_groups = vec![AccessGroup {
            id: Some("g1".to_string()),
            access: vec!["a1".to_string()],
            ..AccessGroup::default()
        }];

        assert_eq!(state.access("a1").map(|a| a.id.as_str()), Some("a1"));
        assert!(state.access("a2").is_none());
        assert_eq!(state.access_group("g1").map(|g| g.member_count()), Some(1));
        assert!(state.access_group("g2").is_none());
    }

    #[test]
    fn test_status_serializes_with_error() {
        let json = serde_json::to_value(LoadStatus::Failed("boom".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({"state": "failed", "error": "boom"}));
        assert!(LoadStatus::Failed(String::new()).is_settled());
        assert!(!LoadStatus::Loading.is_settled());
    }
}
