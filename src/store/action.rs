//! Store mutations and their transition functions.
//!
//! # Transitions
//! ```text
//! SetAccesses / SetEmails / SetAccessGroups → replace slice, mark Ready
//! AddAccess     → append (an existing id is replaced in place)
//! UpdateAccess  → replace matching id in place; absent id is a no-op
//! DeleteAccess  → remove matching id; absent id is a no-op
//! FetchStarted  → slice Loading, data kept
//! FetchFailed   → slice Failed, data kept
//! FetchCancelled → a Loading slice becomes Unloaded, or Failed if it holds data
//! ```

use std::collections::HashSet;

use crate::domain::{Access, AccessGroup, EmailsSetting, Setting};
use crate::store::state::{ConfigCacheState, LoadStatus, Slice};

#[derive(Debug, Clone, PartialEq)]
pub enum CacheAction {
    SetAccesses(Vec<Access>),
    SetEmails(Setting<EmailsSetting>),
    SetAccessGroups(Vec<AccessGroup>),
    AddAccess(Access),
    UpdateAccess(Access),
    DeleteAccess(String),
    FetchStarted(Slice),
    FetchFailed(Slice, String),
    FetchCancelled(Slice),
}

/// Status message for a slice whose refetch was cancelled.
pub const CANCELLED: &str = "fetch cancelled";

impl CacheAction {
    /// Tag used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            CacheAction::SetAccesses(_) => "SET_ACCESSES",
            CacheAction::SetEmails(_) => "SET_EMAILS",
            CacheAction::SetAccessGroups(_) => "SET_ACCESS_GROUPS",
            CacheAction::AddAccess(_) => "ADD_ACCESS",
            CacheAction::UpdateAccess(_) => "UPDATE_ACCESS",
            CacheAction::DeleteAccess(_) => "DELETE_ACCESS",
            CacheAction::FetchStarted(_) => "FETCH_STARTED",
            CacheAction::FetchFailed(..) => "FETCH_FAILED",
            CacheAction::FetchCancelled(_) => "FETCH_CANCELLED",
        }
    }

    /// The slice this action touches.
    pub fn slice(&self) -> Slice {
        match self {
            CacheAction::SetAccesses(_)
            | CacheAction::AddAccess(_)
            | CacheAction::UpdateAccess(_)
            | CacheAction::DeleteAccess(_) => Slice::Accesses,
            CacheAction::SetEmails(_) => Slice::Emails,
            CacheAction::SetAccessGroups(_) => Slice::AccessGroups,
            CacheAction::FetchStarted(slice)
            | CacheAction::FetchFailed(slice, _)
            | CacheAction::FetchCancelled(slice) => *slice,
        }
    }

    /// Next state. `state` is left as it was.
    pub fn apply(self, state: &ConfigCacheState) -> ConfigCacheState {
        let mut next = state.clone();
        match self {
            CacheAction::SetAccesses(accesses) => {
                next.accesses = dedup_by_id(accesses, |a| Some(a.id.as_str()));
                next.status.accesses = LoadStatus::Ready;
            }
            CacheAction::SetEmails(emails) => {
                next.emails = emails;
                next.status.emails = LoadStatus::Ready;
            }
            CacheAction::SetAccessGroups(groups) => {
                next.access_groups = dedup_by_id(groups, |g| g.id.as_deref());
                next.status.access_groups = LoadStatus::Ready;
            }
            CacheAction::AddAccess(access) => {
                match next.accesses.iter_mut().find(|a| a.id == access.id) {
                    Some(existing) => {
                        tracing::warn!(id = %access.id, "ADD_ACCESS for existing id, replacing in place");
                        *existing = access;
                    }
                    None => next.accesses.push(access),
                }
            }
            CacheAction::UpdateAccess(access) => {
                if let Some(existing) = next.accesses.iter_mut().find(|a| a.id == access.id) {
                    *existing = access;
                }
            }
            CacheAction::DeleteAccess(id) => {
                next.accesses.retain(|a| a.id != id);
            }
            CacheAction::FetchStarted(slice) => {
                *next.status.get_mut(slice) = LoadStatus::Loading;
            }
            CacheAction::FetchFailed(slice, message) => {
                *next.status.get_mut(slice) = LoadStatus::Failed(message);
            }
            CacheAction::FetchCancelled(slice) => {
                if *next.status.get(slice) == LoadStatus::Loading {
                    *next.status.get_mut(slice) = if next.len(slice) == 0 {
                        LoadStatus::Unloaded
                    } else {
                        LoadStatus::Failed(CANCELLED.to_string())
                    };
                }
            }
        }
        next
    }
}

/// Keep the first record per id. Records without an id are kept as-is.
fn dedup_by_id<T>(items: Vec<T>, id: impl Fn(&T) -> Option<&str>) -> Vec<T> {
    let mut seen = HashSet::new();
    let before = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter(|item| match id(item) {
            Some(key) => seen.insert(key.to_string()),
            None => true,
        })
        .collect();

    if kept.len() != before {
        tracing::warn!(dropped = before - kept.len(), "Dropped records with duplicate ids");
    }
    kept
}
