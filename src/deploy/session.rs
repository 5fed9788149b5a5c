//! The shared state of one deployment-target edit.
//!
//! A session is created when editing starts and dropped when the editor goes
//! away. Every holder of a clone sees the same draft and error map; changes
//! are announced through [`DeployEditSession::subscribe`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

use crate::deploy::errors::ValidationErrors;
use crate::deploy::target::DeployTarget;

struct SessionInner {
    id: Uuid,
    config: watch::Sender<Arc<DeployTarget>>,
    errors: watch::Sender<ValidationErrors>,
    revision: AtomicU64,
}

/// Handle to a deployment edit session. Cloning shares the session.
#[derive(Clone)]
pub struct DeployEditSession {
    inner: Arc<SessionInner>,
}

impl DeployEditSession {
    pub fn new(target: DeployTarget) -> Self {
        let (config, _) = watch::channel(Arc::new(target));
        let (errors, _) = watch::channel(ValidationErrors::new());
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, "Deploy edit session opened");

        Self {
            inner: Arc::new(SessionInner {
                id,
                config,
                errors,
                revision: AtomicU64::new(0),
            }),
        }
    }

    /// Identifier used to correlate log events.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Current draft.
    pub fn config(&self) -> Arc<DeployTarget> {
        self.inner.config.borrow().clone()
    }

    /// Publish a new draft.
    pub fn set_config(&self, target: DeployTarget) {
        self.inner.config.send_replace(Arc::new(target));
        let revision = self.inner.revision.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(session = %self.inner.id, revision, "Draft updated");
    }

    /// Bumped on every [`set_config`](Self::set_config).
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::SeqCst)
    }

    pub fn errors(&self) -> ValidationErrors {
        self.inner.errors.borrow().clone()
    }

    /// Replace the error map wholesale.
    pub fn set_errors(&self, errors: ValidationErrors) {
        self.inner.errors.send_replace(errors);
    }

    /// Receive every draft published after this call.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DeployTarget>> {
        self.inner.config.subscribe()
    }

    /// Receive every error map published after this call.
    pub fn subscribe_errors(&self) -> watch::Receiver<ValidationErrors> {
        self.inner.errors.subscribe()
    }
}

impl std::fmt::Debug for DeployEditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeployEditSession")
            .field("id", &self.inner.id)
            .field("kind", &self.config().kind)
            .field("revision", &self.revision())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_see_new_drafts() {
        let session = DeployEditSession::new(DeployTarget::new("tencent-cos"));
        let mut rx = session.subscribe();
        assert_eq!(session.revision(), 0);

        let next = session.config().with_field("bucket", "certs");
        session.set_config(next);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().field_str("bucket"), Some("certs"));
        assert_eq!(session.revision(), 1);
    }

    #[tokio::test]
    async fn test_error_subscribers_see_new_maps() {
        let session = DeployEditSession::new(DeployTarget::new("tencent-cos"));
        let mut rx = session.subscribe_errors();

        let mut errors = ValidationErrors::new();
        errors.set("domain", Some("Please enter a valid domain".to_string()));
        session.set_errors(errors);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().get("domain"), Some("Please enter a valid domain"));
        // Draft revision is independent of the error map
        assert_eq!(session.revision(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let session = DeployEditSession::new(DeployTarget::new("tencent-cos"));
        let other = session.clone();

        let mut errors = ValidationErrors::new();
        errors.set("bucket", Some("required".to_string()));
        other.set_errors(errors.clone());

        assert_eq!(session.errors(), errors);
        assert_eq!(session.id(), other.id());
    }

    #[test]
    fn test_previous_draft_is_not_mutated() {
        let session = DeployEditSession::new(DeployTarget::new("tencent-cos"));
        let before = session.config();
        session.set_config(before.with_field("region", "ap-beijing"));

        assert!(before.config.is_empty());
        assert_eq!(session.config().field_str("region"), Some("ap-beijing"));
    }
}
