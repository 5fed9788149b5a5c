//! Session-scoped reference-data store.
//!
//! # Responsibilities
//! - Start the three mount-time fetches, independently of each other
//! - Serialize every mutation through [`CacheAction::apply`]
//! - Publish snapshots lock-free and announce each change
//! - Tie in-flight fetches to the store's lifetime
//!
//! Fetch tasks hold only a weak reference to the store. Once the last handle
//! is dropped (or [`ConfigStore::unmount`] runs) they are cancelled, and any
//! result that still arrives is discarded instead of committed. Slices left
//! `Loading` by the cancellation are settled at unmount.
//!
//! Each fetch carries a per-slice generation. Only the newest fetch of a slice
//! may commit, so a reload is never overwritten by an older fetch.

use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::{ApiError, ApiResult, ConfigSource};
use crate::domain::{Access, AccessGroup, EmailsSetting, Setting};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::store::action::CacheAction;
use crate::store::state::{ConfigCacheState, LoadStatus, Slice};

struct StoreInner<S> {
    source: Arc<S>,
    state: ArcSwap<ConfigCacheState>,
    /// Linearizes dispatches in call order.
    dispatch_lock: Mutex<()>,
    /// Latest fetch generation per slice, indexed by [`Slice::index`].
    generations: [AtomicU64; 3],
    revision: watch::Sender<u64>,
    shutdown: Shutdown,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<S> Drop for StoreInner<S> {
    fn drop(&mut self) {
        self.shutdown.trigger();
        let tasks = self.tasks.get_mut().unwrap_or_else(PoisonError::into_inner);
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

/// Handle to the reference-data cache.
///
/// Cloning is cheap and every clone addresses the same store, so handles and
/// their methods stay stable for the whole session.
pub struct ConfigStore<S: ConfigSource> {
    inner: Arc<StoreInner<S>>,
}

impl<S: ConfigSource> Clone for ConfigStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: ConfigSource> ConfigStore<S> {
    /// Create an empty store without fetching anything.
    pub fn new(source: S) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(StoreInner {
                source: Arc::new(source),
                state: ArcSwap::from_pointee(ConfigCacheState::default()),
                dispatch_lock: Mutex::new(()),
                generations: Default::default(),
                revision,
                shutdown: Shutdown::new(),
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Create a store and start fetching all three slices.
    ///
    /// Must be called from within a Tokio runtime. Returns immediately; the
    /// slices report `Loading` until their fetch settles.
    pub fn mount(source: S) -> Self {
        let store = Self::new(source);
        for slice in Slice::ALL {
            store.spawn_fetch(slice);
        }
        tracing::info!("Config store mounted, fetching reference data");
        store
    }

    fn spawn_fetch(&self, slice: Slice) {
        let weak: Weak<StoreInner<S>> = Arc::downgrade(&self.inner);
        let source = self.inner.source.clone();
        let mut shutdown = self.inner.shutdown.subscribe();
        let Some(generation) = self.begin_fetch(slice) else {
            return;
        };

        let handle = tokio::spawn(async move {
            let outcome = tokio::select! {
                outcome = fetch_slice(source.as_ref(), slice) => outcome,
                _ = shutdown.recv() => {
                    tracing::debug!(%slice, "Fetch cancelled before completion");
                    return;
                }
            };

            let Some(inner) = weak.upgrade() else {
                tracing::debug!(%slice, "Store dropped, discarding fetch result");
                return;
            };
            ConfigStore { inner }.commit(slice, generation, outcome);
        });

        let mut tasks = self.inner.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|t| !t.is_finished());
        tasks.push(handle);
    }

    /// Mark `slice` as loading and return the generation of the new fetch.
    /// `None` once the store is unmounted.
    fn begin_fetch(&self, slice: Slice) -> Option<u64> {
        let _guard = self.lock_dispatch();
        if self.inner.shutdown.is_triggered() {
            return None;
        }
        let generation = self.inner.generations[slice.index()].fetch_add(1, Ordering::SeqCst) + 1;
        self.apply_locked(CacheAction::FetchStarted(slice));
        Some(generation)
    }

    /// Commit a fetch outcome unless the store is unmounted or a newer fetch
    /// of the slice has started.
    fn commit(&self, slice: Slice, generation: u64, outcome: ApiResult<CacheAction>) -> bool {
        let action = match outcome {
            Ok(action) => {
                metrics::record_fetch(slice.as_str(), "ok");
                action
            }
            Err(e) => {
                tracing::warn!(%slice, error = %e, "Failed to fetch reference data");
                metrics::record_fetch(slice.as_str(), "error");
                CacheAction::FetchFailed(slice, e.to_string())
            }
        };

        let _guard = self.lock_dispatch();
        if self.inner.shutdown.is_triggered() {
            tracing::debug!(%slice, "Store unmounted, discarding fetch result");
            return false;
        }
        let latest = self.inner.generations[slice.index()].load(Ordering::SeqCst);
        if latest != generation {
            tracing::debug!(%slice, generation, latest, "Superseded fetch result discarded");
            return false;
        }
        self.apply_locked(action);
        true
    }

    fn lock_dispatch(&self) -> MutexGuard<'_, ()> {
        self.inner
            .dispatch_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply an action and publish the resulting state.
    pub fn dispatch(&self, action: CacheAction) -> Arc<ConfigCacheState> {
        let _guard = self.lock_dispatch();
        self.apply_locked(action)
    }

    /// Caller holds the dispatch lock.
    fn apply_locked(&self, action: CacheAction) -> Arc<ConfigCacheState> {
        let name = action.name();
        let slice = action.slice();
        let current = self.inner.state.load_full();
        let next = Arc::new(action.apply(&current));
        self.inner.state.store(next.clone());
        self.inner.revision.send_modify(|r| *r += 1);

        metrics::record_dispatch(name);
        metrics::record_cache_size(slice.as_str(), next.len(slice));
        tracing::debug!(action = name, %slice, "Dispatched");
        next
    }

    /// Current state without locking.
    pub fn snapshot(&self) -> Arc<ConfigCacheState> {
        self.inner.state.load_full()
    }

    /// Number of dispatches so far.
    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    /// Notified after every dispatch with the new revision.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub fn set_emails(&self, emails: Setting<EmailsSetting>) {
        self.dispatch(CacheAction::SetEmails(emails));
    }

    pub fn add_access(&self, access: Access) {
        self.dispatch(CacheAction::AddAccess(access));
    }

    pub fn update_access(&self, access: Access) {
        self.dispatch(CacheAction::UpdateAccess(access));
    }

    pub fn delete_access(&self, id: &str) {
        self.dispatch(CacheAction::DeleteAccess(id.to_string()));
    }

    pub fn set_access_groups(&self, groups: Vec<AccessGroup>) {
        self.dispatch(CacheAction::SetAccessGroups(groups));
    }

    /// Fetch credential groups again and overwrite that slice only.
    ///
    /// The error is both returned and recorded in the slice status; the
    /// previously cached groups are kept on failure. Supersedes any fetch of
    /// the groups still in flight. After [`unmount`](Self::unmount) nothing
    /// is fetched and [`ApiError::Cancelled`] is returned.
    pub async fn reload_access_groups(&self) -> ApiResult<()> {
        let slice = Slice::AccessGroups;
        let Some(generation) = self.begin_fetch(slice) else {
            return Err(cancelled(slice));
        };
        let result = self.inner.source.list_access_groups().await;

        let error = result.as_ref().err().cloned();
        let committed = self.commit(slice, generation, result.map(CacheAction::SetAccessGroups));
        if !committed && !self.is_mounted() {
            return Err(cancelled(slice));
        }
        match error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Wait until every slice has finished its latest fetch, or the store is
    /// unmounted.
    pub async fn wait_until_settled(&self) -> Arc<ConfigCacheState> {
        let mut rx = self.subscribe();
        let mut shutdown = self.inner.shutdown.subscribe();
        loop {
            let state = self.snapshot();
            if state.status.all_settled() {
                return state;
            }
            if !self.is_mounted() {
                // Unmount settles slices under the dispatch lock
                drop(self.lock_dispatch());
                return self.snapshot();
            }
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        return self.snapshot();
                    }
                }
                _ = shutdown.recv() => {}
            }
        }
    }

    /// Cancel in-flight fetches. Later fetch results are discarded; local
    /// dispatches keep working.
    ///
    /// Slices still `Loading` settle as `Unloaded`, or as `Failed` when they
    /// already hold data from an earlier fetch.
    pub fn unmount(&self) {
        let _guard = self.lock_dispatch();
        if !self.inner.shutdown.trigger() {
            return;
        }
        let pending = {
            let mut tasks = self.inner.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            let pending = tasks.iter().filter(|t| !t.is_finished()).count();
            for task in tasks.drain(..) {
                task.abort();
            }
            pending
        };

        let state = self.snapshot();
        for slice in Slice::ALL {
            if *state.status.get(slice) == LoadStatus::Loading {
                self.apply_locked(CacheAction::FetchCancelled(slice));
            }
        }
        tracing::info!(pending, "Config store unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        !self.inner.shutdown.is_triggered()
    }

    /// Whether two handles address the same store.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

fn cancelled(slice: Slice) -> ApiError {
    ApiError::Cancelled {
        path: slice.as_str().to_string(),
    }
}

async fn fetch_slice<S: ConfigSource>(source: &S, slice: Slice) -> ApiResult<CacheAction> {
    Ok(match slice {
        Slice::Accesses => CacheAction::SetAccesses(source.list_accesses().await?),
        Slice::Emails => CacheAction::SetEmails(source.get_emails().await?),
        Slice::AccessGroups => CacheAction::SetAccessGroups(source.list_access_groups().await?),
    })
}
