//! Reference-data cache subsystem.
//!
//! # Data Flow
//! ```text
//! ConfigStore::mount(source)
//!     → three fetch tasks (accesses, emails, access groups), unordered
//!     → each result becomes a CacheAction (action.rs)
//!     → dispatch: apply under the dispatch lock → swap snapshot (state.rs)
//!     → revision watch notifies subscribers
//!
//! Local edits (add/update/delete access, set emails, set groups)
//!     → same dispatch path, no re-fetch
//! ```
//!
//! # Design Decisions
//! - Reads never block: snapshots are swapped atomically (arc-swap)
//! - Fetch failures are recorded per slice instead of being dropped
//! - Background fetches never outlive the store

pub mod action;
pub mod state;
#[allow(clippy::module_inception)]
pub mod store;

pub use action::CacheAction;
pub use state::{ConfigCacheState, LoadStatus, Slice, SliceStatus};
pub use store::ConfigStore;
