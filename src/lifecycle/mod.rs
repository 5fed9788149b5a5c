//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Store mount:
//!     Spawn fetch tasks → each subscribes to shutdown.rs
//!
//! Store unmount / last handle dropped:
//!     Trigger shutdown → in-flight fetches abandon → late results discarded
//! ```
//!
//! # Design Decisions
//! - Background work is owned by a scope, never detached
//! - Cancellation is cooperative via broadcast, with a latch for late finishers

pub mod shutdown;

pub use shutdown::Shutdown;
