//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Fetch from backend:
//!     → per-request timeout (reqwest client)
//!     → On failure: retries.rs (check if transient)
//!     → backoff.rs (wait with jitter, then retry)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Only transient failures (connect, timeout, 5xx, 429) are retried
//! - Jittered backoff prevents thundering herd on backend restarts

pub mod backoff;
pub mod retries;
