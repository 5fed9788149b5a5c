//! Backend API subsystem.
//!
//! # Data Flow
//! ```text
//! ConfigStore fetch task
//!     → source.rs (ConfigSource trait, the seam tests fake)
//!     → client.rs (REST calls with timeout, paging, retries)
//!     → types.rs (list envelopes, ApiError)
//! ```
//!
//! # Design Decisions
//! - Only the three read endpoints the store needs are modelled
//! - A missing emails record is not an error; it reads as an empty recipient list

pub mod client;
pub mod source;
pub mod types;

pub use client::ApiClient;
pub use source::ConfigSource;
pub use types::{ApiError, ApiResult, ListResult};
