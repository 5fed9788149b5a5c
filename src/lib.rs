//! Certificate console client core.
//!
//! Reference-data caching and deployment-target form validation for a
//! certificate management backend.

pub mod api;
pub mod config;
pub mod deploy;
pub mod domain;
pub mod i18n;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod store;

pub use api::{ApiClient, ConfigSource};
pub use config::ConsoleConfig;
pub use deploy::{DeployEditSession, DeployTarget, FormController, FormRegistry};
pub use store::ConfigStore;
