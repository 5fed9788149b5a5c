//! Deployment target editing subsystem.
//!
//! # Data Flow
//! ```text
//! DeployTarget (target.rs)
//!     → held by DeployEditSession (session.rs), shared by clones
//!     → FormController (form.rs) reads the draft, writes the next one
//!     → Schema (schema.rs) turns the draft into ValidationErrors (errors.rs)
//!     → FieldView per input, labels from i18n
//! ```
//!
//! # Design Decisions
//! - Invalid input is data in the error map, never an Err
//! - Drafts are replaced, never patched in place
//! - Forms are plain trait objects looked up by kind (forms/)

pub mod errors;
pub mod form;
pub mod forms;
pub mod schema;
pub mod session;
pub mod target;

pub use errors::ValidationErrors;
pub use form::{DeployForm, FieldSpec, FieldView, FormController};
pub use forms::FormRegistry;
pub use schema::{FieldRule, Schema, DOMAIN_PATTERN};
pub use session::DeployEditSession;
pub use target::DeployTarget;
