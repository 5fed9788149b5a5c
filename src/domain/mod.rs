//! Backend record types shared by the store and the API client.

pub mod access;
pub mod settings;

pub use access::{Access, AccessGroup, AccessGroupExpand, AccessUsage};
pub use settings::{EmailsSetting, Setting, EMAILS_SETTING};
