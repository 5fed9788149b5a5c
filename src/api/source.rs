//! The reference-data collaborator the config store depends on.

use std::future::Future;
use std::sync::Arc;

use crate::api::types::ApiResult;
use crate::domain::{Access, AccessGroup, EmailsSetting, Setting};

/// Read access to the backend collections cached by the config store.
pub trait ConfigSource: Send + Sync + 'static {
    /// Fetch all non-deleted credential records.
    fn list_accesses(&self) -> impl Future<Output = ApiResult<Vec<Access>>> + Send;

    /// Fetch all credential groups.
    fn list_access_groups(&self) -> impl Future<Output = ApiResult<Vec<AccessGroup>>> + Send;

    /// Fetch the notification email settings record.
    fn get_emails(&self) -> impl Future<Output = ApiResult<Setting<EmailsSetting>>> + Send;
}

impl<S: ConfigSource> ConfigSource for Arc<S> {
    fn list_accesses(&self) -> impl Future<Output = ApiResult<Vec<Access>>> + Send {
        self.as_ref().list_accesses()
    }

    fn list_access_groups(&self) -> impl Future<Output = ApiResult<Vec<AccessGroup>>> + Send {
        self.as_ref().list_access_groups()
    }

    fn get_emails(&self) -> impl Future<Output = ApiResult<Setting<EmailsSetting>>> + Send {
        self.as_ref().get_emails()
    }
}
