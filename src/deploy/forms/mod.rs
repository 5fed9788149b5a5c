//! Deployment target forms and their lookup by kind.

pub mod aliyun_oss;
pub mod tencent_cos;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::deploy::form::DeployForm;

pub use aliyun_oss::AliyunOssForm;
pub use tencent_cos::TencentCosForm;

/// Forms keyed by target kind.
#[derive(Clone, Default)]
pub struct FormRegistry {
    forms: BTreeMap<&'static str, Arc<dyn DeployForm>>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every form shipped with the crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TencentCosForm));
        registry.register(Arc::new(AliyunOssForm));
        registry
    }

    /// Add a form, replacing any previous form of the same kind.
    pub fn register(&mut self, form: Arc<dyn DeployForm>) {
        self.forms.insert(form.kind(), form);
    }

    pub fn get(&self, kind: &str) -> Option<Arc<dyn DeployForm>> {
        self.forms.get(kind).cloned()
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.forms.keys().copied()
    }
}

impl std::fmt::Debug for FormRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.forms.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_kinds() {
        let registry = FormRegistry::builtin();
        assert_eq!(registry.kinds().collect::<Vec<_>>(), vec!["aliyun-oss", "tencent-cos"]);
        assert_eq!(registry.get("tencent-cos").map(|f| f.fields().len()), Some(3));
        assert!(registry.get("ftp").is_none());
    }
}
