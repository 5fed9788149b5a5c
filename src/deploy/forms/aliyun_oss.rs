//! Alibaba Cloud OSS deployment target.

use serde_json::{json, Value};

use crate::deploy::form::{DeployForm, FieldSpec};
use crate::deploy::schema::{domain_regex, Schema};
use crate::i18n::Translate;

pub const KIND: &str = "aliyun-oss";
pub const DEFAULT_ENDPOINT: &str = "oss-cn-hangzhou.aliyuncs.com";

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "endpoint",
        label_key: "domain.deployment.form.aliyun_oss_endpoint.label",
        placeholder_key: "domain.deployment.form.aliyun_oss_endpoint.placeholder",
    },
    FieldSpec {
        name: "bucket",
        label_key: "domain.deployment.form.aliyun_oss_bucket.label",
        placeholder_key: "domain.deployment.form.aliyun_oss_bucket.placeholder",
    },
    FieldSpec {
        name: "domain",
        label_key: "domain.deployment.form.domain.label",
        placeholder_key: "domain.deployment.form.domain.placeholder",
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct AliyunOssForm;

impl DeployForm for AliyunOssForm {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![("endpoint", json!(DEFAULT_ENDPOINT))]
    }

    fn schema(&self, t: &dyn Translate) -> Schema {
        Schema::new()
            .required("endpoint", t.t("domain.deployment.form.aliyun_oss_endpoint.placeholder"))
            .required("bucket", t.t("domain.deployment.form.aliyun_oss_bucket.placeholder"))
            .pattern("domain", domain_regex(), t.t("common.errmsg.domain_invalid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::form::FormController;
    use crate::deploy::session::DeployEditSession;
    use crate::deploy::target::DeployTarget;
    use crate::i18n::Catalog;
    use std::sync::Arc;

    #[test]
    fn test_seeds_endpoint_and_validates() {
        let mut form = FormController::new(
            Arc::new(AliyunOssForm),
            DeployEditSession::new(DeployTarget::new(KIND)),
            Arc::new(Catalog::builtin()),
        );
        let errors = form.mount();

        assert_eq!(form.session().config().field_str("endpoint"), Some(DEFAULT_ENDPOINT));
        assert_eq!(errors.get("endpoint"), None);
        assert_eq!(errors.get("bucket"), Some("Please enter bucket"));

        form.change("bucket", "certs-prod");
        form.change("domain", "static.example.com");
        assert!(form.session().errors().is_valid());
    }
}
