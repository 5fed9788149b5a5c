//! Tencent Cloud COS deployment target.

use serde_json::{json, Value};

use crate::deploy::form::{DeployForm, FieldSpec};
use crate::deploy::schema::{domain_regex, Schema};
use crate::i18n::Translate;

pub const KIND: &str = "tencent-cos";
pub const DEFAULT_REGION: &str = "ap-guangzhou";

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "region",
        label_key: "domain.deployment.form.tencent_cos_region.label",
        placeholder_key: "domain.deployment.form.tencent_cos_region.placeholder",
    },
    FieldSpec {
        name: "bucket",
        label_key: "domain.deployment.form.tencent_cos_bucket.label",
        placeholder_key: "domain.deployment.form.tencent_cos_bucket.placeholder",
    },
    FieldSpec {
        name: "domain",
        label_key: "domain.deployment.form.domain.label",
        placeholder_key: "domain.deployment.form.domain.placeholder",
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct TencentCosForm;

impl DeployForm for TencentCosForm {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![("region", json!(DEFAULT_REGION))]
    }

    fn schema(&self, t: &dyn Translate) -> Schema {
        // Required fields reuse their placeholder as the message
        Schema::new()
            .required("region", t.t("domain.deployment.form.tencent_cos_region.placeholder"))
            .required("bucket", t.t("domain.deployment.form.tencent_cos_bucket.placeholder"))
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

    fn controller(target: DeployTarget) -> FormController {
        FormController::new(
            Arc::new(TencentCosForm),
            DeployEditSession::new(target),
            Arc::new(Catalog::builtin()),
        )
    }

    #[test]
    fn test_mount_seeds_region_for_new_target() {
        let mut form = controller(DeployTarget::new(KIND));
        let errors = form.mount();

        let draft = form.session().config();
        assert_eq!(draft.field_str("region"), Some(DEFAULT_REGION));
        assert_eq!(errors.get("region"), None);
        assert_eq!(errors.get("bucket"), Some("Please enter bucket"));
        assert_eq!(errors.get("domain"), Some("Please enter a valid domain"));
    }

    #[test]
    fn test_mount_keeps_saved_target_untouched() {
        let mut target = DeployTarget::new(KIND).with_field("bucket", "certs");
        target.id = Some("d1".to_string());
        let mut form = controller(target.clone());
        form.mount();

        assert_eq!(*form.session().config(), target);
        assert_eq!(
            form.session().errors().get("region"),
            Some("Please enter region (e.g. ap-guangzhou)")
        );
    }

    #[test]
    fn test_mount_preserves_entered_region() {
        let mut form = controller(DeployTarget::new(KIND).with_field("region", "ap-hongkong"));
        form.mount();
        assert_eq!(form.session().config().field_str("region"), Some("ap-hongkong"));
    }

    #[test]
    fn test_mount_runs_once() {
        let mut form = controller(DeployTarget::new(KIND));
        form.mount();
        form.change("region", "");
        let revision = form.session().revision();

        form.mount();
        assert_eq!(form.session().revision(), revision);
        assert_eq!(form.session().config().field_str("region"), Some(""));
    }

    #[test]
    fn test_mount_clears_stale_errors() {
        let session = DeployEditSession::new(DeployTarget::new(KIND));
        let mut stale = crate::deploy::errors::ValidationErrors::new();
        stale.set("access", Some("from another form".to_string()));
        session.set_errors(stale);

        let mut form = FormController::new(Arc::new(TencentCosForm), session, Arc::new(Catalog::builtin()));
        let errors = form.mount();
        assert!(!errors.contains_field("access"));
    }

    #[test]
    fn test_typing_trims_and_validates() {
        let mut form = controller(DeployTarget::new(KIND));
        form.mount();

        assert!(form.change("bucket", " mybucket "));
        assert_eq!(form.session().config().field_str("bucket"), Some("mybucket"));
        assert_eq!(form.session().errors().get("bucket"), None);

        form.change("domain", "*.example.com");
        assert_eq!(form.session().errors().get("domain"), None);

        form.change("domain", "a.b");
        assert_eq!(form.session().errors().get("domain"), Some("Please enter a valid domain"));

        form.change("region", "   ");
        assert_eq!(form.session().config().field_str("region"), Some(""));
        assert!(form.session().errors().get("region").is_some());
    }

    #[test]
    fn test_unknown_field_is_ignored() {
        let mut form = controller(DeployTarget::new(KIND));
        form.mount();
        let revision = form.session().revision();

        assert!(!form.change("secretKey", "x"));
        assert_eq!(form.session().revision(), revision);
    }

    #[test]
    fn test_view_labels_and_errors() {
        let mut form = controller(DeployTarget::new(KIND));
        form.mount();
        form.change("domain", "cdn.example.com");

        let view = form.view();
        let names: Vec<_> = view.iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["region", "bucket", "domain"]);
        assert_eq!(view[0].label, "Region");
        assert_eq!(view[0].value, DEFAULT_REGION);
        assert_eq!(view[1].value, "");
        assert_eq!(view[1].error.as_deref(), Some("Please enter bucket"));
        assert_eq!(view[2].error, None);
    }
}
