//! Form controller binding a deployment form to an edit session.
//!
//! # Lifecycle
//! ```text
//! mount()   → clear errors → seed defaults (new targets, once) → validate
//! change()  → trim → next draft → set_config → validate → merge errors
//! refresh() → validate again if someone else replaced the draft
//! ```
//!
//! Validation recomputes every field the form owns and merges the result into
//! the session's error map, so messages for fields owned elsewhere survive.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::deploy::errors::ValidationErrors;
use crate::deploy::schema::Schema;
use crate::deploy::session::DeployEditSession;
use crate::i18n::Translate;
use crate::observability::metrics;

/// One input of a deployment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label_key: &'static str,
    pub placeholder_key: &'static str,
}

/// A deployment target's form: its fields, seeded defaults and rules.
pub trait DeployForm: Send + Sync {
    /// Target kind this form edits, e.g. "tencent-cos".
    fn kind(&self) -> &'static str;

    fn fields(&self) -> &'static [FieldSpec];

    /// Values seeded into new targets.
    fn defaults(&self) -> Vec<(&'static str, Value)> {
        Vec::new()
    }

    fn schema(&self, t: &dyn Translate) -> Schema;
}

/// What a field displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub label: String,
    pub placeholder: String,
    pub value: String,
    pub error: Option<String>,
}

pub struct FormController {
    form: Arc<dyn DeployForm>,
    session: DeployEditSession,
    translator: Arc<dyn Translate>,
    schema: Schema,
    mounted: bool,
    validated_revision: Option<u64>,
}

impl FormController {
    pub fn new(
        form: Arc<dyn DeployForm>,
        session: DeployEditSession,
        translator: Arc<dyn Translate>,
    ) -> Self {
        let schema = form.schema(translator.as_ref());
        Self {
            form,
            session,
            translator,
            schema,
            mounted: false,
            validated_revision: None,
        }
    }

    pub fn session(&self) -> &DeployEditSession {
        &self.session
    }

    pub fn kind(&self) -> &'static str {
        self.form.kind()
    }

    /// First-display setup. Runs once; later calls only return current errors.
    pub fn mount(&mut self) -> ValidationErrors {
        if self.mounted {
            return self.session.errors();
        }
        self.mounted = true;

        self.session.set_errors(ValidationErrors::new());

        let draft = self.session.config();
        if draft.is_new() {
            let seeded = draft.with_defaults(&self.form.defaults());
            if seeded != *draft {
                tracing::debug!(
                    session = %self.session.id(),
                    kind = self.form.kind(),
                    "Seeded defaults into new target"
                );
                self.session.set_config(seeded);
            }
        }

        self.revalidate()
    }

    /// Apply typed input for `field`. Returns false for fields this form does not own.
    pub fn change(&mut self, field: &str, raw: &str) -> bool {
        let Some(spec) = self.form.fields().iter().find(|f| f.name == field) else {
            tracing::warn!(
                session = %self.session.id(),
                kind = self.form.kind(),
                field,
                "Ignoring input for unknown field"
            );
            return false;
        };

        let next = self.session.config().with_field(spec.name, raw.trim());
        self.session.set_config(next);
        self.revalidate();
        true
    }

    /// Revalidate when the draft changed since the last pass. Returns whether it ran.
    pub fn refresh(&mut self) -> bool {
        if self.validated_revision == Some(self.session.revision()) {
            return false;
        }
        self.revalidate();
        true
    }

    /// Validate the current draft and merge the result into the session's errors.
    pub fn revalidate(&mut self) -> ValidationErrors {
        let draft = self.session.config();
        let result = self.schema.validate(&draft.config);
        metrics::record_validation_failures(self.form.kind(), result.error_count());

        let mut errors = self.session.errors();
        errors.merge(result);
        self.session.set_errors(errors.clone());
        self.validated_revision = Some(self.session.revision());

        tracing::trace!(
            session = %self.session.id(),
            kind = self.form.kind(),
            invalid = errors.error_count(),
            "Validated draft"
        );
        errors
    }

    /// Render state for every field, in form order.
    pub fn view(&self) -> Vec<FieldView> {
        let draft = self.session.config();
        let errors = self.session.errors();
        self.form
            .fields()
            .iter()
            .map(|spec| FieldView {
                name: spec.name,
                label: self.translator.t(spec.label_key),
                placeholder: self.translator.t(spec.placeholder_key),
                value: draft.field_str(spec.name).unwrap_or_default().to_string(),
                error: errors.get(spec.name).map(str::to_string),
            })
            .collect()
    }
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("kind", &self.form.kind())
            .field("session", &self.session.id())
            .field("mounted", &self.mounted)
            .finish()
    }
}
