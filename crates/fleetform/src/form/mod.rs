// File: src/form/mod.rs
// Purpose: Bind the validation engine to a live form (blur, debounced input, submit)

pub mod debounce;
pub mod driver;
pub mod host;
pub mod presenter;

pub use debounce::Debouncer;
pub use driver::{channel, FormDriver, FormEvent, FormSignal};
pub use host::{FormHost, MemoryForm};
pub use presenter::{ErrorNode, FieldMarker, FieldPresenter, HtmlPresenter, NoopPresenter};

use crate::config::FormConfig;
use crate::validation::{evaluate_field, Clock, ErrorMap, Rule, RuleCatalog, SystemClock};
use crate::value::{expand_dotted, insert_path};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::time::Instant;

/// Result of validating every field on submit
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Submission should be cancelled; carries every violation
    Failed(ErrorMap),
    /// Field values in document order, ready to hand to a transport
    Success(Map<String, Value>),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success(_))
    }
}

/// Validation bound to a [`FormHost`], rendering through a [`FieldPresenter`]
///
/// Rules are re-derived from the host's field attributes on every pass, so
/// fields that appear or disappear after construction are picked up
/// without rebinding. Unknown fields are always valid.
pub struct FormValidator<F, P> {
    form: F,
    presenter: P,
    catalog: Arc<RuleCatalog>,
    clock: Arc<dyn Clock>,
    settings: FormConfig,
    debouncer: Debouncer,
    errors: ErrorMap,
}

impl<F: FormHost, P: FieldPresenter> FormValidator<F, P> {
    pub fn new(form: F, presenter: P) -> Self {
        Self::with_config(form, presenter, FormConfig::default())
    }

    pub fn with_config(form: F, presenter: P, settings: FormConfig) -> Self {
        let debouncer = Debouncer::new(settings.debounce());
        tracing::debug!(
            fields = form.field_names().len(),
            debounce_ms = settings.debounce_ms,
            "form validator attached"
        );
        Self {
            form,
            presenter,
            catalog: RuleCatalog::shared(),
            clock: Arc::new(SystemClock),
            settings,
            debouncer,
            errors: ErrorMap::new(),
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<RuleCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn settings(&self) -> &FormConfig {
        &self.settings
    }

    /// Rules implied by a field's current attributes; empty if the field is
    /// not rendered
    pub fn rules_for(&self, field: &str) -> Vec<Rule> {
        self.form
            .field_attrs(field)
            .map(|attrs| attrs.infer_rules())
            .unwrap_or_default()
    }

    /// Current field values in document order
    pub fn values(&self) -> Map<String, Value> {
        self.form
            .field_names()
            .into_iter()
            .filter_map(|name| self.form.value(&name).map(|value| (name, value)))
            .collect()
    }

    /// Field values as a nested data bag (`address.zip` becomes
    /// `{"address": {"zip": ..}}`)
    pub fn data_bag(&self) -> Value {
        expand_dotted(&self.values())
    }

    /// Validate one field and update its presentation
    pub fn validate_field(&mut self, field: &str) -> bool {
        let Some(attrs) = self.form.field_attrs(field) else {
            tracing::debug!(field, "validation requested for absent field");
            self.errors.remove(field);
            return true;
        };

        let rules = attrs.infer_rules();
        // Dotted names can shadow each other in the bag (`address` vs
        // `address.zip`); the field is always judged on its own value.
        let mut data = self.data_bag();
        let own = self.form.value(field).unwrap_or(Value::Null);
        insert_path(&mut data, field, own);
        let messages = evaluate_field(&self.catalog, self.clock.now(), &data, field, &rules);

        match messages.first() {
            None => {
                self.presenter.clear(field);
                self.presenter.mark_valid(field);
                self.errors.remove(field);
                true
            }
            Some(first) => {
                self.presenter.mark_invalid(field, first);
                self.errors.set(field, messages);
                false
            }
        }
    }

    /// Field lost focus: drop any pending live validation and validate now
    pub fn on_blur(&mut self, field: &str) -> bool {
        self.debouncer.cancel(field);
        self.validate_field(field)
    }

    /// Field value changed
    ///
    /// Stores the value and, for live input types, (re)starts the field's
    /// debounce timer. Returns the deadline when one was scheduled.
    pub fn on_input(&mut self, field: &str, value: Value, now: Instant) -> Option<Instant> {
        if !self.form.set_value(field, value) {
            tracing::debug!(field, "input for absent field ignored");
            return None;
        }

        let live = self
            .form
            .field_attrs(field)
            .map_or(false, |attrs| self.settings.is_live(&attrs.kind()));
        live.then(|| self.debouncer.schedule(field, now))
    }

    /// Number of fields waiting on a debounce timer
    pub fn pending(&self) -> usize {
        self.debouncer.len()
    }

    /// Earliest pending debounce deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    /// Run live validation for every field whose timer has expired
    ///
    /// Returns the fields validated, with their result. Timers for fields
    /// that were removed in the meantime fire as no-ops.
    pub fn poll_due(&mut self, now: Instant) -> Vec<(String, bool)> {
        let mut results = Vec::new();
        for field in self.debouncer.take_due(now) {
            if self.form.field_attrs(&field).is_none() {
                tracing::debug!(field = %field, "debounce fired for removed field");
                continue;
            }
            let valid = self.validate_field(&field);
            results.push((field, valid));
        }
        results
    }

    /// Validate every field
    ///
    /// On failure the first invalid field in document order receives focus.
    pub fn submit(&mut self) -> SubmitOutcome {
        let names = self.form.field_names();
        self.debouncer.clear();

        // Rebuilt from scratch so errors follow document order and fields
        // removed since the last pass drop out.
        self.errors.clear();
        for name in &names {
            self.validate_field(name);
        }

        if self.errors.is_empty() {
            tracing::debug!(fields = names.len(), "form passed validation");
            return SubmitOutcome::Success(self.values());
        }

        tracing::debug!(invalid = self.errors.len(), "form failed validation");
        if self.settings.focus_first_invalid {
            if let Some(first) = names.iter().find(|name| self.errors.contains(name)) {
                self.presenter.focus(first);
            }
        }
        SubmitOutcome::Failed(self.errors.clone())
    }

    /// Clear all markers and error nodes; values are left alone
    pub fn reset(&mut self) {
        for name in self.form.field_names() {
            self.presenter.clear(&name);
        }
        for name in self.errors.fields() {
            self.presenter.clear(name);
        }
        self.errors.clear();
        self.debouncer.clear();
    }

    /// Detach a field from the form along with its timer and errors
    pub fn remove_field(&mut self, field: &str) -> bool {
        self.debouncer.cancel(field);
        self.errors.remove(field);
        self.presenter.clear(field);
        self.form.remove_field(field)
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn first_error(&self, field: &str) -> Option<&str> {
        self.errors.first(field)
    }

    pub fn into_parts(self) -> (F, P) {
        (self.form, self.presenter)
    }
}
