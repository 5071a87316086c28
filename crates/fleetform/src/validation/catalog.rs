// File: src/validation/catalog.rs
// Purpose: Registry of rule handlers (predicate + message template) keyed by kind

use super::rule::{Param, Rule, RuleKind, RuleSpec};
use super::validators;
use crate::error::RuleError;
use crate::value::is_truthy;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Everything a predicate may look at
pub struct RuleInput<'a> {
    pub field: &'a str,
    /// `None` when the field is absent from the data bag
    pub value: Option<&'a Value>,
    pub param: Option<&'a Param>,
    pub data: &'a Value,
    pub now: DateTime<Utc>,
}

/// A rule predicate: `true` means the value is acceptable
pub type Predicate = Arc<dyn Fn(&RuleInput<'_>) -> bool + Send + Sync>;

/// Predicate plus its message template
#[derive(Clone)]
pub struct RuleHandler {
    predicate: Predicate,
    template: Cow<'static, str>,
    skip_falsy: bool,
}

impl RuleHandler {
    /// A handler that, like most built-ins, is skipped for falsy values
    pub fn new<F>(predicate: F, template: impl Into<Cow<'static, str>>) -> Self
    where
        F: Fn(&RuleInput<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            template: template.into(),
            skip_falsy: true,
        }
    }

    /// Run the predicate even when the value is empty
    pub fn always_run(mut self) -> Self {
        self.skip_falsy = false;
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn skips_falsy(&self) -> bool {
        self.skip_falsy
    }
}

impl fmt::Debug for RuleHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleHandler")
            .field("template", &self.template)
            .field("skip_falsy", &self.skip_falsy)
            .finish()
    }
}

static STANDARD: Lazy<Arc<RuleCatalog>> = Lazy::new(|| Arc::new(RuleCatalog::standard()));

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder regex"));

/// Immutable table of rule handlers
///
/// Registration returns an extended copy; the built-in table itself never
/// changes.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    handlers: HashMap<RuleKind, RuleHandler>,
}

impl RuleCatalog {
    /// The built-in catalog
    pub fn standard() -> Self {
        let mut handlers = HashMap::new();
        let mut add = |kind: RuleKind, handler: RuleHandler| {
            handlers.insert(kind, handler);
        };

        add(
            RuleKind::Required,
            RuleHandler::new(validators::required, "This field is required").always_run(),
        );
        add(
            RuleKind::Email,
            RuleHandler::new(validators::email, "Please enter a valid email address"),
        );
        add(
            RuleKind::Phone,
            RuleHandler::new(validators::phone, "Please enter a valid phone number"),
        );
        add(
            RuleKind::ZipCode,
            RuleHandler::new(validators::zip_code, "Please enter a valid ZIP code"),
        );
        add(
            RuleKind::Url,
            RuleHandler::new(validators::url, "Please enter a valid URL"),
        );
        add(
            RuleKind::MinLength,
            RuleHandler::new(validators::min_length, "Must be at least {min} characters"),
        );
        add(
            RuleKind::MaxLength,
            RuleHandler::new(validators::max_length, "Must be no more than {max} characters"),
        );
        add(
            RuleKind::MinValue,
            RuleHandler::new(validators::min_value, "Must be at least {min}"),
        );
        add(
            RuleKind::MaxValue,
            RuleHandler::new(validators::max_value, "Must be no more than {max}"),
        );
        add(
            RuleKind::Pattern,
            RuleHandler::new(validators::pattern, "Please match the requested format"),
        );
        add(
            RuleKind::Match,
            RuleHandler::new(validators::matches, "Must match {field}").always_run(),
        );
        add(
            RuleKind::Date,
            RuleHandler::new(validators::date, "Please enter a valid date (YYYY-MM-DD)"),
        );
        add(
            RuleKind::FutureDate,
            RuleHandler::new(validators::future_date, "Date must be in the future"),
        );
        add(
            RuleKind::PastDate,
            RuleHandler::new(validators::past_date, "Date must be in the past"),
        );
        add(
            RuleKind::CreditCard,
            RuleHandler::new(validators::credit_card, "Please enter a valid credit card number"),
        );
        add(
            RuleKind::StrongPassword,
            RuleHandler::new(
                validators::strong_password,
                "Password must be at least 8 characters and include uppercase, lowercase, number, and special character",
            ),
        );
        add(
            RuleKind::Custom,
            RuleHandler::new(validators::custom, "Invalid value").always_run(),
        );

        Self { handlers }
    }

    /// Process-wide shared copy of [`RuleCatalog::standard`]
    pub fn shared() -> Arc<RuleCatalog> {
        Arc::clone(&STANDARD)
    }

    /// Return a catalog that also knows `kind`
    ///
    /// Registering an existing kind replaces its handler in the copy.
    pub fn register<F>(
        &self,
        kind: impl Into<RuleKind>,
        predicate: F,
        template: impl Into<Cow<'static, str>>,
    ) -> Self
    where
        F: Fn(&RuleInput<'_>) -> bool + Send + Sync + 'static,
    {
        self.register_handler(kind, RuleHandler::new(predicate, template))
    }

    /// Like [`RuleCatalog::register`] with full control over the handler
    pub fn register_handler(&self, kind: impl Into<RuleKind>, handler: RuleHandler) -> Self {
        let mut catalog = self.clone();
        catalog.handlers.insert(kind.into(), handler);
        catalog
    }

    /// Return a catalog with a different message template for `kind`
    ///
    /// Unknown kinds are left alone.
    pub fn with_template(&self, kind: &RuleKind, template: impl Into<Cow<'static, str>>) -> Self {
        let mut catalog = self.clone();
        if let Some(handler) = catalog.handlers.get_mut(kind) {
            handler.template = template.into();
        }
        catalog
    }

    pub fn handler(&self, kind: &RuleKind) -> Option<&RuleHandler> {
        self.handlers.get(kind)
    }

    pub fn contains(&self, kind: &RuleKind) -> bool {
        self.handlers.contains_key(kind)
    }

    /// All registered kinds, sorted
    pub fn kinds(&self) -> Vec<&RuleKind> {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort();
        kinds
    }

    /// Report the first rule in `spec` this catalog cannot evaluate
    pub fn verify(&self, spec: &RuleSpec) -> Result<(), RuleError> {
        spec.iter()
            .flat_map(|(_, rules)| rules.iter())
            .find(|rule| !self.contains(rule.kind()))
            .map_or(Ok(()), |rule| Err(RuleError::UnknownRule(rule.kind().name().to_string())))
    }

    /// Evaluate one rule; returns the formatted message when it is violated
    ///
    /// Unknown kinds are logged and treated as passing.
    pub fn check(
        &self,
        field: &str,
        rule: &Rule,
        value: Option<&Value>,
        data: &Value,
        now: DateTime<Utc>,
    ) -> Option<String> {
        let Some(handler) = self.handlers.get(rule.kind()) else {
            tracing::warn!(field, rule = %rule.kind(), "skipping unknown rule");
            return None;
        };

        if handler.skip_falsy && !value.map_or(false, is_truthy) {
            return None;
        }

        let input = RuleInput {
            field,
            value,
            param: rule.param(),
            data,
            now,
        };

        if (handler.predicate)(&input) {
            None
        } else {
            let template = rule.message().unwrap_or(handler.template.as_ref());
            Some(format_message(template, field, rule))
        }
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Substitute `{placeholder}`s in a message template
///
/// The rule's own parameter (`{min}`, `{max}`, `{pattern}`, ...) takes
/// precedence, then `{field}` is the field name. Anything else is left as is.
pub fn format_message(template: &str, field: &str, rule: &Rule) -> String {
    let param_name = rule.kind().param_name();

    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            match rule.param() {
                Some(param) if Some(name) == param_name => param.display().into_owned(),
                _ if name == "field" => field.to_string(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}
