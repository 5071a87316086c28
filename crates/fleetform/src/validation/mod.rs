// File: src/validation/mod.rs
// Purpose: Validation runtime: error maps, the pure evaluator and the Validator wrapper

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub mod catalog;
pub mod clock;
pub mod rule;
pub mod validators;

pub use catalog::{format_message, Predicate, RuleCatalog, RuleHandler, RuleInput};
pub use clock::{Clock, FixedClock, SystemClock};
pub use rule::{parse_rules, CustomValidator, Param, Rule, RuleKind, RuleSpec};

use crate::value::lookup;

/// Field name to ordered error messages
///
/// A field only appears when it has at least one message; absence means
/// the field is valid. Fields keep the order they were first reported in,
/// which for [`evaluate`] is the order of the rule specification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap(Vec<(String, Vec<String>)>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.0.iter().position(|(name, _)| name == field)
    }

    /// Append a message to a field's list
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        match self.position(field) {
            Some(i) => self.0[i].1.push(message.into()),
            None => self.0.push((field.to_string(), vec![message.into()])),
        }
    }

    /// Replace a field's messages; an empty list removes the field
    pub fn set(&mut self, field: &str, messages: Vec<String>) {
        if messages.is_empty() {
            self.remove(field);
            return;
        }
        match self.position(field) {
            Some(i) => self.0[i].1 = messages,
            None => self.0.push((field.to_string(), messages)),
        }
    }

    pub fn remove(&mut self, field: &str) -> Option<Vec<String>> {
        self.position(field).map(|i| self.0.remove(i).1)
    }

    /// Get all errors for a specific field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.position(field).map(|i| self.0[i].1.as_slice())
    }

    /// Get first error for a specific field
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(|errors| errors.first())
            .map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.position(field).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(field, _)| field.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, errors)| (field.as_str(), errors.as_slice()))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<(String, Vec<String>)> {
        self.0
    }
}

impl IntoIterator for ErrorMap {
    type Item = (String, Vec<String>);
    type IntoIter = std::vec::IntoIter<(String, Vec<String>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// Serialized as a JSON object in field order.
impl Serialize for ErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for ErrorMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ErrorMapVisitor;

        impl<'de> Visitor<'de> for ErrorMapVisitor {
            type Value = ErrorMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to error lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ErrorMap, A::Error> {
                let mut errors = ErrorMap::new();
                while let Some((field, messages)) = access.next_entry::<String, Vec<String>>()? {
                    errors.set(&field, messages);
                }
                Ok(errors)
            }
        }

        deserializer.deserialize_map(ErrorMapVisitor)
    }
}

/// Run one field's rules in declared order and collect every violation
pub fn evaluate_field(
    catalog: &RuleCatalog,
    now: DateTime<Utc>,
    data: &Value,
    field: &str,
    rules: &[Rule],
) -> Vec<String> {
    let value = lookup(data, field);

    rules
        .iter()
        .filter_map(|rule| catalog.check(field, rule, value, data, now))
        .collect()
}

/// Evaluate a whole rule specification against a data bag
pub fn evaluate(
    catalog: &RuleCatalog,
    clock: &dyn Clock,
    data: &Value,
    spec: &RuleSpec,
) -> ErrorMap {
    let now = clock.now();
    let mut errors = ErrorMap::new();

    for (field, rules) in spec.iter() {
        let messages = evaluate_field(catalog, now, data, field, rules);
        if !messages.is_empty() {
            tracing::debug!(field, violations = messages.len(), "field failed validation");
        }
        errors.set(field, messages);
    }

    errors
}

/// Stateful wrapper around [`evaluate`] holding data, rules and the last
/// result
///
/// `is_valid()` before `validate()` is trivially true: nothing has been
/// checked yet.
pub struct Validator {
    data: Value,
    rules: RuleSpec,
    errors: ErrorMap,
    validated: bool,
    catalog: Arc<RuleCatalog>,
    clock: Arc<dyn Clock>,
}

impl Validator {
    pub fn new(data: Value, rules: RuleSpec) -> Self {
        Self {
            data,
            rules,
            errors: ErrorMap::new(),
            validated: false,
            catalog: RuleCatalog::shared(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Parse `field -> "rule|rule:param"` pairs into a validator
    pub fn from_grammar<'a>(
        data: Value,
        rules: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, crate::error::RuleError> {
        let spec = rules
            .into_iter()
            .try_fold(RuleSpec::new(), |spec, (field, grammar)| {
                spec.parse_field(field, grammar)
            })?;
        Ok(Self::new(data, spec))
    }

    pub fn with_catalog(mut self, catalog: Arc<RuleCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Evaluate every rule for every field; returns [`Validator::is_valid`]
    pub fn validate(&mut self) -> bool {
        self.errors = evaluate(&self.catalog, self.clock.as_ref(), &self.data, &self.rules);
        self.validated = true;
        self.is_valid()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn first_error(&self, field: &str) -> Option<&str> {
        self.errors.first(field)
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn rules(&self) -> &RuleSpec {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_error_map_never_holds_empty_lists() {
        let mut errors = ErrorMap::new();
        errors.set("name", vec![]);
        assert!(errors.is_empty());

        errors.push("name", "This field is required");
        errors.set("name", vec![]);
        assert!(!errors.contains("name"));
    }

    #[test]
    fn test_error_map_serializes_as_object() {
        let mut errors = ErrorMap::new();
        errors.push("email", "Please enter a valid email address");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"email": ["Please enter a valid email address"]})
        );
    }

    #[test]
    fn test_error_map_keeps_declaration_order() {
        let spec = RuleSpec::new()
            .field("zip", [Rule::zip_code()])
            .field("name", [Rule::required()])
            .field("email", [Rule::email()]);
        let errors = evaluate(
            &RuleCatalog::standard(),
            &SystemClock,
            &json!({"zip": "1", "name": "", "email": "nope"}),
            &spec,
        );

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["zip", "name", "email"]);
        assert_eq!(
            serde_json::to_string(&errors).unwrap(),
            r#"{"zip":["Please enter a valid ZIP code"],"name":["This field is required"],"email":["Please enter a valid email address"]}"#
        );

        let back: ErrorMap = serde_json::from_str(&serde_json::to_string(&errors).unwrap()).unwrap();
        assert_eq!(back, errors);
    }

    #[test]
    fn test_is_valid_before_validate() {
        let validator = Validator::new(json!({}), RuleSpec::new().field("name", [Rule::required()]));
        assert!(!validator.is_validated());
        assert!(validator.is_valid());
    }

    #[test]
    fn test_validate_populates_errors() {
        let mut validator = Validator::from_grammar(
            json!({"name": "", "email": "fleet@example.com"}),
            [("name", "required"), ("email", "required|email")],
        )
        .unwrap();

        assert!(!validator.validate());
        assert!(validator.is_validated());
        assert_eq!(validator.first_error("name"), Some("This field is required"));
        assert_eq!(validator.first_error("email"), None);
        assert_eq!(validator.errors().len(), 1);
    }

    #[test]
    fn test_fixed_clock_controls_date_rules() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        let spec = RuleSpec::new()
            .field("launch", [Rule::future_date()])
            .field("founded", [Rule::past_date()]);

        let errors = evaluate(
            &RuleCatalog::standard(),
            &clock,
            &json!({"launch": "2024-05-31", "founded": "2010-01-01"}),
            &spec,
        );

        assert_eq!(errors.first("launch"), Some("Date must be in the future"));
        assert!(!errors.contains("founded"));
    }
}
