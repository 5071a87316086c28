// File: src/form_field.rs
// Purpose: Field constraints expressed as HTML-like attributes, and the rules they imply

use crate::validation::{parse_rules, Rule};
use std::collections::HashMap;

/// Constraints declared on a single form field
///
/// Mirrors what a browser exposes on an input: HTML5 attributes
/// (`required`, `type`, `minlength`, `maxlength`, `min`, `max`, `pattern`)
/// plus a `data-validate` rule string layered on top.
#[derive(Debug, Clone, Default)]
pub struct FieldAttrs {
    /// HTML5 native attributes (e.g., "required", "minlength", "type")
    pub html5_attrs: HashMap<String, String>,
    /// Pipe-delimited rule string from the `data-validate` attribute
    pub data_validate: String,
    /// Field label for display
    pub label: String,
}

impl FieldAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute; boolean attributes use an empty value
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.html5_attrs.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn required(self) -> Self {
        self.attr("required", "")
    }

    pub fn input_type(self, input_type: &str) -> Self {
        self.attr("type", input_type)
    }

    pub fn validate(mut self, rules: impl Into<String>) -> Self {
        self.data_validate = rules.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.html5_attrs.get(name).map(String::as_str)
    }

    pub fn is_required(&self) -> bool {
        self.html5_attrs.contains_key("required")
    }

    /// The `type` attribute, lowercased; inputs default to `text`
    pub fn kind(&self) -> String {
        self.get("type")
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "text".to_string())
    }

    /// Derive the field's rule list from its constraints
    ///
    /// Order: required, the type's format rule, numeric bounds, length
    /// bounds, pattern, then the `data-validate` rules. Attribute values
    /// that cannot be parsed are logged and ignored.
    ///
    /// `pattern` attributes are compiled with the `regex` crate, which has
    /// no lookaround or backreferences. A browser pattern that relies on
    /// them (`(?=.*\d).{8,}` style password checks) is dropped with a
    /// warning and the field keeps its other rules; express such checks
    /// as `data-validate` rules instead (`strongPassword`).
    pub fn infer_rules(&self) -> Vec<Rule> {
        let mut rules = Vec::new();

        if self.is_required() {
            rules.push(Rule::required());
        }

        match self.kind().as_str() {
            "email" => rules.push(Rule::email()),
            "tel" => rules.push(Rule::phone()),
            "url" => rules.push(Rule::url()),
            _ => {}
        }

        if let Some(min) = self.number_attr("min") {
            rules.push(Rule::min_value(min));
        }
        if let Some(max) = self.number_attr("max") {
            rules.push(Rule::max_value(max));
        }
        if let Some(min) = self.length_attr("minlength") {
            rules.push(Rule::min_length(min));
        }
        if let Some(max) = self.length_attr("maxlength") {
            rules.push(Rule::max_length(max));
        }

        if let Some(pattern) = self.get("pattern").filter(|p| !p.is_empty()) {
            // HTML pattern attributes must match the whole value.
            match Rule::pattern(&format!("^(?:{})$", pattern)) {
                Ok(rule) => rules.push(rule),
                Err(e) => tracing::warn!(pattern, error = %e, "ignoring invalid pattern attribute"),
            }
        }

        if !self.data_validate.trim().is_empty() {
            match parse_rules(&self.data_validate) {
                Ok(custom) => rules.extend(custom),
                Err(e) => tracing::warn!(
                    rules = %self.data_validate,
                    error = %e,
                    "ignoring invalid data-validate rules"
                ),
            }
        }

        rules
    }

    fn number_attr(&self, name: &str) -> Option<f64> {
        let raw = self.get(name)?.trim();
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => {
                tracing::warn!(attr = name, value = raw, "ignoring non-numeric bound");
                None
            }
        }
    }

    fn length_attr(&self, name: &str) -> Option<usize> {
        let raw = self.get(name)?.trim();
        match raw.parse::<usize>() {
            Ok(n) => Some(n),
            Err(_) => {
                tracing::warn!(attr = name, value = raw, "ignoring invalid length bound");
                None
            }
        }
    }
}
