// File: src/error.rs
// Purpose: Error types for rule parsing and the programmatic API boundary

use crate::validation::ErrorMap;
use serde::Serialize;
use thiserror::Error;

/// A malformed rule specification
///
/// These are programmer errors: invalid user input is reported through an
/// [`ErrorMap`], never through `RuleError`.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule segment `{segment}` has no rule name")]
    MissingName { segment: String },

    #[error("rule `{rule}` requires a `{param}` parameter")]
    MissingParam { rule: String, param: &'static str },

    #[error("rule `{rule}` has invalid parameter `{value}` (expected {expected})")]
    InvalidParam {
        rule: String,
        value: String,
        expected: &'static str,
    },

    #[error("rule `{rule}` has an invalid pattern")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("custom rules need a validator function and cannot be parsed from text")]
    CustomWithoutValidator,

    #[error("rules for field `{field}` must be a string or an array, got {found}")]
    InvalidFieldRules { field: String, found: String },

    #[error("rule specification must be an object of field names, got {found}")]
    InvalidSpec { found: String },

    #[error("unknown rule `{0}`")]
    UnknownRule(String),
}

/// Raised at the API boundary when a request fails validation
///
/// Carries the same error map the UI path produces.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub errors: ErrorMap,
}

impl ValidationError {
    pub const DEFAULT_MESSAGE: &'static str = "Validation failed";

    /// Create an error from a full error map
    pub fn new(message: impl Into<String>, errors: ErrorMap) -> Self {
        Self {
            message: message.into(),
            errors,
        }
    }

    /// Create an error carrying a single field message
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut errors = ErrorMap::new();
        errors.push(field, message.clone());
        Self { message, errors }
    }

    /// Get first error for a specific field
    pub fn first_error(&self, field: &str) -> Option<&str> {
        self.errors.first(field)
    }
}

impl From<ErrorMap> for ValidationError {
    fn from(errors: ErrorMap) -> Self {
        Self::new(Self::DEFAULT_MESSAGE, errors)
    }
}
