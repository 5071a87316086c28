// File: src/api.rs
// Purpose: Request-boundary helpers: schema validation, sanitization and normalizers

use crate::error::ValidationError;
use crate::validation::{evaluate, Clock, RuleCatalog, RuleSpec, SystemClock};
use crate::value::expand_dotted;
use chrono::SecondsFormat;
use fleetform_rules::{format_phone, is_valid_email, is_valid_phone, normalize_email, parse_instant};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));

/// Validates programmatic input and fails with a [`ValidationError`]
#[derive(Clone)]
pub struct ApiValidator {
    catalog: Arc<RuleCatalog>,
    clock: Arc<dyn Clock>,
}

impl Default for ApiValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiValidator {
    pub fn new() -> Self {
        Self {
            catalog: RuleCatalog::shared(),
            clock: Arc::new(SystemClock),
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

    /// Run `schema` against `data`; any violation becomes an error
    pub fn validate_request(&self, data: &Value, schema: &RuleSpec) -> Result<(), ValidationError> {
        let errors = evaluate(&self.catalog, self.clock.as_ref(), data, schema);
        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(invalid = errors.len(), "request rejected");
            Err(ValidationError::from(errors))
        }
    }
}

/// [`ApiValidator::validate_request`] with the standard catalog and wall time
pub fn validate_request(data: &Value, schema: &RuleSpec) -> Result<(), ValidationError> {
    ApiValidator::new().validate_request(data, schema)
}

/// Strip tags from every string in `data`, then HTML-escape what is left
///
/// Arrays and objects are walked recursively; other values pass through.
pub fn sanitize(data: &Value) -> Value {
    match data {
        Value::String(s) => Value::String(sanitize_str(s)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), sanitize(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}

pub fn sanitize_str(s: &str) -> String {
    escape_html(&TAG_REGEX.replace_all(s, ""))
}

/// Escape `& < > " '`
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Lowercase and trim an email address, rejecting malformed ones
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let normalized = normalize_email(email);
    if is_valid_email(&normalized) {
        Ok(normalized)
    } else {
        Err(ValidationError::field("email", "Please enter a valid email address"))
    }
}

/// Validate a phone number and format it as `(XXX) XXX-XXXX`
pub fn validate_phone(phone: &str) -> Result<String, ValidationError> {
    if !is_valid_phone(phone) {
        return Err(ValidationError::field("phone", "Please enter a valid phone number"));
    }
    Ok(format_phone(phone).unwrap_or_else(|| phone.trim().to_string()))
}

/// Ordered date bounds as ISO 8601 UTC timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Parse both bounds and require `start < end`
pub fn validate_date_range(start: &str, end: &str) -> Result<DateRange, ValidationError> {
    let start_at = parse_instant(start)
        .ok_or_else(|| ValidationError::field("start", "Invalid start date"))?;
    let end_at =
        parse_instant(end).ok_or_else(|| ValidationError::field("end", "Invalid end date"))?;

    if start_at >= end_at {
        return Err(ValidationError::field("end", "End date must be after start date"));
    }

    Ok(DateRange {
        start: start_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        end: end_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Decode an `application/x-www-form-urlencoded` body into a data bag
///
/// Values stay strings. A name sent more than once collects its values into
/// an array, and dotted names nest (`address.zip=33139`).
pub fn parse_form_body(body: &str) -> Value {
    let mut flat = Map::new();

    for pair in body.split('&').filter(|pair| !pair.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        let name = decode_component(name);
        if name.is_empty() {
            continue;
        }
        let value = Value::String(decode_component(value));

        match flat.get_mut(&name) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                flat.insert(name, value);
            }
        }
    }

    expand_dotted(&flat)
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}
