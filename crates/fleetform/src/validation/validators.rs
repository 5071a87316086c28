// File: src/validation/validators.rs
// Purpose: Built-in rule predicates over JSON values

use super::catalog::RuleInput;
use super::rule::Param;
use crate::value::{as_text, lookup};
use fleetform_rules as rules;
use serde_json::Value;

/// Absent, `null`, blank strings, empty arrays and empty objects fail;
/// numbers and booleans always pass
pub fn required(input: &RuleInput<'_>) -> bool {
    match input.value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !rules::is_blank(s),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => true,
    }
}

pub fn email(input: &RuleInput<'_>) -> bool {
    rules::is_valid_email(&input.text())
}

pub fn phone(input: &RuleInput<'_>) -> bool {
    rules::is_valid_phone(&input.text())
}

pub fn zip_code(input: &RuleInput<'_>) -> bool {
    rules::is_valid_zip_code(&input.text())
}

pub fn url(input: &RuleInput<'_>) -> bool {
    rules::is_valid_url(&input.text())
}

pub fn min_length(input: &RuleInput<'_>) -> bool {
    match input.param {
        Some(Param::Length(min)) => input.length() >= *min,
        _ => true,
    }
}

pub fn max_length(input: &RuleInput<'_>) -> bool {
    match input.param {
        Some(Param::Length(max)) => input.length() <= *max,
        _ => true,
    }
}

pub fn min_value(input: &RuleInput<'_>) -> bool {
    match input.param {
        Some(Param::Number(min)) => rules::is_at_least(input.number(), *min),
        _ => true,
    }
}

pub fn max_value(input: &RuleInput<'_>) -> bool {
    match input.param {
        Some(Param::Number(max)) => rules::is_at_most(input.number(), *max),
        _ => true,
    }
}

pub fn pattern(input: &RuleInput<'_>) -> bool {
    match input.param {
        Some(Param::Pattern(re)) => rules::matches_pattern(&input.text(), re),
        _ => true,
    }
}

/// Equal to the other field's value; both absent counts as equal
pub fn matches(input: &RuleInput<'_>) -> bool {
    match input.param {
        Some(Param::Field(other)) => {
            let other = lookup(input.data, other).filter(|v| !v.is_null());
            let own = input.value.filter(|v| !v.is_null());
            own == other
        }
        _ => true,
    }
}

pub fn date(input: &RuleInput<'_>) -> bool {
    rules::is_valid_date(&input.text())
}

pub fn future_date(input: &RuleInput<'_>) -> bool {
    rules::is_future_date(&input.text(), input.now)
}

pub fn past_date(input: &RuleInput<'_>) -> bool {
    rules::is_past_date(&input.text(), input.now)
}

pub fn credit_card(input: &RuleInput<'_>) -> bool {
    rules::is_valid_credit_card(&input.text())
}

pub fn strong_password(input: &RuleInput<'_>) -> bool {
    rules::is_strong_password(&input.text())
}

/// The caller's predicate is authoritative
pub fn custom(input: &RuleInput<'_>) -> bool {
    match input.param {
        Some(Param::Validator(validator)) => {
            validator.call(input.value.unwrap_or(&Value::Null), input.data)
        }
        _ => true,
    }
}

impl RuleInput<'_> {
    /// The value as string rules see it
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        self.value.map(as_text).unwrap_or_default()
    }

    /// Array length for arrays, character count otherwise
    pub fn length(&self) -> usize {
        match self.value {
            Some(Value::Array(items)) => items.len(),
            _ => rules::char_length(&self.text()),
        }
    }

    /// `Number(value)` coercion
    pub fn number(&self) -> f64 {
        match self.value {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
            Some(Value::Bool(b)) => f64::from(u8::from(*b)),
            Some(Value::Null) => 0.0,
            None => f64::NAN,
            Some(other) => rules::coerce_number(&as_text(other)),
        }
    }
}
