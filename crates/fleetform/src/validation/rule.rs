// File: src/validation/rule.rs
// Purpose: Rule model, the `rule|rule:param` grammar and rule specifications

use crate::error::RuleError;
use crate::value::as_text;
use regex::Regex;
use serde::de::{self, Deserialize, Deserializer};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Every rule the catalog knows how to evaluate
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    Required,
    Email,
    Phone,
    ZipCode,
    Url,
    MinLength,
    MaxLength,
    MinValue,
    MaxValue,
    Pattern,
    Match,
    Date,
    FutureDate,
    PastDate,
    CreditCard,
    StrongPassword,
    Custom,
    /// A rule registered at runtime under its own name
    Extension(String),
}

impl RuleKind {
    /// Built-in kinds in catalog order
    pub const BUILTIN: [RuleKind; 17] = [
        RuleKind::Required,
        RuleKind::Email,
        RuleKind::Phone,
        RuleKind::ZipCode,
        RuleKind::Url,
        RuleKind::MinLength,
        RuleKind::MaxLength,
        RuleKind::MinValue,
        RuleKind::MaxValue,
        RuleKind::Pattern,
        RuleKind::Match,
        RuleKind::Date,
        RuleKind::FutureDate,
        RuleKind::PastDate,
        RuleKind::CreditCard,
        RuleKind::StrongPassword,
        RuleKind::Custom,
    ];

    /// Name used in rule strings (`minLength`, `zipCode`, ...)
    pub fn name(&self) -> &str {
        match self {
            RuleKind::Required => "required",
            RuleKind::Email => "email",
            RuleKind::Phone => "phone",
            RuleKind::ZipCode => "zipCode",
            RuleKind::Url => "url",
            RuleKind::MinLength => "minLength",
            RuleKind::MaxLength => "maxLength",
            RuleKind::MinValue => "minValue",
            RuleKind::MaxValue => "maxValue",
            RuleKind::Pattern => "pattern",
            RuleKind::Match => "match",
            RuleKind::Date => "date",
            RuleKind::FutureDate => "futureDate",
            RuleKind::PastDate => "pastDate",
            RuleKind::CreditCard => "creditCard",
            RuleKind::StrongPassword => "strongPassword",
            RuleKind::Custom => "custom",
            RuleKind::Extension(name) => name,
        }
    }

    /// Look up a kind by name; unknown names become extensions
    pub fn from_name(name: &str) -> Self {
        Self::BUILTIN
            .iter()
            .find(|kind| kind.name() == name)
            .cloned()
            .unwrap_or_else(|| RuleKind::Extension(name.to_string()))
    }

    /// Key of the rule's parameter, both in object params and in message
    /// placeholders
    pub fn param_name(&self) -> Option<&'static str> {
        match self {
            RuleKind::MinLength | RuleKind::MinValue => Some("min"),
            RuleKind::MaxLength | RuleKind::MaxValue => Some("max"),
            RuleKind::Pattern => Some("pattern"),
            RuleKind::Match => Some("field"),
            RuleKind::Extension(_) => Some("param"),
            _ => None,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for RuleKind {
    fn from(name: &str) -> Self {
        RuleKind::from_name(name)
    }
}

/// Caller-supplied predicate for `custom` rules: `(value, data) -> valid`
pub type CustomFn = dyn Fn(&Value, &Value) -> bool + Send + Sync;

/// Shared handle to a custom predicate
#[derive(Clone)]
pub struct CustomValidator(Arc<CustomFn>);

impl CustomValidator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, value: &Value, data: &Value) -> bool {
        (self.0)(value, data)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidator(..)")
    }
}

/// Resolved rule parameter
#[derive(Debug, Clone)]
pub enum Param {
    Length(usize),
    Number(f64),
    Pattern(Regex),
    Field(String),
    Validator(CustomValidator),
    Text(String),
}

impl Param {
    /// Text substituted for the parameter's placeholder in messages
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Param::Length(n) => Cow::Owned(n.to_string()),
            Param::Number(n) => Cow::Owned(as_text(&Value::from(*n)).into_owned()),
            Param::Pattern(re) => Cow::Borrowed(re.as_str()),
            Param::Field(field) => Cow::Borrowed(field),
            Param::Validator(_) => Cow::Borrowed(""),
            Param::Text(text) => Cow::Borrowed(text),
        }
    }
}

/// A named validation unit: kind, optional parameter and optional message
/// override
#[derive(Debug, Clone)]
pub struct Rule {
    kind: RuleKind,
    param: Option<Param>,
    message: Option<String>,
}

impl Rule {
    fn bare(kind: RuleKind) -> Self {
        Self {
            kind,
            param: None,
            message: None,
        }
    }

    fn with_param(kind: RuleKind, param: Param) -> Self {
        Self {
            kind,
            param: Some(param),
            message: None,
        }
    }

    pub fn required() -> Self {
        Self::bare(RuleKind::Required)
    }

    pub fn email() -> Self {
        Self::bare(RuleKind::Email)
    }

    pub fn phone() -> Self {
        Self::bare(RuleKind::Phone)
    }

    pub fn zip_code() -> Self {
        Self::bare(RuleKind::ZipCode)
    }

    pub fn url() -> Self {
        Self::bare(RuleKind::Url)
    }

    pub fn min_length(min: usize) -> Self {
        Self::with_param(RuleKind::MinLength, Param::Length(min))
    }

    pub fn max_length(max: usize) -> Self {
        Self::with_param(RuleKind::MaxLength, Param::Length(max))
    }

    pub fn min_value(min: f64) -> Self {
        Self::with_param(RuleKind::MinValue, Param::Number(min))
    }

    pub fn max_value(max: f64) -> Self {
        Self::with_param(RuleKind::MaxValue, Param::Number(max))
    }

    /// Compile a case-sensitive pattern rule
    pub fn pattern(pattern: &str) -> Result<Self, RuleError> {
        let regex = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            rule: RuleKind::Pattern.name().to_string(),
            source,
        })?;
        Ok(Self::pattern_regex(regex))
    }

    /// Pattern rule from an already compiled regex
    pub fn pattern_regex(regex: Regex) -> Self {
        Self::with_param(RuleKind::Pattern, Param::Pattern(regex))
    }

    /// The value must equal the value of `field` in the same data bag
    pub fn matches(field: impl Into<String>) -> Self {
        Self::with_param(RuleKind::Match, Param::Field(field.into()))
    }

    pub fn date() -> Self {
        Self::bare(RuleKind::Date)
    }

    pub fn future_date() -> Self {
        Self::bare(RuleKind::FutureDate)
    }

    pub fn past_date() -> Self {
        Self::bare(RuleKind::PastDate)
    }

    pub fn credit_card() -> Self {
        Self::bare(RuleKind::CreditCard)
    }

    pub fn strong_password() -> Self {
        Self::bare(RuleKind::StrongPassword)
    }

    /// Delegate to a caller-supplied predicate and report `message` on failure
    pub fn custom<F>(validator: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        Self::with_param(
            RuleKind::Custom,
            Param::Validator(CustomValidator::new(validator)),
        )
        .with_message(message)
    }

    /// Rule for a kind registered on a catalog at runtime
    pub fn extension(name: impl Into<String>, param: Option<String>) -> Self {
        Self {
            kind: RuleKind::Extension(name.into()),
            param: param.map(Param::Text),
            message: None,
        }
    }

    /// Override the catalog template for this rule only
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn param(&self) -> Option<&Param> {
        self.param.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Build a rule from its kind and an untyped parameter
    ///
    /// Scalars are the shorthand form (`minLength:3`); objects are the
    /// structured form and contribute the key named by
    /// [`RuleKind::param_name`].
    pub fn from_parts(kind: RuleKind, param: Option<&Value>) -> Result<Self, RuleError> {
        let param = match (param, kind.param_name()) {
            (Some(Value::Object(map)), Some(key)) => map.get(key),
            (Some(Value::Null), _) => None,
            (param, _) => param,
        };

        let rule = match &kind {
            RuleKind::MinLength | RuleKind::MaxLength => {
                Self::with_param(kind.clone(), Param::Length(length_param(&kind, param)?))
            }
            RuleKind::MinValue | RuleKind::MaxValue => {
                Self::with_param(kind.clone(), Param::Number(number_param(&kind, param)?))
            }
            RuleKind::Pattern => {
                let source = text_param(&kind, param)?;
                Self::pattern(&source)?
            }
            RuleKind::Match => Self::matches(text_param(&kind, param)?),
            RuleKind::Custom => return Err(RuleError::CustomWithoutValidator),
            RuleKind::Extension(name) => {
                Self::extension(name.clone(), param.map(|p| as_text(p).into_owned()))
            }
            // Parameterless rules ignore anything they are given.
            _ => Self::bare(kind.clone()),
        };

        Ok(rule)
    }

    /// Parse a single `name` or `name:param` segment
    pub fn parse(segment: &str) -> Result<Self, RuleError> {
        let (name, param) = match segment.split_once(':') {
            Some((name, param)) => (name.trim(), Some(param)),
            None => (segment.trim(), None),
        };

        if name.is_empty() {
            return Err(RuleError::MissingName {
                segment: segment.to_string(),
            });
        }

        let param = param.map(|p| Value::String(p.to_string()));
        Self::from_parts(RuleKind::from_name(name), param.as_ref())
    }
}

fn missing(kind: &RuleKind) -> RuleError {
    RuleError::MissingParam {
        rule: kind.name().to_string(),
        param: kind.param_name().unwrap_or("param"),
    }
}

fn length_param(kind: &RuleKind, param: Option<&Value>) -> Result<usize, RuleError> {
    let value = param.ok_or_else(|| missing(kind))?;
    let parsed = match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| RuleError::InvalidParam {
        rule: kind.name().to_string(),
        value: as_text(value).into_owned(),
        expected: "a non-negative integer",
    })
}

fn number_param(kind: &RuleKind, param: Option<&Value>) -> Result<f64, RuleError> {
    let value = param.ok_or_else(|| missing(kind))?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(fleetform_rules::coerce_number(s)).filter(|n| !n.is_nan()),
        _ => None,
    };

    parsed.ok_or_else(|| RuleError::InvalidParam {
        rule: kind.name().to_string(),
        value: as_text(value).into_owned(),
        expected: "a number",
    })
}

fn text_param(kind: &RuleKind, param: Option<&Value>) -> Result<String, RuleError> {
    match param {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) | None => Err(missing(kind)),
        Some(other) => Err(RuleError::InvalidParam {
            rule: kind.name().to_string(),
            value: other.to_string(),
            expected: "a string",
        }),
    }
}

/// Parse the pipe grammar: `"required|minLength:3|email"`
///
/// Segments are split on `|`, then on the first `:`. Blank segments (for
/// example a trailing `|`) are ignored.
pub fn parse_rules(grammar: &str) -> Result<Vec<Rule>, RuleError> {
    grammar
        .split('|')
        .filter(|segment| !segment.trim().is_empty())
        .map(Rule::parse)
        .collect()
}

/// Ordered mapping of field name to the rules declared for it
#[derive(Debug, Clone, Default)]
pub struct RuleSpec {
    fields: Vec<(String, Vec<Rule>)>,
}

impl RuleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`RuleSpec::insert`]
    pub fn field(mut self, name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.insert(name, rules);
        self
    }

    /// Builder that parses the field's rules from the pipe grammar
    pub fn parse_field(mut self, name: impl Into<String>, grammar: &str) -> Result<Self, RuleError> {
        self.insert(name, parse_rules(grammar)?);
        Ok(self)
    }

    /// Set the rules for a field, replacing any earlier declaration but
    /// keeping its position
    pub fn insert(&mut self, name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) {
        let name = name.into();
        let rules: Vec<Rule> = rules.into_iter().collect();

        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, existing)) => *existing = rules,
            None => self.fields.push((name, rules)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[Rule]> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.fields
            .iter()
            .map(|(field, rules)| (field.as_str(), rules.as_slice()))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(field, _)| field.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a spec from JSON
    ///
    /// ```json
    /// {
    ///   "name": "required|minLength:2",
    ///   "budget": ["required", {"type": "minValue", "params": {"min": 500}}],
    ///   "website": [{"type": "url", "message": "Link looks wrong"}]
    /// }
    /// ```
    pub fn from_json(json: &Value) -> Result<Self, RuleError> {
        let Value::Object(map) = json else {
            return Err(RuleError::InvalidSpec {
                found: json_type(json).to_string(),
            });
        };

        let mut spec = RuleSpec::new();
        for (field, rules) in map {
            let rules = match rules {
                Value::String(grammar) => parse_rules(grammar)?,
                Value::Array(items) => items
                    .iter()
                    .map(|item| rule_from_json(field, item))
                    .collect::<Result<Vec<_>, _>>()?
                    .into_iter()
                    .flatten()
                    .collect(),
                other => {
                    return Err(RuleError::InvalidFieldRules {
                        field: field.clone(),
                        found: json_type(other).to_string(),
                    })
                }
            };
            spec.insert(field.clone(), rules);
        }

        Ok(spec)
    }
}

fn rule_from_json(field: &str, item: &Value) -> Result<Vec<Rule>, RuleError> {
    match item {
        Value::String(grammar) => parse_rules(grammar),
        Value::Object(map) => {
            let kind = map
                .get("type")
                .and_then(Value::as_str)
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| RuleError::MissingName {
                    segment: item.to_string(),
                })?;

            let mut rule = Rule::from_parts(RuleKind::from_name(kind.trim()), map.get("params"))?;
            if let Some(message) = map.get("message").and_then(Value::as_str) {
                rule = rule.with_message(message);
            }
            Ok(vec![rule])
        }
        other => Err(RuleError::InvalidFieldRules {
            field: field.to_string(),
            found: json_type(other).to_string(),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<'de> Deserialize<'de> for RuleSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = Value::deserialize(deserializer)?;
        RuleSpec::from_json(&json).map_err(de::Error::custom)
    }
}
