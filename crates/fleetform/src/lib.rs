// Fleetform - declarative validation for forms and request payloads
// Rule catalog, validator, form binding and API-boundary helpers

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod form_field;
pub mod validation;
pub mod value;

// Re-export core types
pub use api::{
    escape_html, parse_form_body, sanitize, sanitize_str, validate_date_range, validate_email,
    validate_phone, validate_request, ApiValidator, DateRange,
};
pub use config::{Config, FormConfig};
pub use error::{RuleError, ValidationError};
pub use form::{
    FieldPresenter, FormDriver, FormEvent, FormHost, FormSignal, FormValidator, HtmlPresenter,
    MemoryForm, NoopPresenter, SubmitOutcome,
};
pub use form_field::FieldAttrs;
pub use validation::{
    evaluate, Clock, ErrorMap, FixedClock, Rule, RuleCatalog, RuleKind, RuleSpec, SystemClock,
    Validator,
};

// Predicates, for callers that want them without a catalog
pub use fleetform_rules as rules;
