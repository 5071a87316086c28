use chrono::{TimeZone, Utc};
use fleetform::validation::FixedClock;
use fleetform::{Rule, RuleCatalog, RuleKind, RuleSpec, Validator};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use std::sync::Arc;

fn messages(data: Value, field: &str, grammar: &str) -> Vec<String> {
    let mut validator = Validator::from_grammar(data, [(field, grammar)]).unwrap();
    validator.validate();
    validator
        .errors()
        .get(field)
        .map(|m| m.to_vec())
        .unwrap_or_default()
}

#[test]
fn test_required_empty_reports_only_required() {
    let errors = messages(json!({"email": ""}), "email", "required|email");
    assert_eq!(errors, vec!["This field is required"]);
}

#[test]
fn test_optional_empty_is_skipped() {
    let mut validator = Validator::from_grammar(json!({"email": ""}), [("email", "email")]).unwrap();
    assert!(validator.validate());
    assert!(!validator.errors().contains("email"));
    assert_eq!(validator.first_error("email"), None);
}

#[test]
fn test_violations_accumulate_in_declared_order() {
    let errors = messages(json!({"code": "AB"}), "code", "minLength:8|pattern:^[a-z]+$");
    assert_eq!(
        errors,
        vec!["Must be at least 8 characters", "Please match the requested format"]
    );
}

#[rstest]
#[case("4532015112830366", true)]
#[case("4532 0151 1283 0366", true)]
#[case("4532015112830367", false)]
fn test_credit_card_rule(#[case] card: &str, #[case] valid: bool) {
    let errors = messages(json!({ "card": card }), "card", "creditCard");
    assert_eq!(errors.is_empty(), valid);
}

#[test]
fn test_dotted_path_resolution() {
    let spec = RuleSpec::new().field("address.zip", [Rule::zip_code()]);
    let mut validator = Validator::new(json!({"address": {"zip": "33139"}}), spec);
    assert!(validator.validate());

    let spec = RuleSpec::new().field("address.zip", [Rule::required()]);
    let mut validator = Validator::new(json!({}), spec);
    assert!(!validator.validate());
    assert_eq!(validator.first_error("address.zip"), Some("This field is required"));
}

#[rstest]
#[case("", Some("This field is required"))]
#[case("ab", Some("Must be at least 3 characters"))]
#[case("abc", None)]
fn test_grammar_round_trip(#[case] value: &str, #[case] expected: Option<&str>) {
    let mut validator =
        Validator::from_grammar(json!({ "name": value }), [("name", "required|minLength:3")])
            .unwrap();
    validator.validate();
    assert_eq!(validator.first_error("name"), expected);
    assert_eq!(validator.errors().get("name").map_or(0, |m| m.len()), expected.iter().count());
}

#[test]
fn test_is_valid_before_validate_is_trivially_true() {
    let mut validator =
        Validator::from_grammar(json!({}), [("name", "required")]).unwrap();
    assert!(validator.is_valid());
    assert!(!validator.is_validated());

    assert!(!validator.validate());
    assert!(validator.is_validated());
    assert!(!validator.is_valid());
}

#[test]
fn test_match_and_custom_rules() {
    let spec = RuleSpec::new()
        .field("confirm", [Rule::matches("password")])
        .field(
            "company",
            [Rule::custom(
                |value, data| data["plan"] != "business" || value.as_str().map_or(false, |s| !s.is_empty()),
                "Company is required for business plans",
            )],
        );

    let data = json!({
        "password": "Secret1!",
        "confirm": "Secret2!",
        "plan": "business",
        "company": ""
    });
    let mut validator = Validator::new(data, spec.clone());
    assert!(!validator.validate());
    assert_eq!(validator.first_error("confirm"), Some("Must match password"));
    assert_eq!(
        validator.first_error("company"),
        Some("Company is required for business plans")
    );

    let data = json!({
        "password": "Secret1!",
        "confirm": "Secret1!",
        "plan": "personal",
        "company": ""
    });
    let mut validator = Validator::new(data, spec);
    assert!(validator.validate());
}

#[test]
fn test_future_and_past_dates_use_injected_clock() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let spec = RuleSpec::new()
        .parse_field("start", "date|futureDate")
        .unwrap()
        .parse_field("born", "pastDate")
        .unwrap();

    let mut validator = Validator::new(json!({"start": "2024-06-02", "born": "1990-01-01"}), spec.clone())
        .with_clock(Arc::new(FixedClock(now)));
    assert!(validator.validate());

    let mut validator = Validator::new(json!({"start": "2024-05-31", "born": "2030-01-01"}), spec)
        .with_clock(Arc::new(FixedClock(now)));
    assert!(!validator.validate());
    assert_eq!(validator.first_error("start"), Some("Date must be in the future"));
    assert_eq!(validator.first_error("born"), Some("Date must be in the past"));
}

#[test]
fn test_numeric_bounds_coerce_strings() {
    let errors = messages(json!({"qty": "12"}), "qty", "minValue:1|maxValue:10");
    assert_eq!(errors, vec!["Must be no more than 10"]);

    let errors = messages(json!({"qty": 0}), "qty", "required|minValue:1");
    assert_eq!(errors, Vec::<String>::new());
}

#[test]
fn test_registered_extension_rule() {
    let catalog = RuleCatalog::standard().register(
        "noFreeEmail",
        |input| !input.text().ends_with("@gmail.com"),
        "{field} must be a company address",
    );
    let spec = RuleSpec::new().parse_field("work_email", "email|noFreeEmail").unwrap();
    catalog.verify(&spec).unwrap();
    assert!(RuleCatalog::standard().verify(&spec).is_err());

    let mut validator = Validator::new(json!({"work_email": "ann@gmail.com"}), spec)
        .with_catalog(Arc::new(catalog));
    assert!(!validator.validate());
    assert_eq!(
        validator.first_error("work_email"),
        Some("work_email must be a company address")
    );
}

#[test]
fn test_unknown_rule_is_skipped() {
    let errors = messages(json!({"name": "x"}), "name", "noSuchRule|minLength:2");
    assert_eq!(errors, vec!["Must be at least 2 characters"]);
}

#[test]
fn test_spec_from_json() {
    let spec: RuleSpec = serde_json::from_value(json!({
        "name": "required|maxLength:5",
        "age": [{"type": "minValue", "params": {"min": 18}, "message": "Adults only"}]
    }))
    .unwrap();
    assert_eq!(spec.get("age").unwrap()[0].kind(), &RuleKind::MinValue);

    let mut validator = Validator::new(json!({"name": "Alexander", "age": 16}), spec);
    validator.validate();
    assert_eq!(validator.first_error("name"), Some("Must be no more than 5 characters"));
    assert_eq!(validator.first_error("age"), Some("Adults only"));
}

#[test]
fn test_malformed_grammar_is_an_error() {
    assert!(Validator::from_grammar(json!({}), [("name", "minLength:abc")]).is_err());
    assert!(Validator::from_grammar(json!({}), [("name", "pattern:[")]).is_err());
}
