use fleetform::form::{FieldMarker, FieldPresenter, FormHost, HtmlPresenter, MemoryForm};
use fleetform::{FieldAttrs, FormConfig, FormValidator, SubmitOutcome};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;

/// Presenter that records every call it receives
#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<String>,
}

impl Recorder {
    fn validations(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| c.starts_with("valid:") || c.starts_with("invalid:"))
            .count()
    }
}

impl FieldPresenter for Recorder {
    fn mark_valid(&mut self, field: &str) {
        self.calls.push(format!("valid:{}", field));
    }

    fn mark_invalid(&mut self, field: &str, message: &str) {
        self.calls.push(format!("invalid:{}:{}", field, message));
    }

    fn clear(&mut self, field: &str) {
        self.calls.push(format!("clear:{}", field));
    }

    fn focus(&mut self, field: &str) {
        self.calls.push(format!("focus:{}", field));
    }
}

fn contact_form() -> MemoryForm {
    MemoryForm::new()
        .field("name", FieldAttrs::new().required().attr("minlength", "2"))
        .field("email", FieldAttrs::new().required().input_type("email"))
        .field("phone", FieldAttrs::new().input_type("tel"))
        .field("message", FieldAttrs::new().validate("required|maxLength:20"))
}

#[test]
fn test_rapid_input_validates_once_with_final_value() {
    let mut form = FormValidator::new(contact_form(), Recorder::default());
    let t0 = Instant::now();

    let typed = "ann@example.com";
    for i in 0..10 {
        let partial = &typed[..typed.len() - 9 + i];
        let at = t0 + Duration::from_millis(50 * i as u64);
        assert!(form.on_input("email", json!(partial), at).is_some());
        assert!(form.poll_due(at).is_empty());
    }

    let last = t0 + Duration::from_millis(450);
    assert_eq!(form.next_deadline(), Some(last + Duration::from_millis(500)));
    assert!(form.poll_due(last + Duration::from_millis(499)).is_empty());

    let fired = form.poll_due(last + Duration::from_millis(500));
    assert_eq!(fired, vec![("email".to_string(), true)]);
    assert_eq!(form.presenter().validations(), 1);
    assert_eq!(form.form().value("email"), Some(json!("ann@example.com")));
    assert_eq!(form.next_deadline(), None);
}

#[test]
fn test_input_on_plain_text_waits_for_blur() {
    let mut form = FormValidator::new(contact_form(), Recorder::default());
    assert_eq!(form.on_input("name", json!("A"), Instant::now()), None);
    assert_eq!(form.next_deadline(), None);

    assert!(!form.on_blur("name"));
    assert_eq!(form.first_error("name"), Some("Must be at least 2 characters"));
    assert_eq!(
        form.presenter().calls,
        vec!["invalid:name:Must be at least 2 characters"]
    );
}

#[test]
fn test_blur_cancels_pending_timer() {
    let mut form = FormValidator::new(contact_form(), Recorder::default());
    let t0 = Instant::now();
    form.on_input("phone", json!("305-555-1234"), t0);

    assert!(form.on_blur("phone"));
    assert!(form.poll_due(t0 + Duration::from_secs(5)).is_empty());
    assert_eq!(form.presenter().validations(), 1);
}

#[test]
fn test_timer_for_removed_field_is_noop() {
    let mut form = FormValidator::new(contact_form(), Recorder::default());
    let t0 = Instant::now();
    form.on_input("email", json!("not-an-email"), t0);

    assert!(form.form_mut().remove_field("email"));
    assert!(form.poll_due(t0 + Duration::from_secs(1)).is_empty());
    assert_eq!(form.presenter().validations(), 0);
    assert!(form.errors().is_empty());
}

#[test]
fn test_unknown_field_is_valid() {
    let mut form = FormValidator::new(contact_form(), Recorder::default());
    assert!(form.validate_field("nickname"));
    assert!(form.on_blur("nickname"));
    assert_eq!(form.on_input("nickname", json!("x"), Instant::now()), None);
    assert!(form.rules_for("nickname").is_empty());
    assert!(form.presenter().calls.is_empty());
}

#[test]
fn test_submit_failure_focuses_first_invalid_field() {
    let mut form = FormValidator::new(contact_form(), HtmlPresenter::new());
    form.form_mut().set_value("name", json!("Ann"));
    form.form_mut().set_value("phone", json!("12"));

    let SubmitOutcome::Failed(errors) = form.submit() else {
        panic!("expected the submission to fail");
    };
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email", "phone", "message"]);
    assert_eq!(errors.first("email"), Some("This field is required"));
    assert_eq!(errors.first("phone"), Some("Please enter a valid phone number"));

    let presenter = form.presenter();
    assert_eq!(presenter.focused(), Some("email"));
    assert_eq!(presenter.marker("name"), Some(FieldMarker::Valid));
    assert_eq!(presenter.marker("email"), Some(FieldMarker::Invalid));
    assert_eq!(presenter.aria_invalid("email"), "true");
    assert_eq!(presenter.error_count(), 3);

    let node = presenter.error_node("email").unwrap();
    assert!(node.html.contains(r#"role="alert""#));
    assert!(node.html.contains("This field is required"));
}

#[test]
fn test_submit_success_returns_values_in_document_order() {
    let mut form = FormValidator::new(contact_form(), HtmlPresenter::new());
    form.form_mut().set_value("name", json!("Ann"));
    form.form_mut().set_value("email", json!("ann@example.com"));
    form.form_mut().set_value("message", json!("Call me"));

    let SubmitOutcome::Success(values) = form.submit() else {
        panic!("expected the submission to pass");
    };
    assert_eq!(
        values.keys().collect::<Vec<_>>(),
        vec!["name", "email", "phone", "message"]
    );
    assert_eq!(values["email"], json!("ann@example.com"));
    assert_eq!(form.presenter().error_count(), 0);
    assert_eq!(form.presenter().focused(), None);
}

#[test]
fn test_fixing_a_field_replaces_its_error_node() {
    let mut form = FormValidator::new(contact_form(), HtmlPresenter::new());
    form.form_mut().set_value("message", json!("This message is far too long"));
    assert!(!form.on_blur("message"));
    assert_eq!(
        form.presenter().error_node("message").map(|n| n.message.as_str()),
        Some("Must be no more than 20 characters")
    );

    form.form_mut().set_value("message", json!(""));
    assert!(!form.on_blur("message"));
    assert_eq!(
        form.presenter().error_node("message").map(|n| n.message.as_str()),
        Some("This field is required")
    );
    assert_eq!(form.presenter().error_count(), 1);

    form.form_mut().set_value("message", json!("Hello"));
    assert!(form.on_blur("message"));
    assert_eq!(form.presenter().error_node("message"), None);
    assert_eq!(form.presenter().marker("message"), Some(FieldMarker::Valid));
}

#[test]
fn test_reset_clears_presentation_but_keeps_values() {
    let mut form = FormValidator::new(contact_form(), HtmlPresenter::new());
    form.form_mut().set_value("name", json!("A"));
    assert!(!form.submit().is_success());

    form.reset();
    assert!(form.errors().is_empty());
    assert_eq!(form.presenter().error_count(), 0);
    assert_eq!(form.presenter().marker("name"), None);
    assert_eq!(form.form().value("name"), Some(json!("A")));
}

#[test]
fn test_live_types_follow_config() {
    let settings = FormConfig {
        debounce_ms: 200,
        live_types: vec!["text".to_string()],
        focus_first_invalid: false,
    };
    let mut form = FormValidator::with_config(contact_form(), Recorder::default(), settings);
    let t0 = Instant::now();

    assert_eq!(form.on_input("email", json!("a"), t0), None);
    assert_eq!(
        form.on_input("name", json!("A"), t0),
        Some(t0 + Duration::from_millis(200))
    );

    assert!(!form.submit().is_success());
    assert!(!form.presenter().calls.iter().any(|c| c.starts_with("focus:")));
}

#[test]
fn test_dotted_fields_validate_against_nested_bag() {
    let form = MemoryForm::new()
        .field("password", FieldAttrs::new().required())
        .field("account.confirm", FieldAttrs::new().validate("match:password"));
    let mut form = FormValidator::new(form, HtmlPresenter::new());
    form.form_mut().set_value("password", json!("Secret1!"));
    form.form_mut().set_value("account.confirm", json!("Secret2!"));

    assert!(!form.on_blur("account.confirm"));
    assert_eq!(form.first_error("account.confirm"), Some("Must match password"));
    assert_eq!(
        form.data_bag(),
        json!({"password": "Secret1!", "account": {"confirm": "Secret2!"}})
    );
}

#[rstest]
#[case::nested_first(["address.zip", "address"])]
#[case::parent_first(["address", "address.zip"])]
fn test_overlapping_dotted_names_use_their_own_values(#[case] order: [&str; 2]) {
    let mut host = MemoryForm::new();
    for name in order {
        let attrs = match name {
            "address" => FieldAttrs::new().attr("minlength", "5"),
            _ => FieldAttrs::new().required(),
        };
        host.add_field(name, attrs, json!(""));
    }
    let mut form = FormValidator::new(host, Recorder::default());
    form.form_mut().set_value("address.zip", json!("33139"));
    form.form_mut().set_value("address", json!("ab"));

    assert!(form.validate_field("address.zip"));
    assert_eq!(form.first_error("address.zip"), None);

    assert!(!form.validate_field("address"));
    assert_eq!(form.first_error("address"), Some("Must be at least 5 characters"));
}
