use formwork::{FieldState, FormEngine, LogicalPath, Schema};
use serde_json::json;

fn matching_fields_form() -> FormEngine {
    let schema = Schema::object()
        .field("a", Schema::string())
        .field("b", Schema::string())
        .equal_fields("a", "b");
    FormEngine::new(schema).unwrap()
}

#[test]
fn test_untouched_sibling_stays_silent() {
    // Neither field has been validated; changing `a` alone must not
    // surface the refinement error on `b`
    let mut form = matching_fields_form();

    let outcome = form.set_value(&"a".into(), json!("first"));
    assert!(outcome.success);
    assert!(!form.errors().contains_key(&LogicalPath::new("b")));
    assert_eq!(form.field_state(&"b".into()), FieldState::Untouched);
}

#[test]
fn test_touched_sibling_receives_refinement_error() {
    let mut form = matching_fields_form();

    form.set_value(&"b".into(), json!("original"));
    assert_eq!(form.field_state(&"b".into()), FieldState::ValidatedOk);

    // Now a change to `a` makes the refinement fail, and `b` has been
    // validated once, so the failure is attributable to it
    form.set_value(&"a".into(), json!("different"));
    assert_eq!(
        form.errors().get(&LogicalPath::new("b")),
        Some(&vec!["b must match a".to_string()]),
    );
    assert_eq!(form.field_state(&"b".into()), FieldState::ValidatedError);
}

#[test]
fn test_eligibility_survives_recovery() {
    // The previously-errored set only grows: once validated, a field
    // stays eligible even after recovering
    let mut form = matching_fields_form();

    form.set_value(&"b".into(), json!("same"));
    form.set_value(&"a".into(), json!("same"));
    assert!(form.errors().is_empty());

    form.set_value(&"a".into(), json!("changed"));
    assert!(form.errors().contains_key(&LogicalPath::new("b")));
}

#[test]
fn test_refinement_error_clears_when_fields_agree() {
    let mut form = matching_fields_form();

    form.set_value(&"b".into(), json!("one"));
    form.set_value(&"a".into(), json!("two"));
    assert!(form.errors().contains_key(&LogicalPath::new("b")));

    // Bringing b in line revalidates it and the sweep passes
    form.set_value(&"b".into(), json!("two"));
    assert!(form.errors().is_empty());
}

#[test]
fn test_submit_is_not_debounced() {
    // On submit every failure is recorded, touched or not
    let mut form = matching_fields_form();
    form.set_value(&"a".into(), json!("x"));
    // b untouched and missing

    let report = form.validate_visible();
    assert!(!report.success);
    assert!(report.errors.contains_key(&LogicalPath::new("b")));
}

#[test]
fn test_field_error_takes_precedence_over_refinement() {
    let schema = Schema::object()
        .field("password", Schema::string().min_len(8))
        .field("confirm", Schema::string())
        .equal_fields("password", "confirm");
    let mut form = FormEngine::new(schema).unwrap();

    form.set_value(&"confirm".into(), json!("abc"));
    let outcome = form.set_value(&"password".into(), json!("short"));

    // The field's own failure is reported; the refinement never ran
    // because field validation did not pass
    assert!(!outcome.success);
    assert_eq!(
        form.errors().get(&LogicalPath::new("password")).map(Vec::len),
        Some(1),
    );
}

#[test]
fn test_hidden_unrelated_field_keeps_rule_live() {
    let schema = Schema::object()
        .field("a", Schema::string())
        .field("b", Schema::string())
        .field("age", Schema::number().min(18.0))
        .equal_fields("a", "b");
    let mut form = FormEngine::new(schema).unwrap();
    form.set_visible(&"age".into(), false);

    form.set_value(&"b".into(), json!("one"));
    form.set_value(&"a".into(), json!("two"));

    // The hidden field does not block the sweep, and the rule still fires
    assert!(form.errors().contains_key(&LogicalPath::new("b")));
    assert!(!form.errors().contains_key(&LogicalPath::new("age")));
}
