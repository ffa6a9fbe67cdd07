use super::*;

#[test]
fn test_format_message_replaces_positional_args() {
    let text = format_message("'{0}' is called on '{1}' after '{0}'", &["emit", "this"]);
    assert_eq!(text, "'emit' is called on 'this' after 'emit'");
}

#[test]
fn test_warning_defaults() {
    let diag = Diagnostic::warning("a.ts", 10, 5, "emit-after-await", "message");
    assert_eq!(diag.category, DiagnosticCategory::Warning);
    assert_eq!(diag.end(), 15);
    assert!(diag.correction.is_none());
}

#[test]
fn test_builder_methods() {
    let diag = Diagnostic::warning("a.ts", 0, 1, "r", "m")
        .with_correction("wrap it")
        .with_category(DiagnosticCategory::Error);
    assert_eq!(diag.correction.as_deref(), Some("wrap it"));
    assert_eq!(diag.category.as_str(), "error");
}

#[test]
fn test_serializes_camel_case_and_skips_missing_correction() {
    let diag = Diagnostic::warning("a.ts", 3, 4, "rule", "msg");
    let json = serde_json::to_value(&diag).unwrap();
    assert_eq!(json["ruleId"], "rule");
    assert_eq!(json["messageText"], "msg");
    assert_eq!(json["category"], "warning");
    assert!(json.get("correction").is_none());
}
