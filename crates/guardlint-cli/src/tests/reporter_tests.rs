use guardlint_common::{Diagnostic, DiagnosticCategory};
use guardlint_engine::{Fix, TextEdit};

use super::reporter::Reporter;

const SOURCE: &str = "async function f() {\n  await x();\n  emit(1);\n}\n";

fn emit_diagnostic() -> Diagnostic {
    Diagnostic::warning(
        "lib/bloc.ts",
        36,
        7,
        "emit-after-await",
        "'emit' may run after the bloc is closed; check '!isClosed' first.",
    )
    .with_correction("Wrap the call in 'if (!isClosed)'.")
}

fn reporter() -> Reporter {
    let mut reporter = Reporter::new(false);
    reporter.add_source("lib/bloc.ts", SOURCE);
    reporter
}

#[test]
fn formats_location_severity_and_rule() {
    assert_eq!(&SOURCE[36..43], "emit(1)");
    let output = reporter().format_diagnostic(&emit_diagnostic());
    let mut lines = output.lines();
    assert_eq!(
        lines.next(),
        Some(
            "lib/bloc.ts:3:3 - warning emit-after-await: 'emit' may run after the bloc is closed; check '!isClosed' first."
        )
    );
    assert_eq!(lines.next(), Some("    3     emit(1);"));
    assert_eq!(lines.next(), Some("          ~~~~~~~"));
    assert_eq!(
        lines.next(),
        Some("       hint: Wrap the call in 'if (!isClosed)'.")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn error_category_label() {
    let diagnostic = emit_diagnostic().with_category(DiagnosticCategory::Error);
    let output = reporter().format_diagnostic(&diagnostic);
    assert!(output.starts_with("lib/bloc.ts:3:3 - error emit-after-await:"));
}

#[test]
fn unknown_file_has_no_position() {
    let mut diagnostic = emit_diagnostic();
    diagnostic.file = "other.ts".to_string();
    let output = reporter().format_diagnostic(&diagnostic);
    assert!(output.starts_with("other.ts - warning emit-after-await:"));
}

#[test]
fn json_output_carries_position_and_fix() {
    let fix = Fix {
        rule_id: "emit-after-await".to_string(),
        description: "Wrap the call in 'if (!isClosed)'.".to_string(),
        edits: vec![TextEdit::new(34, 8, "if (!isClosed) {\n    emit(1);\n  }")],
    };
    let text = reporter()
        .render_json(&[emit_diagnostic()], &[Some(fix)])
        .expect("json");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    let entry = &value[0];
    assert_eq!(entry["file"], "lib/bloc.ts");
    assert_eq!(entry["ruleId"], "emit-after-await");
    assert_eq!(entry["category"], "warning");
    assert_eq!(entry["line"], 3);
    assert_eq!(entry["column"], 3);
    assert_eq!(entry["fix"]["edits"][0]["start"], 34);
    assert_eq!(entry["fix"]["edits"][0]["length"], 8);
}

#[test]
fn json_output_omits_missing_fix() {
    let text = reporter()
        .render_json(&[emit_diagnostic()], &[None])
        .expect("json");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert!(value[0].get("fix").is_none());
}
