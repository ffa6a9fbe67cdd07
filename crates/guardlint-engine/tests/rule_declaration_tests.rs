//! Tests for the serde shape of rule declarations.
use guardlint_common::DiagnosticCategory;
use guardlint_engine::builtin_rules::{
    ADD_TO_CLOSED_CONTROLLER, EMIT_AFTER_AWAIT, SET_STATE_AFTER_AWAIT, UNCONSTRAINED_TEXT_IN_ROW,
};
use guardlint_engine::{
    Applicability, GuardSpec, Predicate, ReceiverRequirement, RuleDeclaration, builtin_rules,
};
use serde_json::json;

#[test]
fn test_minimal_declaration_uses_defaults() {
    let text = r#"[{
        "id": "dispose-after-await",
        "message": "'{0}' after await; check '{1}'.",
        "matcher": { "operations": ["dispose"] },
        "guard": { "kind": "condition", "predicates": [{ "name": "isDisposed", "safeWhen": false }] }
    }]"#;
    let rules = RuleDeclaration::list_from_json(text).expect("valid rules");
    assert_eq!(rules.len(), 1);
    let rule = &rules[0];
    assert_eq!(rule.description, "");
    assert_eq!(rule.correction, None);
    assert_eq!(rule.category, DiagnosticCategory::Warning);
    assert_eq!(rule.matcher.receiver, ReceiverRequirement::Any);
    assert_eq!(rule.matcher.applicability, Applicability::Always);
    assert_eq!(
        rule.guard,
        GuardSpec::Condition {
            predicates: vec![Predicate::new("isDisposed", false)]
        }
    );
}

#[test]
fn test_tagged_kinds() {
    let text = r#"[{
        "id": "leaf-in-column",
        "message": "m",
        "correction": "c",
        "category": "error",
        "matcher": {
            "operations": ["Image"],
            "receiver": { "kind": "unqualified" },
            "applicability": { "kind": "containerSlot", "containers": ["Column"], "slot": "children" }
        },
        "guard": { "kind": "wrapper", "wrappers": ["Expanded"], "preferred": "Expanded" }
    }, {
        "id": "typed",
        "message": "m",
        "matcher": {
            "operations": ["add"],
            "receiver": { "kind": "typed", "types": ["Sink"] },
            "applicability": { "kind": "asyncFunction" }
        },
        "guard": { "kind": "condition", "predicates": [] }
    }]"#;
    let rules = RuleDeclaration::list_from_json(text).expect("valid rules");
    assert_eq!(rules[0].category, DiagnosticCategory::Error);
    assert_eq!(rules[0].correction.as_deref(), Some("c"));
    assert_eq!(rules[0].matcher.receiver, ReceiverRequirement::Unqualified);
    assert_eq!(
        rules[0].matcher.applicability,
        Applicability::ContainerSlot {
            containers: vec!["Column".to_string()],
            slot: "children".to_string()
        }
    );
    assert!(matches!(&rules[0].guard, GuardSpec::Wrapper { preferred, .. } if preferred == "Expanded"));
    assert_eq!(
        rules[1].matcher.receiver,
        ReceiverRequirement::Typed {
            types: vec!["Sink".to_string()]
        }
    );
    assert_eq!(rules[1].matcher.applicability, Applicability::AsyncFunction);
}

#[test]
fn test_unknown_kind_is_rejected() {
    let text = r#"[{
        "id": "x",
        "message": "m",
        "matcher": { "operations": ["a"], "receiver": { "kind": "sometimes" } },
        "guard": { "kind": "wrapper", "wrappers": [], "preferred": "W" }
    }]"#;
    assert!(RuleDeclaration::list_from_json(text).is_err());
}

#[test]
fn test_serialized_shape() {
    let value = serde_json::to_value(builtin_rules::emit_after_await()).expect("serialize");
    assert_eq!(value["id"], json!(EMIT_AFTER_AWAIT));
    assert_eq!(value["category"], json!("warning"));
    assert_eq!(
        value["matcher"],
        json!({
            "operations": ["emit"],
            "receiver": { "kind": "this" },
            "applicability": { "kind": "afterSuspension" }
        })
    );
    assert_eq!(
        value["guard"],
        json!({ "kind": "condition", "predicates": [{ "name": "isClosed", "safeWhen": false }] })
    );
}

#[test]
fn test_builtin_rules_survive_json() {
    let rules = builtin_rules::builtin_rules();
    let text = serde_json::to_string(&rules).expect("serialize");
    assert_eq!(RuleDeclaration::list_from_json(&text).expect("parse"), rules);
    let ids: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            EMIT_AFTER_AWAIT,
            ADD_TO_CLOSED_CONTROLLER,
            SET_STATE_AFTER_AWAIT,
            UNCONSTRAINED_TEXT_IN_ROW
        ]
    );
}
