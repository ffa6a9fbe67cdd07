use std::path::Path;

use guardlint_common::DiagnosticCategory;
use guardlint_engine::builtin_rules::{
    ADD_TO_CLOSED_CONTROLLER, EMIT_AFTER_AWAIT, SET_STATE_AFTER_AWAIT, UNCONSTRAINED_TEXT_IN_ROW,
};

use super::config::{FileMatcher, GuardlintConfig, RuleSetting};

fn ids(config: &GuardlintConfig) -> Vec<String> {
    config
        .active_rules()
        .expect("valid rules")
        .into_iter()
        .map(|r| r.id)
        .collect()
}

#[test]
fn empty_config_enables_builtins() {
    let config = GuardlintConfig::parse("{}").expect("empty config");
    assert_eq!(
        ids(&config),
        vec![
            EMIT_AFTER_AWAIT,
            ADD_TO_CLOSED_CONTROLLER,
            SET_STATE_AFTER_AWAIT,
            UNCONSTRAINED_TEXT_IN_ROW
        ]
    );
}

#[test]
fn rule_settings_disable_and_override_severity() {
    let config = GuardlintConfig::parse(
        r#"{ "rules": { "unconstrained-text-in-row": "off", "emit-after-await": "error" } }"#,
    )
    .expect("config");
    assert_eq!(config.rules.get(EMIT_AFTER_AWAIT), Some(&RuleSetting::Error));

    let rules = config.active_rules().expect("rules");
    assert_eq!(rules.len(), 3);
    assert!(rules.iter().all(|r| r.id != UNCONSTRAINED_TEXT_IN_ROW));
    let emit = rules.iter().find(|r| r.id == EMIT_AFTER_AWAIT).expect("emit rule");
    assert_eq!(emit.category, DiagnosticCategory::Error);
}

#[test]
fn extra_rules_are_appended_and_configurable() {
    let config = GuardlintConfig::parse(
        r#"{
            "rules": { "dispose-after-await": "error" },
            "extraRules": [{
                "id": "dispose-after-await",
                "message": "'{0}' after await; check '{1}'.",
                "matcher": { "operations": ["dispose"], "receiver": { "kind": "this" },
                             "applicability": { "kind": "afterSuspension" } },
                "guard": { "kind": "condition", "predicates": [{ "name": "isDisposed", "safeWhen": false }] }
            }]
        }"#,
    )
    .expect("config");
    let rules = config.active_rules().expect("rules");
    let last = rules.last().expect("extra rule");
    assert_eq!(last.id, "dispose-after-await");
    assert_eq!(last.category, DiagnosticCategory::Error);
}

#[test]
fn unknown_rule_setting_is_an_error() {
    let config = GuardlintConfig::parse(r#"{ "rules": { "no-such-rule": "warning" } }"#)
        .expect("config parses");
    let err = config.active_rules().expect_err("unknown rule");
    assert!(err.to_string().contains("no-such-rule"));
}

#[test]
fn duplicate_rule_id_is_an_error() {
    let config = GuardlintConfig::parse(
        r#"{ "extraRules": [{
            "id": "emit-after-await", "message": "m",
            "matcher": { "operations": ["emit"] },
            "guard": { "kind": "wrapper", "wrappers": ["W"], "preferred": "W" }
        }] }"#,
    )
    .expect("config parses");
    assert!(config.active_rules().is_err());
}

#[test]
fn rejects_unknown_fields_and_settings() {
    assert!(GuardlintConfig::parse(r#"{ "rule": {} }"#).is_err());
    assert!(GuardlintConfig::parse(r#"{ "rules": { "emit-after-await": "loud" } }"#).is_err());
}

#[test]
fn file_matcher_excludes_win() {
    let matcher = FileMatcher::new(
        &["lib/**/*.ts".to_string()],
        &["**/generated/**".to_string()],
    )
    .expect("globs");
    assert!(matcher.is_included(Path::new("lib/bloc/counter.ts")));
    assert!(!matcher.is_included(Path::new("lib/generated/api.ts")));
    assert!(!matcher.is_included(Path::new("test/counter.ts")));

    let everything = FileMatcher::new(&[], &[]).expect("no globs");
    assert!(everything.is_included(Path::new("anywhere/file.ts")));
}

#[test]
fn invalid_glob_is_reported() {
    assert!(FileMatcher::new(&["lib/[".to_string()], &[]).is_err());
}
