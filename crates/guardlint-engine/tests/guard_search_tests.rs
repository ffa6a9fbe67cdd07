//! Tests for ancestor-chain guard recognition.
use guardlint_engine::builtin_rules::{emit_after_await, unconstrained_text_in_row};
use guardlint_engine::{AnalysisContext, GuardKind, GuardSearch, NoTypeInfo, RuleDeclaration};
use guardlint_parser::{NodeIndex, ParserState};

/// Guard kind protecting the first `operation` call of `source`.
fn guard_for(source: &str, operation: &str, rule: &RuleDeclaration) -> Option<GuardKind> {
    let mut parser = ParserState::new("guard.ts".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        parser.get_diagnostics()
    );
    let arena = parser.into_arena();
    let ctx = AnalysisContext::new(&arena, root, "guard.ts", &NoTypeInfo);
    let site = (0..arena.len() as u32)
        .filter_map(|i| ctx.call_site(NodeIndex(i)))
        .filter(|site| site.name == operation)
        .min_by_key(|site| arena.get(site.node).map_or(u32::MAX, |n| n.pos))
        .expect("call site");
    GuardSearch::new(&ctx)
        .find_guard(&site, &rule.guard)
        .map(|found| found.kind)
}

fn emit_guard(source: &str) -> Option<GuardKind> {
    guard_for(source, "emit", &emit_after_await())
}

#[test]
fn test_direct_if() {
    let source = "async function f() { await x(); if (!isClosed) { emit(1); } }";
    assert_eq!(emit_guard(source), Some(GuardKind::DirectIf));
}

#[test]
fn test_direct_if_else_branch() {
    let source = "function f() { if (this.isClosed) { log(); } else { emit(1); } }";
    assert_eq!(emit_guard(source), Some(GuardKind::DirectIf));
}

#[test]
fn test_then_branch_of_denying_if_is_unguarded() {
    assert_eq!(emit_guard("function f() { if (isClosed) { emit(1); } }"), None);
}

#[test]
fn test_top_level_guard() {
    assert_eq!(emit_guard("if (!isClosed) emit(1);"), Some(GuardKind::DirectIf));
}

#[test]
fn test_early_return_shapes() {
    for exit in ["return;", "{ log(); return; }", "throw err;", "{ return 1; }"] {
        let source = format!("function f() {{ if (isClosed) {exit}\nemit(1); }}");
        assert_eq!(emit_guard(&source), Some(GuardKind::EarlyReturn), "{source}");
    }
}

#[test]
fn test_early_exit_inside_loop() {
    let source = "function f() { for (const x of xs) { if (isClosed) break; emit(x); } }";
    assert_eq!(emit_guard(source), Some(GuardKind::EarlyReturn));
    let source = "function f() { while (go) { if (isClosed) continue; emit(1); } }";
    assert_eq!(emit_guard(source), Some(GuardKind::EarlyReturn));
}

#[test]
fn test_early_return_only_in_nearest_block() {
    let source = "function f() { if (isClosed) return;\nfor (const x of xs) { emit(x); } }";
    assert_eq!(emit_guard(source), None);
    let source = "function f() { if (isClosed) return;\nif (ready) { emit(1); } }";
    assert_eq!(emit_guard(source), None);
    let source = "function f() { if (ready) { if (isClosed) return; emit(1); } }";
    assert_eq!(emit_guard(source), Some(GuardKind::EarlyReturn));
}

#[test]
fn test_early_return_through_else_branch() {
    let source = "function f() { if (!isClosed) { log(); } else { return; }\nemit(1); }";
    assert_eq!(emit_guard(source), Some(GuardKind::EarlyReturn));
}

#[test]
fn test_early_return_after_the_call_does_not_count() {
    assert_eq!(emit_guard("function f() { emit(1); if (isClosed) return; }"), None);
}

#[test]
fn test_non_exiting_if_does_not_count() {
    assert_eq!(emit_guard("function f() { if (isClosed) { log(); }\nemit(1); }"), None);
}

#[test]
fn test_ternary_polarity() {
    assert_eq!(emit_guard("!isClosed ? emit(1) : null;"), Some(GuardKind::Conditional));
    assert_eq!(emit_guard("isClosed ? null : emit(1);"), Some(GuardKind::Conditional));
    assert_eq!(emit_guard("isClosed ? emit(1) : null;"), None);
}

#[test]
fn test_short_circuit_forms() {
    assert_eq!(emit_guard("!isClosed && emit(1);"), Some(GuardKind::Conditional));
    assert_eq!(emit_guard("isClosed || emit(1);"), Some(GuardKind::Conditional));
    assert_eq!(emit_guard("isClosed && emit(1);"), None);
    assert_eq!(emit_guard("emit(1) && !isClosed;"), None);
}

#[test]
fn test_guard_inside_continuation_callback() {
    let source = "function f() { x.then((_) => { if (!isClosed) { emit(1); } }); }";
    assert_eq!(emit_guard(source), Some(GuardKind::NestedCallback));
    let source = "function f() { x.whenComplete(() => !isClosed ? emit(1) : null); }";
    assert_eq!(emit_guard(source), Some(GuardKind::NestedCallback));
}

#[test]
fn test_outer_guard_does_not_reach_into_callback() {
    let source = "function f() { if (!isClosed) { x.then((_) => emit(1)); } }";
    assert_eq!(emit_guard(source), None);
    let source = "function f() { if (isClosed) return;\nx.catchError(function (e) { emit(e); }); }";
    assert_eq!(emit_guard(source), None);
}

#[test]
fn test_search_stops_at_any_function_boundary() {
    let source = "function f() { if (!isClosed) { items.forEach((i) => emit(i)); } }";
    assert_eq!(emit_guard(source), None);
}

#[test]
fn test_wrapper_guard() {
    let rule = unconstrained_text_in_row();
    let wrapped = "Row({ children: [Expanded(Text('a'))] });";
    assert_eq!(guard_for(wrapped, "Text", &rule), Some(GuardKind::Wrapper));
    let named = "Row({ children: [Flexible({ child: Text('a') })] });";
    assert_eq!(guard_for(named, "Text", &rule), Some(GuardKind::Wrapper));
    let bare = "Row({ children: [Text('a')] });";
    assert_eq!(guard_for(bare, "Text", &rule), None);
}

#[test]
fn test_wrapper_outside_the_slot_does_not_count() {
    let rule = unconstrained_text_in_row();
    let source = "Expanded(Row({ children: [Text('a')] }));";
    assert_eq!(guard_for(source, "Text", &rule), None);
}
