//! Tests for rule evaluation over whole files.
use guardlint_common::{Diagnostic, DiagnosticCategory};
use guardlint_engine::builtin_rules::{
    ADD_TO_CLOSED_CONTROLLER, EMIT_AFTER_AWAIT, add_to_closed_controller, emit_after_await,
    set_state_after_await, unconstrained_text_in_row,
};
use guardlint_engine::{
    AnalysisContext, RuleDeclaration, TypeOracle, builtin_rules, evaluate, evaluate_all,
};
use guardlint_parser::{DeclaredTypeResolver, NodeIndex, ParserState};

fn lint(source: &str, rules: &[RuleDeclaration]) -> Vec<Diagnostic> {
    let mut parser = ParserState::new("lint.ts".to_string(), source.to_string());
    let root = parser.parse_source_file();
    let arena = parser.into_arena();
    let types = DeclaredTypeResolver::new(&arena);
    let ctx = AnalysisContext::new(&arena, root, "lint.ts", &types);
    evaluate_all(&ctx, rules)
}

fn flagged<'s>(source: &'s str, diagnostics: &[Diagnostic]) -> Vec<&'s str> {
    diagnostics
        .iter()
        .map(|d| &source[d.start as usize..d.end() as usize])
        .collect()
}

// =============================================================================
// Suspension-guard family
// =============================================================================

#[test]
fn test_unguarded_call_after_await() {
    let source = "class Counter {\n  async load() {\n    await fetch();\n    emit(1);\n  }\n}\n";
    let diagnostics = lint(source, &[emit_after_await()]);
    assert_eq!(flagged(source, &diagnostics), vec!["emit(1)"]);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.rule_id, EMIT_AFTER_AWAIT);
    assert_eq!(diagnostic.file, "lint.ts");
    assert_eq!(diagnostic.category, DiagnosticCategory::Warning);
    assert_eq!(
        diagnostic.message_text,
        "'emit' may run after the bloc is closed; check '!isClosed' first."
    );
    assert_eq!(
        diagnostic.correction.as_deref(),
        Some("Wrap the call in 'if (!isClosed)'.")
    );
}

#[test]
fn test_direct_guard_suppresses() {
    let source = "async function f() { await fetch(); if (!isClosed) { emit(1); } }";
    assert!(lint(source, &[emit_after_await()]).is_empty());
}

#[test]
fn test_bare_predicate_name_reads_as_this_member() {
    // No scope lookup: a local named like the predicate still guards.
    let source = "async function f() { await fetch(); const isClosed = false; if (!isClosed) { emit(1); } }";
    assert!(lint(source, &[emit_after_await()]).is_empty());
    let source =
        "class C { async f() { await fetch(); const isClosed = false; if (!isClosed) this.emit(1); } }";
    assert!(lint(source, &[emit_after_await()]).is_empty());
}

#[test]
fn test_early_return_suppresses() {
    let source = "async function f() { await fetch(); if (isClosed) return; emit(1); }";
    assert!(lint(source, &[emit_after_await()]).is_empty());
}

#[test]
fn test_ternary_suppresses() {
    let source = "async function f() { await fetch(); !this.isClosed ? this.emit(1) : null; }";
    assert!(lint(source, &[emit_after_await()]).is_empty());

    let source = r#"
class Bloc {
  controller: StreamController<int>;
  push() { this.controller.isOpen ? this.controller.add(1) : null; }
}
"#;
    assert!(lint(source, &[add_to_closed_controller()]).is_empty());
}

#[test]
fn test_call_before_first_suspension_is_not_flagged() {
    let source = "async function f() { emit(1); await fetch(); }";
    assert!(lint(source, &[emit_after_await()]).is_empty());
    let source = "async function f() { await emit(1); }";
    assert!(lint(source, &[emit_after_await()]).is_empty());
}

#[test]
fn test_other_receivers_are_not_matched() {
    let source = "async function f() { await fetch(); bus.emit(1); this.emit(2); }";
    let diagnostics = lint(source, &[emit_after_await()]);
    assert_eq!(flagged(source, &diagnostics), vec!["this.emit(2)"]);
}

#[test]
fn test_continuation_callback_counts_as_after_suspension() {
    let source = "function f() { load().then((_) => { emit(1); }); }";
    assert_eq!(lint(source, &[emit_after_await()]).len(), 1);
    let source = "function f() { load().then((_) => { if (isClosed) return; emit(1); }); }";
    assert!(lint(source, &[emit_after_await()]).is_empty());
}

#[test]
fn test_suspension_in_outer_function_reaches_plain_closures() {
    let source = "async function f() { await fetch(); items.forEach((i) => emit(i)); }";
    assert_eq!(lint(source, &[emit_after_await()]).len(), 1);
    let source = "async function f() { items.forEach((i) => emit(i)); await fetch(); }";
    assert!(lint(source, &[emit_after_await()]).is_empty());
}

#[test]
fn test_suspension_in_nested_function_does_not_leak_out() {
    let source = "function f() { const g = async () => { await fetch(); }; emit(1); }";
    assert!(lint(source, &[emit_after_await()]).is_empty());
}

#[test]
fn test_yield_is_a_suspension_point() {
    let source = "function* f() { yield 1; setState(update); }";
    assert_eq!(lint(source, &[set_state_after_await()]).len(), 1);
}

#[test]
fn test_set_state_guarded_by_mounted() {
    let source = r#"
class PageState {
  async refresh() {
    const data = await load();
    if (!this.mounted) return;
    setState(() => { this.data = data; });
  }
}
"#;
    assert!(lint(source, &[set_state_after_await()]).is_empty());
}

// =============================================================================
// Typed receivers
// =============================================================================

#[test]
fn test_typed_receiver_rule() {
    let source = r#"
class Bloc {
  controller: StreamController<int>;
  items: List<int>;
  push(sink: EventSink) {
    this.controller.add(1);
    this.items.add(2);
    other.add(3);
    sink.addError(err);
  }
}
"#;
    let diagnostics = lint(source, &[add_to_closed_controller()]);
    assert_eq!(
        flagged(source, &diagnostics),
        vec!["this.controller.add(1)", "sink.addError(err)"]
    );
    assert!(diagnostics.iter().all(|d| d.rule_id == ADD_TO_CLOSED_CONTROLLER));
    assert!(diagnostics[0].message_text.contains("'!this.controller.isClosed'"));
}

#[test]
fn test_guard_on_one_receiver_never_covers_another() {
    let source = r#"
function f(a: StreamController, b: StreamController, c: StreamController) {
  if (a.isOpen && b.isOpen) {
    a.add(1);
    b.add(2);
    c.add(3);
  }
}
"#;
    let diagnostics = lint(source, &[add_to_closed_controller()]);
    assert_eq!(flagged(source, &diagnostics), vec!["c.add(3)"]);
}

// =============================================================================
// UI-composition family
// =============================================================================

#[test]
fn test_leaf_directly_in_row_is_flagged() {
    let source = "build() { return Row({ children: [Icon(star), Text('title')] }); }";
    let source = format!("class Tile {{ {source} }}");
    let diagnostics = lint(&source, &[unconstrained_text_in_row()]);
    assert_eq!(flagged(&source, &diagnostics), vec!["Text('title')"]);
    assert_eq!(
        diagnostics[0].message_text,
        "'Text' in a Row has no width constraint; wrap it in 'Expanded'."
    );
}

#[test]
fn test_wrapped_leaf_is_not_flagged() {
    let source = "Row({ children: [Expanded(Text('a')), Flexible({ child: new RichText(span) })] });";
    assert!(lint(source, &[unconstrained_text_in_row()]).is_empty());
}

#[test]
fn test_leaf_outside_a_row_is_not_flagged() {
    let source = "Column({ children: [Text('a')] });\nRow({ children: [Column({ children: [Text('b')] })] });\nText('c');";
    assert!(lint(source, &[unconstrained_text_in_row()]).is_empty());
}

#[test]
fn test_intermediate_widget_does_not_constrain() {
    let source = "Row({ children: [Padding({ padding: p, child: Text('a') })] });";
    assert_eq!(lint(source, &[unconstrained_text_in_row()]).len(), 1);
}

// =============================================================================
// Evaluation order and isolation
// =============================================================================

#[test]
fn test_document_order_and_single_report_per_site() {
    let source = "async function f() { await x(); emit(1); emit(2); }";
    let arena_source = source.to_string();
    let mut parser = ParserState::new("order.ts".to_string(), arena_source);
    let root = parser.parse_source_file();
    let arena = parser.into_arena();
    let types = DeclaredTypeResolver::new(&arena);
    let ctx = AnalysisContext::new(&arena, root, "order.ts", &types);
    let diagnostics = evaluate(&ctx, &emit_after_await());
    assert_eq!(flagged(source, &diagnostics), vec!["emit(1)", "emit(2)"]);

    let duplicated = vec![emit_after_await(), emit_after_await()];
    assert_eq!(evaluate_all(&ctx, &duplicated).len(), 2);
}

#[test]
fn test_evaluate_all_sorts_by_offset_then_rule() {
    let source = r#"
class Bloc {
  controller: StreamController<int>;
  async load() {
    await fetch();
    this.controller.add(1);
    emit(2);
  }
  build() { return Row({ children: [Text('a')] }); }
}
"#;
    let diagnostics = lint(source, &builtin_rules());
    let starts: Vec<u32> = diagnostics.iter().map(|d| d.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
    assert_eq!(diagnostics.len(), 3);
}

struct PanickingOracle;

impl TypeOracle for PanickingOracle {
    fn static_type_name(&self, _expr: NodeIndex) -> Option<&str> {
        panic!("type oracle failure");
    }
}

#[test]
fn test_panicking_rule_does_not_stop_others() {
    let source = "async function f(c: StreamController) { await x(); c.add(1); emit(2); }";
    let mut parser = ParserState::new("panic.ts".to_string(), source.to_string());
    let root = parser.parse_source_file();
    let arena = parser.into_arena();
    let ctx = AnalysisContext::new(&arena, root, "panic.ts", &PanickingOracle);
    let diagnostics = evaluate_all(&ctx, &[add_to_closed_controller(), emit_after_await()]);
    assert_eq!(flagged(source, &diagnostics), vec!["emit(2)"]);
}

#[test]
fn test_recovered_tree_is_still_linted() {
    let source = "async function f() { await x(); emit(1); ) }\n";
    let mut parser = ParserState::new("broken.ts".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(!parser.get_diagnostics().is_empty());
    let arena = parser.into_arena();
    let types = DeclaredTypeResolver::new(&arena);
    let ctx = AnalysisContext::new(&arena, root, "broken.ts", &types);
    assert_eq!(evaluate(&ctx, &emit_after_await()).len(), 1);
}

#[test]
fn test_category_comes_from_the_rule() {
    let mut rule = emit_after_await();
    rule.category = DiagnosticCategory::Error;
    let source = "async function f() { await x(); emit(1); }";
    let diagnostics = lint(source, &[rule]);
    assert_eq!(diagnostics[0].category, DiagnosticCategory::Error);
}
