//! Tests for declared-type lookup of call receivers.
use guardlint_parser::parser::node::NodeArena;
use guardlint_parser::{DeclaredTypeResolver, NodeIndex, ParserState, syntax_kind_ext};

fn parse(source: &str) -> NodeArena {
    let mut parser = ParserState::new("types.ts".to_string(), source.to_string());
    parser.parse_source_file();
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        parser.get_diagnostics()
    );
    parser.into_arena()
}

/// Receivers of every `<receiver>.<method>(...)` call, in source order.
fn receivers_of(arena: &NodeArena, method: &str) -> Vec<NodeIndex> {
    let mut calls: Vec<(u32, NodeIndex)> = Vec::new();
    for node in &arena.nodes {
        if node.kind != syntax_kind_ext::CALL_EXPRESSION {
            continue;
        }
        let Some(call) = arena.get_call_expr(node) else {
            continue;
        };
        let Some(callee) = arena.get(call.expression) else {
            continue;
        };
        if callee.kind != syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION {
            continue;
        }
        let access = arena.get_access_expr(callee).expect("access data");
        if arena.identifier_text(access.name_or_argument) == Some(method) {
            calls.push((node.pos, access.expression));
        }
    }
    calls.sort_by_key(|&(pos, _)| pos);
    calls.into_iter().map(|(_, receiver)| receiver).collect()
}

fn types_of(source: &str, method: &str) -> Vec<Option<String>> {
    let arena = parse(source);
    let resolver = DeclaredTypeResolver::new(&arena);
    receivers_of(&arena, method)
        .into_iter()
        .map(|r| resolver.declared_type_of(r).map(str::to_string))
        .collect()
}

#[test]
fn test_annotated_local() {
    let types = types_of("let c: StreamController<int> = make();\nc.add(1);", "add");
    assert_eq!(types, vec![Some("StreamController".to_string())]);
}

#[test]
fn test_new_initializer_without_annotation() {
    let types = types_of("const c = new StreamController<int>();\nc.add(1);", "add");
    assert_eq!(types, vec![Some("StreamController".to_string())]);
}

#[test]
fn test_qualified_new_callee_uses_last_name() {
    let types = types_of("const c = new streams.StreamController();\nc.add(1);", "add");
    assert_eq!(types, vec![Some("StreamController".to_string())]);
}

#[test]
fn test_parameter_type() {
    let types = types_of("function f(sink: EventSink) { sink.add(1); }", "add");
    assert_eq!(types, vec![Some("EventSink".to_string())]);
}

#[test]
fn test_class_field_through_this() {
    let source = r#"
class Bloc {
  controller: StreamController<int>;
  private sink = new Sink();
  push() {
    this.controller.add(1);
    this.sink.add(2);
    this.missing.add(3);
  }
}
"#;
    assert_eq!(
        types_of(source, "add"),
        vec![
            Some("StreamController".to_string()),
            Some("Sink".to_string()),
            None,
        ]
    );
}

#[test]
fn test_fields_are_per_class() {
    let source = r#"
class A { out: Sink; run() { this.out.add(1); } }
class B { out: Controller; run() { this.out.add(2); } }
"#;
    assert_eq!(
        types_of(source, "add"),
        vec![Some("Sink".to_string()), Some("Controller".to_string())]
    );
}

#[test]
fn test_inner_binding_shadows_outer() {
    let source = r#"
let x: Outer = a();
function f() {
  let x: Inner = b();
  x.add(1);
}
x.add(2);
"#;
    assert_eq!(
        types_of(source, "add"),
        vec![Some("Inner".to_string()), Some("Outer".to_string())]
    );
}

#[test]
fn test_block_binding_is_not_visible_outside() {
    let source = "if (ok) { let s: Sink = open(); s.add(1); }\ns.add(2);";
    assert_eq!(types_of(source, "add"), vec![Some("Sink".to_string()), None]);
}

#[test]
fn test_wrappers_are_skipped() {
    let source = "let c: Sink = open();\n(c!).add(1);";
    assert_eq!(types_of(source, "add"), vec![Some("Sink".to_string())]);
}

#[test]
fn test_unresolved_receivers() {
    let source = "let y = make();\ny.add(1);\nz.add(2);\nthis.q.add(3);\nfoo().add(4);";
    assert_eq!(types_of(source, "add"), vec![None, None, None, None]);
}
