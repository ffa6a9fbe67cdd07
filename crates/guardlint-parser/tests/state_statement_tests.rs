//! Tests for statement and declaration parsing.
use guardlint_parser::parser::node::NodeArena;
use guardlint_parser::{NodeIndex, ParseDiagnostic, ParserState, syntax_kind_ext};

fn parse(source: &str) -> (NodeArena, NodeIndex, Vec<ParseDiagnostic>) {
    let mut parser = ParserState::new("test.ts".to_string(), source.to_string());
    let root = parser.parse_source_file();
    let diagnostics = parser.get_diagnostics().to_vec();
    (parser.into_arena(), root, diagnostics)
}

fn top_level(arena: &NodeArena, root: NodeIndex) -> Vec<NodeIndex> {
    let node = arena.get(root).expect("root node");
    arena
        .get_source_file(node)
        .expect("source file data")
        .statements
        .nodes
        .clone()
}

fn kinds(arena: &NodeArena, nodes: &[NodeIndex]) -> Vec<u16> {
    nodes
        .iter()
        .map(|&n| arena.get(n).expect("node").kind)
        .collect()
}

#[test]
fn test_statement_kinds() {
    let source = r#"
let a = 1;
const b: int = 2
function f() {}
class C {}
if (a) {} else {}
while (a) {}
do {} while (a);
for (let i = 0; i < 3; i++) {}
for (const x of xs) {}
for (const k in obj) {}
try {} catch (e) {} finally {}
;
"#;
    let (arena, root, diagnostics) = parse(source);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    let statements = top_level(&arena, root);
    assert_eq!(
        kinds(&arena, &statements),
        vec![
            syntax_kind_ext::VARIABLE_STATEMENT,
            syntax_kind_ext::VARIABLE_STATEMENT,
            syntax_kind_ext::FUNCTION_DECLARATION,
            syntax_kind_ext::CLASS_DECLARATION,
            syntax_kind_ext::IF_STATEMENT,
            syntax_kind_ext::WHILE_STATEMENT,
            syntax_kind_ext::DO_STATEMENT,
            syntax_kind_ext::FOR_STATEMENT,
            syntax_kind_ext::FOR_OF_STATEMENT,
            syntax_kind_ext::FOR_IN_STATEMENT,
            syntax_kind_ext::TRY_STATEMENT,
            syntax_kind_ext::EMPTY_STATEMENT,
        ]
    );
}

#[test]
fn test_expression_statement_range_includes_semicolon() {
    let source = "  riskyOp();\n";
    let (arena, root, _) = parse(source);
    let statements = top_level(&arena, root);
    assert_eq!(arena.node_text(statements[0]), Some("riskyOp();"));
}

#[test]
fn test_semicolon_insertion_on_line_break() {
    let (arena, root, diagnostics) = parse("a()\nb()\nreturn\nc");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let statements = top_level(&arena, root);
    assert_eq!(statements.len(), 4);
    let ret = arena.get(statements[2]).expect("return");
    assert_eq!(ret.kind, syntax_kind_ext::RETURN_STATEMENT);
    assert!(
        arena.get_return(ret).expect("return data").expression.is_none(),
        "a line break after `return` ends the statement"
    );
}

#[test]
fn test_if_else_children() {
    let (arena, root, _) = parse("if (!done) { go(); } else stop();");
    let statements = top_level(&arena, root);
    let if_node = arena.get(statements[0]).expect("if");
    let data = arena.get_if_statement(if_node).expect("if data");
    assert_eq!(arena.node_text(data.expression), Some("!done"));
    assert_eq!(arena.get(data.then_statement).map(|n| n.kind), Some(syntax_kind_ext::BLOCK));
    assert_eq!(arena.node_text(data.else_statement), Some("stop();"));
    assert_eq!(arena.parent_of(data.then_statement), statements[0]);
}

#[test]
fn test_async_function_declaration_flags() {
    let (arena, root, _) = parse("async function load() { await x(); }\nfunction* gen() { yield 1; }");
    let statements = top_level(&arena, root);
    let load = arena.get(statements[0]).expect("load");
    assert!(load.is_async());
    let generator = arena.get(statements[1]).expect("gen");
    assert!(!generator.is_async());
    assert!(
        generator
            .node_flags()
            .contains(guardlint_parser::parser::NodeFlags::GENERATOR)
    );
}

#[test]
fn test_class_members() {
    let source = r#"
class Bloc extends Base<State> implements Closable {
  private controller: StreamController<int> = new StreamController<int>();
  static count = 0;
  isClosed?: boolean;
  constructor(private readonly repo: Repo) { super(); }
  async load(): Promise<void> { await this.repo.fetch(); }
  get value() { return 1; }
  onTap = () => { this.emit(1); };
}
"#;
    let (arena, root, diagnostics) = parse(source);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    let statements = top_level(&arena, root);
    let class = arena.get(statements[0]).expect("class");
    let data = arena.get_class(class).expect("class data");
    assert_eq!(arena.identifier_text(data.name), Some("Bloc"));
    assert_eq!(arena.identifier_text(data.heritage), Some("Base"));
    assert_eq!(
        kinds(&arena, &data.members.nodes),
        vec![
            syntax_kind_ext::PROPERTY_DECLARATION,
            syntax_kind_ext::PROPERTY_DECLARATION,
            syntax_kind_ext::PROPERTY_DECLARATION,
            syntax_kind_ext::CONSTRUCTOR,
            syntax_kind_ext::METHOD_DECLARATION,
            syntax_kind_ext::METHOD_DECLARATION,
            syntax_kind_ext::PROPERTY_DECLARATION,
        ]
    );
    let load = arena.get(data.members.nodes[4]).expect("load");
    assert!(load.is_async());
}

#[test]
fn test_try_catch_structure() {
    let (arena, root, _) = parse("try { a(); } catch (err) { b(); }");
    let statements = top_level(&arena, root);
    let node = arena.get(statements[0]).expect("try");
    let data = arena.get_try(node).expect("try data");
    assert!(data.finally_block.is_none());
    let clause = arena.get(data.catch_clause).expect("catch");
    let clause_data = arena.get_catch_clause(clause).expect("catch data");
    assert_eq!(arena.node_text(clause_data.variable_declaration), Some("err"));
    assert_eq!(arena.node_text(clause_data.block), Some("{ b(); }"));
}

#[test]
fn test_recovers_from_stray_tokens() {
    let (arena, root, diagnostics) = parse("a();\n) ] }\nb();");
    assert!(!diagnostics.is_empty());
    let statements = top_level(&arena, root);
    let texts: Vec<_> = statements
        .iter()
        .filter_map(|&s| arena.node_text(s))
        .collect();
    assert_eq!(texts.first(), Some(&"a();"));
    assert_eq!(texts.last(), Some(&"b();"));
}

#[test]
fn test_missing_close_brace_reports_diagnostic() {
    let (_, _, diagnostics) = parse("function f() {\n  a();\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 1005);
    assert_eq!(diagnostics[0].message, "'}' expected.");
}

#[test]
fn test_unterminated_string_is_reported_with_parse_errors() {
    let (_, _, diagnostics) = parse("let s = 'abc\nlet t = 1;");
    assert!(diagnostics.iter().any(|d| d.code == 1002));
}

#[test]
fn test_deep_nesting_hits_recursion_limit() {
    let depth = 2_000;
    let source = format!("x = {}1{};", "(".repeat(depth), ")".repeat(depth));
    // Debug builds need more than the default test thread stack to reach the limit.
    let diagnostics = std::thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(move || parse(&source).2)
        .expect("spawn parser thread")
        .join()
        .expect("parser thread");
    assert!(diagnostics.iter().any(|d| d.code == 1440));
}

#[test]
fn test_every_child_points_back_to_its_parent() {
    let source = "class A { m() { if (a) { return b ? c() : d?.e; } } }";
    let (arena, root, _) = parse(source);
    let mut stack = vec![root];
    let mut visited = 0;
    while let Some(node) = stack.pop() {
        visited += 1;
        for child in arena.children_of(node) {
            assert_eq!(arena.parent_of(child), node);
            stack.push(child);
        }
    }
    assert!(visited > 10);
}
