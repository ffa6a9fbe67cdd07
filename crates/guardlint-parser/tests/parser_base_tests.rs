//! Tests for the arena, node access helpers and index types.
use super::*;
use guardlint_scanner::SyntaxKind;

#[test]
fn test_node_index_none() {
    assert!(NodeIndex::NONE.is_none());
    assert!(!NodeIndex::NONE.is_some());
    assert!(NodeIndex(0).is_some());
    assert_eq!(NodeIndex::default(), NodeIndex::NONE);
}

#[test]
fn test_node_list_basics() {
    let list = NodeList::with_nodes(vec![NodeIndex(1), NodeIndex(2)], 3, 9);
    assert_eq!(list.len(), 2);
    assert!(!list.is_empty());
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![NodeIndex(1), NodeIndex(2)]);
    assert!(NodeList::new().is_empty());
}

#[test]
fn test_add_binary_expr_sets_parents() {
    let mut arena = NodeArena::new();
    let left = arena.add_identifier(
        SyntaxKind::Identifier as u16,
        0,
        1,
        IdentifierData {
            escaped_text: "a".to_string(),
        },
    );
    let right = arena.add_token(SyntaxKind::TrueKeyword as u16, 5, 9);
    let binary = arena.add_binary_expr(
        0,
        9,
        BinaryExprData {
            left,
            operator_token: SyntaxKind::AmpersandAmpersandToken as u16,
            right,
        },
    );

    assert_eq!(arena.parent_of(left), binary);
    assert_eq!(arena.parent_of(right), binary);
    assert!(arena.parent_of(binary).is_none());
    assert_eq!(arena.children_of(binary), vec![left, right]);
    assert_eq!(arena.identifier_text(left), Some("a"));
    assert_eq!(arena.identifier_text(right), None);
}

#[test]
fn test_typed_getter_rejects_wrong_kind() {
    let mut arena = NodeArena::new();
    let expression = arena.add_token(SyntaxKind::ThisKeyword as u16, 0, 4);
    let statement = arena.add_expr_statement(0, 5, ExprStatementData { expression });
    let node = arena.get(statement).copied().expect("statement node");
    assert!(arena.get_expr_statement(&node).is_some());
    assert!(arena.get_block(&node).is_none());
    assert!(arena.get_call_expr(&node).is_none());
}

#[test]
fn test_add_flags_and_kind_helpers() {
    let mut arena = NodeArena::new();
    let body = arena.add_block(
        10,
        12,
        BlockData {
            statements: NodeList::new(),
        },
    );
    let function = arena.add_function(
        syntax_kind_ext::ARROW_FUNCTION,
        0,
        12,
        FunctionData {
            name: NodeIndex::NONE,
            parameters: NodeList::new(),
            type_annotation: NodeIndex::NONE,
            body,
        },
    );
    arena.add_flags(function, NodeFlags::ASYNC);

    let node = arena.get(function).expect("function node");
    assert!(node.is_async());
    assert!(node.is_function_like());
    assert!(node.is_function_literal());
    assert!(!node.is_statement());
    assert!(arena.get(body).expect("block").is_statement());
    assert_eq!(arena.parent_of(body), function);
}

#[test]
fn test_node_access_trait_matches_arena() {
    let mut arena = NodeArena::new();
    let text = arena.add_literal(
        SyntaxKind::StringLiteral as u16,
        2,
        7,
        LiteralData {
            text: "abc".to_string(),
        },
    );
    let access: &dyn NodeAccess = &arena;
    assert_eq!(access.kind(text), Some(SyntaxKind::StringLiteral as u16));
    assert_eq!(access.pos_end(text), Some((2, 7)));
    assert_eq!(access.get_literal_text(text), Some("abc"));
    assert!(access.exists(text));
    assert!(!access.exists(NodeIndex::NONE));
    assert!(access.get_children(text).is_empty());
    let info = access.node_info(text).expect("info");
    assert_eq!(info.parent, NodeIndex::NONE);
}

#[test]
fn test_node_view_navigation() {
    let mut parser = ParserState::new("view.ts".to_string(), "foo(1);".to_string());
    let root = parser.parse_source_file();
    let arena = parser.get_arena();
    let source = arena.get_source_file(arena.get(root).expect("root")).expect("sf");
    let statement = source.statements.nodes[0];
    let view = NodeView::new(arena, statement).expect("view");
    assert_eq!(view.kind(), syntax_kind_ext::EXPRESSION_STATEMENT);
    assert_eq!(view.text(), Some("foo(1);"));
    assert_eq!(view.parent(), root);
    let parent = view.parent_view().expect("parent view");
    assert_eq!(parent.kind(), syntax_kind_ext::SOURCE_FILE);
}

#[test]
fn test_kind_names() {
    assert_eq!(syntax_kind_ext::kind_name(syntax_kind_ext::IF_STATEMENT), "IfStatement");
    assert_eq!(
        syntax_kind_ext::kind_name(SyntaxKind::Identifier as u16),
        "Identifier"
    );
    assert_eq!(syntax_kind_ext::kind_name(u16::MAX), "Unknown");
}
