//! NodeArena access methods, NodeView, and NodeAccess trait.
//!
//! This module contains the typed getters, the NodeView ergonomic wrapper,
//! Node kind utility methods, and the NodeAccess trait consumed by the
//! guard-verification engine.

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::syntax_kind_ext::*;
use guardlint_scanner::SyntaxKind;

macro_rules! typed_getter {
    ($(#[$meta:meta])* $name:ident, $pool:ident, $data:ty, $($kind:expr),+) => {
        $(#[$meta])*
        #[inline]
        pub fn $name(&self, node: &Node) -> Option<&$data> {
            if node.has_data() && ($(node.kind == $kind)||+) {
                self.$pool.get(node.data_index as usize)
            } else {
                None
            }
        }
    };
}

impl NodeArena {
    /// Get a node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_extended(&self, index: NodeIndex) -> Option<&ExtendedNodeInfo> {
        if index.is_none() {
            None
        } else {
            self.extended_info.get(index.0 as usize)
        }
    }

    /// Parent of a node, `NONE` for the root or an unknown index.
    #[inline]
    pub fn parent_of(&self, index: NodeIndex) -> NodeIndex {
        self.get_extended(index)
            .map_or(NodeIndex::NONE, |ext| ext.parent)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Full text of the parsed file, if a source file node exists.
    pub fn source_text(&self) -> Option<&str> {
        self.source_files.first().map(|sf| &*sf.text)
    }

    /// Source text covered by a node.
    pub fn node_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        self.source_text()?
            .get(node.pos as usize..node.end as usize)
    }

    /// Get identifier data for a node.
    #[inline]
    pub fn get_identifier(&self, node: &Node) -> Option<&IdentifierData> {
        if node.has_data() && node.kind == SyntaxKind::Identifier as u16 {
            self.identifiers.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get literal data for a node.
    #[inline]
    pub fn get_literal(&self, node: &Node) -> Option<&LiteralData> {
        if node.has_data()
            && matches!(node.kind,
                k if k == SyntaxKind::StringLiteral as u16
                    || k == SyntaxKind::NumericLiteral as u16
                    || k == SyntaxKind::NoSubstitutionTemplateLiteral as u16
            )
        {
            self.literals.get(node.data_index as usize)
        } else {
            None
        }
    }

    typed_getter!(get_binary_expr, binary_exprs, BinaryExprData, BINARY_EXPRESSION);
    typed_getter!(
        get_unary_expr,
        unary_exprs,
        UnaryExprData,
        PREFIX_UNARY_EXPRESSION,
        POSTFIX_UNARY_EXPRESSION
    );
    typed_getter!(
        /// `await`, `yield`, spread and non-null payloads.
        get_unary_expr_ex,
        unary_exprs_ex,
        UnaryExprDataEx,
        AWAIT_EXPRESSION,
        YIELD_EXPRESSION,
        SPREAD_ELEMENT,
        NON_NULL_EXPRESSION
    );
    typed_getter!(
        /// Call and `new` expressions.
        get_call_expr,
        call_exprs,
        CallExprData,
        CALL_EXPRESSION,
        NEW_EXPRESSION
    );
    typed_getter!(
        get_access_expr,
        access_exprs,
        AccessExprData,
        PROPERTY_ACCESS_EXPRESSION,
        ELEMENT_ACCESS_EXPRESSION
    );
    typed_getter!(
        get_conditional_expr,
        conditional_exprs,
        ConditionalExprData,
        CONDITIONAL_EXPRESSION
    );
    typed_getter!(
        get_parenthesized,
        parenthesized,
        ParenthesizedData,
        PARENTHESIZED_EXPRESSION
    );
    typed_getter!(
        get_literal_expr,
        literal_exprs,
        LiteralExprData,
        ARRAY_LITERAL_EXPRESSION,
        OBJECT_LITERAL_EXPRESSION
    );
    typed_getter!(
        get_property_assignment,
        property_assignments,
        PropertyAssignmentData,
        PROPERTY_ASSIGNMENT,
        SHORTHAND_PROPERTY_ASSIGNMENT
    );
    typed_getter!(
        get_computed_property,
        computed_properties,
        ComputedPropertyData,
        COMPUTED_PROPERTY_NAME
    );
    typed_getter!(
        /// Any function-like node, including methods and constructors.
        get_function,
        functions,
        FunctionData,
        FUNCTION_DECLARATION,
        FUNCTION_EXPRESSION,
        ARROW_FUNCTION,
        METHOD_DECLARATION,
        CONSTRUCTOR
    );
    typed_getter!(get_parameter, parameters, ParameterData, PARAMETER);
    typed_getter!(get_class, classes, ClassData, CLASS_DECLARATION);
    typed_getter!(
        get_property_decl,
        property_decls,
        PropertyDeclData,
        PROPERTY_DECLARATION
    );
    typed_getter!(get_type_ref, type_refs, TypeRefData, TYPE_REFERENCE);
    typed_getter!(get_block, blocks, BlockData, BLOCK);
    typed_getter!(get_variable, variables, VariableData, VARIABLE_STATEMENT);
    typed_getter!(
        get_variable_declaration,
        variable_declarations,
        VariableDeclarationData,
        VARIABLE_DECLARATION
    );
    typed_getter!(
        get_expr_statement,
        expr_statements,
        ExprStatementData,
        EXPRESSION_STATEMENT
    );
    typed_getter!(
        get_if_statement,
        if_statements,
        IfStatementData,
        IF_STATEMENT
    );
    typed_getter!(
        /// `return` and `throw`.
        get_return,
        return_data,
        ReturnData,
        RETURN_STATEMENT,
        THROW_STATEMENT
    );
    typed_getter!(
        get_jump,
        jump_data,
        JumpData,
        BREAK_STATEMENT,
        CONTINUE_STATEMENT
    );
    typed_getter!(
        get_loop,
        loops,
        LoopData,
        WHILE_STATEMENT,
        DO_STATEMENT,
        FOR_STATEMENT
    );
    typed_getter!(
        get_for_in_of,
        for_in_of,
        ForInOfData,
        FOR_OF_STATEMENT,
        FOR_IN_STATEMENT
    );
    typed_getter!(get_try, try_data, TryData, TRY_STATEMENT);
    typed_getter!(
        get_catch_clause,
        catch_clauses,
        CatchClauseData,
        CATCH_CLAUSE
    );
    typed_getter!(get_source_file, source_files, SourceFileData, SOURCE_FILE);

    /// Identifier text of a node, if it is an identifier.
    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        self.get_identifier(node).map(|id| id.escaped_text.as_str())
    }

    /// Ordered children of a node (source order).
    pub fn children_of(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let Some(node) = self.get(index) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let o = &mut out;

        match node.kind {
            k if k == BINARY_EXPRESSION => {
                if let Some(d) = self.get_binary_expr(node) {
                    push(o, d.left);
                    push(o, d.right);
                }
            }
            k if k == PREFIX_UNARY_EXPRESSION || k == POSTFIX_UNARY_EXPRESSION => {
                if let Some(d) = self.get_unary_expr(node) {
                    push(o, d.operand);
                }
            }
            k if k == AWAIT_EXPRESSION
                || k == YIELD_EXPRESSION
                || k == SPREAD_ELEMENT
                || k == NON_NULL_EXPRESSION =>
            {
                if let Some(d) = self.get_unary_expr_ex(node) {
                    push(o, d.expression);
                }
            }
            k if k == CALL_EXPRESSION || k == NEW_EXPRESSION => {
                if let Some(d) = self.get_call_expr(node) {
                    push(o, d.expression);
                    if let Some(list) = &d.type_arguments {
                        push_list(o, list);
                    }
                    if let Some(list) = &d.arguments {
                        push_list(o, list);
                    }
                }
            }
            k if k == PROPERTY_ACCESS_EXPRESSION || k == ELEMENT_ACCESS_EXPRESSION => {
                if let Some(d) = self.get_access_expr(node) {
                    push(o, d.expression);
                    push(o, d.name_or_argument);
                }
            }
            k if k == CONDITIONAL_EXPRESSION => {
                if let Some(d) = self.get_conditional_expr(node) {
                    push(o, d.condition);
                    push(o, d.when_true);
                    push(o, d.when_false);
                }
            }
            k if k == PARENTHESIZED_EXPRESSION => {
                if let Some(d) = self.get_parenthesized(node) {
                    push(o, d.expression);
                }
            }
            k if k == ARRAY_LITERAL_EXPRESSION || k == OBJECT_LITERAL_EXPRESSION => {
                if let Some(d) = self.get_literal_expr(node) {
                    push_list(o, &d.elements);
                }
            }
            k if k == PROPERTY_ASSIGNMENT || k == SHORTHAND_PROPERTY_ASSIGNMENT => {
                if let Some(d) = self.get_property_assignment(node) {
                    push(o, d.name);
                    push(o, d.initializer);
                }
            }
            k if k == COMPUTED_PROPERTY_NAME => {
                if let Some(d) = self.get_computed_property(node) {
                    push(o, d.expression);
                }
            }
            _ if node.is_function_like() => {
                if let Some(d) = self.get_function(node) {
                    push(o, d.name);
                    push_list(o, &d.parameters);
                    push(o, d.type_annotation);
                    push(o, d.body);
                }
            }
            k if k == PARAMETER => {
                if let Some(d) = self.get_parameter(node) {
                    push(o, d.name);
                    push(o, d.type_annotation);
                    push(o, d.initializer);
                }
            }
            k if k == CLASS_DECLARATION => {
                if let Some(d) = self.get_class(node) {
                    push(o, d.name);
                    push(o, d.heritage);
                    push_list(o, &d.members);
                }
            }
            k if k == PROPERTY_DECLARATION => {
                if let Some(d) = self.get_property_decl(node) {
                    push(o, d.name);
                    push(o, d.type_annotation);
                    push(o, d.initializer);
                }
            }
            k if k == BLOCK => {
                if let Some(d) = self.get_block(node) {
                    push_list(o, &d.statements);
                }
            }
            k if k == VARIABLE_STATEMENT => {
                if let Some(d) = self.get_variable(node) {
                    push_list(o, &d.declarations);
                }
            }
            k if k == VARIABLE_DECLARATION => {
                if let Some(d) = self.get_variable_declaration(node) {
                    push(o, d.name);
                    push(o, d.type_annotation);
                    push(o, d.initializer);
                }
            }
            k if k == EXPRESSION_STATEMENT => {
                if let Some(d) = self.get_expr_statement(node) {
                    push(o, d.expression);
                }
            }
            k if k == IF_STATEMENT => {
                if let Some(d) = self.get_if_statement(node) {
                    push(o, d.expression);
                    push(o, d.then_statement);
                    push(o, d.else_statement);
                }
            }
            k if k == RETURN_STATEMENT || k == THROW_STATEMENT => {
                if let Some(d) = self.get_return(node) {
                    push(o, d.expression);
                }
            }
            k if k == BREAK_STATEMENT || k == CONTINUE_STATEMENT => {
                if let Some(d) = self.get_jump(node) {
                    push(o, d.label);
                }
            }
            k if k == DO_STATEMENT => {
                // Body precedes the condition in source.
                if let Some(d) = self.get_loop(node) {
                    push(o, d.statement);
                    push(o, d.condition);
                }
            }
            k if k == WHILE_STATEMENT || k == FOR_STATEMENT => {
                if let Some(d) = self.get_loop(node) {
                    push(o, d.initializer);
                    push(o, d.condition);
                    push(o, d.incrementor);
                    push(o, d.statement);
                }
            }
            k if k == FOR_OF_STATEMENT || k == FOR_IN_STATEMENT => {
                if let Some(d) = self.get_for_in_of(node) {
                    push(o, d.initializer);
                    push(o, d.expression);
                    push(o, d.statement);
                }
            }
            k if k == TRY_STATEMENT => {
                if let Some(d) = self.get_try(node) {
                    push(o, d.try_block);
                    push(o, d.catch_clause);
                    push(o, d.finally_block);
                }
            }
            k if k == CATCH_CLAUSE => {
                if let Some(d) = self.get_catch_clause(node) {
                    push(o, d.variable_declaration);
                    push(o, d.block);
                }
            }
            k if k == SOURCE_FILE => {
                if let Some(d) = self.get_source_file(node) {
                    push_list(o, &d.statements);
                }
            }
            _ => {}
        }
        out
    }
}

#[inline]
fn push(out: &mut Vec<NodeIndex>, child: NodeIndex) {
    if child.is_some() {
        out.push(child);
    }
}

#[inline]
fn push_list(out: &mut Vec<NodeIndex>, list: &NodeList) {
    out.extend(list.nodes.iter().copied().filter(|c| c.is_some()));
}

// =============================================================================
// Node kind utilities
// =============================================================================

impl Node {
    /// Function declarations, expressions, arrows, methods and constructors.
    #[inline]
    pub const fn is_function_like(&self) -> bool {
        is_function_like_kind(self.kind)
    }

    /// Function literals that can appear as call arguments.
    #[inline]
    pub const fn is_function_literal(&self) -> bool {
        self.kind == FUNCTION_EXPRESSION || self.kind == ARROW_FUNCTION
    }

    #[inline]
    pub const fn is_statement(&self) -> bool {
        (self.kind >= BLOCK && self.kind <= EMPTY_STATEMENT)
            || self.kind == FUNCTION_DECLARATION
            || self.kind == CLASS_DECLARATION
    }

    #[inline]
    pub fn is_async(&self) -> bool {
        self.node_flags().contains(NodeFlags::ASYNC)
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.node_flags().contains(NodeFlags::MISSING)
    }
}

#[inline]
pub const fn is_function_like_kind(kind: u16) -> bool {
    kind == FUNCTION_DECLARATION
        || kind == FUNCTION_EXPRESSION
        || kind == ARROW_FUNCTION
        || kind == METHOD_DECLARATION
        || kind == CONSTRUCTOR
}

// =============================================================================
// NodeView
// =============================================================================

/// A borrowed view of one node bundled with its arena.
#[derive(Clone, Copy)]
pub struct NodeView<'a> {
    pub node: &'a Node,
    pub arena: &'a NodeArena,
    pub index: NodeIndex,
}

impl<'a> NodeView<'a> {
    #[inline]
    pub fn new(arena: &'a NodeArena, index: NodeIndex) -> Option<NodeView<'a>> {
        arena.get(index).map(|node| NodeView { node, arena, index })
    }

    #[inline]
    pub fn kind(&self) -> u16 {
        self.node.kind
    }

    #[inline]
    pub fn pos(&self) -> u32 {
        self.node.pos
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.node.end
    }

    #[inline]
    pub fn flags(&self) -> u16 {
        self.node.flags
    }

    #[inline]
    pub fn parent(&self) -> NodeIndex {
        self.arena.parent_of(self.index)
    }

    /// Create a view of the parent node.
    #[inline]
    pub fn parent_view(&self) -> Option<NodeView<'a>> {
        NodeView::new(self.arena, self.parent())
    }

    /// Create a view of a child node.
    #[inline]
    pub fn child(&self, index: NodeIndex) -> Option<NodeView<'a>> {
        NodeView::new(self.arena, index)
    }

    #[inline]
    pub fn text(&self) -> Option<&'a str> {
        self.arena.node_text(self.index)
    }

    #[inline]
    pub fn as_identifier(&self) -> Option<&'a IdentifierData> {
        self.arena.get_identifier(self.node)
    }

    #[inline]
    pub fn as_call_expr(&self) -> Option<&'a CallExprData> {
        self.arena.get_call_expr(self.node)
    }

    #[inline]
    pub fn as_access_expr(&self) -> Option<&'a AccessExprData> {
        self.arena.get_access_expr(self.node)
    }

    #[inline]
    pub fn as_function(&self) -> Option<&'a FunctionData> {
        self.arena.get_function(self.node)
    }

    #[inline]
    pub fn as_if_statement(&self) -> Option<&'a IfStatementData> {
        self.arena.get_if_statement(self.node)
    }

    #[inline]
    pub fn as_block(&self) -> Option<&'a BlockData> {
        self.arena.get_block(self.node)
    }
}

// =============================================================================
// NodeAccess trait
// =============================================================================

/// Common node information, independent of the arena layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    pub kind: u16,
    pub flags: u16,
    pub pos: u32,
    pub end: u32,
    pub parent: NodeIndex,
}

impl NodeInfo {
    pub fn from_node(node: &Node, ext: &ExtendedNodeInfo) -> NodeInfo {
        NodeInfo {
            kind: node.kind,
            flags: node.flags,
            pos: node.pos,
            end: node.end,
            parent: ext.parent,
        }
    }
}

/// Minimal read-only tree view: kind, range, parent and ordered children.
/// Generic traversals (document-order walks, ancestor ascent) only need this.
pub trait NodeAccess {
    fn node_info(&self, index: NodeIndex) -> Option<NodeInfo>;

    fn kind(&self, index: NodeIndex) -> Option<u16>;

    fn pos_end(&self, index: NodeIndex) -> Option<(u32, u32)>;

    fn exists(&self, index: NodeIndex) -> bool {
        !index.is_none() && self.kind(index).is_some()
    }

    /// Parent back-reference, `NONE` at the root.
    fn parent(&self, index: NodeIndex) -> NodeIndex;

    fn get_identifier_text(&self, index: NodeIndex) -> Option<&str>;

    fn get_literal_text(&self, index: NodeIndex) -> Option<&str>;

    /// Children in source order.
    fn get_children(&self, index: NodeIndex) -> Vec<NodeIndex>;
}

impl NodeAccess for NodeArena {
    fn node_info(&self, index: NodeIndex) -> Option<NodeInfo> {
        let node = self.get(index)?;
        let ext = self.get_extended(index)?;
        Some(NodeInfo::from_node(node, ext))
    }

    fn kind(&self, index: NodeIndex) -> Option<u16> {
        self.get(index).map(|n| n.kind)
    }

    fn pos_end(&self, index: NodeIndex) -> Option<(u32, u32)> {
        self.get(index).map(|n| (n.pos, n.end))
    }

    fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.parent_of(index)
    }

    fn get_identifier_text(&self, index: NodeIndex) -> Option<&str> {
        self.identifier_text(index)
    }

    fn get_literal_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        self.get_literal(node).map(|lit| lit.text.as_str())
    }

    fn get_children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.children_of(index)
    }
}
