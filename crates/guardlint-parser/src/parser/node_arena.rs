//! NodeArena creation methods (add_* methods).
//!
//! Nodes are built bottom-up: children always exist before their parent, so
//! every `add_*` method records the new node as the parent of its children.

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::syntax_kind_ext::*;

impl NodeArena {
    /// Maximum pre-allocation to avoid capacity overflow in huge files.
    const MAX_NODE_PREALLOC: usize = 5_000_000;

    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Create an arena sized for roughly `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> NodeArena {
        let safe_capacity = capacity.min(Self::MAX_NODE_PREALLOC);
        let mut arena = NodeArena::default();
        arena.nodes = Vec::with_capacity(safe_capacity);
        arena.extended_info = Vec::with_capacity(safe_capacity);
        arena.identifiers = Vec::with_capacity(safe_capacity / 4);
        arena.call_exprs = Vec::with_capacity(safe_capacity / 8);
        arena.access_exprs = Vec::with_capacity(safe_capacity / 8);
        arena.source_files = Vec::with_capacity(1);
        arena
    }

    // ============================================================================
    // Parent Mapping Helpers
    // ============================================================================

    #[inline]
    fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if child.is_some() {
            if let Some(info) = self.extended_info.get_mut(child.0 as usize) {
                info.parent = parent;
            }
        }
    }

    #[inline]
    fn set_parent_list(&mut self, list: &NodeList, parent: NodeIndex) {
        for &child in &list.nodes {
            self.set_parent(child, parent);
        }
    }

    #[inline]
    fn set_parent_opt_list(&mut self, list: &Option<NodeList>, parent: NodeIndex) {
        if let Some(l) = list {
            self.set_parent_list(l, parent);
        }
    }

    #[inline]
    fn push_node(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        self.extended_info.push(ExtendedNodeInfo::default());
        NodeIndex(index)
    }

    /// Set node flags after creation (the parser learns `async` etc. late).
    pub fn add_flags(&mut self, index: NodeIndex, flags: NodeFlags) {
        if let Some(node) = self.get_mut(index) {
            node.flags |= flags.bits();
        }
    }

    // ============================================================================
    // Node Creation Methods
    // ============================================================================

    /// Add a token node (no additional data): `this`, `true`, `null`, ...
    pub fn add_token(&mut self, kind: u16, pos: u32, end: u32) -> NodeIndex {
        self.push_node(Node::new(kind, pos, end))
    }

    pub fn add_identifier(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: IdentifierData,
    ) -> NodeIndex {
        let data_index = self.identifiers.len() as u32;
        self.identifiers.push(data);
        self.push_node(Node::with_data(kind, pos, end, data_index))
    }

    pub fn add_literal(&mut self, kind: u16, pos: u32, end: u32, data: LiteralData) -> NodeIndex {
        let data_index = self.literals.len() as u32;
        self.literals.push(data);
        self.push_node(Node::with_data(kind, pos, end, data_index))
    }

    pub fn add_binary_expr(&mut self, pos: u32, end: u32, data: BinaryExprData) -> NodeIndex {
        let (left, right) = (data.left, data.right);
        let data_index = self.binary_exprs.len() as u32;
        self.binary_exprs.push(data);
        let parent = self.push_node(Node::with_data(BINARY_EXPRESSION, pos, end, data_index));
        self.set_parent(left, parent);
        self.set_parent(right, parent);
        parent
    }

    pub fn add_unary_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: UnaryExprData,
    ) -> NodeIndex {
        let operand = data.operand;
        let data_index = self.unary_exprs.len() as u32;
        self.unary_exprs.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(operand, parent);
        parent
    }

    pub fn add_unary_expr_ex(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: UnaryExprDataEx,
    ) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.unary_exprs_ex.len() as u32;
        self.unary_exprs_ex.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_call_expr(&mut self, kind: u16, pos: u32, end: u32, data: CallExprData) -> NodeIndex {
        let expression = data.expression;
        let type_arguments = data.type_arguments.clone();
        let arguments = data.arguments.clone();
        let data_index = self.call_exprs.len() as u32;
        self.call_exprs.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        self.set_parent_opt_list(&type_arguments, parent);
        self.set_parent_opt_list(&arguments, parent);
        parent
    }

    pub fn add_access_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: AccessExprData,
    ) -> NodeIndex {
        let (expression, name) = (data.expression, data.name_or_argument);
        let optional = data.question_dot_token;
        let data_index = self.access_exprs.len() as u32;
        self.access_exprs.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        if optional {
            self.add_flags(parent, NodeFlags::OPTIONAL_CHAIN);
        }
        self.set_parent(expression, parent);
        self.set_parent(name, parent);
        parent
    }

    pub fn add_conditional_expr(
        &mut self,
        pos: u32,
        end: u32,
        data: ConditionalExprData,
    ) -> NodeIndex {
        let (c, t, f) = (data.condition, data.when_true, data.when_false);
        let data_index = self.conditional_exprs.len() as u32;
        self.conditional_exprs.push(data);
        let parent = self.push_node(Node::with_data(CONDITIONAL_EXPRESSION, pos, end, data_index));
        self.set_parent(c, parent);
        self.set_parent(t, parent);
        self.set_parent(f, parent);
        parent
    }

    pub fn add_parenthesized(&mut self, pos: u32, end: u32, data: ParenthesizedData) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.parenthesized.len() as u32;
        self.parenthesized.push(data);
        let parent =
            self.push_node(Node::with_data(PARENTHESIZED_EXPRESSION, pos, end, data_index));
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_literal_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: LiteralExprData,
    ) -> NodeIndex {
        let elements = data.elements.clone();
        let data_index = self.literal_exprs.len() as u32;
        self.literal_exprs.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent_list(&elements, parent);
        parent
    }

    pub fn add_property_assignment(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: PropertyAssignmentData,
    ) -> NodeIndex {
        let (name, initializer) = (data.name, data.initializer);
        let data_index = self.property_assignments.len() as u32;
        self.property_assignments.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(name, parent);
        self.set_parent(initializer, parent);
        parent
    }

    pub fn add_computed_property(
        &mut self,
        pos: u32,
        end: u32,
        data: ComputedPropertyData,
    ) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.computed_properties.len() as u32;
        self.computed_properties.push(data);
        let parent = self.push_node(Node::with_data(COMPUTED_PROPERTY_NAME, pos, end, data_index));
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_function(&mut self, kind: u16, pos: u32, end: u32, data: FunctionData) -> NodeIndex {
        let name = data.name;
        let parameters = data.parameters.clone();
        let type_annotation = data.type_annotation;
        let body = data.body;
        let data_index = self.functions.len() as u32;
        self.functions.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(name, parent);
        self.set_parent_list(&parameters, parent);
        self.set_parent(type_annotation, parent);
        self.set_parent(body, parent);
        parent
    }

    pub fn add_parameter(&mut self, pos: u32, end: u32, data: ParameterData) -> NodeIndex {
        let (name, ty, init) = (data.name, data.type_annotation, data.initializer);
        let data_index = self.parameters.len() as u32;
        self.parameters.push(data);
        let parent = self.push_node(Node::with_data(PARAMETER, pos, end, data_index));
        self.set_parent(name, parent);
        self.set_parent(ty, parent);
        self.set_parent(init, parent);
        parent
    }

    pub fn add_class(&mut self, pos: u32, end: u32, data: ClassData) -> NodeIndex {
        let name = data.name;
        let heritage = data.heritage;
        let members = data.members.clone();
        let data_index = self.classes.len() as u32;
        self.classes.push(data);
        let parent = self.push_node(Node::with_data(CLASS_DECLARATION, pos, end, data_index));
        self.set_parent(name, parent);
        self.set_parent(heritage, parent);
        self.set_parent_list(&members, parent);
        parent
    }

    pub fn add_property_decl(&mut self, pos: u32, end: u32, data: PropertyDeclData) -> NodeIndex {
        let (name, ty, init) = (data.name, data.type_annotation, data.initializer);
        let data_index = self.property_decls.len() as u32;
        self.property_decls.push(data);
        let parent = self.push_node(Node::with_data(PROPERTY_DECLARATION, pos, end, data_index));
        self.set_parent(name, parent);
        self.set_parent(ty, parent);
        self.set_parent(init, parent);
        parent
    }

    pub fn add_type_ref(&mut self, pos: u32, end: u32, data: TypeRefData) -> NodeIndex {
        let data_index = self.type_refs.len() as u32;
        self.type_refs.push(data);
        self.push_node(Node::with_data(TYPE_REFERENCE, pos, end, data_index))
    }

    pub fn add_block(&mut self, pos: u32, end: u32, data: BlockData) -> NodeIndex {
        let statements = data.statements.clone();
        let data_index = self.blocks.len() as u32;
        self.blocks.push(data);
        let parent = self.push_node(Node::with_data(BLOCK, pos, end, data_index));
        self.set_parent_list(&statements, parent);
        parent
    }

    pub fn add_variable(&mut self, pos: u32, end: u32, data: VariableData) -> NodeIndex {
        let declarations = data.declarations.clone();
        let data_index = self.variables.len() as u32;
        self.variables.push(data);
        let parent = self.push_node(Node::with_data(VARIABLE_STATEMENT, pos, end, data_index));
        self.set_parent_list(&declarations, parent);
        parent
    }

    pub fn add_variable_declaration(
        &mut self,
        pos: u32,
        end: u32,
        data: VariableDeclarationData,
    ) -> NodeIndex {
        let (name, ty, init) = (data.name, data.type_annotation, data.initializer);
        let data_index = self.variable_declarations.len() as u32;
        self.variable_declarations.push(data);
        let parent = self.push_node(Node::with_data(VARIABLE_DECLARATION, pos, end, data_index));
        self.set_parent(name, parent);
        self.set_parent(ty, parent);
        self.set_parent(init, parent);
        parent
    }

    pub fn add_expr_statement(&mut self, pos: u32, end: u32, data: ExprStatementData) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.expr_statements.len() as u32;
        self.expr_statements.push(data);
        let parent = self.push_node(Node::with_data(EXPRESSION_STATEMENT, pos, end, data_index));
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_if_statement(&mut self, pos: u32, end: u32, data: IfStatementData) -> NodeIndex {
        let (e, t, f) = (data.expression, data.then_statement, data.else_statement);
        let data_index = self.if_statements.len() as u32;
        self.if_statements.push(data);
        let parent = self.push_node(Node::with_data(IF_STATEMENT, pos, end, data_index));
        self.set_parent(e, parent);
        self.set_parent(t, parent);
        self.set_parent(f, parent);
        parent
    }

    /// `return` or `throw`.
    pub fn add_return(&mut self, kind: u16, pos: u32, end: u32, data: ReturnData) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.return_data.len() as u32;
        self.return_data.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(expression, parent);
        parent
    }

    /// `break` or `continue`.
    pub fn add_jump(&mut self, kind: u16, pos: u32, end: u32, data: JumpData) -> NodeIndex {
        let label = data.label;
        let data_index = self.jump_data.len() as u32;
        self.jump_data.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        self.set_parent(label, parent);
        parent
    }

    pub fn add_loop(&mut self, kind: u16, pos: u32, end: u32, data: LoopData) -> NodeIndex {
        let children = [
            data.initializer,
            data.condition,
            data.incrementor,
            data.statement,
        ];
        let data_index = self.loops.len() as u32;
        self.loops.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        for child in children {
            self.set_parent(child, parent);
        }
        parent
    }

    pub fn add_for_in_of(&mut self, kind: u16, pos: u32, end: u32, data: ForInOfData) -> NodeIndex {
        let children = [data.initializer, data.expression, data.statement];
        let data_index = self.for_in_of.len() as u32;
        self.for_in_of.push(data);
        let parent = self.push_node(Node::with_data(kind, pos, end, data_index));
        for child in children {
            self.set_parent(child, parent);
        }
        parent
    }

    pub fn add_try(&mut self, pos: u32, end: u32, data: TryData) -> NodeIndex {
        let children = [data.try_block, data.catch_clause, data.finally_block];
        let data_index = self.try_data.len() as u32;
        self.try_data.push(data);
        let parent = self.push_node(Node::with_data(TRY_STATEMENT, pos, end, data_index));
        for child in children {
            self.set_parent(child, parent);
        }
        parent
    }

    pub fn add_catch_clause(&mut self, pos: u32, end: u32, data: CatchClauseData) -> NodeIndex {
        let (variable, block) = (data.variable_declaration, data.block);
        let data_index = self.catch_clauses.len() as u32;
        self.catch_clauses.push(data);
        let parent = self.push_node(Node::with_data(CATCH_CLAUSE, pos, end, data_index));
        self.set_parent(variable, parent);
        self.set_parent(block, parent);
        parent
    }

    pub fn add_source_file(&mut self, pos: u32, end: u32, data: SourceFileData) -> NodeIndex {
        let statements = data.statements.clone();
        let data_index = self.source_files.len() as u32;
        self.source_files.push(data);
        let parent = self.push_node(Node::with_data(SOURCE_FILE, pos, end, data_index));
        self.set_parent_list(&statements, parent);
        parent
    }
}
