//! Node header, per-kind data records and the arena that owns them.
//!
//! A `Node` is a small fixed-size header (kind, flags, range, data index).
//! Kind-specific payloads live in typed pools on the `NodeArena`; the
//! header's `data_index` points into the pool selected by its kind. Parent
//! links live in `ExtendedNodeInfo` so that the header stays compact.

use super::base::{NodeIndex, NodeList};
use std::sync::Arc;

bitflags::bitflags! {
    /// Per-node flags set by the parser.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u16 {
        const LET = 1 << 0;
        const CONST = 1 << 1;
        const ASYNC = 1 << 2;
        const GENERATOR = 1 << 3;
        const OPTIONAL_CHAIN = 1 << 4;
        const STATIC = 1 << 5;
        /// Node was synthesized during error recovery.
        const MISSING = 1 << 6;
    }
}

/// Fixed-size node header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: u16,
    pub flags: u16,
    /// Start offset of the first token (leading trivia excluded).
    pub pos: u32,
    /// End offset of the last token.
    pub end: u32,
    pub data_index: u32,
}

impl Node {
    pub const NO_DATA: u32 = u32::MAX;

    #[inline]
    pub const fn new(kind: u16, pos: u32, end: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index: Self::NO_DATA,
        }
    }

    #[inline]
    pub const fn with_data(kind: u16, pos: u32, end: u32, data_index: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index,
        }
    }

    #[inline]
    pub const fn has_data(&self) -> bool {
        self.data_index != Self::NO_DATA
    }

    #[inline]
    pub fn node_flags(&self) -> NodeFlags {
        NodeFlags::from_bits_truncate(self.flags)
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.end.saturating_sub(self.pos)
    }
}

/// Data kept outside the header: currently just the parent back-reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtendedNodeInfo {
    pub parent: NodeIndex,
}

// =============================================================================
// Per-kind data records
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct IdentifierData {
    pub escaped_text: String,
}

#[derive(Clone, Debug, Default)]
pub struct LiteralData {
    /// Cooked value (string contents without quotes, numeric text).
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    pub operator_token: u16,
    pub right: NodeIndex,
}

/// Prefix and postfix unary expressions.
#[derive(Clone, Debug)]
pub struct UnaryExprData {
    pub operator: u16,
    pub operand: NodeIndex,
}

/// Single-operand expressions without an operator token of interest:
/// `await`, `yield`, spread, non-null assertion.
#[derive(Clone, Debug)]
pub struct UnaryExprDataEx {
    pub expression: NodeIndex,
}

/// Call and `new` expressions. `arguments` is `None` for `new X` without parens.
#[derive(Clone, Debug)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub type_arguments: Option<NodeList>,
    pub arguments: Option<NodeList>,
}

/// Property access (`a.b`, `a?.b`) and element access (`a[b]`).
#[derive(Clone, Debug)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name_or_argument: NodeIndex,
    pub question_dot_token: bool,
}

#[derive(Clone, Debug)]
pub struct ConditionalExprData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ParenthesizedData {
    pub expression: NodeIndex,
}

/// Array and object literal elements.
#[derive(Clone, Debug)]
pub struct LiteralExprData {
    pub elements: NodeList,
}

/// `name: initializer` and shorthand `name` (initializer is `NONE`).
#[derive(Clone, Debug)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ComputedPropertyData {
    pub expression: NodeIndex,
}

/// Function declarations, expressions, arrows, methods and constructors.
/// For arrows with an expression body, `body` is that expression.
#[derive(Clone, Debug)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
    pub body: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ParameterData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
    pub dot_dot_dot_token: bool,
    pub question_token: bool,
}

#[derive(Clone, Debug)]
pub struct ClassData {
    pub name: NodeIndex,
    pub heritage: NodeIndex,
    pub members: NodeList,
}

#[derive(Clone, Debug)]
pub struct PropertyDeclData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// A type annotation. Only the head name matters to the engine
/// (`StreamController` for `StreamController<int>`).
#[derive(Clone, Debug, Default)]
pub struct TypeRefData {
    pub type_name: String,
    pub type_arguments: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct BlockData {
    pub statements: NodeList,
}

#[derive(Clone, Debug)]
pub struct VariableData {
    pub declarations: NodeList,
}

#[derive(Clone, Debug)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ExprStatementData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct IfStatementData {
    pub expression: NodeIndex,
    pub then_statement: NodeIndex,
    pub else_statement: NodeIndex,
}

/// `return` and `throw`.
#[derive(Clone, Debug)]
pub struct ReturnData {
    pub expression: NodeIndex,
}

/// `break` and `continue`.
#[derive(Clone, Debug)]
pub struct JumpData {
    pub label: NodeIndex,
}

/// `while`, `do ... while` and classic `for`.
#[derive(Clone, Debug)]
pub struct LoopData {
    pub initializer: NodeIndex,
    pub condition: NodeIndex,
    pub incrementor: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ForInOfData {
    pub initializer: NodeIndex,
    pub expression: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TryData {
    pub try_block: NodeIndex,
    pub catch_clause: NodeIndex,
    pub finally_block: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct CatchClauseData {
    pub variable_declaration: NodeIndex,
    pub block: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct SourceFileData {
    pub statements: NodeList,
    pub file_name: String,
    pub text: Arc<str>,
}

// =============================================================================
// Arena
// =============================================================================

/// Owner of every node of one parsed file.
///
/// The arena is immutable once parsing finishes; consumers borrow it for the
/// duration of one analysis pass.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
    pub extended_info: Vec<ExtendedNodeInfo>,
    pub identifiers: Vec<IdentifierData>,
    pub literals: Vec<LiteralData>,
    pub binary_exprs: Vec<BinaryExprData>,
    pub unary_exprs: Vec<UnaryExprData>,
    pub unary_exprs_ex: Vec<UnaryExprDataEx>,
    pub call_exprs: Vec<CallExprData>,
    pub access_exprs: Vec<AccessExprData>,
    pub conditional_exprs: Vec<ConditionalExprData>,
    pub parenthesized: Vec<ParenthesizedData>,
    pub literal_exprs: Vec<LiteralExprData>,
    pub property_assignments: Vec<PropertyAssignmentData>,
    pub computed_properties: Vec<ComputedPropertyData>,
    pub functions: Vec<FunctionData>,
    pub parameters: Vec<ParameterData>,
    pub classes: Vec<ClassData>,
    pub property_decls: Vec<PropertyDeclData>,
    pub type_refs: Vec<TypeRefData>,
    pub blocks: Vec<BlockData>,
    pub variables: Vec<VariableData>,
    pub variable_declarations: Vec<VariableDeclarationData>,
    pub expr_statements: Vec<ExprStatementData>,
    pub if_statements: Vec<IfStatementData>,
    pub return_data: Vec<ReturnData>,
    pub jump_data: Vec<JumpData>,
    pub loops: Vec<LoopData>,
    pub for_in_of: Vec<ForInOfData>,
    pub try_data: Vec<TryData>,
    pub catch_clauses: Vec<CatchClauseData>,
    pub source_files: Vec<SourceFileData>,
}
