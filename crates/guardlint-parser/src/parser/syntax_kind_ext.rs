//! Node kinds.
//!
//! Token kinds live in `guardlint_scanner::SyntaxKind`; composite node kinds
//! continue the same `u16` numbering from here so a single `kind` field can
//! hold either.

use guardlint_scanner::SyntaxKind;

const FIRST_NODE: u16 = SyntaxKind::LAST_TOKEN as u16 + 1;

// Top level and declarations
pub const SOURCE_FILE: u16 = FIRST_NODE;
pub const TYPE_REFERENCE: u16 = FIRST_NODE + 1;
pub const PARAMETER: u16 = FIRST_NODE + 2;
pub const FUNCTION_DECLARATION: u16 = FIRST_NODE + 3;
pub const FUNCTION_EXPRESSION: u16 = FIRST_NODE + 4;
pub const ARROW_FUNCTION: u16 = FIRST_NODE + 5;
pub const CLASS_DECLARATION: u16 = FIRST_NODE + 6;
pub const PROPERTY_DECLARATION: u16 = FIRST_NODE + 7;
pub const METHOD_DECLARATION: u16 = FIRST_NODE + 8;
pub const CONSTRUCTOR: u16 = FIRST_NODE + 9;
pub const VARIABLE_DECLARATION: u16 = FIRST_NODE + 10;

// Statements (BLOCK..=EMPTY_STATEMENT)
pub const BLOCK: u16 = FIRST_NODE + 20;
pub const VARIABLE_STATEMENT: u16 = FIRST_NODE + 21;
pub const EXPRESSION_STATEMENT: u16 = FIRST_NODE + 22;
pub const IF_STATEMENT: u16 = FIRST_NODE + 23;
pub const DO_STATEMENT: u16 = FIRST_NODE + 24;
pub const WHILE_STATEMENT: u16 = FIRST_NODE + 25;
pub const FOR_STATEMENT: u16 = FIRST_NODE + 26;
pub const FOR_OF_STATEMENT: u16 = FIRST_NODE + 27;
pub const FOR_IN_STATEMENT: u16 = FIRST_NODE + 28;
pub const CONTINUE_STATEMENT: u16 = FIRST_NODE + 29;
pub const BREAK_STATEMENT: u16 = FIRST_NODE + 30;
pub const RETURN_STATEMENT: u16 = FIRST_NODE + 31;
pub const THROW_STATEMENT: u16 = FIRST_NODE + 32;
pub const TRY_STATEMENT: u16 = FIRST_NODE + 33;
pub const EMPTY_STATEMENT: u16 = FIRST_NODE + 34;
pub const CATCH_CLAUSE: u16 = FIRST_NODE + 35;

// Expressions
pub const CALL_EXPRESSION: u16 = FIRST_NODE + 50;
pub const NEW_EXPRESSION: u16 = FIRST_NODE + 51;
pub const PROPERTY_ACCESS_EXPRESSION: u16 = FIRST_NODE + 52;
pub const ELEMENT_ACCESS_EXPRESSION: u16 = FIRST_NODE + 53;
pub const BINARY_EXPRESSION: u16 = FIRST_NODE + 54;
pub const PREFIX_UNARY_EXPRESSION: u16 = FIRST_NODE + 55;
pub const POSTFIX_UNARY_EXPRESSION: u16 = FIRST_NODE + 56;
pub const CONDITIONAL_EXPRESSION: u16 = FIRST_NODE + 57;
pub const PARENTHESIZED_EXPRESSION: u16 = FIRST_NODE + 58;
pub const AWAIT_EXPRESSION: u16 = FIRST_NODE + 59;
pub const YIELD_EXPRESSION: u16 = FIRST_NODE + 60;
pub const SPREAD_ELEMENT: u16 = FIRST_NODE + 61;
pub const NON_NULL_EXPRESSION: u16 = FIRST_NODE + 62;
pub const ARRAY_LITERAL_EXPRESSION: u16 = FIRST_NODE + 63;
pub const OBJECT_LITERAL_EXPRESSION: u16 = FIRST_NODE + 64;
pub const PROPERTY_ASSIGNMENT: u16 = FIRST_NODE + 65;
pub const SHORTHAND_PROPERTY_ASSIGNMENT: u16 = FIRST_NODE + 66;
pub const COMPUTED_PROPERTY_NAME: u16 = FIRST_NODE + 67;
pub const OMITTED_EXPRESSION: u16 = FIRST_NODE + 68;

/// Human-readable name of a node or token kind, for tracing and tests.
pub fn kind_name(kind: u16) -> &'static str {
    if let Some(token) = SyntaxKind::try_from_u16(kind) {
        return match token {
            SyntaxKind::Identifier => "Identifier",
            SyntaxKind::StringLiteral => "StringLiteral",
            SyntaxKind::NumericLiteral => "NumericLiteral",
            SyntaxKind::NoSubstitutionTemplateLiteral => "TemplateLiteral",
            SyntaxKind::ThisKeyword => "ThisKeyword",
            SyntaxKind::SuperKeyword => "SuperKeyword",
            SyntaxKind::TrueKeyword => "TrueKeyword",
            SyntaxKind::FalseKeyword => "FalseKeyword",
            SyntaxKind::NullKeyword => "NullKeyword",
            _ => "Token",
        };
    }
    match kind {
        SOURCE_FILE => "SourceFile",
        TYPE_REFERENCE => "TypeReference",
        PARAMETER => "Parameter",
        FUNCTION_DECLARATION => "FunctionDeclaration",
        FUNCTION_EXPRESSION => "FunctionExpression",
        ARROW_FUNCTION => "ArrowFunction",
        CLASS_DECLARATION => "ClassDeclaration",
        PROPERTY_DECLARATION => "PropertyDeclaration",
        METHOD_DECLARATION => "MethodDeclaration",
        CONSTRUCTOR => "Constructor",
        VARIABLE_DECLARATION => "VariableDeclaration",
        BLOCK => "Block",
        VARIABLE_STATEMENT => "VariableStatement",
        EXPRESSION_STATEMENT => "ExpressionStatement",
        IF_STATEMENT => "IfStatement",
        DO_STATEMENT => "DoStatement",
        WHILE_STATEMENT => "WhileStatement",
        FOR_STATEMENT => "ForStatement",
        FOR_OF_STATEMENT => "ForOfStatement",
        FOR_IN_STATEMENT => "ForInStatement",
        CONTINUE_STATEMENT => "ContinueStatement",
        BREAK_STATEMENT => "BreakStatement",
        RETURN_STATEMENT => "ReturnStatement",
        THROW_STATEMENT => "ThrowStatement",
        TRY_STATEMENT => "TryStatement",
        EMPTY_STATEMENT => "EmptyStatement",
        CATCH_CLAUSE => "CatchClause",
        CALL_EXPRESSION => "CallExpression",
        NEW_EXPRESSION => "NewExpression",
        PROPERTY_ACCESS_EXPRESSION => "PropertyAccessExpression",
        ELEMENT_ACCESS_EXPRESSION => "ElementAccessExpression",
        BINARY_EXPRESSION => "BinaryExpression",
        PREFIX_UNARY_EXPRESSION => "PrefixUnaryExpression",
        POSTFIX_UNARY_EXPRESSION => "PostfixUnaryExpression",
        CONDITIONAL_EXPRESSION => "ConditionalExpression",
        PARENTHESIZED_EXPRESSION => "ParenthesizedExpression",
        AWAIT_EXPRESSION => "AwaitExpression",
        YIELD_EXPRESSION => "YieldExpression",
        SPREAD_ELEMENT => "SpreadElement",
        NON_NULL_EXPRESSION => "NonNullExpression",
        ARRAY_LITERAL_EXPRESSION => "ArrayLiteralExpression",
        OBJECT_LITERAL_EXPRESSION => "ObjectLiteralExpression",
        PROPERTY_ASSIGNMENT => "PropertyAssignment",
        SHORTHAND_PROPERTY_ASSIGNMENT => "ShorthandPropertyAssignment",
        COMPUTED_PROPERTY_NAME => "ComputedPropertyName",
        OMITTED_EXPRESSION => "OmittedExpression",
        _ => "Unknown",
    }
}
