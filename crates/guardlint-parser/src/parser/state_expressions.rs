//! Parser state - expression parsing methods

use super::state::ParserState;
use crate::parser::{
    NodeIndex, NodeList,
    node::{
        AccessExprData, BinaryExprData, CallExprData, ComputedPropertyData, ConditionalExprData,
        FunctionData, LiteralData, LiteralExprData, NodeFlags, ParameterData, ParenthesizedData,
        PropertyAssignmentData, TypeRefData, UnaryExprData, UnaryExprDataEx,
    },
    syntax_kind_ext,
};
use guardlint_common::diagnostics::{diagnostic_codes, diagnostic_messages};
use guardlint_scanner::SyntaxKind;
use smallvec::SmallVec;

/// Binding power of a binary operator; 0 when the token is not one.
fn binary_operator_precedence(kind: SyntaxKind, disallow_in: bool) -> u8 {
    match kind {
        SyntaxKind::QuestionQuestionToken | SyntaxKind::BarBarToken => 1,
        SyntaxKind::AmpersandAmpersandToken => 2,
        SyntaxKind::BarToken => 3,
        SyntaxKind::CaretToken => 4,
        SyntaxKind::AmpersandToken => 5,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => 6,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken
        | SyntaxKind::InstanceOfKeyword => 7,
        SyntaxKind::InKeyword if !disallow_in => 7,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => 8,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => 9,
        _ => 0,
    }
}

impl ParserState {
    // =========================================================================
    // Parse Methods - Expressions
    // =========================================================================

    /// Parse a full expression, including the comma operator.
    pub(crate) fn parse_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let mut left = self.parse_assignment_expression_or_higher();
        while self.is_token(SyntaxKind::CommaToken) {
            self.next_token();
            let right = self.parse_assignment_expression_or_higher();
            left = self.arena.add_binary_expr(
                start_pos,
                self.prev_token_end,
                BinaryExprData {
                    left,
                    operator_token: SyntaxKind::CommaToken as u16,
                    right,
                },
            );
        }
        left
    }

    /// Parse an assignment expression (or anything of higher precedence).
    pub(crate) fn parse_assignment_expression_or_higher(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return self.create_missing_expression();
        }
        let result = self.parse_assignment_expression_worker();
        self.exit_recursion();
        result
    }

    fn parse_assignment_expression_worker(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::YieldKeyword) {
            return self.parse_yield_expression();
        }
        if self.look_ahead(|p| p.is_start_of_arrow_function()) {
            return self.parse_arrow_function();
        }

        let start_pos = self.token_pos();
        let expr = self.parse_binary_expression_or_higher(0);

        if self.token().is_assignment_operator() {
            let operator = self.token();
            self.next_token();
            let right = self.parse_assignment_expression_or_higher();
            return self.arena.add_binary_expr(
                start_pos,
                self.prev_token_end,
                BinaryExprData {
                    left: expr,
                    operator_token: operator as u16,
                    right,
                },
            );
        }

        if self.is_token(SyntaxKind::QuestionToken) {
            return self.parse_conditional_expression_rest(start_pos, expr);
        }
        expr
    }

    fn parse_conditional_expression_rest(&mut self, start_pos: u32, condition: NodeIndex) -> NodeIndex {
        self.parse_expected(SyntaxKind::QuestionToken);
        let saved_disallow_in = std::mem::replace(&mut self.disallow_in, false);
        let when_true = self.parse_assignment_expression_or_higher();
        self.disallow_in = saved_disallow_in;
        self.parse_expected(SyntaxKind::ColonToken);
        let when_false = self.parse_assignment_expression_or_higher();
        self.arena.add_conditional_expr(
            start_pos,
            self.prev_token_end,
            ConditionalExprData {
                condition,
                when_true,
                when_false,
            },
        )
    }

    /// Precedence climbing over left-associative binary operators.
    fn parse_binary_expression_or_higher(&mut self, min_precedence: u8) -> NodeIndex {
        let start_pos = self.token_pos();
        let mut left = self.parse_unary_expression_or_higher();
        loop {
            let precedence = binary_operator_precedence(self.token(), self.disallow_in);
            if precedence == 0 || precedence <= min_precedence {
                break;
            }
            let operator = self.token();
            self.next_token();
            let right = self.parse_binary_expression_or_higher(precedence);
            left = self.arena.add_binary_expr(
                start_pos,
                self.prev_token_end,
                BinaryExprData {
                    left,
                    operator_token: operator as u16,
                    right,
                },
            );
        }
        left
    }

    fn parse_unary_expression_or_higher(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        match self.token() {
            SyntaxKind::ExclamationToken
            | SyntaxKind::MinusToken
            | SyntaxKind::PlusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => {
                let operator = self.token();
                self.next_token();
                if !self.enter_recursion() {
                    return self.create_missing_expression();
                }
                let operand = self.parse_unary_expression_or_higher();
                self.exit_recursion();
                self.arena.add_unary_expr(
                    syntax_kind_ext::PREFIX_UNARY_EXPRESSION,
                    start_pos,
                    self.prev_token_end,
                    UnaryExprData {
                        operator: operator as u16,
                        operand,
                    },
                )
            }
            SyntaxKind::AwaitKeyword => {
                self.next_token();
                if !self.enter_recursion() {
                    return self.create_missing_expression();
                }
                let expression = self.parse_unary_expression_or_higher();
                self.exit_recursion();
                self.arena.add_unary_expr_ex(
                    syntax_kind_ext::AWAIT_EXPRESSION,
                    start_pos,
                    self.prev_token_end,
                    UnaryExprDataEx { expression },
                )
            }
            _ => self.parse_postfix_expression_or_higher(),
        }
    }

    fn parse_postfix_expression_or_higher(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let expression = self.parse_left_hand_side_expression_or_higher();
        if matches!(
            self.token(),
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
        ) && !self.has_preceding_line_break()
        {
            let operator = self.token();
            self.next_token();
            return self.arena.add_unary_expr(
                syntax_kind_ext::POSTFIX_UNARY_EXPRESSION,
                start_pos,
                self.prev_token_end,
                UnaryExprData {
                    operator: operator as u16,
                    operand: expression,
                },
            );
        }
        expression
    }

    /// Member accesses, calls and `new`, e.g. `new A<T>().b?.c(d)[e]!`.
    pub(crate) fn parse_left_hand_side_expression_or_higher(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        self.parse_call_chain(start_pos, expression)
    }

    fn parse_call_chain(&mut self, start_pos: u32, mut expression: NodeIndex) -> NodeIndex {
        loop {
            match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    expression = self.parse_property_access_rest(start_pos, expression, false);
                }
                SyntaxKind::QuestionDotToken => {
                    self.next_token();
                    expression = match self.token() {
                        SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken => {
                            let call = self.parse_call_rest(start_pos, expression);
                            self.arena.add_flags(call, NodeFlags::OPTIONAL_CHAIN);
                            call
                        }
                        SyntaxKind::OpenBracketToken => {
                            self.parse_element_access_rest(start_pos, expression, true)
                        }
                        _ => self.parse_property_access_rest(start_pos, expression, true),
                    };
                }
                SyntaxKind::OpenBracketToken => {
                    expression = self.parse_element_access_rest(start_pos, expression, false);
                }
                SyntaxKind::OpenParenToken => {
                    expression = self.parse_call_rest(start_pos, expression);
                }
                SyntaxKind::LessThanToken
                    if self.look_ahead(|p| {
                        p.skip_type_argument_list() && p.is_token(SyntaxKind::OpenParenToken)
                    }) =>
                {
                    expression = self.parse_call_rest(start_pos, expression);
                }
                SyntaxKind::ExclamationToken if !self.has_preceding_line_break() => {
                    self.next_token();
                    expression = self.arena.add_unary_expr_ex(
                        syntax_kind_ext::NON_NULL_EXPRESSION,
                        start_pos,
                        self.prev_token_end,
                        UnaryExprDataEx { expression },
                    );
                }
                _ => return expression,
            }
        }
    }

    fn parse_property_access_rest(
        &mut self,
        start_pos: u32,
        expression: NodeIndex,
        question_dot_token: bool,
    ) -> NodeIndex {
        let name = self.parse_identifier_name();
        self.arena.add_access_expr(
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
            start_pos,
            self.prev_token_end,
            AccessExprData {
                expression,
                name_or_argument: name,
                question_dot_token,
            },
        )
    }

    fn parse_element_access_rest(
        &mut self,
        start_pos: u32,
        expression: NodeIndex,
        question_dot_token: bool,
    ) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let saved_disallow_in = std::mem::replace(&mut self.disallow_in, false);
        let argument = self.parse_expression();
        self.disallow_in = saved_disallow_in;
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.arena.add_access_expr(
            syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION,
            start_pos,
            self.prev_token_end,
            AccessExprData {
                expression,
                name_or_argument: argument,
                question_dot_token,
            },
        )
    }

    fn parse_call_rest(&mut self, start_pos: u32, expression: NodeIndex) -> NodeIndex {
        let type_arguments = if self.is_token(SyntaxKind::LessThanToken) {
            Some(self.parse_type_argument_list())
        } else {
            None
        };
        let arguments = self.parse_argument_list();
        self.arena.add_call_expr(
            syntax_kind_ext::CALL_EXPRESSION,
            start_pos,
            self.prev_token_end,
            CallExprData {
                expression,
                type_arguments,
                arguments: Some(arguments),
            },
        )
    }

    /// Parse `new Callee<T>(args)`; the argument list is optional.
    fn parse_new_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::NewKeyword);
        if !self.enter_recursion() {
            return self.create_missing_expression();
        }
        let callee_start = self.token_pos();
        let mut expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        self.exit_recursion();
        loop {
            match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    expression = self.parse_property_access_rest(callee_start, expression, false);
                }
                SyntaxKind::OpenBracketToken => {
                    expression = self.parse_element_access_rest(callee_start, expression, false);
                }
                _ => break,
            }
        }
        let type_arguments = if self.is_token(SyntaxKind::LessThanToken)
            && self.look_ahead(|p| p.skip_type_argument_list())
        {
            Some(self.parse_type_argument_list())
        } else {
            None
        };
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            Some(self.parse_argument_list())
        } else {
            None
        };
        self.arena.add_call_expr(
            syntax_kind_ext::NEW_EXPRESSION,
            start_pos,
            self.prev_token_end,
            CallExprData {
                expression,
                type_arguments,
                arguments,
            },
        )
    }

    pub(crate) fn parse_argument_list(&mut self) -> NodeList {
        let list_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let saved_disallow_in = std::mem::replace(&mut self.disallow_in, false);
        let mut arguments = Vec::new();
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let argument = if self.is_token(SyntaxKind::DotDotDotToken) {
                self.parse_spread_element()
            } else {
                self.parse_assignment_expression_or_higher()
            };
            arguments.push(argument);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.disallow_in = saved_disallow_in;
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.make_node_list(arguments, list_pos)
    }

    fn parse_spread_element(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::DotDotDotToken);
        let expression = self.parse_assignment_expression_or_higher();
        self.arena.add_unary_expr_ex(
            syntax_kind_ext::SPREAD_ELEMENT,
            start_pos,
            self.prev_token_end,
            UnaryExprDataEx { expression },
        )
    }

    fn parse_yield_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::YieldKeyword);
        let expression = if !self.has_preceding_line_break()
            && (self.parse_optional(SyntaxKind::AsteriskToken) || self.is_start_of_expression())
        {
            self.parse_assignment_expression_or_higher()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_unary_expr_ex(
            syntax_kind_ext::YIELD_EXPRESSION,
            start_pos,
            self.prev_token_end,
            UnaryExprDataEx { expression },
        )
    }

    pub(crate) fn is_start_of_expression(&self) -> bool {
        !matches!(
            self.token(),
            SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::CommaToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::ColonToken
                | SyntaxKind::EndOfFileToken
        )
    }

    // =========================================================================
    // Parse Methods - Primary Expressions
    // =========================================================================

    fn parse_primary_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        match self.token() {
            SyntaxKind::Identifier => {
                if self.is_contextual("async")
                    && self.look_ahead(|p| {
                        p.next_token();
                        p.is_token(SyntaxKind::FunctionKeyword) && !p.has_preceding_line_break()
                    })
                {
                    return self.parse_function_expression();
                }
                self.parse_identifier()
            }
            SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword => {
                let kind = self.token() as u16;
                let end_pos = self.current_token_end();
                self.next_token();
                self.arena.add_token(kind, start_pos, end_pos)
            }
            SyntaxKind::NumericLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral => self.parse_literal_expression(),
            SyntaxKind::OpenParenToken => self.parse_parenthesized_expression(),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(),
            _ => {
                self.parse_error_at_current_token(
                    diagnostic_messages::EXPRESSION_EXPECTED,
                    diagnostic_codes::EXPRESSION_EXPECTED,
                );
                self.create_missing_expression()
            }
        }
    }

    pub(crate) fn parse_literal_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let end_pos = self.current_token_end();
        let kind = self.token() as u16;
        let text = self.token_value().to_string();
        self.next_token();
        self.arena
            .add_literal(kind, start_pos, end_pos, LiteralData { text })
    }

    fn parse_parenthesized_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let saved_disallow_in = std::mem::replace(&mut self.disallow_in, false);
        let expression = self.parse_expression();
        self.disallow_in = saved_disallow_in;
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.arena.add_parenthesized(
            start_pos,
            self.prev_token_end,
            ParenthesizedData { expression },
        )
    }

    /// Array literal; also used for array binding patterns.
    pub(crate) fn parse_array_literal(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let list_pos = self.token_pos();
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.is_token(SyntaxKind::CommaToken) {
                let pos = self.token_pos();
                elements.push(
                    self.arena
                        .add_token(syntax_kind_ext::OMITTED_EXPRESSION, pos, pos),
                );
                self.next_token();
                continue;
            }
            let element = if self.is_token(SyntaxKind::DotDotDotToken) {
                self.parse_spread_element()
            } else {
                self.parse_assignment_expression_or_higher()
            };
            elements.push(element);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        let elements = self.make_node_list(elements, list_pos);
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.arena.add_literal_expr(
            syntax_kind_ext::ARRAY_LITERAL_EXPRESSION,
            start_pos,
            self.prev_token_end,
            LiteralExprData { elements },
        )
    }

    /// Object literal; also used for object binding patterns.
    pub(crate) fn parse_object_literal(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let list_pos = self.token_pos();
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let before = self.token_pos();
            elements.push(self.parse_object_literal_element());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
            if self.token_pos() == before {
                break;
            }
        }
        let elements = self.make_node_list(elements, list_pos);
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add_literal_expr(
            syntax_kind_ext::OBJECT_LITERAL_EXPRESSION,
            start_pos,
            self.prev_token_end,
            LiteralExprData { elements },
        )
    }

    fn parse_object_literal_element(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        if self.is_token(SyntaxKind::DotDotDotToken) {
            return self.parse_spread_element();
        }

        let mut flags = NodeFlags::empty();
        while self.is_method_modifier() {
            if self.is_contextual("async") {
                flags |= NodeFlags::ASYNC;
            }
            self.next_token();
        }
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            flags |= NodeFlags::GENERATOR;
        }

        let name = self.parse_property_name();
        if self.is_token(SyntaxKind::OpenParenToken) || self.is_token(SyntaxKind::LessThanToken) {
            return self.parse_method_rest(syntax_kind_ext::METHOD_DECLARATION, start_pos, name, flags);
        }

        if self.parse_optional(SyntaxKind::ColonToken) {
            let initializer = self.parse_assignment_expression_or_higher();
            return self.arena.add_property_assignment(
                syntax_kind_ext::PROPERTY_ASSIGNMENT,
                start_pos,
                self.prev_token_end,
                PropertyAssignmentData { name, initializer },
            );
        }

        // Shorthand `{ a }`, or `{ a = 1 }` in a binding pattern.
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression_or_higher()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_property_assignment(
            syntax_kind_ext::SHORTHAND_PROPERTY_ASSIGNMENT,
            start_pos,
            self.prev_token_end,
            PropertyAssignmentData { name, initializer },
        )
    }

    /// `async`, `get` or `set` directly followed by a member name.
    pub(crate) fn is_method_modifier(&mut self) -> bool {
        if !(self.is_contextual("async") || self.is_contextual("get") || self.is_contextual("set"))
        {
            return false;
        }
        self.look_ahead(|p| {
            p.next_token();
            !p.has_preceding_line_break() && p.is_start_of_property_name()
        })
    }

    pub(crate) fn is_start_of_property_name(&self) -> bool {
        self.token().is_identifier_or_keyword()
            || matches!(
                self.token(),
                SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::OpenBracketToken
                    | SyntaxKind::AsteriskToken
            )
    }

    /// Identifier, keyword, string, number or `[computed]` member name.
    pub(crate) fn parse_property_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => self.parse_literal_expression(),
            SyntaxKind::OpenBracketToken => {
                let start_pos = self.token_pos();
                self.next_token();
                let expression = self.parse_assignment_expression_or_higher();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                self.arena.add_computed_property(
                    start_pos,
                    self.prev_token_end,
                    ComputedPropertyData { expression },
                )
            }
            _ => self.parse_identifier_name(),
        }
    }

    /// Parameters, return type and body of a method-like member.
    pub(crate) fn parse_method_rest(
        &mut self,
        kind: u16,
        start_pos: u32,
        name: NodeIndex,
        flags: NodeFlags,
    ) -> NodeIndex {
        if self.is_token(SyntaxKind::LessThanToken) {
            self.skip_type_argument_list();
        }
        let parameters = self.parse_parameter_list();
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_block()
        } else {
            self.parse_semicolon();
            NodeIndex::NONE
        };
        let node = self.arena.add_function(
            kind,
            start_pos,
            self.prev_token_end,
            FunctionData {
                name,
                parameters,
                type_annotation,
                body,
            },
        );
        self.arena.add_flags(node, flags);
        node
    }

    // =========================================================================
    // Parse Methods - Functions
    // =========================================================================

    /// `function name(params) { }`, optionally `async` and/or a generator.
    pub(crate) fn parse_function_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let mut flags = NodeFlags::empty();
        if self.is_contextual("async") {
            self.next_token();
            flags |= NodeFlags::ASYNC;
        }
        self.parse_expected(SyntaxKind::FunctionKeyword);
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            flags |= NodeFlags::GENERATOR;
        }
        let name = if self.is_token(SyntaxKind::Identifier) {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        self.parse_method_rest(syntax_kind_ext::FUNCTION_EXPRESSION, start_pos, name, flags)
    }

    /// Decide, without consuming anything, whether an arrow function starts here.
    fn is_start_of_arrow_function(&mut self) -> bool {
        if self.is_contextual("async") {
            self.next_token();
            if self.has_preceding_line_break() {
                return false;
            }
            if self.is_token(SyntaxKind::EqualsGreaterThanToken) {
                // `async => ...` uses `async` as the parameter name.
                return true;
            }
        }
        match self.token() {
            SyntaxKind::Identifier => {
                self.next_token();
                self.is_token(SyntaxKind::EqualsGreaterThanToken)
            }
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken => {
                if self.is_token(SyntaxKind::LessThanToken) && !self.skip_type_argument_list() {
                    return false;
                }
                if !self.skip_balanced(SyntaxKind::OpenParenToken, SyntaxKind::CloseParenToken) {
                    return false;
                }
                if self.parse_optional(SyntaxKind::ColonToken) {
                    self.parse_type();
                }
                self.is_token(SyntaxKind::EqualsGreaterThanToken)
            }
            _ => false,
        }
    }

    fn parse_arrow_function(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let mut flags = NodeFlags::empty();
        if self.is_contextual("async")
            && !self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::EqualsGreaterThanToken)
            })
        {
            self.next_token();
            flags |= NodeFlags::ASYNC;
        }

        let parameters = if self.is_token(SyntaxKind::Identifier) {
            let list_pos = self.token_pos();
            let name = self.parse_identifier();
            let parameter = self.arena.add_parameter(
                list_pos,
                self.prev_token_end,
                ParameterData {
                    name,
                    type_annotation: NodeIndex::NONE,
                    initializer: NodeIndex::NONE,
                    dot_dot_dot_token: false,
                    question_token: false,
                },
            );
            self.make_node_list(vec![parameter], list_pos)
        } else {
            if self.is_token(SyntaxKind::LessThanToken) {
                self.skip_type_argument_list();
            }
            self.parse_parameter_list()
        };

        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);

        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_block()
        } else {
            self.parse_assignment_expression_or_higher()
        };

        let node = self.arena.add_function(
            syntax_kind_ext::ARROW_FUNCTION,
            start_pos,
            self.prev_token_end,
            FunctionData {
                name: NodeIndex::NONE,
                parameters,
                type_annotation,
                body,
            },
        );
        self.arena.add_flags(node, flags);
        node
    }

    /// `(a, b: T, c = 1, ...rest)`.
    pub(crate) fn parse_parameter_list(&mut self) -> NodeList {
        let list_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let mut parameters = Vec::new();
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let before = self.token_pos();
            parameters.push(self.parse_parameter());
            if !self.parse_optional(SyntaxKind::CommaToken) || self.token_pos() == before {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.make_node_list(parameters, list_pos)
    }

    fn parse_parameter(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        // Constructor parameter properties: `private readonly x: T`.
        while (self.is_contextual("public")
            || self.is_contextual("private")
            || self.is_contextual("protected")
            || self.is_contextual("readonly"))
            && self.look_ahead(|p| {
                p.next_token();
                p.token().is_identifier_or_keyword()
                    || p.is_token(SyntaxKind::OpenBraceToken)
                    || p.is_token(SyntaxKind::OpenBracketToken)
            })
        {
            self.next_token();
        }
        let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = self.parse_binding_name();
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression_or_higher()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_parameter(
            start_pos,
            self.prev_token_end,
            ParameterData {
                name,
                type_annotation,
                initializer,
                dot_dot_dot_token,
                question_token,
            },
        )
    }

    /// Identifier or destructuring pattern.
    pub(crate) fn parse_binding_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::ThisKeyword => {
                let start_pos = self.token_pos();
                let end_pos = self.current_token_end();
                self.next_token();
                self.arena
                    .add_token(SyntaxKind::ThisKeyword as u16, start_pos, end_pos)
            }
            _ => self.parse_identifier(),
        }
    }

    // =========================================================================
    // Parse Methods - Types
    // =========================================================================

    /// Parse a type annotation into a `TypeReference` carrying its head name.
    ///
    /// Types are not modelled beyond that: tokens are consumed with bracket
    /// balancing until a token that cannot continue the type at depth zero.
    pub(crate) fn parse_type(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let mut type_name = String::new();
        if self.token().is_identifier_or_keyword() {
            type_name = self.token_value().to_string();
            self.next_token();
            while self.is_token(SyntaxKind::DotToken)
                && self.look_ahead(|p| {
                    p.next_token();
                    p.is_token(SyntaxKind::Identifier)
                })
            {
                self.next_token();
                type_name = self.token_value().to_string();
                self.next_token();
            }
        }

        let mut type_arguments = Vec::new();
        let mut open: SmallVec<[SyntaxKind; 8]> = SmallVec::new();
        let mut previous = SyntaxKind::Unknown;
        let mut consumed_any = !type_name.is_empty();
        loop {
            let token = self.token();
            let at_top = open.is_empty();
            match token {
                SyntaxKind::EndOfFileToken => break,
                // Function or class body after a return/implements type.
                SyntaxKind::OpenBraceToken | SyntaxKind::OpenParenToken
                    if at_top
                        && consumed_any
                        && !matches!(
                            previous,
                            SyntaxKind::BarToken
                                | SyntaxKind::AmpersandToken
                                | SyntaxKind::EqualsGreaterThanToken
                                | SyntaxKind::ColonToken
                        ) =>
                {
                    break;
                }
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::LessThanToken => open.push(token),
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::GreaterThanToken => {
                    if at_top {
                        break;
                    }
                    open.pop();
                }
                SyntaxKind::CommaToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::EqualsToken
                | SyntaxKind::QuestionToken
                    if at_top =>
                {
                    break;
                }
                // A function type `(a: A) => R` continues after its parameter list.
                SyntaxKind::EqualsGreaterThanToken
                    if at_top && previous != SyntaxKind::CloseParenToken =>
                {
                    break;
                }
                _ if at_top
                    && consumed_any
                    && self.has_preceding_line_break()
                    && !matches!(
                        previous,
                        SyntaxKind::BarToken
                            | SyntaxKind::AmpersandToken
                            | SyntaxKind::DotToken
                            | SyntaxKind::EqualsGreaterThanToken
                    ) =>
                {
                    break;
                }
                _ if at_top
                    && consumed_any
                    && token.is_identifier_or_keyword()
                    && !matches!(
                        previous,
                        SyntaxKind::BarToken
                            | SyntaxKind::AmpersandToken
                            | SyntaxKind::DotToken
                            | SyntaxKind::EqualsGreaterThanToken
                    ) =>
                {
                    // `x: T of`, `x: T in`: the next word belongs to the caller.
                    break;
                }
                SyntaxKind::Identifier
                    if open.len() == 1
                        && open.last() == Some(&SyntaxKind::LessThanToken)
                        && matches!(previous, SyntaxKind::LessThanToken | SyntaxKind::CommaToken) =>
                {
                    type_arguments.push(self.token_value().to_string());
                }
                _ => {}
            }
            previous = token;
            consumed_any = true;
            self.next_token();
        }

        if !consumed_any {
            self.parse_error_at_current_token(
                diagnostic_messages::IDENTIFIER_EXPECTED,
                diagnostic_codes::IDENTIFIER_EXPECTED,
            );
        }
        self.arena.add_type_ref(
            start_pos,
            self.prev_token_end.max(start_pos),
            TypeRefData {
                type_name,
                type_arguments,
            },
        )
    }

    /// `<A, B<C>>` as a list of type references.
    pub(crate) fn parse_type_argument_list(&mut self) -> NodeList {
        let list_pos = self.token_pos();
        self.parse_expected(SyntaxKind::LessThanToken);
        let mut arguments = Vec::new();
        while !self.is_token(SyntaxKind::GreaterThanToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let before = self.token_pos();
            arguments.push(self.parse_type());
            if !self.parse_optional(SyntaxKind::CommaToken) || self.token_pos() == before {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken);
        self.make_node_list(arguments, list_pos)
    }

    /// Skip a `<...>` group if it looks like a type argument list.
    /// Returns false when the tokens cannot be type arguments (`a < b`).
    pub(crate) fn skip_type_argument_list(&mut self) -> bool {
        if !self.is_token(SyntaxKind::LessThanToken) {
            return false;
        }
        let mut depth = 0u32;
        loop {
            match self.token() {
                SyntaxKind::LessThanToken => depth += 1,
                SyntaxKind::GreaterThanToken => {
                    depth -= 1;
                    if depth == 0 {
                        self.next_token();
                        return true;
                    }
                }
                SyntaxKind::EndOfFileToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::EqualsToken
                | SyntaxKind::AmpersandAmpersandToken
                | SyntaxKind::BarBarToken
                | SyntaxKind::NumericLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::PlusToken
                | SyntaxKind::MinusToken => return false,
                _ => {}
            }
            self.next_token();
        }
    }

    /// Skip a balanced `open ... close` group, counting all bracket kinds.
    pub(crate) fn skip_balanced(&mut self, open: SyntaxKind, close: SyntaxKind) -> bool {
        if !self.is_token(open) {
            return false;
        }
        let mut depth = 0u32;
        loop {
            match self.token() {
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                    if depth == 0 {
                        let matched = self.is_token(close);
                        self.next_token();
                        return matched;
                    }
                }
                SyntaxKind::EndOfFileToken => return false,
                _ => {}
            }
            self.next_token();
        }
    }

    pub(crate) fn create_missing_expression(&mut self) -> NodeIndex {
        self.create_missing_identifier()
    }
}
