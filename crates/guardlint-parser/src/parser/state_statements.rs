//! Parser state - statement and declaration parsing methods

use super::state::{ParserState, u32_from_usize};
use crate::parser::{
    NodeIndex, NodeList,
    node::{
        BlockData, CatchClauseData, ClassData, ExprStatementData, ForInOfData, IfStatementData,
        JumpData, LoopData, NodeFlags, PropertyDeclData, ReturnData,
        SourceFileData, TryData, VariableData, VariableDeclarationData,
    },
    syntax_kind_ext,
};
use guardlint_common::diagnostics::{diagnostic_codes, diagnostic_messages};
use guardlint_scanner::SyntaxKind;
use tracing::debug;

/// Contextual words that may prefix a class member.
const CLASS_MEMBER_MODIFIERS: &[&str] = &[
    "static",
    "public",
    "private",
    "protected",
    "readonly",
    "abstract",
    "override",
    "declare",
    "async",
    "get",
    "set",
];

impl ParserState {
    // =========================================================================
    // Parse Methods - Source File
    // =========================================================================

    /// Parse a source file
    pub fn parse_source_file(&mut self) -> NodeIndex {
        self.next_token();

        let statements = self.parse_statement_list(true);

        // Lexical errors are reported together with the syntax errors.
        self.collect_scanner_diagnostics();

        let end_pos = u32_from_usize(self.scanner.source_text().len());
        debug!(
            file = %self.file_name,
            nodes = self.arena.len(),
            diagnostics = self.parse_diagnostics.len(),
            "parsed source file"
        );
        self.arena.add_source_file(
            0,
            end_pos,
            SourceFileData {
                statements,
                file_name: self.file_name.clone(),
                text: self.scanner.source_text_arc(),
            },
        )
    }

    /// Statements up to `}` (or end of file at the top level).
    ///
    /// Every iteration consumes at least one token: a statement that made no
    /// progress is reported and its first token skipped.
    fn parse_statement_list(&mut self, is_source_file: bool) -> NodeList {
        let list_pos = self.token_pos();
        let mut statements = Vec::new();
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::CloseBraceToken if !is_source_file => break,
                SyntaxKind::CloseBraceToken => {
                    self.parse_error_at_current_token(
                        diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                        diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                    );
                    self.next_token();
                    continue;
                }
                _ => {}
            }
            let before = self.token_pos();
            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
            if self.token_pos() == before && !self.is_token(SyntaxKind::EndOfFileToken) {
                self.parse_error_at_current_token(
                    diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                    diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                );
                self.next_token();
            }
        }
        self.make_node_list(statements, list_pos)
    }

    // =========================================================================
    // Parse Methods - Statements
    // =========================================================================

    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return NodeIndex::NONE;
        }
        let statement = match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => self.parse_empty_statement(),
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => {
                self.parse_variable_statement()
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(),
            SyntaxKind::Identifier if self.look_ahead_is_async_function() => {
                self.parse_function_declaration()
            }
            SyntaxKind::ClassKeyword => self.parse_class_declaration(),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::ReturnKeyword | SyntaxKind::ThrowKeyword => {
                self.parse_return_or_throw_statement()
            }
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => {
                self.parse_break_or_continue_statement()
            }
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            _ => self.parse_expression_statement(),
        };
        self.exit_recursion();
        statement
    }

    /// Look ahead to see if we have "async function"
    fn look_ahead_is_async_function(&mut self) -> bool {
        self.is_contextual("async")
            && self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::FunctionKeyword) && !p.has_preceding_line_break()
            })
    }

    /// Parse a block statement
    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return NodeIndex::NONE;
        }
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let statements = self.parse_statement_list(false);
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.exit_recursion();
        self.arena
            .add_block(start_pos, self.prev_token_end, BlockData { statements })
    }

    fn parse_empty_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::SemicolonToken);
        self.arena
            .add_token(syntax_kind_ext::EMPTY_STATEMENT, start_pos, self.prev_token_end)
    }

    fn parse_expression_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let expression = self.parse_expression();
        if self.token_pos() == start_pos {
            // Nothing was consumed; the caller skips the token.
            return NodeIndex::NONE;
        }
        self.parse_semicolon();
        self.arena.add_expr_statement(
            start_pos,
            self.prev_token_end,
            ExprStatementData { expression },
        )
    }

    /// Parse variable statement (var/let/const)
    fn parse_variable_statement(&mut self) -> NodeIndex {
        let statement = self.parse_variable_declaration_list();
        self.parse_semicolon();
        if let Some(node) = self.arena.get_mut(statement) {
            node.end = self.prev_token_end;
        }
        statement
    }

    /// `let a: T = x, b` without the trailing semicolon.
    fn parse_variable_declaration_list(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let flags = match self.token() {
            SyntaxKind::LetKeyword => NodeFlags::LET,
            SyntaxKind::ConstKeyword => NodeFlags::CONST,
            _ => NodeFlags::empty(),
        };
        self.next_token();

        let list_pos = self.token_pos();
        let mut declarations = Vec::new();
        loop {
            declarations.push(self.parse_variable_declaration());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        let declarations = self.make_node_list(declarations, list_pos);
        let statement = self.arena.add_variable(
            start_pos,
            self.prev_token_end,
            VariableData { declarations },
        );
        self.arena.add_flags(statement, flags);
        statement
    }

    fn parse_variable_declaration(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let name = self.parse_binding_name();
        // Definite assignment assertion `let x!: T`.
        self.parse_optional(SyntaxKind::ExclamationToken);
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
        self.arena.add_variable_declaration(
            start_pos,
            self.prev_token_end,
            VariableDeclarationData {
                name,
                type_annotation,
                initializer,
            },
        )
    }

    /// `[async] function [*] name(params) [: T] { body }`
    fn parse_function_declaration(&mut self) -> NodeIndex {
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
        let name = self.parse_identifier();
        self.parse_method_rest(syntax_kind_ext::FUNCTION_DECLARATION, start_pos, name, flags)
    }

    fn parse_if_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::IfKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        let then_statement = self.parse_statement();
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_statement()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_if_statement(
            start_pos,
            self.prev_token_end,
            IfStatementData {
                expression,
                then_statement,
                else_statement,
            },
        )
    }

    fn parse_while_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::WhileKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.arena.add_loop(
            syntax_kind_ext::WHILE_STATEMENT,
            start_pos,
            self.prev_token_end,
            LoopData {
                initializer: NodeIndex::NONE,
                condition,
                incrementor: NodeIndex::NONE,
                statement,
            },
        )
    }

    fn parse_do_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::DoKeyword);
        let statement = self.parse_statement();
        self.parse_expected(SyntaxKind::WhileKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.parse_optional(SyntaxKind::SemicolonToken);
        self.arena.add_loop(
            syntax_kind_ext::DO_STATEMENT,
            start_pos,
            self.prev_token_end,
            LoopData {
                initializer: NodeIndex::NONE,
                condition,
                incrementor: NodeIndex::NONE,
                statement,
            },
        )
    }

    /// `for (init; cond; incr)`, `for (x of xs)` and `for (k in obj)`.
    fn parse_for_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::ForKeyword);
        // `for await (... of ...)`
        self.parse_optional(SyntaxKind::AwaitKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);

        let saved_disallow_in = std::mem::replace(&mut self.disallow_in, true);
        let initializer = match self.token() {
            SyntaxKind::SemicolonToken => NodeIndex::NONE,
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => {
                self.parse_variable_declaration_list()
            }
            _ => self.parse_expression(),
        };
        self.disallow_in = saved_disallow_in;

        let for_in_of_kind = if self.is_contextual("of") {
            Some(syntax_kind_ext::FOR_OF_STATEMENT)
        } else if self.is_token(SyntaxKind::InKeyword) {
            Some(syntax_kind_ext::FOR_IN_STATEMENT)
        } else {
            None
        };

        if let Some(kind) = for_in_of_kind {
            self.next_token();
            let expression = self.parse_assignment_expression_or_higher();
            self.parse_expected(SyntaxKind::CloseParenToken);
            let statement = self.parse_statement();
            return self.arena.add_for_in_of(
                kind,
                start_pos,
                self.prev_token_end,
                ForInOfData {
                    initializer,
                    expression,
                    statement,
                },
            );
        }

        self.parse_expected(SyntaxKind::SemicolonToken);
        let condition = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_expected(SyntaxKind::SemicolonToken);
        let incrementor = if self.is_token(SyntaxKind::CloseParenToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.arena.add_loop(
            syntax_kind_ext::FOR_STATEMENT,
            start_pos,
            self.prev_token_end,
            LoopData {
                initializer,
                condition,
                incrementor,
                statement,
            },
        )
    }

    fn parse_return_or_throw_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let kind = if self.is_token(SyntaxKind::ThrowKeyword) {
            syntax_kind_ext::THROW_STATEMENT
        } else {
            syntax_kind_ext::RETURN_STATEMENT
        };
        self.next_token();
        let expression = if self.can_parse_semicolon() {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_semicolon();
        self.arena.add_return(
            kind,
            start_pos,
            self.prev_token_end,
            ReturnData { expression },
        )
    }

    fn parse_break_or_continue_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let kind = if self.is_token(SyntaxKind::BreakKeyword) {
            syntax_kind_ext::BREAK_STATEMENT
        } else {
            syntax_kind_ext::CONTINUE_STATEMENT
        };
        self.next_token();
        let label = if self.is_token(SyntaxKind::Identifier) && !self.has_preceding_line_break() {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.arena
            .add_jump(kind, start_pos, self.prev_token_end, JumpData { label })
    }

    fn parse_try_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::TryKeyword);
        let try_block = self.parse_block();

        let catch_clause = if self.is_token(SyntaxKind::CatchKeyword) {
            let catch_pos = self.token_pos();
            self.next_token();
            let variable_declaration = if self.parse_optional(SyntaxKind::OpenParenToken) {
                let decl = self.parse_variable_declaration();
                self.parse_expected(SyntaxKind::CloseParenToken);
                decl
            } else {
                NodeIndex::NONE
            };
            let block = self.parse_block();
            self.arena.add_catch_clause(
                catch_pos,
                self.prev_token_end,
                CatchClauseData {
                    variable_declaration,
                    block,
                },
            )
        } else {
            NodeIndex::NONE
        };

        let finally_block = if self.parse_optional(SyntaxKind::FinallyKeyword) {
            self.parse_block()
        } else {
            NodeIndex::NONE
        };

        if catch_clause.is_none() && finally_block.is_none() {
            self.parse_expected(SyntaxKind::CatchKeyword);
        }

        self.arena.add_try(
            start_pos,
            self.prev_token_end,
            TryData {
                try_block,
                catch_clause,
                finally_block,
            },
        )
    }

    // =========================================================================
    // Parse Methods - Classes
    // =========================================================================

    /// `class Name<T> extends Base<U> implements I { members }`
    fn parse_class_declaration(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::ClassKeyword);
        let name = if self.is_token(SyntaxKind::Identifier) && !self.is_contextual("implements") {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        if self.is_token(SyntaxKind::LessThanToken) {
            self.skip_type_argument_list();
        }

        let heritage = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            let base = self.parse_left_hand_side_expression_or_higher();
            if self.is_token(SyntaxKind::LessThanToken) {
                self.skip_type_argument_list();
            }
            base
        } else {
            NodeIndex::NONE
        };
        if self.is_contextual("implements") {
            self.next_token();
            loop {
                self.parse_type();
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }

        self.parse_expected(SyntaxKind::OpenBraceToken);
        let list_pos = self.token_pos();
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.parse_optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            let before = self.token_pos();
            let member = self.parse_class_member();
            if member.is_some() {
                members.push(member);
            }
            if self.token_pos() == before {
                self.parse_error_at_current_token(
                    diagnostic_messages::UNEXPECTED_TOKEN,
                    diagnostic_codes::UNEXPECTED_TOKEN,
                );
                self.next_token();
            }
        }
        let members = self.make_node_list(members, list_pos);
        self.parse_expected(SyntaxKind::CloseBraceToken);

        self.arena.add_class(
            start_pos,
            self.prev_token_end,
            ClassData {
                name,
                heritage,
                members,
            },
        )
    }

    fn is_class_member_modifier(&mut self) -> bool {
        if self.token() != SyntaxKind::Identifier
            || !CLASS_MEMBER_MODIFIERS.contains(&self.token_value())
        {
            return false;
        }
        self.look_ahead(|p| {
            p.next_token();
            !p.has_preceding_line_break() && p.is_start_of_property_name()
        })
    }

    fn parse_class_member(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let mut flags = NodeFlags::empty();
        while self.is_class_member_modifier() {
            if self.is_contextual("static") {
                flags |= NodeFlags::STATIC;
            } else if self.is_contextual("async") {
                flags |= NodeFlags::ASYNC;
            }
            self.next_token();
        }
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            flags |= NodeFlags::GENERATOR;
        }

        if self.is_contextual("constructor")
            && self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::OpenParenToken)
            })
        {
            self.next_token();
            return self.parse_method_rest(
                syntax_kind_ext::CONSTRUCTOR,
                start_pos,
                NodeIndex::NONE,
                flags,
            );
        }

        if !self.is_start_of_property_name() {
            return NodeIndex::NONE;
        }
        let name = self.parse_property_name();
        self.parse_optional(SyntaxKind::QuestionToken);
        self.parse_optional(SyntaxKind::ExclamationToken);

        if self.is_token(SyntaxKind::OpenParenToken) || self.is_token(SyntaxKind::LessThanToken) {
            return self.parse_method_rest(
                syntax_kind_ext::METHOD_DECLARATION,
                start_pos,
                name,
                flags,
            );
        }

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
        self.parse_semicolon();
        let property = self.arena.add_property_decl(
            start_pos,
            self.prev_token_end,
            PropertyDeclData {
                name,
                type_annotation,
                initializer,
            },
        );
        self.arena.add_flags(property, flags);
        property
    }
}
