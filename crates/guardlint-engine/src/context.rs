//! Per-file analysis context and shared tree queries.
//!
//! An `AnalysisContext` borrows one parsed file for the duration of a pass:
//! the arena, its root, the file name and a type oracle. Everything the rule
//! evaluator, the guard search and the fix synthesizer need to ask about the
//! shape of the tree lives here, so that each of those modules reads as the
//! algorithm it implements.

use guardlint_common::limits::MAX_TREE_WALK_ITERATIONS;
use guardlint_parser::parser::node::{Node, NodeArena};
use guardlint_parser::{DeclaredTypeResolver, NodeIndex, syntax_kind_ext};
use guardlint_scanner::SyntaxKind;

/// Continuation combinators whose callback arguments run at a later time.
///
/// A call inside a function literal passed to one of these never inherits
/// a guard from the scope that registered the callback.
pub const CONTINUATION_COMBINATORS: &[&str] = &[
    "then",
    "whenComplete",
    "catchError",
    "onError",
    "finally",
    "catch",
];

// =============================================================================
// Type oracle
// =============================================================================

/// Resolved static type of an expression, as far as the host knows it.
pub trait TypeOracle {
    /// Head name of the static type of `expr` (`StreamController` for
    /// `StreamController<int>`), or `None` when unknown.
    fn static_type_name(&self, expr: NodeIndex) -> Option<&str>;
}

impl TypeOracle for DeclaredTypeResolver<'_> {
    fn static_type_name(&self, expr: NodeIndex) -> Option<&str> {
        self.declared_type_of(expr)
    }
}

/// Oracle for hosts without type information. Typed rules never fire.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTypeInfo;

impl TypeOracle for NoTypeInfo {
    fn static_type_name(&self, _expr: NodeIndex) -> Option<&str> {
        None
    }
}

// =============================================================================
// Call sites
// =============================================================================

/// Callee shape of a call or `new` expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallSite<'a> {
    pub node: NodeIndex,
    /// Operation name: the last name of the callee.
    pub name: &'a str,
    /// Explicit receiver (`r` in `r.op()`); `None` for a bare `op()` or a
    /// constructor call.
    pub receiver: Option<NodeIndex>,
}

// =============================================================================
// Analysis context
// =============================================================================

/// Read-only view of one parsed file for one analysis pass.
pub struct AnalysisContext<'a> {
    pub arena: &'a NodeArena,
    pub root: NodeIndex,
    pub file_name: &'a str,
    pub types: &'a dyn TypeOracle,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        arena: &'a NodeArena,
        root: NodeIndex,
        file_name: &'a str,
        types: &'a dyn TypeOracle,
    ) -> AnalysisContext<'a> {
        AnalysisContext {
            arena,
            root,
            file_name,
            types,
        }
    }

    /// Full source text of the file.
    pub fn source_text(&self) -> &'a str {
        self.arena.source_text().unwrap_or("")
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> Option<&'a Node> {
        self.arena.get(index)
    }

    #[inline]
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.arena.parent_of(index)
    }

    pub fn text_of(&self, index: NodeIndex) -> Option<&'a str> {
        self.arena.node_text(index)
    }

    /// Strip parentheses and non-null assertions.
    pub fn skip_parens(&self, mut index: NodeIndex) -> NodeIndex {
        for _ in 0..MAX_TREE_WALK_ITERATIONS {
            let Some(node) = self.arena.get(index) else {
                return index;
            };
            if let Some(paren) = self.arena.get_parenthesized(node) {
                index = paren.expression;
            } else if node.kind == syntax_kind_ext::NON_NULL_EXPRESSION {
                match self.arena.get_unary_expr_ex(node) {
                    Some(inner) => index = inner.expression,
                    None => return index,
                }
            } else {
                return index;
            }
        }
        index
    }

    pub fn is_this(&self, index: NodeIndex) -> bool {
        let index = self.skip_parens(index);
        self.arena
            .get(index)
            .is_some_and(|n| n.kind == SyntaxKind::ThisKeyword as u16)
    }

    /// Decompose a call or `new` expression into its operation name and
    /// receiver. Element-access callees and computed callees yield `None`.
    pub fn call_site(&self, index: NodeIndex) -> Option<CallSite<'a>> {
        let arena = self.arena;
        let node = arena.get(index)?;
        let is_new = node.kind == syntax_kind_ext::NEW_EXPRESSION;
        if node.kind != syntax_kind_ext::CALL_EXPRESSION && !is_new {
            return None;
        }
        let call = arena.get_call_expr(node)?;
        let callee = self.skip_parens(call.expression);
        let callee_node = arena.get(callee)?;

        if callee_node.kind == syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION {
            let access = arena.get_access_expr(callee_node)?;
            let name = arena.identifier_text(access.name_or_argument)?;
            // `new ns.Widget()` qualifies a constructor; it has no receiver.
            let receiver = (!is_new).then_some(access.expression);
            return Some(CallSite {
                node: index,
                name,
                receiver,
            });
        }

        let name = arena.identifier_text(callee)?;
        Some(CallSite {
            node: index,
            name,
            receiver: None,
        })
    }

    /// Callee name of the call whose argument list contains `index`
    /// directly, if any.
    pub fn call_taking_argument(&self, index: NodeIndex) -> Option<CallSite<'a>> {
        let parent = self.parent(index);
        let parent_node = self.arena.get(parent)?;
        let call = self.arena.get_call_expr(parent_node)?;
        let is_argument = call
            .arguments
            .as_ref()
            .is_some_and(|args| args.nodes.contains(&index));
        if !is_argument {
            return None;
        }
        self.call_site(parent)
    }

    /// Innermost function-like node strictly enclosing `index`.
    pub fn enclosing_function(&self, index: NodeIndex) -> Option<NodeIndex> {
        let mut current = self.parent(index);
        let mut iterations = 0;
        while current.is_some() {
            iterations += 1;
            if iterations > MAX_TREE_WALK_ITERATIONS {
                return None;
            }
            if self.arena.get(current)?.is_function_like() {
                return Some(current);
            }
            current = self.parent(current);
        }
        None
    }

    /// Is `function` a function literal passed straight to a continuation
    /// combinator (`future.then((v) => ...)`)?
    pub fn is_combinator_callback(&self, function: NodeIndex) -> bool {
        let Some(node) = self.arena.get(function) else {
            return false;
        };
        if !node.is_function_literal() {
            return false;
        }
        self.call_taking_argument(function)
            .is_some_and(|call| CONTINUATION_COMBINATORS.contains(&call.name))
    }

    /// Body of a function-like node.
    pub fn function_body(&self, function: NodeIndex) -> Option<NodeIndex> {
        let node = self.arena.get(function)?;
        let body = self.arena.get_function(node)?.body;
        body.is_some().then_some(body)
    }

    /// Is `ancestor` on the parent chain of `index` (or equal to it)?
    pub fn contains(&self, ancestor: NodeIndex, index: NodeIndex) -> bool {
        let mut current = index;
        let mut iterations = 0;
        while current.is_some() && iterations < MAX_TREE_WALK_ITERATIONS {
            if current == ancestor {
                return true;
            }
            current = self.parent(current);
            iterations += 1;
        }
        false
    }
}
