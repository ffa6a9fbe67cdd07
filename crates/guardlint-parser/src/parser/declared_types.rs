//! Declared static types of receiver expressions.
//!
//! There is no type checker behind this: the resolver only knows what is
//! written at a declaration site. A binding's type is the head name of its
//! annotation (`StreamController` for `StreamController<int>`), or the callee
//! of a `new` initializer when the annotation is absent. Identifiers are
//! resolved lexically; `this.field` is resolved against the enclosing class.

use super::base::NodeIndex;
use super::node::NodeArena;
use super::node_access::is_function_like_kind;
use super::syntax_kind_ext::*;
use guardlint_common::limits::MAX_TREE_WALK_ITERATIONS;
use guardlint_scanner::SyntaxKind;
use rustc_hash::FxHashMap;
use tracing::trace;

#[derive(Clone, Copy, Debug)]
struct LocalBinding<'a> {
    /// Node whose subtree the binding is visible in.
    scope: NodeIndex,
    type_name: &'a str,
}

/// Lexical type lookup over one parsed file.
pub struct DeclaredTypeResolver<'a> {
    arena: &'a NodeArena,
    locals: FxHashMap<&'a str, Vec<LocalBinding<'a>>>,
    fields: FxHashMap<(NodeIndex, &'a str), &'a str>,
}

impl<'a> DeclaredTypeResolver<'a> {
    /// Index every typed declaration of the arena in one pass.
    pub fn new(arena: &'a NodeArena) -> DeclaredTypeResolver<'a> {
        let mut resolver = DeclaredTypeResolver {
            arena,
            locals: FxHashMap::default(),
            fields: FxHashMap::default(),
        };

        for (i, node) in arena.nodes.iter().enumerate() {
            let index = NodeIndex(i as u32);
            match node.kind {
                k if k == VARIABLE_DECLARATION => {
                    if let Some(decl) = arena.get_variable_declaration(node) {
                        resolver.add_local(index, decl.name, decl.type_annotation, decl.initializer);
                    }
                }
                k if k == PARAMETER => {
                    if let Some(param) = arena.get_parameter(node) {
                        resolver.add_local(
                            index,
                            param.name,
                            param.type_annotation,
                            param.initializer,
                        );
                    }
                }
                k if k == PROPERTY_DECLARATION => {
                    let Some(prop) = arena.get_property_decl(node) else {
                        continue;
                    };
                    let class = arena.parent_of(index);
                    let Some(name) = arena.identifier_text(prop.name) else {
                        continue;
                    };
                    if let Some(type_name) =
                        resolver.type_of_declaration(prop.type_annotation, prop.initializer)
                    {
                        resolver.fields.insert((class, name), type_name);
                    }
                }
                _ => {}
            }
        }
        resolver
    }

    fn add_local(
        &mut self,
        declaration: NodeIndex,
        name: NodeIndex,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    ) {
        let Some(name) = self.arena.identifier_text(name) else {
            // Destructuring patterns carry no usable type.
            return;
        };
        let Some(type_name) = self.type_of_declaration(type_annotation, initializer) else {
            return;
        };
        let Some(scope) = self.binding_scope(declaration) else {
            return;
        };
        self.locals
            .entry(name)
            .or_default()
            .push(LocalBinding { scope, type_name });
    }

    /// Head type name from an annotation, else from a `new` initializer.
    fn type_of_declaration(
        &self,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    ) -> Option<&'a str> {
        let arena = self.arena;
        if let Some(type_ref) = arena.get(type_annotation).and_then(|n| arena.get_type_ref(n)) {
            if !type_ref.type_name.is_empty() {
                return Some(type_ref.type_name.as_str());
            }
        }
        let init = self.skip_wrappers(initializer);
        let node = arena.get(init)?;
        if node.kind != NEW_EXPRESSION {
            return None;
        }
        let call = arena.get_call_expr(node)?;
        self.callee_name(call.expression)
    }

    /// Last name of a callee: `Foo` for `Foo` and `ns.Foo`.
    fn callee_name(&self, callee: NodeIndex) -> Option<&'a str> {
        let arena = self.arena;
        let node = arena.get(callee)?;
        if let Some(access) = arena.get_access_expr(node) {
            if node.kind == PROPERTY_ACCESS_EXPRESSION {
                return arena.identifier_text(access.name_or_argument);
            }
            return None;
        }
        arena.identifier_text(callee)
    }

    /// Nearest ancestor that bounds the visibility of a declaration.
    fn binding_scope(&self, declaration: NodeIndex) -> Option<NodeIndex> {
        let mut current = self.arena.parent_of(declaration);
        let mut iterations = 0;
        while current.is_some() {
            iterations += 1;
            if iterations > MAX_TREE_WALK_ITERATIONS {
                return None;
            }
            let kind = self.arena.get(current)?.kind;
            if kind == BLOCK
                || kind == SOURCE_FILE
                || kind == FOR_STATEMENT
                || kind == FOR_OF_STATEMENT
                || kind == FOR_IN_STATEMENT
                || kind == CATCH_CLAUSE
                || is_function_like_kind(kind)
            {
                return Some(current);
            }
            current = self.arena.parent_of(current);
        }
        None
    }

    fn skip_wrappers(&self, mut index: NodeIndex) -> NodeIndex {
        let arena = self.arena;
        for _ in 0..MAX_TREE_WALK_ITERATIONS {
            let Some(node) = arena.get(index) else {
                return index;
            };
            if let Some(paren) = arena.get_parenthesized(node) {
                index = paren.expression;
            } else if node.kind == NON_NULL_EXPRESSION || node.kind == AWAIT_EXPRESSION {
                match arena.get_unary_expr_ex(node) {
                    Some(inner) => index = inner.expression,
                    None => return index,
                }
            } else {
                return index;
            }
        }
        index
    }

    /// Declared type head name of `expr`: an identifier or `this.field`.
    pub fn declared_type_of(&self, expr: NodeIndex) -> Option<&'a str> {
        let arena = self.arena;
        let expr = self.skip_wrappers(expr);
        let node = arena.get(expr)?;

        if let Some(name) = arena.identifier_text(expr) {
            let bindings = self.locals.get(name)?;
            let mut current = arena.parent_of(expr);
            let mut iterations = 0;
            while current.is_some() && iterations < MAX_TREE_WALK_ITERATIONS {
                // Innermost scope wins; a later binding in the same scope shadows.
                if let Some(binding) = bindings.iter().rev().find(|b| b.scope == current) {
                    return Some(binding.type_name);
                }
                current = arena.parent_of(current);
                iterations += 1;
            }
            trace!(name, "no typed binding in scope");
            return None;
        }

        if node.kind == PROPERTY_ACCESS_EXPRESSION {
            let access = arena.get_access_expr(node)?;
            let receiver = arena.get(access.expression)?;
            if receiver.kind != SyntaxKind::ThisKeyword as u16 {
                return None;
            }
            let field = arena.identifier_text(access.name_or_argument)?;
            let class = self.enclosing_class(expr)?;
            return self.fields.get(&(class, field)).copied();
        }
        None
    }

    fn enclosing_class(&self, index: NodeIndex) -> Option<NodeIndex> {
        let mut current = self.arena.parent_of(index);
        let mut iterations = 0;
        while current.is_some() && iterations < MAX_TREE_WALK_ITERATIONS {
            if self.arena.get(current)?.kind == CLASS_DECLARATION {
                return Some(current);
            }
            current = self.arena.parent_of(current);
            iterations += 1;
        }
        None
    }
}
