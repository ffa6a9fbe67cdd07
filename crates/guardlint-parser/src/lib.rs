//! Reference front end for guardlint.
//!
//! The guard-verification engine only needs a read-only tree with parent
//! links, source offsets and (for some rules) the static type name of a
//! receiver. This crate provides one such tree for a small
//! TypeScript-flavoured language:
//! - `NodeArena` / `NodeIndex` - arena-allocated AST with parent pointers
//! - `NodeAccess` - the minimal node view consumed by generic traversals
//! - `ParserState` - recursive-descent parser with error recovery
//! - `DeclaredTypeResolver` - static type names from annotations and `new`

pub mod parser;
pub use parser::{
    DeclaredTypeResolver, NodeAccess, NodeArena, NodeIndex, NodeList, NodeView, ParseDiagnostic,
    ParserState, syntax_kind_ext,
};
