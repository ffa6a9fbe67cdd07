//! Parser module: arena, node data, access helpers and the parser itself.

mod base;
pub use base::{NodeIndex, NodeList};

pub mod node;
pub use node::*;

pub mod syntax_kind_ext;

mod node_access;
pub use node_access::{NodeAccess, NodeInfo, NodeView};

mod node_arena;

mod state;
pub use state::{ParseDiagnostic, ParserState};
mod state_expressions;
mod state_statements;

mod declared_types;
pub use declared_types::DeclaredTypeResolver;

#[cfg(test)]
#[path = "../../tests/parser_base_tests.rs"]
mod tests;
