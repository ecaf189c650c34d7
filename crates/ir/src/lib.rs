//! Normalized C++ AST for **terra**.
//!
//! The dump produced by the external C++ front-end is decoded into the
//! typed node model in [`node`] through [`cast`], collected into a
//! [`ParseResult`] graph, and queried with the resolver in [`graph`].
//! The [`clang`] module models the compiler's native JSON AST used by the
//! enrichment passes.

pub mod cast;
pub mod clang;
pub mod graph;
pub mod names;
pub mod node;

pub use cast::{cast, files_from_json, CastError, TYPE_FIELD};
pub use clang::{parse_clang_ast, ClangKind, ClangLoc, ClangNode, ClangType, TagUsed};
pub use graph::{NameIndex, ParseResult};
pub use names::{get_namespace, join_scope, trim_namespace};
pub use node::{
    Clazz, Constructor, ConstructorInitializer, ConstructorInitializerKind, CxxFile, EnumConstant,
    Enumz, IncludeDirective, MemberFunction, MemberVariable, Node, NodeBase, NodeId, NodeKind,
    NodeRef, SimpleType, SimpleTypeKind, TerraNode, TypeAlias, Variable,
};

#[cfg(test)]
mod tests;
