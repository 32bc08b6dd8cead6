//! Formula IR foundations.
//!
//! Shared leaf types for every phase of the engine:
//! - [`Span`] for source locations
//! - [`Name`] and [`StringInterner`] for identifiers
//! - [`syntax`]: the syntax tree the host parser hands to the binder
//!
//! The syntax tree is flat: nodes live in one arena and reference children
//! by [`NodeId`], so the binder and IR compiler can keep per-node side
//! tables without back-pointers.

mod interner;
mod name;
mod span;
pub mod syntax;

pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;
pub use syntax::{
    BinaryOp, DecimalValue, Literal, NamespacePath, NodeId, NodeKind, RecordField, SyntaxNode,
    SyntaxTree, SyntaxTreeBuilder, UnaryOp,
};
