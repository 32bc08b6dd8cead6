//! Name resolution and binding for the formula engine.
//!
//! [`bind`] walks a [`SyntaxTree`](fx_ir::SyntaxTree) once and produces a
//! [`BoundTree`]: a type, a resolution and an optional coercion for every
//! node, plus the diagnostics found along the way.
//!
//! - [`env`]: symbol table and the lambda scope chain
//! - [`bind`]: the binder itself
//! - [`output`]: the bound tree handed to the IR compiler

mod bind;
pub mod env;
pub mod output;

pub use bind::{bind, bind_with_cache, BindOptions};
pub use env::{NameResolver, Symbol, SymbolTable, THIS_RECORD};
pub use output::{
    BindResult, BoundCall, BoundNode, BoundTree, Coercion, LambdaScope, NodeDetail, Resolution,
};
