//! IR for the formula engine.
//!
//! ```text
//! SyntaxTree + BoundTree -> compile_ir -> IrNode -> run_rewrite_passes -> IrNode
//! ```
//!
//! The IR is an owned tree with every node typed, every name resolved and
//! every implicit conversion explicit. [`validate`] checks its structural
//! invariants; rewrite passes run through [`run_rewrite_passes`], which
//! validates after each one.

mod error;
pub mod ir;
mod lower;
pub mod passes;
mod validate;

pub use error::IrError;
pub use ir::{CallFlags, CallTarget, Intrinsic, IrKind, IrNode, ResolvedObject};
pub use lower::compile_ir;
pub use passes::{
    default_passes, run_rewrite_passes, BoxedPass, IrPass, ServiceInjectionPass,
};
pub use validate::validate;
