//! Formula engine facade.
//!
//! Ties the phases together behind one configured [`Engine`]:
//!
//! ```text
//! SyntaxTree -> bind -> BoundTree -> compile_ir -> IrNode -> rewrite passes -> Compiled
//! ```
//!
//! The engine owns the function registry, the symbol table and a shared
//! overload cache. Configuration happens through `&mut self` methods;
//! binding and compiling only need `&self`, so one engine serves many
//! threads at once (see [`Engine::bind_many`]).

mod config;
mod engine;
mod error;
mod logging;

pub use config::EngineConfig;
pub use engine::{Compiled, Engine};
pub use error::EngineError;
pub use logging::init_tracing;

pub use fx_bind::BindResult;
pub use fx_canon::IrNode;
pub use fx_diagnostic::{Diagnostic, MessageKey, Severity};
