//! Diagnostics for the formula engine.
//!
//! The core never produces human-readable text. A [`Diagnostic`] carries a
//! source span, a [`Severity`], a stable [`MessageKey`] and positional
//! message arguments; hosts resolve the key against their own localization
//! table.
//!
//! [`DiagnosticQueue`] collects diagnostics from a whole compile and hands
//! them back in source-position order.

mod diagnostic;
mod message_key;
pub mod queue;

pub use diagnostic::{Diagnostic, Severity};
pub use message_key::MessageKey;
pub use queue::{DiagnosticConfig, DiagnosticQueue, DiagnosticSink};
