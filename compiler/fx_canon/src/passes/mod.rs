//! IR rewrite passes.
//!
//! A pass consumes a tree and returns a rewritten one, optionally emitting
//! diagnostics. [`run_rewrite_passes`] validates after every pass so a
//! broken rewrite is caught where it happened instead of in the evaluator.

mod service;

pub use service::ServiceInjectionPass;

use fx_diagnostic::DiagnosticSink;

use crate::ir::IrNode;
use crate::{validate, IrError};

pub trait IrPass {
    /// Name used in logs and in [`IrError::InvalidPassOutput`].
    fn name(&self) -> &str;

    fn transform(&self, root: IrNode, sink: &mut dyn DiagnosticSink) -> IrNode;
}

pub type BoxedPass = Box<dyn IrPass + Send + Sync>;

/// Every pass the engine runs by default, in order.
pub fn default_passes() -> Vec<BoxedPass> {
    vec![Box::new(ServiceInjectionPass)]
}

/// Apply `passes` in order, validating the tree after each one.
#[tracing::instrument(level = "debug", skip_all, fields(passes = passes.len()))]
pub fn run_rewrite_passes(
    root: IrNode,
    passes: &[BoxedPass],
    sink: &mut dyn DiagnosticSink,
) -> Result<IrNode, IrError> {
    passes.iter().try_fold(root, |root, pass| {
        let rewritten = pass.transform(root, sink);
        tracing::trace!(pass = pass.name(), ir = %rewritten, "pass complete");
        validate(&rewritten).map_err(|err| IrError::InvalidPassOutput {
            pass: pass.name().to_owned(),
            source: Box::new(err),
        })?;
        Ok(rewritten)
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
