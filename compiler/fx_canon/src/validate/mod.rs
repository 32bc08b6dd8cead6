//! Structural validation of IR trees.
//!
//! Checked after lowering and after every rewrite pass:
//! - `Lambda` nodes appear only as direct call arguments
//! - `ScopeAccess` depths stay below the number of enclosing lambdas
//! - record constructor field names are unique
//! - table constructor rows are records (or sentinels)

use fx_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

use crate::ir::{IrKind, IrNode};
use crate::IrError;

/// Check every structural invariant; the first violation found is returned.
pub fn validate(root: &IrNode) -> Result<(), IrError> {
    check(root, 0, false)
}

fn check(node: &IrNode, scopes: usize, call_arg: bool) -> Result<(), IrError> {
    ensure_sufficient_stack(|| {
        match &node.kind {
            IrKind::Lambda { body } => {
                if !call_arg {
                    return Err(IrError::LambdaOutsideCall { span: node.span });
                }
                return check(body, scopes + 1, false);
            }
            IrKind::Call { args, .. } => {
                for arg in args {
                    check(arg, scopes, true)?;
                }
                return Ok(());
            }
            IrKind::ScopeAccess { depth, .. } if *depth >= scopes => {
                return Err(IrError::ScopeDepthOutOfRange {
                    span: node.span,
                    depth: *depth,
                    scopes,
                });
            }
            IrKind::RecordCtor { fields } => {
                let mut seen = FxHashSet::default();
                if let Some((name, _)) = fields.iter().find(|(name, _)| !seen.insert(name)) {
                    return Err(IrError::DuplicateRecordField {
                        span: node.span,
                        field: name.clone(),
                    });
                }
            }
            IrKind::TableCtor { rows } => {
                if let Some(row) = rows
                    .iter()
                    .find(|row| !row.ty.is_record() && !row.ty.is_sentinel())
                {
                    return Err(IrError::TableRowNotRecord {
                        span: row.span,
                        ty: row.ty.to_string(),
                    });
                }
            }
            _ => {}
        }
        node.children()
            .into_iter()
            .try_for_each(|child| check(child, scopes, false))
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
