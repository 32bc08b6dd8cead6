use fx_ir::{Name, Span};
use thiserror::Error;

/// A structural invariant of the IR does not hold.
///
/// These indicate a bug in lowering or in a rewrite pass, never a problem
/// with the user's formula.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IrError {
    #[error("lambda at {span} is not a call argument")]
    LambdaOutsideCall { span: Span },

    #[error("scope access at {span} reaches depth {depth} with {scopes} enclosing lambdas")]
    ScopeDepthOutOfRange {
        span: Span,
        depth: usize,
        scopes: usize,
    },

    #[error("record constructor at {span} repeats field `{field}`")]
    DuplicateRecordField { span: Span, field: Name },

    #[error("table constructor row at {span} has type {ty}, expected a record")]
    TableRowNotRecord { span: Span, ty: String },

    #[error("pass `{pass}` produced invalid IR")]
    InvalidPassOutput {
        pass: String,
        #[source]
        source: Box<IrError>,
    },
}
