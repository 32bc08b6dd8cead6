//! Type construction errors.
//!
//! These signal a programming error in the caller (a host building an
//! ambient scope, a connector adapter, the binder itself), never a problem
//! with the user's formula.

use fx_ir::Name;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeConstructionError {
    #[error("field `{field}` declared twice with different types (`{first}` and `{second}`)")]
    DuplicateField {
        field: Name,
        first: String,
        second: String,
    },
    #[error("`{ty}` has no fields")]
    NotAggregate { ty: String },
    #[error("table rows must be records, found `{ty}`")]
    RowNotRecord { ty: String },
}
