//! Computed return types for polymorphic built-ins.

use fx_diagnostic::MessageKey;
use fx_types::Type;

use crate::{JoinedArgs, ReturnContext, ReturnTypeError};

/// Column name of tables built from scalars.
pub const VALUE_COLUMN: &str = "Value";

fn arg(ctx: &ReturnContext<'_>, index: usize) -> Type {
    ctx.args.get(index).cloned().unwrap_or(Type::Error)
}

/// `First(T)`, `Last(T)`, `LookUp(T, p)`, `Patch(T, r, u)`: the row record.
pub(super) fn row_of_source(ctx: &ReturnContext<'_>) -> Result<Type, ReturnTypeError> {
    let source = arg(ctx, 0);
    Ok(source.row_type().unwrap_or(source))
}

/// `Filter(T, ...)`: the source table unchanged.
pub(super) fn same_as_source(ctx: &ReturnContext<'_>) -> Result<Type, ReturnTypeError> {
    Ok(arg(ctx, 0))
}

/// `LookUp(T, p, r)`: the reduction's type when present.
pub(super) fn lookup_result(ctx: &ReturnContext<'_>) -> Result<Type, ReturnTypeError> {
    if ctx.args.len() > 2 {
        Ok(arg(ctx, 2))
    } else {
        row_of_source(ctx)
    }
}

/// `With(r, body)`: the body's type.
pub(super) fn body_type(ctx: &ReturnContext<'_>) -> Result<Type, ReturnTypeError> {
    Ok(arg(ctx, 1))
}

/// `ForAll(T, body)`: a table of body records, or of single `Value` rows.
pub(super) fn for_all(ctx: &ReturnContext<'_>) -> Result<Type, ReturnTypeError> {
    Ok(match arg(ctx, 1) {
        Type::Record(agg) => Type::Table(agg),
        body @ (Type::Void | Type::Error | Type::Unknown) => body,
        scalar => Type::single_column_table(VALUE_COLUMN, scalar),
    })
}

/// `If(c1, v1, c2, v2, ..., else)`: union of every branch.
pub(super) fn if_branches(ctx: &ReturnContext<'_>) -> Result<Type, ReturnTypeError> {
    let branches = JoinedArgs::Branches.positions(ctx.args.len());
    union_all(ctx, branches, MessageKey::IncompatibleBranchTypes)
}

/// `Coalesce(a, b, ...)`: union of every argument.
pub(super) fn coalesce(ctx: &ReturnContext<'_>) -> Result<Type, ReturnTypeError> {
    union_all(ctx, 0..ctx.args.len(), MessageKey::IncompatibleBranchTypes)
}

/// `Table(r1, r2, ...)`: a table whose row type is the union of the records.
pub(super) fn table_of_records(ctx: &ReturnContext<'_>) -> Result<Type, ReturnTypeError> {
    if ctx.args.is_empty() {
        return Ok(Type::empty_table());
    }
    let row = union_all(ctx, 0..ctx.args.len(), MessageKey::IncompatibleRecordFields)?;
    Ok(row.to_table().unwrap_or(row))
}

/// `AddColumns(T, Name, value, ...)`: the source with each named column added.
pub(super) fn add_columns(ctx: &ReturnContext<'_>) -> Result<Type, ReturnTypeError> {
    let mut table = arg(ctx, 0);
    if table.is_sentinel() {
        return Ok(table);
    }
    for index in (1..ctx.args.len()).step_by(2) {
        let Some(Some(column)) = ctx.identifiers.get(index) else {
            continue;
        };
        table = table
            .with_field(column.clone(), arg(ctx, index + 1))
            .map_err(|_| ReturnTypeError::new(MessageKey::InvalidScopeSource).at(0))?;
    }
    Ok(table)
}

fn union_all(
    ctx: &ReturnContext<'_>,
    indices: impl IntoIterator<Item = usize>,
    key: MessageKey,
) -> Result<Type, ReturnTypeError> {
    let mut acc: Option<Type> = None;
    for index in indices {
        let ty = arg(ctx, index);
        acc = Some(match acc {
            None => ty,
            Some(prev) => Type::try_union(&prev, &ty, ctx.rules).ok_or_else(|| {
                ReturnTypeError::new(key)
                    .at(index)
                    .with_arg(&prev)
                    .with_arg(&ty)
            })?,
        });
    }
    Ok(acc.unwrap_or(Type::BLANK))
}
