//! Record and table constructors.

use std::collections::BTreeMap;

use fx_diagnostic::{Diagnostic, MessageKey};
use fx_ir::{Name, NodeId, RecordField};
use fx_registry::builtins::VALUE_COLUMN;
use fx_types::{coercion_plan, Type};
use rustc_hash::FxHashSet;

use super::{apply_plan, Binder};
use crate::{Coercion, NameResolver, NodeDetail};

/// `{ a: 1, b: "x" }`. A repeated field is reported and the last one wins.
pub(super) fn bind_record(
    b: &mut Binder<'_>,
    id: NodeId,
    fields: &[RecordField],
    resolver: &NameResolver<'_>,
) -> Type {
    let mut seen: FxHashSet<&Name> = FxHashSet::default();
    let mut types: BTreeMap<Name, Type> = BTreeMap::new();
    for field in fields {
        let ty = b.bind_expr(field.value, resolver);
        if !seen.insert(&field.name) {
            let diagnostic =
                Diagnostic::new(MessageKey::DuplicateField, field.name_span).with_arg(&field.name);
            b.report(id, diagnostic);
        }
        types.insert(field.name.clone(), ty);
    }
    Type::record(types).unwrap_or(Type::Error)
}

/// Row shape of a table constructor, fixed by its first typed row.
#[derive(Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Records,
    Scalars,
}

/// `[row, row, ...]`. Record rows union into the row type; scalar rows
/// become a single `Value` column.
pub(super) fn bind_table(
    b: &mut Binder<'_>,
    id: NodeId,
    rows: &[NodeId],
    resolver: &NameResolver<'_>,
) -> Type {
    let row_types: Vec<Type> = rows.iter().map(|&row| b.bind_expr(row, resolver)).collect();

    let rules = b.options.rules;
    let mut kind: Option<RowKind> = None;
    let mut target: Option<Type> = None;
    for (&row, ty) in rows.iter().zip(&row_types) {
        if ty.is_sentinel() {
            continue;
        }
        let row_kind = if ty.is_record() {
            RowKind::Records
        } else {
            RowKind::Scalars
        };
        let joined = match (&target, kind) {
            (None, _) => Some(ty.clone()),
            (Some(prev), Some(k)) if k == row_kind => Type::try_union(prev, ty, &rules),
            _ => None,
        };
        let Some(joined) = joined else {
            let prev = target.as_ref().map(ToString::to_string).unwrap_or_default();
            let span = b.span(row);
            b.report(
                id,
                Diagnostic::new(MessageKey::IncompatibleRecordFields, span)
                    .with_arg(ty)
                    .with_arg(prev),
            );
            return Type::Error;
        };
        kind = Some(row_kind);
        target = Some(joined);
    }

    let Some(target) = target else {
        return match row_types.first() {
            None => Type::empty_table(),
            // Only sentinel rows.
            Some(_) if row_types.iter().any(Type::is_error) => Type::Error,
            Some(_) => Type::Unknown,
        };
    };

    for (&row, ty) in rows.iter().zip(&row_types) {
        if ty.is_sentinel() {
            continue;
        }
        if let Some(plan) = coercion_plan(&target, ty, &rules) {
            let to = apply_plan(ty, &plan);
            b.node_mut(row).coercion = Some(Coercion { to, plan });
        }
    }

    if kind == Some(RowKind::Scalars) {
        b.node_mut(id).detail = NodeDetail::ScalarTable;
        return Type::single_column_table(VALUE_COLUMN, target);
    }
    target.to_table().unwrap_or(Type::Error)
}
