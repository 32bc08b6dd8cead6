//! Name and field-access binding.

use fx_diagnostic::MessageKey;
use fx_ir::{Name, NodeId, NodeKind};
use fx_types::Type;

use super::Binder;
use crate::{NameResolver, Resolution, Symbol};

/// Bare identifier.
pub(super) fn bind_first_name(
    b: &mut Binder<'_>,
    id: NodeId,
    name: &Name,
    resolver: &NameResolver<'_>,
) -> Type {
    let Some(symbol) = resolver.lookup(name.as_str()) else {
        return b.error(id, MessageKey::UnknownIdentifier, [name]);
    };
    let Some(ty) = symbol.value_type() else {
        return b.error(id, MessageKey::NamespaceNotValue, [symbol.name()]);
    };
    b.resolve(id, Resolution::Symbol(symbol));
    ty
}

/// `left.right`: namespace member or field access.
pub(super) fn bind_dotted(
    b: &mut Binder<'_>,
    id: NodeId,
    left: NodeId,
    right: &Name,
    resolver: &NameResolver<'_>,
) -> Type {
    let tree = b.tree;
    if let NodeKind::FirstName { name } = tree.kind(left) {
        if let Some(namespace) = resolver.lookup(name.as_str()).filter(Symbol::is_namespace) {
            return bind_member(b, id, left, &namespace, right, resolver);
        }
    }

    let source = b.bind_expr(left, resolver);
    match &source {
        // The source already failed or is untyped; nothing new to report.
        Type::Error | Type::Unknown => source.clone(),
        Type::Record(_) => match source.get_field(right.as_str()) {
            Some(ty) => ty.clone(),
            None => b.error(id, MessageKey::UnknownField, [right.to_string(), source.to_string()]),
        },
        Type::Table(_) => match source.get_field(right.as_str()) {
            Some(ty) => Type::single_column_table(right.clone(), ty.clone()),
            None => b.error(id, MessageKey::UnknownField, [right.to_string(), source.to_string()]),
        },
        _ => b.error(
            id,
            MessageKey::InvalidDottedName,
            [right.to_string(), source.to_string()],
        ),
    }
}

fn bind_member(
    b: &mut Binder<'_>,
    id: NodeId,
    left: NodeId,
    namespace: &Symbol,
    member: &Name,
    resolver: &NameResolver<'_>,
) -> Type {
    b.resolve(left, Resolution::Symbol(namespace.clone()));
    b.node_mut(left).ty = Type::Void;

    if let Symbol::FunctionNamespace(ns) = namespace {
        return b.error(id, MessageKey::NamespaceNotValue, [format!("{ns}.{member}")]);
    }
    let Some(symbol) = resolver.lookup_member(namespace, member.as_str()) else {
        return b.error(
            id,
            MessageKey::UnknownField,
            [member.clone(), namespace.name().clone()],
        );
    };
    match symbol.value_type() {
        Some(ty) => {
            b.resolve(id, Resolution::Symbol(symbol));
            ty
        }
        None => Type::Error,
    }
}
