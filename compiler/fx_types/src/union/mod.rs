//! Type union: the most specific common supertype of two types.
//!
//! Used for conditional branches and table-constructor rows. Primitive kinds
//! join through widening entries of the coercion table only, unless loose
//! unification is enabled, in which case conversion entries count too and
//! the higher-ranked kind wins (Text above all).

use std::collections::BTreeMap;

use crate::coercion::{lookup, widens_to};
use crate::ty::AggregateType;
use crate::{CoercionRules, PrimitiveKind, Type};

impl Type {
    /// Union of `a` and `b`; `Error` where they have no common supertype.
    pub fn union(a: &Type, b: &Type, rules: &CoercionRules) -> Type {
        union_inner(a, b, rules).ty
    }

    /// Union of `a` and `b`, or `None` if they conflict anywhere, including
    /// inside aggregate fields.
    ///
    /// An `Error` input is not a conflict: it yields `Some(Error)`.
    pub fn try_union(a: &Type, b: &Type, rules: &CoercionRules) -> Option<Type> {
        let joined = union_inner(a, b, rules);
        (!joined.conflict).then_some(joined.ty)
    }
}

struct Joined {
    ty: Type,
    conflict: bool,
}

impl Joined {
    fn ok(ty: Type) -> Self {
        Joined {
            ty,
            conflict: false,
        }
    }

    fn conflict() -> Self {
        Joined {
            ty: Type::Error,
            conflict: true,
        }
    }
}

fn union_inner(a: &Type, b: &Type, rules: &CoercionRules) -> Joined {
    match (a, b) {
        (Type::Record(x), Type::Record(y)) => {
            let (agg, conflict) = union_fields(x, y, rules);
            return Joined {
                ty: Type::Record(agg),
                conflict,
            };
        }
        (Type::Table(x), Type::Table(y)) => {
            let (agg, conflict) = union_fields(x, y, rules);
            return Joined {
                ty: Type::Table(agg),
                conflict,
            };
        }
        _ => {}
    }

    if a == b {
        return Joined::ok(a.clone());
    }

    match (a, b) {
        (Type::Error, _) | (_, Type::Error) => Joined::ok(Type::Error),
        (Type::Unknown, other) | (other, Type::Unknown) => Joined::ok(other.clone()),
        (blank, other) if blank.is_blank() => Joined::ok(other.clone()),
        (other, blank) if blank.is_blank() => Joined::ok(other.clone()),
        (Type::Void, _) | (_, Type::Void) => Joined::ok(Type::Void),
        (Type::Primitive(x), Type::Primitive(y)) => {
            join_primitives(*x, *y, rules)
                .map_or_else(Joined::conflict, |k| Joined::ok(Type::Primitive(k)))
        }
        (Type::Enum(e), Type::Primitive(k)) | (Type::Primitive(k), Type::Enum(e)) => {
            if e.backing() == *k {
                Joined::ok(Type::Primitive(*k))
            } else {
                join_primitives(e.backing(), *k, rules)
                    .map_or_else(Joined::conflict, |k| Joined::ok(Type::Primitive(k)))
            }
        }
        _ => Joined::conflict(),
    }
}

fn join_primitives(x: PrimitiveKind, y: PrimitiveKind, rules: &CoercionRules) -> Option<PrimitiveKind> {
    if x == y {
        return Some(x);
    }
    if widens_to(y, x) {
        return Some(x);
    }
    if widens_to(x, y) {
        return Some(y);
    }
    if !rules.loose_unification {
        return None;
    }
    match (lookup(y, x, rules).is_some(), lookup(x, y, rules).is_some()) {
        (true, true) => Some(if x.unification_rank() >= y.unification_rank() {
            x
        } else {
            y
        }),
        (true, false) => Some(x),
        (false, true) => Some(y),
        (false, false) => None,
    }
}

/// Field-wise union; fields present on one side only are kept.
fn union_fields(x: &AggregateType, y: &AggregateType, rules: &CoercionRules) -> (AggregateType, bool) {
    let mut conflict = false;
    let mut fields: BTreeMap<_, _> = x.iter().map(|(n, t)| (n.clone(), t.clone())).collect();
    for (name, ty) in y.iter() {
        let merged = match fields.get(name) {
            Some(existing) => {
                let joined = union_inner(existing, ty, rules);
                conflict |= joined.conflict;
                joined.ty
            }
            None => ty.clone(),
        };
        fields.insert(name.clone(), merged);
    }
    let service = match (x.service(), y.service()) {
        (Some(a), Some(b)) if a == b => Some(a.clone()),
        _ => None,
    };
    (AggregateType::merged(fields, service), conflict)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
