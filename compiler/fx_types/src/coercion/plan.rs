//! Field-by-field coercion plans.

use fx_ir::Name;

use super::lookup;
use crate::{CoercionRules, PrimitiveKind, Type};

/// What has to happen to a value of the source type to be used as the target.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CoercionPlan {
    Primitive {
        from: PrimitiveKind,
        to: PrimitiveKind,
    },
    /// Retype the listed fields; fields not listed pass through unchanged.
    Aggregate {
        table: bool,
        fields: Vec<(Name, CoercionPlan)>,
    },
}

impl CoercionPlan {
    /// Number of primitive conversions the plan performs.
    pub fn conversion_count(&self) -> usize {
        match self {
            CoercionPlan::Primitive { .. } => 1,
            CoercionPlan::Aggregate { fields, .. } => {
                fields.iter().map(|(_, plan)| plan.conversion_count()).sum()
            }
        }
    }
}

/// Plan for using `source` where `target` is expected.
///
/// `None` when nothing needs converting. Fields present on only one side are
/// skipped, so the same plan serves option records that supply a subset of
/// the declared fields. Callers check acceptance first.
pub fn coercion_plan(target: &Type, source: &Type, rules: &CoercionRules) -> Option<CoercionPlan> {
    match (target, source) {
        (Type::Primitive(to), Type::Primitive(from)) if to != from => {
            lookup(*from, *to, rules).map(|_| CoercionPlan::Primitive {
                from: *from,
                to: *to,
            })
        }
        (Type::Primitive(to), Type::Enum(e)) if e.backing() != *to => {
            lookup(e.backing(), *to, rules).map(|_| CoercionPlan::Primitive {
                from: e.backing(),
                to: *to,
            })
        }
        (Type::Record(t), Type::Record(s)) | (Type::Table(t), Type::Table(s)) => {
            let fields: Vec<_> = t
                .iter()
                .filter_map(|(name, tf)| {
                    let sf = s.get(name.as_str())?;
                    coercion_plan(tf, sf, rules).map(|plan| (name.clone(), plan))
                })
                .collect();
            (!fields.is_empty()).then(|| CoercionPlan::Aggregate {
                table: target.is_table(),
                fields,
            })
        }
        _ => None,
    }
}
