//! Call and operator binding.
//!
//! # Resolution
//!
//! 1. Candidates: overloads of `(namespace, name)` whose arity admits the
//!    call. None at all is `UnknownIdentifier`, `FunctionDisabled` or
//!    `ArityMismatch` depending on what the registry knows about the name.
//! 2. Arguments: value arguments bind in the caller's scope. Lambda
//!    arguments then bind in a scope built from their scope-source argument
//!    (table rows, a record, or a permissive scope for sentinels). Overloads
//!    of one name share a lambda layout, so every argument binds once.
//! 3. Scoring: each candidate scores every argument `Exact` or `Coerced`; a
//!    rejected argument drops the candidate.
//! 4. Selection: the lexicographically best score wins, left to right; ties
//!    go to the earliest registered overload.
//! 5. Coercions for the winner are recorded on the argument nodes, and the
//!    call's type comes from the static or computed return type.

use std::sync::Arc;

use fx_diagnostic::{Diagnostic, MessageKey};
use fx_ir::{Name, NodeId, NodeKind, SyntaxTree};
use fx_registry::{operator_namespace, FunctionDescriptor, ParamUsage, ReturnContext};
use fx_types::{coercion_plan, Acceptance, CoercionRules, Type};
use smallvec::SmallVec;

use super::{apply_plan, Binder};
use crate::{BoundCall, Coercion, LambdaScope, NameResolver, NodeDetail, Resolution};

type Score = SmallVec<[Acceptance; 4]>;

/// `Name(args)` or `Namespace.Name(args)`.
pub(super) fn bind_call(
    b: &mut Binder<'_>,
    id: NodeId,
    namespace: &[Name],
    name: &Name,
    args: &[NodeId],
    resolver: &NameResolver<'_>,
) -> Type {
    let qualified = qualified_name(namespace, name);
    let candidates = b.overloads(namespace, name, args.len());
    if candidates.is_empty() {
        bind_args_permissively(b, args, resolver);
        return report_unresolved(b, id, namespace, name, &qualified, args.len());
    }
    resolve_call(b, id, &qualified, &candidates, args, resolver)
}

/// Binary and unary operators: calls into the operator namespace.
pub(super) fn bind_operator(
    b: &mut Binder<'_>,
    id: NodeId,
    symbol: &str,
    args: &[NodeId],
    resolver: &NameResolver<'_>,
) -> Type {
    let candidates = b.overloads(&operator_namespace(), &Name::new(symbol), args.len());
    resolve_call(b, id, symbol, &candidates, args, resolver)
}

fn resolve_call(
    b: &mut Binder<'_>,
    id: NodeId,
    qualified: &str,
    candidates: &[Arc<FunctionDescriptor>],
    args: &[NodeId],
    resolver: &NameResolver<'_>,
) -> Type {
    let Some(bound) = bind_arguments(b, qualified, candidates.first(), args, resolver) else {
        return Type::Error;
    };

    let rules = b.options.rules;
    let tree = b.tree;
    let mut best: Option<(Score, usize)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let Some(score) = score_candidate(tree, candidate, args, &bound.types, &rules) else {
            continue;
        };
        let better = match &best {
            Some((current, _)) => score < *current,
            None => true,
        };
        if better {
            best = Some((score, index));
        }
    }

    let Some((score, index)) = best else {
        let mut message = vec![qualified.to_owned()];
        message.extend(bound.types.iter().map(ToString::to_string));
        return b.error(id, MessageKey::NoMatchingOverload, message);
    };
    let descriptor = &candidates[index];
    tracing::debug!(function = qualified, overload = ?descriptor.id, "selected overload");

    record_coercions(b, descriptor, args, &bound.types, &score, &rules);

    let default_options = match descriptor.params.last() {
        Some(options) if descriptor.options_record && args.len() + 1 == descriptor.params.len() => {
            Some(options.ty.clone())
        }
        _ => None,
    };
    b.resolve(id, Resolution::Function(descriptor.id));
    b.node_mut(id).detail = NodeDetail::Call(BoundCall {
        function: descriptor.id,
        name: qualified.to_owned(),
        flags: descriptor.flags,
        default_options,
    });

    if descriptor.is_behavioral() && !b.options.allow_side_effects {
        return b.error(id, MessageKey::BehaviorNotAllowed, [qualified]);
    }

    let ctx = ReturnContext {
        args: &bound.types,
        identifiers: &bound.identifiers,
        rules: &rules,
    };
    match descriptor.return_type(&ctx) {
        Ok(ty) => {
            record_join_coercions(b, descriptor, args, &bound.types, &ty, &rules);
            ty
        }
        Err(err) => {
            let span = err
                .arg
                .and_then(|i| args.get(i))
                .map_or_else(|| b.span(id), |&arg| b.span(arg));
            b.report(id, Diagnostic::new(err.key, span).with_args(err.args));
            Type::Error
        }
    }
}

/// Argument types and identifier names, by position.
struct BoundArgs {
    types: Vec<Type>,
    identifiers: Vec<Option<Name>>,
}

/// Bind every argument once, following the layout of `layout`.
///
/// `None` when a lambda's scope source is not a table or record; that has
/// been reported and the call is an error.
fn bind_arguments(
    b: &mut Binder<'_>,
    qualified: &str,
    layout: Option<&Arc<FunctionDescriptor>>,
    args: &[NodeId],
    resolver: &NameResolver<'_>,
) -> Option<BoundArgs> {
    let tree = b.tree;
    let n = args.len();
    let sources: SmallVec<[Option<usize>; 4]> = (0..n)
        .map(|i| layout.and_then(|d| d.lambda_source(i, n)))
        .collect();
    let is_source = |i: usize| sources.contains(&Some(i));
    let is_identifier = |i: usize| {
        layout
            .and_then(|d| d.param_at(i, n))
            .is_some_and(|p| p.usage == ParamUsage::Identifier)
    };

    let mut types = vec![Type::Error; n];
    let mut identifiers: Vec<Option<Name>> = vec![None; n];
    let mut aliases: Vec<Option<Name>> = vec![None; n];

    for (i, &arg) in args.iter().enumerate() {
        if sources[i].is_some() {
            continue;
        }
        types[i] = match tree.kind(arg) {
            NodeKind::FirstName { name } if is_identifier(i) => {
                identifiers[i] = Some(name.clone());
                b.resolve(arg, Resolution::Identifier(name.clone()));
                b.node_mut(arg).ty = Type::Unknown;
                Type::Unknown
            }
            NodeKind::As { source, alias } if is_source(i) => {
                aliases[i] = Some(alias.clone());
                let ty = b.bind_expr(*source, resolver);
                b.node_mut(arg).ty = ty.clone();
                ty
            }
            _ => b.bind_expr(arg, resolver),
        };
    }

    let mut scope_error = false;
    for (i, &arg) in args.iter().enumerate() {
        let Some(source) = sources[i] else {
            continue;
        };
        let row = match &types[source] {
            Type::Table(agg) => Type::Record(agg.clone()),
            ty @ (Type::Record(_) | Type::Error | Type::Unknown) => ty.clone(),
            other => {
                if !scope_error {
                    let other = other.clone();
                    b.error(args[source], MessageKey::InvalidScopeSource, [
                        qualified.to_owned(),
                        other.to_string(),
                    ]);
                }
                scope_error = true;
                Type::Error
            }
        };
        let alias = aliases[source].clone();
        let scoped = resolver.enter_scope(row.clone(), alias.clone());
        types[i] = b.bind_expr(arg, &scoped);
        b.node_mut(arg).lambda = Some(LambdaScope { row, alias });
    }

    (!scope_error).then_some(BoundArgs { types, identifiers })
}

/// Per-argument acceptance, or `None` if any argument is rejected.
fn score_candidate(
    tree: &SyntaxTree,
    candidate: &FunctionDescriptor,
    args: &[NodeId],
    types: &[Type],
    rules: &CoercionRules,
) -> Option<Score> {
    if !candidate.admits(types) {
        return None;
    }
    let n = args.len();
    let options_index = options_index(candidate);
    let mut score = Score::with_capacity(n);
    for (i, ty) in types.iter().enumerate() {
        let param = candidate.param_at(i, n)?;
        let acceptance = match param.usage {
            ParamUsage::Identifier => {
                if matches!(tree.kind(args[i]), NodeKind::FirstName { .. }) {
                    Acceptance::Exact
                } else {
                    Acceptance::Rejected
                }
            }
            _ if Some(i) == options_index => param.ty.check_accepts_partial(ty, false, rules),
            _ => param.ty.check_accepts(ty, false, rules),
        };
        if !acceptance.is_accepted() {
            return None;
        }
        score.push(acceptance);
    }
    Some(score)
}

fn record_coercions(
    b: &mut Binder<'_>,
    descriptor: &FunctionDescriptor,
    args: &[NodeId],
    types: &[Type],
    score: &[Acceptance],
    rules: &CoercionRules,
) {
    let n = args.len();
    for (i, acceptance) in score.iter().enumerate() {
        if *acceptance != Acceptance::Coerced {
            continue;
        }
        let Some(param) = descriptor.param_at(i, n) else {
            continue;
        };
        let Some(plan) = coercion_plan(&param.ty, &types[i], rules) else {
            continue;
        };
        let to = apply_plan(&types[i], &plan);
        b.node_mut(args[i]).coercion = Some(Coercion { to, plan });
    }
}

/// Coerce each joined argument to the joined result. For a table built
/// from records the target is the row type.
fn record_join_coercions(
    b: &mut Binder<'_>,
    descriptor: &FunctionDescriptor,
    args: &[NodeId],
    types: &[Type],
    joined: &Type,
    rules: &CoercionRules,
) {
    if joined.is_sentinel() {
        return;
    }
    for i in descriptor.joins.positions(args.len()) {
        let (Some(&arg), Some(ty)) = (args.get(i), types.get(i)) else {
            continue;
        };
        if ty.is_sentinel() || b.node_mut(arg).coercion.is_some() {
            continue;
        }
        let target = match (ty, joined.row_type()) {
            (Type::Record(_), Some(row)) => row,
            _ => joined.clone(),
        };
        if let Some(plan) = coercion_plan(&target, ty, rules) {
            let to = apply_plan(ty, &plan);
            b.node_mut(arg).coercion = Some(Coercion { to, plan });
        }
    }
}

fn options_index(descriptor: &FunctionDescriptor) -> Option<usize> {
    if descriptor.options_record {
        descriptor.params.len().checked_sub(1)
    } else {
        None
    }
}

/// No overload admits the argument count.
fn report_unresolved(
    b: &mut Binder<'_>,
    id: NodeId,
    namespace: &[Name],
    name: &Name,
    qualified: &str,
    arg_count: usize,
) -> Type {
    let registry = b.registry;
    if registry.contains(namespace, name) {
        let min = registry
            .overloads(namespace, name)
            .map(|d| d.min_arity)
            .min()
            .unwrap_or(0);
        // Unbounded if any overload is variadic.
        let max = registry
            .overloads(namespace, name)
            .try_fold(0, |acc, d| d.max_arity.map(|m| acc.max(m)));
        return b.error(id, MessageKey::ArityMismatch, [
            qualified.to_owned(),
            min.to_string(),
            max.map_or_else(|| "*".to_owned(), |max| max.to_string()),
            arg_count.to_string(),
        ]);
    }
    if let Some(disabled) = registry.disabled(namespace, name) {
        tracing::debug!(function = qualified, reason = %disabled.reason, "call to disabled function");
        let reason = disabled.reason.clone();
        return b.error(id, MessageKey::FunctionDisabled, [qualified.to_owned(), reason]);
    }
    b.error(id, MessageKey::UnknownIdentifier, [qualified])
}

/// Bind arguments of an unresolvable call without reporting their names.
fn bind_args_permissively(b: &mut Binder<'_>, args: &[NodeId], resolver: &NameResolver<'_>) {
    let tree = b.tree;
    let scoped = resolver.enter_scope(Type::Error, None);
    for &arg in args {
        if let NodeKind::As { source, .. } = tree.kind(arg) {
            let ty = b.bind_expr(*source, &scoped);
            b.node_mut(arg).ty = ty;
        } else {
            b.bind_expr(arg, &scoped);
        }
    }
}

fn qualified_name(namespace: &[Name], name: &Name) -> String {
    let mut out = String::new();
    for segment in namespace {
        out.push_str(segment.as_str());
        out.push('.');
    }
    out.push_str(name.as_str());
    out
}
