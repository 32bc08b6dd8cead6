//! Connector service injection.
//!
//! Values produced by a connector carry a [`ServiceTag`] in their type. The
//! evaluator needs the service bound before such a value is used, so the
//! outermost node of each tagged subtree is wrapped in an
//! [`Intrinsic::InjectService`] call.
//!
//! Two phases. [`visit`] rewrites children bottom-up and returns a
//! [`Visited`] marker for each node without wrapping it yet; the parent
//! decides, because a tagged child under a parent with the same tag is left
//! to the parent. [`materialize`] then turns a `NeedsInjection` marker into
//! the wrapper.

use fx_diagnostic::{Diagnostic, DiagnosticSink, MessageKey};
use fx_stack::ensure_sufficient_stack;
use fx_types::ServiceTag;

use super::IrPass;
use crate::ir::{CallFlags, CallTarget, Intrinsic, IrKind, IrNode};

#[derive(Copy, Clone, Debug, Default)]
pub struct ServiceInjectionPass;

impl IrPass for ServiceInjectionPass {
    fn name(&self) -> &str {
        "service-injection"
    }

    fn transform(&self, root: IrNode, sink: &mut dyn DiagnosticSink) -> IrNode {
        let visited = visit(root, sink);
        materialize(visited, sink)
    }
}

enum Visited {
    Plain(IrNode),
    NeedsInjection(IrNode, ServiceTag),
}

impl Visited {
    fn tag(&self) -> Option<&ServiceTag> {
        match self {
            Visited::Plain(_) => None,
            Visited::NeedsInjection(_, tag) => Some(tag),
        }
    }
}

fn visit(node: IrNode, sink: &mut dyn DiagnosticSink) -> Visited {
    ensure_sufficient_stack(|| {
        let own = own_tag(&node);
        let cover = match &node.kind {
            IrKind::Call {
                target: CallTarget::Intrinsic(Intrinsic::InjectService { service }),
                ..
            } => Some(service.clone()),
            _ => own.clone(),
        };
        let IrNode { kind, ty, span } = node;
        let mut rewrite = |child: IrNode| {
            let child = visit(child, sink);
            if cover.is_some() && child.tag() == cover.as_ref() {
                // Covered by the parent's wrapper.
                match child {
                    Visited::Plain(n) | Visited::NeedsInjection(n, _) => n,
                }
            } else {
                materialize(child, sink)
            }
        };

        let kind = match kind {
            IrKind::Call {
                target,
                args,
                flags,
            } => IrKind::Call {
                target,
                args: args.into_iter().map(&mut rewrite).collect(),
                flags,
            },
            IrKind::RecordCtor { fields } => IrKind::RecordCtor {
                fields: fields
                    .into_iter()
                    .map(|(name, value)| (name, rewrite(value)))
                    .collect(),
            },
            IrKind::TableCtor { rows } => IrKind::TableCtor {
                rows: rows.into_iter().map(&mut rewrite).collect(),
            },
            IrKind::Chaining { exprs } => IrKind::Chaining {
                exprs: exprs.into_iter().map(&mut rewrite).collect(),
            },
            IrKind::FieldAccess { source, field } => IrKind::FieldAccess {
                source: Box::new(rewrite(*source)),
                field,
            },
            IrKind::Lambda { body } => IrKind::Lambda {
                body: Box::new(rewrite(*body)),
            },
            IrKind::Coerce { from, to, operand } => IrKind::Coerce {
                from,
                to,
                operand: Box::new(rewrite(*operand)),
            },
            IrKind::AggregateCoercion { plan, operand } => IrKind::AggregateCoercion {
                plan,
                operand: Box::new(rewrite(*operand)),
            },
            leaf @ (IrKind::Literal(_)
            | IrKind::ResolvedObject(_)
            | IrKind::ScopeAccess { .. }
            | IrKind::Error { .. }) => leaf,
        };

        let node = IrNode { kind, ty, span };
        match own {
            Some(tag) => Visited::NeedsInjection(node, tag),
            None => Visited::Plain(node),
        }
    })
}

/// Tag this node would be wrapped for, if any.
fn own_tag(node: &IrNode) -> Option<ServiceTag> {
    match &node.kind {
        // A lambda must stay a direct call argument; its body is wrapped instead.
        IrKind::Lambda { .. } | IrKind::Error { .. } => None,
        // Already injected.
        IrKind::Call {
            target: CallTarget::Intrinsic(Intrinsic::InjectService { .. }),
            ..
        } => None,
        _ => node.ty.service().cloned(),
    }
}

fn materialize(visited: Visited, sink: &mut dyn DiagnosticSink) -> IrNode {
    match visited {
        Visited::Plain(node) => node,
        Visited::NeedsInjection(node, service) => {
            tracing::trace!(service = %service.name(), span = %node.span, "injecting service");
            sink.emit(
                Diagnostic::new(MessageKey::ServiceInjected, node.span).with_arg(service.name()),
            );
            let (ty, span) = (node.ty.clone(), node.span);
            IrNode::new(
                IrKind::Call {
                    target: CallTarget::Intrinsic(Intrinsic::InjectService { service }),
                    args: vec![node],
                    flags: CallFlags::CONNECTOR,
                },
                ty,
                span,
            )
        }
    }
}
