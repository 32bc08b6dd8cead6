//! Bound tree to IR lowering.
//!
//! A post-order walk over the syntax tree, reading each node's binding from
//! the [`BoundTree`]:
//!
//! - names become [`ResolvedObject`]s or [`IrKind::ScopeAccess`]
//! - calls and operators become [`IrKind::Call`], lambda arguments wrapped in
//!   [`IrKind::Lambda`], an omitted options record supplied as an empty
//!   record constructor
//! - recorded coercions become [`IrKind::Coerce`] or
//!   [`IrKind::AggregateCoercion`] around the converted node
//! - nodes that failed to bind and own a diagnostic become [`IrKind::Error`]

use fx_bind::{BoundNode, BoundTree, Coercion, NodeDetail, Resolution, Symbol};
use fx_ir::{Name, NodeId, NodeKind, RecordField, Span, SyntaxTree};
use fx_registry::builtins::VALUE_COLUMN;
use fx_stack::ensure_sufficient_stack;
use fx_types::{CoercionPlan, Type};
use rustc_hash::FxHashMap;

use crate::ir::{CallTarget, IrKind, IrNode, ResolvedObject};

/// Lower a bound expression to IR.
///
/// `syntax` must be the tree `bound` was produced from.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = syntax.len()))]
pub fn compile_ir(bound: &BoundTree, syntax: &SyntaxTree) -> IrNode {
    let root = bound.root();
    if syntax.get(root).is_none() {
        return IrNode::error(None, Span::DUMMY);
    }
    Lowerer { syntax, bound }.lower_expr(root)
}

struct Lowerer<'a> {
    syntax: &'a SyntaxTree,
    bound: &'a BoundTree,
}

impl Lowerer<'_> {
    fn lower_expr(&self, id: NodeId) -> IrNode {
        ensure_sufficient_stack(|| {
            let span = self.syntax.span(id);
            let Some(node) = self.bound.get(id) else {
                return IrNode::error(None, span);
            };
            if node.ty.is_error() {
                if let Some(diagnostic) = &node.diagnostic {
                    return IrNode::error(Some(diagnostic.clone()), span);
                }
            }
            let inner = self.lower_kind(id, node, span);
            wrap_coercion(inner, node.coercion.as_ref())
        })
    }

    fn lower_kind(&self, id: NodeId, node: &BoundNode, span: Span) -> IrNode {
        let ty = node.ty.clone();
        match self.syntax.kind(id) {
            NodeKind::Literal(literal) => IrNode::new(IrKind::Literal(literal.clone()), ty, span),
            NodeKind::FirstName { .. } => lower_resolution(node, span),
            NodeKind::DottedName { left, right } => {
                if matches!(node.resolution, Resolution::Symbol(_)) {
                    return lower_resolution(node, span);
                }
                let source = self.lower_expr(*left);
                IrNode::new(
                    IrKind::FieldAccess {
                        source: Box::new(source),
                        field: right.clone(),
                    },
                    ty,
                    span,
                )
            }
            NodeKind::Call { args, .. } => self.lower_call(node, args, span),
            NodeKind::Binary { left, right, .. } => self.lower_call(node, &[*left, *right], span),
            NodeKind::Unary { operand, .. } => self.lower_call(node, &[*operand], span),
            NodeKind::Record { fields } => self.lower_record(fields, ty, span),
            NodeKind::Table { rows } => self.lower_table(node, rows, span),
            // A scope source; the alias lives on the lambda's scope.
            NodeKind::As { source, .. } => self.lower_expr(*source),
            NodeKind::Chain { exprs } => {
                let exprs = exprs.iter().map(|&e| self.lower_expr(e)).collect();
                IrNode::new(IrKind::Chaining { exprs }, ty, span)
            }
            NodeKind::Error => IrNode::error(node.diagnostic.clone(), span),
        }
    }

    fn lower_call(&self, node: &BoundNode, args: &[NodeId], span: Span) -> IrNode {
        let Some(call) = node.call() else {
            return IrNode::error(node.diagnostic.clone(), span);
        };
        let mut lowered: Vec<IrNode> = args.iter().map(|&arg| self.lower_arg(arg)).collect();
        if call.default_options.is_some() {
            lowered.push(IrNode::new(
                IrKind::RecordCtor { fields: Vec::new() },
                Type::empty_record(),
                span,
            ));
        }
        IrNode::new(
            IrKind::Call {
                target: CallTarget::Function {
                    id: call.function,
                    name: call.name.clone(),
                },
                args: lowered,
                flags: call.flags.into(),
            },
            node.ty.clone(),
            span,
        )
    }

    fn lower_arg(&self, arg: NodeId) -> IrNode {
        let value = self.lower_expr(arg);
        match self.bound.get(arg) {
            Some(node) if node.lambda.is_some() => {
                let (ty, span) = (value.ty.clone(), value.span);
                IrNode::new(
                    IrKind::Lambda {
                        body: Box::new(value),
                    },
                    ty,
                    span,
                )
            }
            _ => value,
        }
    }

    /// Only the last occurrence of a repeated field survives.
    fn lower_record(&self, fields: &[RecordField], ty: Type, span: Span) -> IrNode {
        let last: FxHashMap<&Name, usize> = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (&field.name, i))
            .collect();
        let fields = fields
            .iter()
            .enumerate()
            .filter(|(i, field)| last.get(&field.name) == Some(i))
            .map(|(_, field)| (field.name.clone(), self.lower_expr(field.value)))
            .collect();
        IrNode::new(IrKind::RecordCtor { fields }, ty, span)
    }

    fn lower_table(&self, node: &BoundNode, rows: &[NodeId], span: Span) -> IrNode {
        let scalar = node.detail == NodeDetail::ScalarTable;
        let rows = rows
            .iter()
            .map(|&row| {
                let value = self.lower_expr(row);
                if scalar {
                    wrap_value_row(value)
                } else {
                    value
                }
            })
            .collect();
        IrNode::new(IrKind::TableCtor { rows }, node.ty.clone(), span)
    }
}

/// `{ Value: value }`
fn wrap_value_row(value: IrNode) -> IrNode {
    let ty = Type::record([(VALUE_COLUMN, value.ty.clone())]).unwrap_or(Type::Error);
    let span = value.span;
    IrNode::new(
        IrKind::RecordCtor {
            fields: vec![(Name::new(VALUE_COLUMN), value)],
        },
        ty,
        span,
    )
}

fn lower_resolution(node: &BoundNode, span: Span) -> IrNode {
    let ty = node.ty.clone();
    let kind = match &node.resolution {
        Resolution::Symbol(symbol) => match symbol {
            Symbol::Global { name, .. } => IrKind::ResolvedObject(ResolvedObject::Global(name.clone())),
            Symbol::ScopeField { name, depth, .. } => IrKind::ScopeAccess {
                depth: *depth,
                field: Some(name.clone()),
            },
            Symbol::Alias { depth, .. } => IrKind::ScopeAccess {
                depth: *depth,
                field: None,
            },
            Symbol::EnumMember { enum_type, member } => match enum_type.member(member.as_str()) {
                Some(value) => IrKind::ResolvedObject(ResolvedObject::EnumMember {
                    enum_name: enum_type.name().clone(),
                    member: member.clone(),
                    value: value.clone(),
                }),
                None => return IrNode::error(node.diagnostic.clone(), span),
            },
            Symbol::OptionSetMember { option_set, member } => {
                IrKind::ResolvedObject(ResolvedObject::OptionSetMember {
                    option_set: option_set.name().clone(),
                    member: member.clone(),
                })
            }
            Symbol::EnumNamespace(_)
            | Symbol::OptionSetNamespace(_)
            | Symbol::FunctionNamespace(_) => return IrNode::error(node.diagnostic.clone(), span),
        },
        Resolution::Identifier(name) => IrKind::ResolvedObject(ResolvedObject::Identifier(name.clone())),
        Resolution::None | Resolution::Function(_) => {
            return IrNode::error(node.diagnostic.clone(), span)
        }
    };
    IrNode::new(kind, ty, span)
}

fn wrap_coercion(inner: IrNode, coercion: Option<&Coercion>) -> IrNode {
    let Some(coercion) = coercion else {
        return inner;
    };
    let span = inner.span;
    let operand = Box::new(inner);
    let kind = match &coercion.plan {
        CoercionPlan::Primitive { from, to } => IrKind::Coerce {
            from: *from,
            to: *to,
            operand,
        },
        plan @ CoercionPlan::Aggregate { .. } => IrKind::AggregateCoercion {
            plan: plan.clone(),
            operand,
        },
    };
    IrNode::new(kind, coercion.to.clone(), span)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
