//! Binder output.
//!
//! A [`BoundTree`] is a side table over the syntax tree: one [`BoundNode`]
//! per [`NodeId`], filled in by a single traversal and never modified after.
//! The IR compiler reads it together with the syntax tree it was bound from.

use fx_diagnostic::Diagnostic;
use fx_ir::{Name, NodeId};
use fx_registry::{FunctionFlags, FunctionId};
use fx_types::{CoercionPlan, Type};

use crate::Symbol;

/// What a node refers to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Resolution {
    #[default]
    None,
    Symbol(Symbol),
    /// Selected overload of a call or operator.
    Function(FunctionId),
    /// A bare name passed to an identifier parameter (`Set(x, 1)`).
    Identifier(Name),
}

/// Implicit conversion applied to a node's value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coercion {
    /// Type after conversion.
    pub to: Type,
    pub plan: CoercionPlan,
}

/// Scope a lambda argument is evaluated in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LambdaScope {
    pub row: Type,
    pub alias: Option<Name>,
}

/// Selected overload of a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundCall {
    pub function: FunctionId,
    /// `Namespace.Name`, or the operator symbol.
    pub name: String,
    pub flags: FunctionFlags,
    /// Type of an options record the caller omitted; the IR supplies it.
    pub default_options: Option<Type>,
}

/// Node-kind-specific binding facts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NodeDetail {
    #[default]
    None,
    Call(BoundCall),
    /// Table constructor whose rows are scalars, wrapped as `Value` records.
    ScalarTable,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundNode {
    pub ty: Type,
    pub resolution: Resolution,
    pub coercion: Option<Coercion>,
    /// Set on arguments evaluated per row.
    pub lambda: Option<LambdaScope>,
    pub detail: NodeDetail,
    /// First error reported at this node.
    pub diagnostic: Option<Diagnostic>,
}

impl Default for BoundNode {
    fn default() -> Self {
        BoundNode {
            ty: Type::Error,
            resolution: Resolution::None,
            coercion: None,
            lambda: None,
            detail: NodeDetail::None,
            diagnostic: None,
        }
    }
}

impl BoundNode {
    pub fn call(&self) -> Option<&BoundCall> {
        match &self.detail {
            NodeDetail::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Type after any coercion.
    pub fn final_type(&self) -> &Type {
        self.coercion.as_ref().map_or(&self.ty, |c| &c.to)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundTree {
    nodes: Vec<BoundNode>,
    root: NodeId,
}

impl BoundTree {
    pub(crate) fn new(nodes: Vec<BoundNode>, root: NodeId) -> Self {
        BoundTree { nodes, root }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// # Panics
    /// Panics if `id` is not a node of the bound syntax tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &BoundNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&BoundNode> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn ty(&self, id: NodeId) -> &Type {
        &self.node(id).ty
    }

    /// Type of the whole expression; `Error` for an empty tree.
    pub fn root_type(&self) -> &Type {
        static EMPTY: Type = Type::Error;
        self.get(self.root).map_or(&EMPTY, |node| &node.ty)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Result of binding one expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindResult {
    pub tree: BoundTree,
    /// Every diagnostic, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl BindResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn root_type(&self) -> &Type {
        self.tree.root_type()
    }
}
