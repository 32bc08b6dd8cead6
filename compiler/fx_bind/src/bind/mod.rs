//! Expression binding.
//!
//! One recursive pass over the syntax tree, children before parents,
//! dispatching on [`NodeKind`] to the specialized modules:
//!
//! - Literals -> intrinsic primitive type
//! - Names -> resolver lookup, field access, enum and option-set members
//! - Calls and operators -> overload resolution with coercion recording
//! - Record and table constructors -> field-wise and row-wise typing
//!
//! Errors are local: a failing node gets type `Error`, which every parent
//! accepts without complaint, so one mistake produces one diagnostic.

mod calls;
mod constructors;
mod identifiers;

use fx_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue, MessageKey};
use fx_ir::{Literal, Name, NodeId, NodeKind, Span, SyntaxTree};
use fx_registry::{FunctionRegistry, OverloadCache, Overloads};
use fx_stack::ensure_sufficient_stack;
use fx_types::{CoercionPlan, CoercionRules, Type};

use crate::{BindResult, BoundNode, BoundTree, NameResolver, Resolution, SymbolTable};

/// Per-engine binding options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindOptions {
    pub rules: CoercionRules,
    /// Retry global, enum and namespace lookups ignoring ASCII case.
    pub case_insensitive_globals: bool,
    /// Permit behavior functions and `;` chaining.
    pub allow_side_effects: bool,
    pub diagnostics: DiagnosticConfig,
}

/// Bind a syntax tree.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = tree.len()))]
pub fn bind(
    tree: &SyntaxTree,
    symbols: &SymbolTable,
    registry: &FunctionRegistry,
    options: &BindOptions,
) -> BindResult {
    Binder::new(tree, registry, None, options).run(symbols)
}

/// [`bind`], reusing overload lookups through `cache`.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = tree.len()))]
pub fn bind_with_cache(
    tree: &SyntaxTree,
    symbols: &SymbolTable,
    registry: &FunctionRegistry,
    cache: &OverloadCache,
    options: &BindOptions,
) -> BindResult {
    Binder::new(tree, registry, Some(cache), options).run(symbols)
}

pub(crate) struct Binder<'a> {
    tree: &'a SyntaxTree,
    registry: &'a FunctionRegistry,
    cache: Option<&'a OverloadCache>,
    options: &'a BindOptions,
    nodes: Vec<BoundNode>,
    queue: DiagnosticQueue,
}

impl<'a> Binder<'a> {
    fn new(
        tree: &'a SyntaxTree,
        registry: &'a FunctionRegistry,
        cache: Option<&'a OverloadCache>,
        options: &'a BindOptions,
    ) -> Self {
        Binder {
            tree,
            registry,
            cache,
            options,
            nodes: vec![BoundNode::default(); tree.len()],
            queue: DiagnosticQueue::with_config(options.diagnostics.clone()),
        }
    }

    fn run(mut self, symbols: &SymbolTable) -> BindResult {
        let resolver =
            NameResolver::new(symbols).case_insensitive(self.options.case_insensitive_globals);
        let root = self.tree.root();
        if self.tree.get(root).is_some() {
            self.bind_expr(root, &resolver);
        }
        let diagnostics = self.queue.flush();
        tracing::debug!(diagnostics = diagnostics.len(), "bound expression");
        BindResult {
            tree: BoundTree::new(self.nodes, root),
            diagnostics,
        }
    }

    /// Bind one node and record its type.
    #[tracing::instrument(level = "trace", skip(self, resolver))]
    pub(crate) fn bind_expr(&mut self, id: NodeId, resolver: &NameResolver<'_>) -> Type {
        let ty = ensure_sufficient_stack(|| self.bind_expr_inner(id, resolver));
        self.node_mut(id).ty = ty.clone();
        ty
    }

    fn bind_expr_inner(&mut self, id: NodeId, resolver: &NameResolver<'_>) -> Type {
        let tree = self.tree;
        match tree.kind(id) {
            NodeKind::Literal(literal) => literal_type(literal),
            NodeKind::FirstName { name } => identifiers::bind_first_name(self, id, name, resolver),
            NodeKind::DottedName { left, right } => {
                identifiers::bind_dotted(self, id, *left, right, resolver)
            }
            NodeKind::Call {
                namespace,
                name,
                args,
            } => calls::bind_call(self, id, namespace, name, args, resolver),
            NodeKind::Binary { op, left, right } => {
                calls::bind_operator(self, id, op.as_symbol(), &[*left, *right], resolver)
            }
            NodeKind::Unary { op, operand } => {
                calls::bind_operator(self, id, op.as_symbol(), &[*operand], resolver)
            }
            NodeKind::Record { fields } => constructors::bind_record(self, id, fields, resolver),
            NodeKind::Table { rows } => constructors::bind_table(self, id, rows, resolver),
            NodeKind::As { source, .. } => {
                self.bind_expr(*source, resolver);
                self.error(id, MessageKey::AsNotAllowed, Vec::<String>::new())
            }
            NodeKind::Chain { exprs } => self.bind_chain(id, exprs, resolver),
            NodeKind::Error => Type::Error,
        }
    }

    fn bind_chain(&mut self, id: NodeId, exprs: &[NodeId], resolver: &NameResolver<'_>) -> Type {
        if !self.options.allow_side_effects {
            let span = self.span(id);
            self.report(id, Diagnostic::new(MessageKey::ChainingNotAllowed, span));
        }
        let mut ty = Type::Void;
        for &expr in exprs {
            ty = self.bind_expr(expr, resolver);
        }
        ty
    }

    // Helpers shared by the submodules

    fn overloads(&self, namespace: &[Name], name: &Name, arg_count: usize) -> Overloads {
        match self.cache {
            Some(cache) => cache.resolve(self.registry, namespace, name, arg_count),
            None => self
                .registry
                .resolve_overloads(namespace, name, arg_count)
                .into(),
        }
    }

    #[inline]
    fn span(&self, id: NodeId) -> Span {
        self.tree.span(id)
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut BoundNode {
        &mut self.nodes[id.index()]
    }

    fn resolve(&mut self, id: NodeId, resolution: Resolution) {
        self.node_mut(id).resolution = resolution;
    }

    /// Queue a diagnostic owned by node `owner`.
    fn report(&mut self, owner: NodeId, diagnostic: Diagnostic) {
        let node = self.node_mut(owner);
        if node.diagnostic.is_none() && diagnostic.is_error() {
            node.diagnostic = Some(diagnostic.clone());
        }
        self.queue.push(diagnostic);
    }

    /// Report `key` at `id` and return `Error`.
    fn error<I, T>(&mut self, id: NodeId, key: MessageKey, args: I) -> Type
    where
        I: IntoIterator<Item = T>,
        T: std::fmt::Display,
    {
        let span = self.span(id);
        self.report(id, Diagnostic::new(key, span).with_args(args));
        Type::Error
    }
}

fn literal_type(literal: &Literal) -> Type {
    match literal {
        Literal::Number(_) => Type::NUMBER,
        Literal::Decimal(_) => Type::DECIMAL,
        Literal::Text(_) => Type::TEXT,
        Literal::Boolean(_) => Type::BOOLEAN,
        Literal::Blank => Type::BLANK,
    }
}

/// `source` after the conversions in `plan`.
pub(crate) fn apply_plan(source: &Type, plan: &CoercionPlan) -> Type {
    match plan {
        CoercionPlan::Primitive { to, .. } => Type::Primitive(*to),
        CoercionPlan::Aggregate { fields, .. } => {
            fields.iter().fold(source.clone(), |acc, (name, inner)| {
                let converted = acc
                    .get_field(name.as_str())
                    .map_or(Type::Error, |field| apply_plan(field, inner));
                acc.with_field(name.clone(), converted).unwrap_or(Type::Error)
            })
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
