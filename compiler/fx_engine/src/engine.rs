//! The configured engine.

use fx_bind::{bind_with_cache, BindResult, SymbolTable};
use fx_canon::{compile_ir, default_passes, run_rewrite_passes, validate, BoxedPass, IrNode};
use fx_diagnostic::{Diagnostic, DiagnosticQueue};
use fx_ir::{Name, SyntaxTree};
use fx_registry::{
    ConnectorSignature, FunctionDescriptor, FunctionId, FunctionRegistry, OverloadCache,
    RegisterMode, ServiceReport,
};
use fx_types::{EnumType, OptionSetType, Type};
use rayon::prelude::*;

use crate::{EngineConfig, EngineError};

/// A bound and lowered expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compiled {
    pub ir: IrNode,
    /// Type of the whole expression.
    pub ty: Type,
    /// Binding and pass diagnostics, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Compiled {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Registry, symbols and settings shared by every expression it binds.
pub struct Engine {
    config: EngineConfig,
    registry: FunctionRegistry,
    symbols: SymbolTable,
    cache: OverloadCache,
    passes: Vec<BoxedPass>,
}

impl Engine {
    /// An engine with an empty registry and the default rewrite passes.
    pub fn new(config: EngineConfig) -> Self {
        Engine {
            config,
            registry: FunctionRegistry::new(),
            symbols: SymbolTable::new(),
            cache: OverloadCache::new(),
            passes: default_passes(),
        }
    }

    /// An engine with the built-in library installed.
    pub fn with_builtins(config: EngineConfig) -> Result<Self, EngineError> {
        let mut engine = Engine::new(config);
        engine.registry = FunctionRegistry::with_builtins()?;
        engine.symbols.sync_namespaces(&engine.registry);
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    // Configuration

    /// Add the fields of an ambient record as globals. Non-record types add
    /// nothing.
    pub fn set_ambient(&mut self, ambient: &Type) {
        if let Type::Record(fields) = ambient {
            for (name, ty) in fields.iter() {
                self.add_global(name.clone(), ty.clone());
            }
        }
    }

    pub fn add_global(&mut self, name: impl Into<Name>, ty: Type) {
        self.symbols = std::mem::take(&mut self.symbols).with_global(name, ty);
    }

    pub fn add_enum(&mut self, enum_type: EnumType) {
        self.symbols = std::mem::take(&mut self.symbols).with_enum(enum_type);
    }

    pub fn add_option_set(&mut self, option_set: OptionSetType) {
        self.symbols = std::mem::take(&mut self.symbols).with_option_set(option_set);
    }

    pub fn register_function(
        &mut self,
        descriptor: FunctionDescriptor,
    ) -> Result<FunctionId, EngineError> {
        let id = self.registry.register(descriptor)?;
        self.symbols.sync_namespaces(&self.registry);
        Ok(id)
    }

    /// Register a connector service. On error nothing is registered.
    #[tracing::instrument(level = "debug", skip_all, fields(service = %service))]
    pub fn add_service(
        &mut self,
        service: &Name,
        signatures: &[ConnectorSignature],
        mode: RegisterMode,
    ) -> Result<ServiceReport, EngineError> {
        let report = self.registry.add_service(service, signatures, mode)?;
        for disabled in &report.disabled {
            tracing::debug!(
                function = %disabled.name,
                reason = %disabled.reason,
                "connector function disabled"
            );
        }
        self.symbols.sync_namespaces(&self.registry);
        Ok(report)
    }

    /// Append a rewrite pass after the existing ones.
    pub fn add_pass(&mut self, pass: BoxedPass) {
        self.passes.push(pass);
    }

    // Binding and compilation

    pub fn bind(&self, tree: &SyntaxTree) -> BindResult {
        bind_with_cache(
            tree,
            &self.symbols,
            &self.registry,
            &self.cache,
            &self.config.bind_options(),
        )
    }

    /// Diagnostics only.
    pub fn check(&self, tree: &SyntaxTree) -> Vec<Diagnostic> {
        self.bind(tree).diagnostics
    }

    /// Bind, lower and run the rewrite passes.
    ///
    /// Type errors do not fail compilation: the affected subtrees lower to
    /// `Error` nodes and the diagnostics come back in [`Compiled`]. `Err`
    /// means the IR itself is malformed.
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = tree.len()))]
    pub fn compile(&self, tree: &SyntaxTree) -> Result<Compiled, EngineError> {
        let bound = self.bind(tree);
        let ir = compile_ir(&bound.tree, tree);
        validate(&ir)?;

        let mut queue = DiagnosticQueue::with_config(self.config.diagnostics.clone());
        queue.extend(bound.diagnostics);
        let ir = run_rewrite_passes(ir, &self.passes, &mut queue)?;

        Ok(Compiled {
            ty: bound.tree.root_type().clone(),
            ir,
            diagnostics: queue.flush(),
        })
    }

    /// Bind independent expressions in parallel. Results keep input order.
    #[tracing::instrument(level = "debug", skip_all, fields(trees = trees.len()))]
    pub fn bind_many(&self, trees: &[SyntaxTree]) -> Vec<BindResult> {
        trees.par_iter().map(|tree| self.bind(tree)).collect()
    }

    /// [`Engine::compile`] over independent expressions in parallel.
    pub fn compile_many(&self, trees: &[SyntaxTree]) -> Vec<Result<Compiled, EngineError>> {
        trees.par_iter().map(|tree| self.compile(tree)).collect()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("functions", &self.registry.len())
            .field("cache", &self.cache)
            .field("passes", &self.passes.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
mod tests;
