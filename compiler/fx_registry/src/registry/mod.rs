//! Function registry.
//!
//! Descriptors are stored once and indexed by `(namespace, name)`. Overloads
//! under one key keep registration order, which is the final overload
//! tie-breaker in the binder.
//!
//! # Lifecycle
//!
//! Registration is a single-threaded configuration phase. Once binding
//! starts the registry is shared immutably (behind `Arc` in the engine), and
//! every lookup is a read. Each mutation bumps [`FunctionRegistry::generation`]
//! so caches built against an older registry can tell they are stale.

use std::collections::BTreeSet;
use std::sync::Arc;

use fx_ir::{Name, NamespacePath};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{FunctionDescriptor, FunctionId, RegistryError};

/// Namespace holding the operator overloads (`+`, `=`, `Not`, ...).
///
/// Not a valid identifier, so it can never collide with a connector
/// namespace or be named from a formula.
pub const OPERATOR_NAMESPACE: &str = "$Operator";

pub fn operator_namespace() -> NamespacePath {
    smallvec::smallvec![Name::new(OPERATOR_NAMESPACE)]
}

/// What to do when an equal signature is already registered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RegisterMode {
    #[default]
    Reject,
    /// Replace the existing descriptor, keeping its id and position.
    Overwrite,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionKey {
    pub namespace: NamespacePath,
    pub name: Name,
}

impl FunctionKey {
    pub fn new(namespace: &[Name], name: &Name) -> Self {
        FunctionKey {
            namespace: namespace.iter().cloned().collect(),
            name: name.clone(),
        }
    }
}

/// A connector function left unregistered because its signature could not
/// be translated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DisabledFunction {
    pub namespace: NamespacePath,
    pub name: Name,
    pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    functions: Vec<Arc<FunctionDescriptor>>,
    by_name: FxHashMap<FunctionKey, SmallVec<[FunctionId; 4]>>,
    disabled: FxHashMap<FunctionKey, DisabledFunction>,
    /// First segments of every non-operator namespace.
    namespaces: BTreeSet<Name>,
    generation: u64,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register with [`RegisterMode::Reject`].
    pub fn register(&mut self, descriptor: FunctionDescriptor) -> Result<FunctionId, RegistryError> {
        self.register_with(descriptor, RegisterMode::Reject)
    }

    pub fn register_with(
        &mut self,
        mut descriptor: FunctionDescriptor,
        mode: RegisterMode,
    ) -> Result<FunctionId, RegistryError> {
        descriptor.validate()?;

        let key = FunctionKey::new(&descriptor.namespace, &descriptor.name);
        let signature = descriptor.signature();
        let existing = self.by_name.get(&key).cloned().unwrap_or_default();

        let same_signature = existing
            .iter()
            .copied()
            .find(|id| self.functions[id.index()].signature() == signature);

        if same_signature.is_some() && mode == RegisterMode::Reject {
            return Err(RegistryError::DuplicateFunction {
                function: descriptor.qualified_name(),
                signature: signature.to_string(),
            });
        }

        let layout_conflict = existing
            .iter()
            .filter(|id| Some(**id) != same_signature)
            .any(|id| !self.functions[id.index()].same_lambda_layout(&descriptor));
        if layout_conflict {
            return Err(RegistryError::ConflictingLambdaLayout {
                function: descriptor.qualified_name(),
            });
        }

        self.disabled.remove(&key);
        self.generation += 1;

        if let Some(id) = same_signature {
            descriptor.id = id;
            tracing::debug!(function = %descriptor.qualified_name(), ?id, "overwrote function");
            self.functions[id.index()] = Arc::new(descriptor);
            return Ok(id);
        }

        let id = FunctionId::new(u32::try_from(self.functions.len()).map_err(|_| {
            RegistryError::InvalidDescriptor {
                function: descriptor.qualified_name(),
                reason: "registry is full".to_owned(),
            }
        })?);
        descriptor.id = id;
        if let Some(first) = descriptor.namespace.first() {
            if first.as_str() != OPERATOR_NAMESPACE {
                self.namespaces.insert(first.clone());
            }
        }
        tracing::debug!(
            function = %descriptor.qualified_name(),
            ?id,
            signature = %signature,
            "registered function"
        );
        self.functions.push(Arc::new(descriptor));
        self.by_name.entry(key).or_default().push(id);
        Ok(id)
    }

    /// Record that a function exists but is unusable.
    pub(crate) fn mark_disabled(&mut self, disabled: DisabledFunction) {
        let key = FunctionKey::new(&disabled.namespace, &disabled.name);
        tracing::debug!(
            function = %disabled.name,
            reason = %disabled.reason,
            "disabled function"
        );
        if let Some(first) = disabled.namespace.first() {
            self.namespaces.insert(first.clone());
        }
        self.generation += 1;
        self.disabled.insert(key, disabled);
    }

    /// Every overload whose arity admits `arg_count`, in registration order.
    pub fn resolve_overloads(
        &self,
        namespace: &[Name],
        name: &Name,
        arg_count: usize,
    ) -> Vec<Arc<FunctionDescriptor>> {
        self.overloads(namespace, name)
            .filter(|d| d.accepts_arity(arg_count))
            .cloned()
            .collect()
    }

    /// Every overload under the name, any arity.
    pub fn overloads<'a>(
        &'a self,
        namespace: &[Name],
        name: &Name,
    ) -> impl Iterator<Item = &'a Arc<FunctionDescriptor>> + 'a {
        let ids = self
            .by_name
            .get(&FunctionKey::new(namespace, name))
            .map(|ids| ids.as_slice())
            .unwrap_or_default();
        ids.iter().map(|id| &self.functions[id.index()])
    }

    pub fn contains(&self, namespace: &[Name], name: &Name) -> bool {
        self.by_name.contains_key(&FunctionKey::new(namespace, name))
    }

    pub fn disabled(&self, namespace: &[Name], name: &Name) -> Option<&DisabledFunction> {
        self.disabled.get(&FunctionKey::new(namespace, name))
    }

    #[inline]
    pub fn get(&self, id: FunctionId) -> Option<&Arc<FunctionDescriptor>> {
        self.functions.get(id.index())
    }

    /// Namespaces formulas can name (`Office365` in `Office365.Send(...)`).
    pub fn namespaces(&self) -> impl Iterator<Item = &Name> {
        self.namespaces.iter()
    }

    pub fn is_namespace(&self, name: &str) -> bool {
        self.namespaces.contains(name)
    }

    /// Function names registered without a namespace.
    pub fn global_function_names(&self) -> impl Iterator<Item = &Name> {
        self.by_name
            .keys()
            .filter(|key| key.namespace.is_empty())
            .map(|key| &key.name)
    }

    /// Bumped on every mutation.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<FunctionDescriptor>> {
        self.functions.iter()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
mod tests;
