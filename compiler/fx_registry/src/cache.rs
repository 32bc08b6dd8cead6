//! Caller-owned memo of arity-compatible overloads.
//!
//! Keyed by `(namespace, name, arg_count)` and stamped with the registry
//! generation it was computed against. An entry from an older generation is
//! recomputed on the next lookup, so one cache can outlive registry edits
//! without serving stale candidates.

use std::sync::Arc;

use dashmap::DashMap;
use fx_ir::Name;
use rustc_hash::FxBuildHasher;

use crate::registry::FunctionKey;
use crate::{FunctionDescriptor, FunctionRegistry};

pub type Overloads = Arc<[Arc<FunctionDescriptor>]>;

struct CacheEntry {
    generation: u64,
    overloads: Overloads,
}

/// Thread-safe overload cache, shareable across parallel binds.
#[derive(Default)]
pub struct OverloadCache {
    entries: DashMap<(FunctionKey, usize), CacheEntry, FxBuildHasher>,
}

impl OverloadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// [`FunctionRegistry::resolve_overloads`], memoized.
    pub fn resolve(
        &self,
        registry: &FunctionRegistry,
        namespace: &[Name],
        name: &Name,
        arg_count: usize,
    ) -> Overloads {
        let key = (FunctionKey::new(namespace, name), arg_count);
        let generation = registry.generation();

        // Fast path: the guard must drop before the insert below.
        if let Some(entry) = self.entries.get(&key) {
            if entry.generation == generation {
                return Arc::clone(&entry.overloads);
            }
        }

        let overloads: Overloads = registry.resolve_overloads(namespace, name, arg_count).into();
        self.entries.insert(
            key,
            CacheEntry {
                generation,
                overloads: Arc::clone(&overloads),
            },
        );
        overloads
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl std::fmt::Debug for OverloadCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverloadCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
mod tests {
    use super::*;
    use crate::{ParamSpec, ReturnType};
    use fx_types::Type;

    fn len_fn(ty: Type) -> FunctionDescriptor {
        FunctionDescriptor::builtin(
            "Len",
            vec![ParamSpec::value("x", ty)],
            ReturnType::Static(Type::NUMBER),
        )
    }

    #[test]
    fn memoizes_per_generation() {
        let mut registry = FunctionRegistry::new();
        registry.register(len_fn(Type::TEXT)).unwrap();
        let cache = OverloadCache::new();
        let name = Name::new("Len");

        let first = cache.resolve(&registry, &[], &name, 1);
        let again = cache.resolve(&registry, &[], &name, 1);
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(cache.len(), 1);

        registry.register(len_fn(Type::empty_table())).unwrap();
        let fresh = cache.resolve(&registry, &[], &name, 1);
        assert_eq!(fresh.len(), 2);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn shared_across_threads() {
        let mut registry = FunctionRegistry::new();
        registry.register(len_fn(Type::TEXT)).unwrap();
        let cache = OverloadCache::new();
        let name = Name::new("Len");

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    assert_eq!(cache.resolve(&registry, &[], &name, 1).len(), 1);
                });
            }
        });
        assert_eq!(cache.len(), 1);
    }
}
