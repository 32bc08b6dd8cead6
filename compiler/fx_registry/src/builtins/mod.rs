//! The built-in function library and operator overloads.
//!
//! Built once per registry. Operators are registered first, then functions
//! in the order the library lists them; that order is the final overload
//! tie-breaker, so within one name the preferred overload comes first.

mod library;
mod operators;
mod returns;

pub use returns::VALUE_COLUMN;

use crate::{FunctionRegistry, RegistryError};

/// Register every built-in into `registry`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn install(registry: &mut FunctionRegistry) -> Result<(), RegistryError> {
    for descriptor in operators::operators().into_iter().chain(library::library()) {
        registry.register(descriptor)?;
    }
    tracing::debug!(functions = registry.len(), "installed built-ins");
    Ok(())
}

impl FunctionRegistry {
    /// A registry holding the built-in library.
    pub fn with_builtins() -> Result<Self, RegistryError> {
        let mut registry = FunctionRegistry::new();
        install(&mut registry)?;
        Ok(registry)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
