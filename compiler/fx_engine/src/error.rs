use fx_canon::IrError;
use fx_registry::{ConnectorError, RegistryError};

/// Errors surfaced by [`Engine`](crate::Engine).
///
/// Formula mistakes are never errors here; they come back as diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The engine produced a malformed IR tree.
    #[error("internal compiler error: {0}")]
    Internal(#[from] IrError),

    #[error(transparent)]
    Connector(#[from] ConnectorError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
