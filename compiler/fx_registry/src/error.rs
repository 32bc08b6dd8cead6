//! Registry configuration errors.
//!
//! These are host mistakes caught while building the registry, not user
//! formula errors; the binder never sees them.

use fx_types::TypeConstructionError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("function `{function}` is already registered with signature {signature}")]
    DuplicateFunction { function: String, signature: String },

    #[error("overloads of `{function}` disagree about which arguments are lambdas")]
    ConflictingLambdaLayout { function: String },

    #[error("invalid descriptor for `{function}`: {reason}")]
    InvalidDescriptor { function: String, reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConnectorError {
    #[error("connector function `{function}` declares required parameter `{param}` twice")]
    DuplicateRequiredParam { function: String, param: String },

    #[error(transparent)]
    Type(#[from] TypeConstructionError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
