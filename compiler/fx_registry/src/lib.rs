//! Function registry for the formula engine.
//!
//! - [`FunctionDescriptor`]: parameters, arity, lambda layout and return type
//!   of one overload
//! - [`FunctionRegistry`]: overloads by `(namespace, name)`, in registration
//!   order
//! - [`OverloadCache`]: shared memo of arity-filtered overload lists
//! - [`builtins`]: the standard library and operator overloads
//! - [`connector`]: adapting connector service signatures into descriptors
//!
//! The registry is built during configuration and is read-only while
//! expressions bind.

pub mod builtins;
mod cache;
pub mod connector;
mod descriptor;
mod error;
mod registry;

pub use cache::{OverloadCache, Overloads};
pub use connector::{
    Adapted, ConnectorDescriptorBuilder, ConnectorParam, ConnectorSignature, ServiceReport,
    TypeTranslation,
};
pub use descriptor::{
    ArgGuard, DelegationCapability, FunctionDescriptor, FunctionFlags, FunctionId,
    FunctionOrigin, JoinedArgs, ParamSpec, ParamUsage, RepeatSpec, ReturnContext, ReturnType,
    ReturnTypeError, ReturnTypeFn, Signature,
};
pub use error::{ConnectorError, RegistryError};
pub use registry::{
    operator_namespace, DisabledFunction, FunctionKey, FunctionRegistry, RegisterMode,
    OPERATOR_NAMESPACE,
};
