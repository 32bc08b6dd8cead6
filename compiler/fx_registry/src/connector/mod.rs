//! Connector services.
//!
//! A host adapts an external API (OpenAPI or otherwise) into
//! [`ConnectorSignature`]s and registers them with
//! [`FunctionRegistry::add_service`]. Each signature is folded into an
//! ordinary [`FunctionDescriptor`], so connector calls type-check through the
//! same overload machinery as built-ins.
//!
//! # Parameter shape
//!
//! ```text
//! required:  id: s, region: s (default "eu", internal)
//! optional:  name: s, active: b
//!
//! Service.Get(id, region, { name: ..., active: ... })
//!             ^^  ^^^^^^  ^^^^^^^^^^^^^^^^^^^^^^^^^^
//!          positional  hidden   one trailing options record
//! ```
//!
//! A parameter or return type the host cannot translate disables the
//! function instead of failing the whole service; calls to it report
//! `FunctionDisabled`.

mod builder;

pub use builder::{Adapted, ConnectorDescriptorBuilder};

use fx_ir::{Literal, Name, NamespacePath};
use fx_types::Type;

use crate::{
    ConnectorError, DisabledFunction, FunctionFlags, FunctionId, FunctionRegistry, RegisterMode,
};

/// A connector type as translated by the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTranslation {
    Supported(Type),
    /// No formula type corresponds; the reason ends up in the diagnostic.
    Unsupported(String),
}

impl From<Type> for TypeTranslation {
    fn from(ty: Type) -> Self {
        TypeTranslation::Supported(ty)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectorParam {
    pub name: Name,
    pub ty: TypeTranslation,
    pub default: Option<Literal>,
    /// Filled in by the host, not by the formula author.
    pub internal: bool,
}

impl ConnectorParam {
    pub fn new(name: impl Into<Name>, ty: impl Into<TypeTranslation>) -> Self {
        ConnectorParam {
            name: name.into(),
            ty: ty.into(),
            default: None,
            internal: false,
        }
    }

    /// Internal parameter with a host default.
    #[must_use]
    pub fn hidden(mut self, default: Literal) -> Self {
        self.default = Some(default);
        self.internal = true;
        self
    }

    pub(crate) fn is_hidden_required(&self) -> bool {
        self.internal && self.default.is_some()
    }
}

/// One operation of a connector service.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectorSignature {
    /// Empty means the service name.
    pub namespace: NamespacePath,
    pub name: Name,
    pub required: Vec<ConnectorParam>,
    pub optional: Vec<ConnectorParam>,
    pub returns: TypeTranslation,
    pub flags: FunctionFlags,
}

impl ConnectorSignature {
    pub fn new(name: impl Into<Name>, returns: impl Into<TypeTranslation>) -> Self {
        ConnectorSignature {
            namespace: NamespacePath::new(),
            name: name.into(),
            required: Vec::new(),
            optional: Vec::new(),
            returns: returns.into(),
            flags: FunctionFlags::empty(),
        }
    }

    #[must_use]
    pub fn required(mut self, param: ConnectorParam) -> Self {
        self.required.push(param);
        self
    }

    #[must_use]
    pub fn optional(mut self, param: ConnectorParam) -> Self {
        self.optional.push(param);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: FunctionFlags) -> Self {
        self.flags |= flags;
        self
    }
}

/// Outcome of [`FunctionRegistry::add_service`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceReport {
    pub service: Option<Name>,
    pub registered: Vec<FunctionId>,
    pub disabled: Vec<DisabledFunction>,
}

impl FunctionRegistry {
    /// Register every operation of a connector service.
    ///
    /// All or nothing: a configuration error on any signature leaves the
    /// registry unchanged. Untranslatable signatures are not errors; they
    /// are recorded as disabled and listed in the report.
    #[tracing::instrument(level = "debug", skip_all, fields(service = %service))]
    pub fn add_service(
        &mut self,
        service: &Name,
        signatures: &[ConnectorSignature],
        mode: RegisterMode,
    ) -> Result<ServiceReport, ConnectorError> {
        let mut staged = self.clone();
        let mut report = ServiceReport {
            service: Some(service.clone()),
            ..ServiceReport::default()
        };

        for signature in signatures {
            match ConnectorDescriptorBuilder::adapt(service, signature)? {
                Adapted::Function(descriptor) => {
                    report.registered.push(staged.register_with(descriptor, mode)?);
                }
                Adapted::Disabled(disabled) => {
                    staged.mark_disabled(disabled.clone());
                    report.disabled.push(disabled);
                }
            }
        }

        tracing::debug!(
            registered = report.registered.len(),
            disabled = report.disabled.len(),
            "added connector service"
        );
        *self = staged;
        Ok(report)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
mod tests;
