//! Folding a connector signature into a function descriptor.
//!
//! Each step consumes the builder and returns the next state, so the
//! adaptation reads as one pipeline and no step can observe a half-built
//! descriptor.

use std::collections::BTreeSet;

use fx_ir::{Name, NamespacePath};
use fx_types::{ServiceTag, Type};

use super::{ConnectorParam, ConnectorSignature, TypeTranslation};
use crate::{
    ConnectorError, DisabledFunction, FunctionDescriptor, FunctionFlags, FunctionOrigin,
    ParamSpec, ReturnType,
};

/// Name of the trailing parameter that collects optional parameters.
const OPTIONS_PARAM: &str = "options";

/// Result of adapting one signature.
#[derive(Clone, Debug)]
pub enum Adapted {
    Function(FunctionDescriptor),
    Disabled(DisabledFunction),
}

#[derive(Clone, Debug)]
pub struct ConnectorDescriptorBuilder {
    service: Name,
    namespace: NamespacePath,
    name: Name,
    params: Vec<ParamSpec>,
    hidden_required: Vec<Name>,
    options: Vec<(Name, Type)>,
    /// Names already used by positional or option parameters.
    taken: BTreeSet<Name>,
    returns: Type,
    flags: FunctionFlags,
    unsupported: Option<String>,
}

impl ConnectorDescriptorBuilder {
    pub fn new(service: &Name, signature: &ConnectorSignature) -> Self {
        let namespace = if signature.namespace.is_empty() {
            smallvec::smallvec![service.clone()]
        } else {
            signature.namespace.clone()
        };
        ConnectorDescriptorBuilder {
            service: service.clone(),
            namespace,
            name: signature.name.clone(),
            params: Vec::new(),
            hidden_required: Vec::new(),
            options: Vec::new(),
            taken: BTreeSet::new(),
            returns: Type::Void,
            flags: signature.flags | FunctionFlags::CONNECTOR,
            unsupported: None,
        }
    }

    /// Run the whole pipeline for one signature.
    pub fn adapt(service: &Name, signature: &ConnectorSignature) -> Result<Adapted, ConnectorError> {
        Self::new(service, signature)
            .required(&signature.required)?
            .optional(&signature.optional)
            .returns(&signature.returns)
            .build()
    }

    /// Positional parameters, in declaration order.
    pub fn required(mut self, params: &[ConnectorParam]) -> Result<Self, ConnectorError> {
        for param in params {
            if !self.taken.insert(param.name.clone()) {
                return Err(ConnectorError::DuplicateRequiredParam {
                    function: self.qualified_name(),
                    param: param.name.to_string(),
                });
            }
            let Some(ty) = self.translate(&param.ty) else {
                continue;
            };
            if param.is_hidden_required() {
                self.hidden_required.push(param.name.clone());
            }
            self.params.push(ParamSpec::value(param.name.clone(), ty));
        }
        Ok(self)
    }

    /// Optional parameters, collapsed into one trailing record.
    ///
    /// Must run after [`required`](Self::required): names that collide with
    /// an earlier parameter get the first free `_n` suffix.
    #[must_use]
    pub fn optional(mut self, params: &[ConnectorParam]) -> Self {
        for param in params {
            let name = unique_name(&param.name, &self.taken);
            self.taken.insert(name.clone());
            if let Some(ty) = self.translate(&param.ty) {
                self.options.push((name, ty));
            }
        }
        self
    }

    #[must_use]
    pub fn returns(mut self, returns: &TypeTranslation) -> Self {
        if let Some(ty) = self.translate(returns) {
            self.returns = ty.with_service(ServiceTag::new(self.service.clone()));
        }
        self
    }

    pub fn build(self) -> Result<Adapted, ConnectorError> {
        if let Some(reason) = self.unsupported {
            return Ok(Adapted::Disabled(DisabledFunction {
                namespace: self.namespace,
                name: self.name,
                reason,
            }));
        }

        let required = self.params.len();
        let mut params = self.params;
        let has_options = !self.options.is_empty();
        if has_options {
            let record = Type::record(self.options)?;
            let name = unique_name(&Name::new(OPTIONS_PARAM), &self.taken);
            params.push(ParamSpec::value(name, record));
        }

        let returns = ReturnType::Static(self.returns);
        let mut descriptor = FunctionDescriptor::builtin(self.name, params, returns)
            .in_namespace(self.namespace)
            .with_min_arity(required)
            .with_flags(self.flags);
        descriptor.options_record = has_options;
        descriptor.hidden_required = self.hidden_required;
        descriptor.origin = FunctionOrigin::Service(self.service);
        Ok(Adapted::Function(descriptor))
    }

    fn translate(&mut self, ty: &TypeTranslation) -> Option<Type> {
        match ty {
            TypeTranslation::Supported(ty) => Some(ty.clone()),
            TypeTranslation::Unsupported(reason) => {
                self.unsupported.get_or_insert_with(|| reason.clone());
                None
            }
        }
    }

    fn qualified_name(&self) -> String {
        let mut out = String::new();
        for segment in &self.namespace {
            out.push_str(segment.as_str());
            out.push('.');
        }
        out.push_str(self.name.as_str());
        out
    }
}

/// `base`, or `base_n` for the smallest `n` not in `taken`.
pub(crate) fn unique_name(base: &Name, taken: &BTreeSet<Name>) -> Name {
    if !taken.contains(base) {
        return base.clone();
    }
    let mut n = 1;
    loop {
        let candidate = base.with_suffix(n);
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
