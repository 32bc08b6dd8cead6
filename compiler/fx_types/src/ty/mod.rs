//! Structural type values.
//!
//! # Architecture
//!
//! A [`Type`] is an immutable value compared by shape. Aggregate field trees
//! live behind an `Arc<BTreeMap>`, so cloning a record type is a refcount bump
//! and equality never depends on the order fields were added.
//!
//! ```text
//! Type
//!  ├── Primitive(kind)          n, w, s, b, D, d, T, ...
//!  ├── Record(AggregateType)    ![a:n, b:s]
//!  ├── Table(AggregateType)     *[a:n]        (row type is the record)
//!  ├── OptionSet / Enum         named, compared by name
//!  └── Error / Unknown / Void   sentinels
//! ```
//!
//! Aggregates may carry a [`ServiceTag`]. The tag is metadata for IR rewrite
//! passes and is ignored by equality, hashing and acceptance.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use fx_ir::Name;

use crate::{PrimitiveKind, TypeConstructionError, TypeFlags};

/// Marks an aggregate as backed by a runtime connection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceTag(Name);

impl ServiceTag {
    pub fn new(service: impl Into<Name>) -> Self {
        ServiceTag(service.into())
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.0
    }
}

impl fmt::Display for ServiceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Field tree shared by record and table types.
#[derive(Clone, Debug)]
pub struct AggregateType {
    fields: Arc<BTreeMap<Name, Type>>,
    /// Propagated from the fields, plus `HAS_SERVICE` for a tagged aggregate.
    flags: TypeFlags,
    service: Option<ServiceTag>,
}

impl AggregateType {
    fn from_map(fields: BTreeMap<Name, Type>, service: Option<ServiceTag>) -> Self {
        let mut flags = TypeFlags::propagate_all(fields.values().map(Type::flags));
        if service.is_some() {
            flags |= TypeFlags::HAS_SERVICE;
        }
        AggregateType {
            fields: Arc::new(fields),
            flags,
            service,
        }
    }

    fn empty() -> Self {
        Self::from_map(BTreeMap::new(), None)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Type> {
        self.fields.get(name)
    }

    /// Fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Type)> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[inline]
    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    #[inline]
    pub fn service(&self) -> Option<&ServiceTag> {
        self.service.as_ref()
    }

    pub(crate) fn with_service(&self, service: Option<ServiceTag>) -> Self {
        Self::from_map((*self.fields).clone(), service)
    }

    fn with_field(&self, name: Name, ty: Type) -> Self {
        let mut fields = (*self.fields).clone();
        fields.insert(name, ty);
        Self::from_map(fields, self.service.clone())
    }

    pub(crate) fn merged(fields: BTreeMap<Name, Type>, service: Option<ServiceTag>) -> Self {
        Self::from_map(fields, service)
    }
}

impl PartialEq for AggregateType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields) || self.fields == other.fields
    }
}

impl Eq for AggregateType {}

impl Hash for AggregateType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fields.hash(state);
    }
}

/// Named set of members with display names.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OptionSetType {
    name: Name,
    members: Arc<BTreeMap<Name, Name>>,
}

impl OptionSetType {
    /// `members` are `(logical name, display name)` pairs.
    pub fn new<I, M, D>(name: impl Into<Name>, members: I) -> Self
    where
        I: IntoIterator<Item = (M, D)>,
        M: Into<Name>,
        D: Into<Name>,
    {
        OptionSetType {
            name: name.into(),
            members: Arc::new(
                members
                    .into_iter()
                    .map(|(m, d)| (m.into(), d.into()))
                    .collect(),
            ),
        }
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn display_name(&self, member: &str) -> Option<&Name> {
        self.members.get(member)
    }

    pub fn has_member(&self, member: &str) -> bool {
        self.members.contains_key(member)
    }

    pub fn members(&self) -> impl Iterator<Item = (&Name, &Name)> {
        self.members.iter()
    }
}

/// Value of an enum member, matching the enum's backing kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnumValue {
    Number(i64),
    Text(Name),
    Boolean(bool),
}

/// Named enumeration backed by a primitive kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumType {
    name: Name,
    backing: PrimitiveKind,
    members: Arc<BTreeMap<Name, EnumValue>>,
}

impl EnumType {
    pub fn new<I, M>(name: impl Into<Name>, backing: PrimitiveKind, members: I) -> Self
    where
        I: IntoIterator<Item = (M, EnumValue)>,
        M: Into<Name>,
    {
        EnumType {
            name: name.into(),
            backing,
            members: Arc::new(members.into_iter().map(|(m, v)| (m.into(), v)).collect()),
        }
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[inline]
    pub fn backing(&self) -> PrimitiveKind {
        self.backing
    }

    pub fn member(&self, member: &str) -> Option<&EnumValue> {
        self.members.get(member)
    }

    pub fn members(&self) -> impl Iterator<Item = (&Name, &EnumValue)> {
        self.members.iter()
    }
}

/// A formula type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveKind),
    Record(AggregateType),
    /// Many rows; the aggregate is the row type's field tree.
    Table(AggregateType),
    OptionSet(OptionSetType),
    Enum(EnumType),
    /// Result of a failed subexpression. Accepted everywhere.
    Error,
    /// Not yet known (untyped host data). Accepted everywhere.
    Unknown,
    /// No value; behavior functions and chains of them.
    Void,
}

impl Type {
    pub const NUMBER: Type = Type::Primitive(PrimitiveKind::Number);
    pub const DECIMAL: Type = Type::Primitive(PrimitiveKind::Decimal);
    pub const TEXT: Type = Type::Primitive(PrimitiveKind::Text);
    pub const BOOLEAN: Type = Type::Primitive(PrimitiveKind::Boolean);
    pub const DATE: Type = Type::Primitive(PrimitiveKind::Date);
    pub const DATE_TIME: Type = Type::Primitive(PrimitiveKind::DateTime);
    pub const TIME: Type = Type::Primitive(PrimitiveKind::Time);
    pub const BLANK: Type = Type::Primitive(PrimitiveKind::Blank);

    /// Record with the given fields.
    ///
    /// A name repeated with the same type collapses into one field; repeated
    /// with a different type it is a construction error.
    pub fn record<I, N>(fields: I) -> Result<Type, TypeConstructionError>
    where
        I: IntoIterator<Item = (N, Type)>,
        N: Into<Name>,
    {
        Ok(Type::Record(build_aggregate(fields)?))
    }

    /// Table whose row record has the given fields.
    pub fn table<I, N>(fields: I) -> Result<Type, TypeConstructionError>
    where
        I: IntoIterator<Item = (N, Type)>,
        N: Into<Name>,
    {
        Ok(Type::Table(build_aggregate(fields)?))
    }

    pub fn empty_record() -> Type {
        Type::Record(AggregateType::empty())
    }

    pub fn empty_table() -> Type {
        Type::Table(AggregateType::empty())
    }

    /// Table with one column, as produced by `[1, 2, 3]` or `Table.Column`.
    pub fn single_column_table(column: impl Into<Name>, ty: Type) -> Type {
        let mut fields = BTreeMap::new();
        fields.insert(column.into(), ty);
        Type::Table(AggregateType::from_map(fields, None))
    }

    pub fn flags(&self) -> TypeFlags {
        match self {
            Type::Primitive(_) => TypeFlags::IS_PRIMITIVE,
            Type::Record(agg) => agg.flags() | TypeFlags::IS_AGGREGATE,
            Type::Table(agg) => agg.flags() | TypeFlags::IS_AGGREGATE | TypeFlags::IS_TABLE,
            Type::OptionSet(_) | Type::Enum(_) => TypeFlags::IS_NAMED,
            Type::Error => TypeFlags::HAS_ERROR | TypeFlags::IS_SENTINEL,
            Type::Unknown => TypeFlags::HAS_UNKNOWN | TypeFlags::IS_SENTINEL,
            Type::Void => TypeFlags::empty(),
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    /// `Error` or `Unknown`.
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Type::Error | Type::Unknown)
    }

    #[inline]
    pub fn is_blank(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveKind::Blank))
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    #[inline]
    pub fn is_record(&self) -> bool {
        matches!(self, Type::Record(_))
    }

    #[inline]
    pub fn is_table(&self) -> bool {
        matches!(self, Type::Table(_))
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Type::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Field tree of a record or table.
    pub fn aggregate(&self) -> Option<&AggregateType> {
        match self {
            Type::Record(agg) | Type::Table(agg) => Some(agg),
            _ => None,
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&Type> {
        self.aggregate().and_then(|agg| agg.get(name))
    }

    /// Copy of this aggregate with `name` set to `ty`. `self` is unchanged.
    pub fn with_field(&self, name: impl Into<Name>, ty: Type) -> Result<Type, TypeConstructionError> {
        match self {
            Type::Record(agg) => Ok(Type::Record(agg.with_field(name.into(), ty))),
            Type::Table(agg) => Ok(Type::Table(agg.with_field(name.into(), ty))),
            other => Err(TypeConstructionError::NotAggregate {
                ty: other.to_string(),
            }),
        }
    }

    /// Lift a record to a table of such records.
    pub fn to_table(&self) -> Result<Type, TypeConstructionError> {
        match self {
            Type::Record(agg) => Ok(Type::Table(agg.clone())),
            Type::Table(_) => Ok(self.clone()),
            other => Err(TypeConstructionError::RowNotRecord {
                ty: other.to_string(),
            }),
        }
    }

    /// The row record of a table.
    pub fn row_type(&self) -> Option<Type> {
        match self {
            Type::Table(agg) => Some(Type::Record(agg.clone())),
            _ => None,
        }
    }

    /// Copy of this aggregate tagged with `service`. Non-aggregates are
    /// returned unchanged.
    #[must_use]
    pub fn with_service(&self, service: ServiceTag) -> Type {
        match self {
            Type::Record(agg) => Type::Record(agg.with_service(Some(service))),
            Type::Table(agg) => Type::Table(agg.with_service(Some(service))),
            other => other.clone(),
        }
    }

    pub fn service(&self) -> Option<&ServiceTag> {
        self.aggregate().and_then(AggregateType::service)
    }
}

fn build_aggregate<I, N>(fields: I) -> Result<AggregateType, TypeConstructionError>
where
    I: IntoIterator<Item = (N, Type)>,
    N: Into<Name>,
{
    let mut map: BTreeMap<Name, Type> = BTreeMap::new();
    for (name, ty) in fields {
        let name = name.into();
        match map.get(&name) {
            Some(existing) if *existing != ty => {
                return Err(TypeConstructionError::DuplicateField {
                    first: existing.to_string(),
                    second: ty.to_string(),
                    field: name,
                });
            }
            Some(_) => {}
            None => {
                map.insert(name, ty);
            }
        }
    }
    Ok(AggregateType::from_map(map, None))
}

impl From<PrimitiveKind> for Type {
    fn from(kind: PrimitiveKind) -> Self {
        Type::Primitive(kind)
    }
}

impl fmt::Display for Type {
    /// Compact debug form: `n`, `![a:n, b:s]`, `*[a:n]`, `Enum(Color)`, `e`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(kind) => f.write_str(kind.code()),
            Type::Record(agg) => write_fields(f, "!", agg),
            Type::Table(agg) => write_fields(f, "*", agg),
            Type::OptionSet(os) => write!(f, "OptionSet({})", os.name),
            Type::Enum(e) => write!(f, "Enum({})", e.name),
            Type::Error => f.write_str("e"),
            Type::Unknown => f.write_str("?"),
            Type::Void => f.write_str("-"),
        }
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, prefix: &str, agg: &AggregateType) -> fmt::Result {
    write!(f, "{prefix}[")?;
    for (i, (name, ty)) in agg.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{name}:{ty}")?;
    }
    f.write_str("]")
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]
