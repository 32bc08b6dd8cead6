//! Structural type system for the formula engine.
//!
//! - [`Type`]: primitives, records, tables, option sets, enums and the
//!   `Error`/`Unknown`/`Void` sentinels
//! - [`Type::check_accepts`]: containment with coercion reporting
//! - [`Type::union`]: join for conditional branches and table rows
//! - [`coercion`]: the explicit table of legal implicit conversions
//!
//! Types are plain values. Nothing here allocates per lookup or holds
//! global state, so the same types can be shared freely across threads
//! binding independent expressions.

mod accepts;
pub mod coercion;
mod error;
mod flags;
mod kind;
mod ty;
mod union;

pub use accepts::Acceptance;
pub use coercion::{coercion_plan, CoercionKind, CoercionPlan, CoercionRules};
pub use error::TypeConstructionError;
pub use flags::TypeFlags;
pub use kind::PrimitiveKind;
pub use ty::{AggregateType, EnumType, EnumValue, OptionSetType, ServiceTag, Type};
