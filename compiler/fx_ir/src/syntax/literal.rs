//! Literal values carried by syntax nodes.

use std::fmt;

use crate::Name;

/// Fixed-point decimal literal: `mantissa * 10^-scale`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DecimalValue {
    pub mantissa: i128,
    pub scale: u32,
}

impl DecimalValue {
    pub const fn new(mantissa: i128, scale: u32) -> Self {
        DecimalValue { mantissa, scale }
    }
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        let sign = if self.mantissa < 0 { "-" } else { "" };
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{sign}{int}.{frac}")
        } else {
            write!(f, "{sign}0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    }
}

/// A literal already parsed into primitive form.
///
/// Numbers are stored as `f64` bits so literals stay `Eq + Hash`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Number(u64),
    Decimal(DecimalValue),
    Text(Name),
    Boolean(bool),
    Blank,
}

impl Literal {
    pub fn number(value: f64) -> Self {
        Literal::Number(value.to_bits())
    }

    /// The numeric value of a `Number` literal.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Number(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(bits) => write!(f, "{}", f64::from_bits(*bits)),
            Literal::Decimal(d) => write!(f, "{d}"),
            Literal::Text(s) => write!(f, "{s:?}"),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Blank => write!(f, "Blank()"),
        }
    }
}
