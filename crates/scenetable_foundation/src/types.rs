//! Attribute type descriptors and coercing validation.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::id::RecordId;
use crate::value::Value;

/// Type and domain of a record attribute.
///
/// Used by shape schemas to validate every write. Validation coerces where
/// a tabular source would hand over a compatible representation (an
/// integer for a float, a 3-element list for a vector).
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttrType {
    /// Boolean.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// Float with optional inclusive bounds.
    Float {
        /// Inclusive lower bound.
        min: Option<f64>,
        /// Inclusive upper bound.
        max: Option<f64>,
    },
    /// String.
    String,
    /// Fixed 3-vector of floats.
    Vec3,
    /// Color in any accepted form.
    Color,
    /// Hashable identifier.
    Id,
    /// List whose items share one type.
    List(Box<AttrType>),
}

impl AttrType {
    /// Unbounded float.
    #[must_use]
    pub const fn float() -> Self {
        Self::Float {
            min: None,
            max: None,
        }
    }

    /// Float restricted to `[min, max]`.
    #[must_use]
    pub const fn bounded(min: f64, max: f64) -> Self {
        Self::Float {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Float restricted to `>= 0`.
    #[must_use]
    pub const fn non_negative() -> Self {
        Self::Float {
            min: Some(0.0),
            max: None,
        }
    }

    /// List of `inner`.
    #[must_use]
    pub fn list(inner: AttrType) -> Self {
        Self::List(Box::new(inner))
    }

    /// Validates `value` for `attribute`, returning the coerced value.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the attribute, the rejected value
    /// and this type if the value cannot be coerced or lies outside the
    /// type's domain.
    pub fn coerce(&self, attribute: &str, value: &Value) -> Result<Value> {
        self.try_coerce(value)
            .ok_or_else(|| Error::validation(attribute, value.clone(), self.to_string()))
    }

    fn try_coerce(&self, value: &Value) -> Option<Value> {
        match self {
            Self::Bool => value.as_bool().map(Value::Bool),
            Self::Int => match value {
                Value::Int(n) => Some(Value::Int(*n)),
                Value::Float(f) => integral(*f).map(Value::Int),
                _ => None,
            },
            Self::Float { min, max } => {
                let n = match value {
                    Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    other => other.as_number(),
                }?;
                let above = min.is_none_or(|lo| n >= lo);
                let below = max.is_none_or(|hi| n <= hi);
                (above && below).then_some(Value::Float(n))
            }
            Self::String => match value {
                Value::String(_) => Some(value.clone()),
                Value::Int(_) | Value::Float(_) | Value::Bool(_) => {
                    Some(Value::from(value.to_string()))
                }
                _ => None,
            },
            Self::Vec3 => match value.numeric_components()?.as_slice() {
                [x, y, z] if !matches!(value, Value::Color(_)) => Some(Value::Vec3([*x, *y, *z])),
                _ => None,
            },
            Self::Color => Color::parse_value(value).map(Value::Color),
            Self::Id => RecordId::new(value.clone()).ok().map(RecordId::into_value),
            Self::List(inner) => value
                .as_list()?
                .iter()
                .map(|item| inner.try_coerce(item))
                .collect::<Option<_>>()
                .map(Value::List),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn integral(f: f64) -> Option<i64> {
    let in_range = f >= -9_223_372_036_854_775_808.0 && f < 9_223_372_036_854_775_808.0;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float { min: None, max: None } => write!(f, "float"),
            Self::Float {
                min: Some(lo),
                max: Some(hi),
            } => write!(f, "float in [{lo}, {hi}]"),
            Self::Float {
                min: Some(lo),
                max: None,
            } => write!(f, "float >= {lo}"),
            Self::Float {
                min: None,
                max: Some(hi),
            } => write!(f, "float <= {hi}"),
            Self::String => write!(f, "string"),
            Self::Vec3 => write!(f, "3-vector"),
            Self::Color => write!(f, "color"),
            Self::Id => write!(f, "hashable identifier"),
            Self::List(inner) => write!(f, "list<{inner}>"),
        }
    }
}

impl fmt::Debug for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
