//! Record identifiers.

use std::fmt;

use crate::error::{Error, Result};
use crate::value::Value;

/// Identifier of a record within a collection.
///
/// Any hashable value may serve as an id: booleans, integers, floats,
/// strings, vectors, and colors. Lists and nil are rejected. A float with
/// an integral value is stored as the integer, so `1.0` and `1` name the
/// same record.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RecordId(Value);

impl RecordId {
    /// Validates `value` as an identifier.
    ///
    /// # Errors
    ///
    /// Returns a validation error on attribute `id` if the value is a list
    /// or nil.
    pub fn new(value: impl Into<Value>) -> Result<Self> {
        match value.into() {
            Value::Float(f) => Ok(Self(as_int(f).map_or(Value::Float(f), Value::Int))),
            value if value.is_hashable() => Ok(Self(value)),
            value => Err(Error::validation("id", value, "hashable identifier")),
        }
    }

    /// Returns the underlying value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Consumes the id, returning the underlying value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

/// The integer a finite, integral float in `i64` range stands for.
#[allow(clippy::cast_possible_truncation)]
fn as_int(f: f64) -> Option<i64> {
    let in_range = (-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&f);
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

impl Default for RecordId {
    fn default() -> Self {
        Self(Value::Int(1))
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self(Value::Int(n))
    }
}

impl From<i32> for RecordId {
    fn from(n: i32) -> Self {
        Self(Value::Int(i64::from(n)))
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(Value::from(s))
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(Value::from(s))
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({:?})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use super::{RecordId, Value};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for RecordId {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            self.0.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for RecordId {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = Value::deserialize(deserializer)?;
            RecordId::new(value).map_err(serde::de::Error::custom)
        }
    }
}
