use std::fmt;

use strum::{EnumIter, IntoEnumIterator};

use crate::Result;

/// A runtime argument or return value flowing through dispatch.
///
/// Every operation in the model receives its arguments and produces its
/// result as [`Value`] instances. The set is deliberately small: dispatch
/// plumbing cares about moving values, not about arithmetic on them.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value (for operations that return nothing)
    #[default]
    Unit,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// String value
    Str(String),
}

impl Value {
    /// Get the kind this value inhabits
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Unit => ValueKind::Unit,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
        }
    }

    /// Try to convert to a boolean value
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            Value::Int(value) => Some(*value != 0),
            _ => None,
        }
    }

    /// Try to convert to an integer value
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Bool(value) => Some(i64::from(*value)),
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Try to convert to a floating point value
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(value) => Some(f64::from(*value)),
            #[allow(clippy::cast_precision_loss)]
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Try to borrow the string payload
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Int(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Str(value) => write!(f, "\"{}\"", value),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Unit
    }
}

/// The kind of a [`Value`], without the payload.
///
/// Kinds are the vocabulary of [`Signature`](crate::runtime::Signature)
/// declarations. [`ValueKind::Any`] never inhabits a concrete value; it is
/// a signature-only wildcard that matches every kind during
/// interchangeability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ValueKind {
    /// No value
    Unit,
    /// Boolean value
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// String value
    Str,
    /// Signature wildcard, matches any kind
    Any,
}

impl ValueKind {
    /// Get the textual name used in encoded signatures
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Unit => "unit",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
            ValueKind::Any => "any",
        }
    }

    /// Parse a kind from its signature name
    ///
    /// ## Arguments
    /// * `name` - The textual name to convert from
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidSignature`] if the name does not
    /// match any kind.
    pub fn from_name(name: &str) -> Result<Self> {
        ValueKind::iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| {
                let expected = ValueKind::iter()
                    .map(|kind| kind.name())
                    .collect::<Vec<_>>()
                    .join(", ");
                signature_error!("Unknown value kind '{}', expected one of: {}", name, expected)
            })
    }

    /// The neutral value of this kind, returned by suppressed operations
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            ValueKind::Unit | ValueKind::Any => Value::Unit,
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Str => Value::Str(String::new()),
        }
    }

    /// Whether a value of `other` is acceptable where this kind is declared
    #[must_use]
    pub fn accepts(&self, other: ValueKind) -> bool {
        *self == ValueKind::Any || other == ValueKind::Any || *self == other
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
