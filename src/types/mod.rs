//! Runtime value representation for MiniSQL.
//!
//! Every cell in every row is stored as a [`Value`]. The variants map
//! directly onto the four declarable column types plus NULL:
//!
//! | Variant   | Column type | Rust type |
//! |-----------|-------------|-----------|
//! | `Null`    | any         | —         |
//! | `Integer` | INT         | `i64`     |
//! | `Float`   | FLOAT       | `f64`     |
//! | `Text`    | TEXT, DATE  | `String`  |
//!
//! DATE values are stored as uninterpreted text; the engine never validates
//! them as calendar dates.
//!
//! # Comparison semantics
//!
//! Equality ([`Value::loose_eq`]) never fails: integers and floats compare
//! numerically across the two variants, text compares with text, NULL equals
//! only NULL, and any other cross-type pair is simply unequal. Ordering
//! ([`Value::compare`]) is stricter: it is defined only for numeric/numeric
//! and text/text pairs; anything else, including NULL on either side,
//! is a [`SqlError::TypeError`].

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Result, SqlError};

/// A dynamically-typed value held in a table cell or produced by expression
/// evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Human-readable name of the runtime type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::Text(_) => "TEXT",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Boolean coercion used when a bare expression stands where a condition
    /// is expected: NULL, zero, and the empty string are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Integer(v) => *v != 0,
            Value::Float(v) => *v != 0.0,
            Value::Text(s) => !s.is_empty(),
        }
    }

    /// Loose equality: numeric values compare numerically across the
    /// Integer/Float divide, mismatched types are unequal, never an error.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                (*a as f64) == *b
            }
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }

    /// Ordering for `< > <= >=`. Only numeric/numeric and text/text pairs
    /// are ordered; every other combination is a type error.
    pub fn compare(&self, other: &Value) -> Result<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
            (Value::Integer(a), Value::Float(b)) => float_cmp(*a as f64, *b),
            (Value::Float(a), Value::Integer(b)) => float_cmp(*a, *b as f64),
            (Value::Float(a), Value::Float(b)) => float_cmp(*a, *b),
            (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
            _ => Err(SqlError::TypeError(format!(
                "cannot compare {} and {}",
                self.type_name(),
                other.type_name()
            ))),
        }
    }

    pub fn add(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a
                .checked_add(*b)
                .map(Value::Integer)
                .ok_or_else(|| SqlError::Overflow("integer addition".into())),
            (Value::Text(a), Value::Text(b)) => Ok(Value::Text(format!("{a}{b}"))),
            _ => self.numeric_op(other, "+", |a, b| a + b),
        }
    }

    pub fn sub(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a
                .checked_sub(*b)
                .map(Value::Integer)
                .ok_or_else(|| SqlError::Overflow("integer subtraction".into())),
            _ => self.numeric_op(other, "-", |a, b| a - b),
        }
    }

    pub fn mul(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a
                .checked_mul(*b)
                .map(Value::Integer)
                .ok_or_else(|| SqlError::Overflow("integer multiplication".into())),
            _ => self.numeric_op(other, "*", |a, b| a * b),
        }
    }

    /// Division always produces a Float, even for two integer operands.
    /// Dividing by zero (integer or float) is an error rather than an
    /// infinity.
    pub fn div(&self, other: &Value) -> Result<Value> {
        let rhs = other
            .as_f64()
            .ok_or_else(|| self.binary_type_error("/", other))?;
        if rhs == 0.0 {
            return Err(SqlError::DivisionByZero);
        }
        let lhs = self
            .as_f64()
            .ok_or_else(|| self.binary_type_error("/", other))?;
        Ok(Value::Float(lhs / rhs))
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    fn numeric_op(&self, other: &Value, op: &str, f: impl Fn(f64, f64) -> f64) -> Result<Value> {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(f(a, b))),
            _ => Err(self.binary_type_error(op, other)),
        }
    }

    fn binary_type_error(&self, op: &str, other: &Value) -> SqlError {
        SqlError::TypeError(format!(
            "cannot apply '{op}' to {} and {}",
            self.type_name(),
            other.type_name()
        ))
    }
}

fn float_cmp(a: f64, b: f64) -> Result<Ordering> {
    a.partial_cmp(&b)
        .ok_or_else(|| SqlError::TypeError("cannot order NaN".into()))
}

/// Renders an `f64` the way the engine canonically spells float literals:
/// whole-number floats keep one fractional digit (`50000.0`, not `50000`) so
/// they re-tokenize as floats.
pub(crate) fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{}", format_float(*v)),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}
