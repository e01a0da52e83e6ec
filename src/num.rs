//! Checked addition over integers and floats.

use std::fmt;
use std::str::FromStr;

/// A numeric argument: either an integer or a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// The value widened to `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

/// Add two numbers.
///
/// Two integers stay an integer (and fail on overflow); anything involving a
/// float produces a float.
pub fn add(a: Number, b: Number) -> Result<Number, Error> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x
            .checked_add(y)
            .map(Number::Int)
            .ok_or(Error::Overflow { a: x, b: y }),
        (a, b) => {
            let sum = a.as_f64() + b.as_f64();
            if sum.is_finite() {
                Ok(Number::Float(sum))
            } else {
                Err(Error::FloatOverflow {
                    a: a.as_f64(),
                    b: b.as_f64(),
                })
            }
        }
    }
}

/// Add two loosely-typed values, rejecting anything that is not a number.
pub fn add_values(a: &toml::Value, b: &toml::Value) -> Result<Number, Error> {
    add(Number::try_from(a)?, Number::try_from(b)?)
}

impl TryFrom<&toml::Value> for Number {
    type Error = Error;

    fn try_from(value: &toml::Value) -> Result<Self, Self::Error> {
        match value {
            toml::Value::Integer(i) => Ok(Number::Int(*i)),
            toml::Value::Float(f) if f.is_finite() => Ok(Number::Float(*f)),
            toml::Value::Float(f) => Err(Error::NotANumber {
                kind: format!("non-finite float {f}"),
            }),
            other => Err(Error::NotANumber {
                kind: other.type_str().to_string(),
            }),
        }
    }
}

impl FromStr for Number {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(i) = s.parse::<i64>() {
            return Ok(Number::Int(i));
        }
        match s.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Number::Float(f)),
            _ => Err(Error::NotANumber {
                kind: format!("string {s:?}"),
            }),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            // Keep a trailing `.0` so floats never read as integers.
            Number::Float(x) if x.fract() == 0.0 => write!(f, "{x:.1}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Errors from [`add`] and number parsing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("both arguments must be numbers (int or float), got {kind}")]
    NotANumber { kind: String },

    #[error("integer overflow adding {a} and {b}")]
    Overflow { a: i64, b: i64 },

    #[error("float overflow adding {a} and {b}")]
    FloatOverflow { a: f64, b: f64 },
}
