//! Typed literal values and their conversion to native query text.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// A typed literal used in filter conditions and compiled predicates.
///
/// Values of different variants never compare equal, and ordering
/// comparisons between mismatched variants yield no ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
	Str(String),
	Int(i64),
	Float(f64),
	Bool(bool),
	Uuid(Uuid),
	DateTime(DateTime<Utc>),
}

impl Value {
	/// The raw text of a string value, if this is one.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(s) => Some(s),
			_ => None,
		}
	}
}

/// Ordering is defined within one variant only; mismatched variants (and
/// NaN floats) have no ordering.
impl PartialOrd for Value {
	fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
		match (self, other) {
			(Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
			(Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
			(Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
			(Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
			(Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
			(Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
			_ => None,
		}
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::Str(s)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::Str(s.to_string())
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Value::Int(i)
	}
}

impl From<i32> for Value {
	fn from(i: i32) -> Self {
		Value::Int(i as i64)
	}
}

impl From<f64> for Value {
	fn from(f: f64) -> Self {
		Value::Float(f)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl From<Uuid> for Value {
	fn from(u: Uuid) -> Self {
		Value::Uuid(u)
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(t: DateTime<Utc>) -> Self {
		Value::DateTime(t)
	}
}

/// Pluggable conversion from a [`Value`] to its native literal text.
///
/// The compiler never hard-codes quoting rules; every column carries an
/// encoder and backends substitute their own where the default does not fit.
pub trait ValueEncoder: Send + Sync {
	fn encode(&self, value: &Value) -> String;
}

/// Default encoder producing SQL-style literals.
///
/// Strings are wrapped in single quotes with embedded quotes doubled,
/// numerics are emitted unquoted, booleans as `TRUE`/`FALSE`, UUIDs and
/// timestamps as quoted text.
///
/// # Examples
///
/// ```
/// use lagrene_filter::{SqlValueEncoder, Value, ValueEncoder};
///
/// let encoder = SqlValueEncoder;
/// assert_eq!(encoder.encode(&Value::Str("O'Brien".into())), "'O''Brien'");
/// assert_eq!(encoder.encode(&Value::Int(42)), "42");
/// assert_eq!(encoder.encode(&Value::Bool(true)), "TRUE");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlValueEncoder;

impl ValueEncoder for SqlValueEncoder {
	fn encode(&self, value: &Value) -> String {
		match value {
			Value::Str(s) => format!("'{}'", s.replace('\'', "''")),
			Value::Int(i) => i.to_string(),
			Value::Float(f) => f.to_string(),
			Value::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
			Value::Uuid(u) => format!("'{u}'"),
			Value::DateTime(t) => {
				format!("'{}'", t.to_rfc3339_opts(SecondsFormat::Micros, true))
			}
		}
	}
}
