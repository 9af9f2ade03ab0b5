//! Compiled predicates and their logical combinators.
//!
//! A [`Predicate`] is the backend-facing form of one or more conditions:
//! columns are native tokens, literals are typed [`Value`]s rendered at the
//! text boundary. Besides rendering, a predicate can be evaluated
//! structurally against any [`RowAccess`] source, which is how in-memory
//! backends execute compiled filters.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Binary comparison operator of a compiled predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
	Lt,
	Lte,
	Eq,
	Gte,
	Gt,
	Ne,
}

impl CompareOp {
	pub fn token(self) -> &'static str {
		match self {
			CompareOp::Lt => "<",
			CompareOp::Lte => "<=",
			CompareOp::Eq => "=",
			CompareOp::Gte => ">=",
			CompareOp::Gt => ">",
			CompareOp::Ne => "!=",
		}
	}
}

/// Read access to one row's typed attribute values, keyed by column token.
///
/// Returning `None` means the attribute is absent on this row; comparisons
/// and membership tests over an absent attribute do not match, and the
/// null-test predicate matches exactly the absent case.
pub trait RowAccess {
	fn value_of(&self, column: &str) -> Option<Value>;
}

/// A compiled, backend-native boolean expression fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
	Tautology,
	Contradiction,
	And(Vec<Predicate>),
	Or(Vec<Predicate>),
	Not(Box<Predicate>),
	Comparison {
		column: String,
		op: CompareOp,
		literal: Value,
	},
	/// The null-test form of comparison: `IS NULL` / `IS NOT NULL`.
	Null { column: String, negated: bool },
	InSet {
		column: String,
		literals: Vec<Value>,
	},
	Like { column: String, pattern: String },
}

impl Predicate {
	/// N-ary conjunction. Zero operands yield [`Predicate::Tautology`]; a
	/// single operand is returned unchanged.
	pub fn and(operands: Vec<Predicate>) -> Predicate {
		Self::combine(operands, true)
	}

	/// N-ary disjunction. Zero operands yield [`Predicate::Tautology`],
	/// matching the conjunction case; a single operand is returned
	/// unchanged.
	pub fn or(operands: Vec<Predicate>) -> Predicate {
		Self::combine(operands, false)
	}

	fn combine(mut operands: Vec<Predicate>, conjunction: bool) -> Predicate {
		match operands.len() {
			0 => Predicate::Tautology,
			1 => operands.remove(0),
			_ if conjunction => Predicate::And(operands),
			_ => Predicate::Or(operands),
		}
	}

	/// Negation wrapper. Requires the backend to support a native NOT
	/// operator over arbitrary sub-predicates.
	#[allow(clippy::should_implement_trait)]
	pub fn not(operand: Predicate) -> Predicate {
		Predicate::Not(Box::new(operand))
	}

	/// Evaluate this predicate against one row.
	///
	/// Evaluation is two-valued: a comparison, membership or pattern test
	/// over an absent attribute is false, so `Not` over it is true.
	pub fn matches(&self, row: &dyn RowAccess) -> bool {
		match self {
			Predicate::Tautology => true,
			Predicate::Contradiction => false,
			Predicate::And(operands) => operands.iter().all(|p| p.matches(row)),
			Predicate::Or(operands) => operands.iter().any(|p| p.matches(row)),
			Predicate::Not(operand) => !operand.matches(row),
			Predicate::Comparison {
				column,
				op,
				literal,
			} => match row.value_of(column) {
				Some(actual) => compare(&actual, *op, literal),
				None => false,
			},
			Predicate::Null { column, negated } => {
				let absent = row.value_of(column).is_none();
				absent != *negated
			}
			Predicate::InSet { column, literals } => match row.value_of(column) {
				Some(actual) => literals.iter().any(|l| *l == actual),
				None => false,
			},
			Predicate::Like { column, pattern } => match row.value_of(column) {
				Some(Value::Str(text)) => like_match(pattern, &text),
				_ => false,
			},
		}
	}
}

fn compare(actual: &Value, op: CompareOp, literal: &Value) -> bool {
	match actual.partial_cmp(literal) {
		Some(ordering) => match op {
			CompareOp::Lt => ordering == Ordering::Less,
			CompareOp::Lte => ordering != Ordering::Greater,
			CompareOp::Eq => ordering == Ordering::Equal,
			CompareOp::Gte => ordering != Ordering::Less,
			CompareOp::Gt => ordering == Ordering::Greater,
			CompareOp::Ne => ordering != Ordering::Equal,
		},
		// Mismatched value types: unknown, never a match.
		None => false,
	}
}

/// Match `text` against a pattern whose only wildcard is `%` (any run of
/// characters). All other characters, `_` included, match literally.
fn like_match(pattern: &str, text: &str) -> bool {
	if !pattern.contains('%') {
		return pattern == text;
	}
	let segments: Vec<&str> = pattern.split('%').collect();
	let last = segments.len() - 1;
	let mut pos = 0;
	for (i, segment) in segments.iter().enumerate() {
		if segment.is_empty() {
			continue;
		}
		if i == 0 {
			if !text.starts_with(segment) {
				return false;
			}
			pos = segment.len();
		} else if i == last {
			let tail = &text[pos..];
			if tail.len() < segment.len() || !tail.ends_with(segment) {
				return false;
			}
		} else {
			match text[pos..].find(segment) {
				Some(found) => pos += found + segment.len(),
				None => return false,
			}
		}
	}
	true
}
