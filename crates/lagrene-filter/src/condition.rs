//! The condition model: typed, immutable constraints on a single attribute.
//!
//! Conditions are built through validating factories; an invalid mode/value
//! pairing fails at construction with [`FilterError::Validation`], before any
//! query execution.

use crate::error::{FilterError, FilterResult};
use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EqualityMode {
	Equal,
	Unequal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonMode {
	LessThan,
	AtMost,
	Exactly,
	AtLeast,
	GreaterThan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipMode {
	In,
	NotIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextMode {
	Equal,
	Unequal,
	StartsWith,
	Contains,
	EndsWith,
}

/// Boundary kind of an [`Interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundKind {
	Open,
	Closed,
	LeftClosedRightOpen,
	LeftOpenRightClosed,
	LeftOpenRightUnbounded,
	LeftClosedRightUnbounded,
	LeftUnboundedRightOpen,
	LeftUnboundedRightClosed,
	Unbounded,
}

impl BoundKind {
	pub fn left_bounded(self) -> bool {
		!matches!(
			self,
			BoundKind::LeftUnboundedRightOpen
				| BoundKind::LeftUnboundedRightClosed
				| BoundKind::Unbounded
		)
	}

	pub fn right_bounded(self) -> bool {
		!matches!(
			self,
			BoundKind::LeftOpenRightUnbounded
				| BoundKind::LeftClosedRightUnbounded
				| BoundKind::Unbounded
		)
	}

	pub fn left_closed(self) -> bool {
		matches!(
			self,
			BoundKind::Closed | BoundKind::LeftClosedRightOpen | BoundKind::LeftClosedRightUnbounded
		)
	}

	pub fn right_closed(self) -> bool {
		matches!(
			self,
			BoundKind::Closed | BoundKind::LeftOpenRightClosed | BoundKind::LeftUnboundedRightClosed
		)
	}
}

/// An interval over attribute values.
///
/// An endpoint is absent exactly when that side is unbounded; the checked
/// constructor enforces this. When both endpoints are present, `left <= right`
/// is the caller's responsibility and is not validated here.
///
/// # Examples
///
/// ```
/// use lagrene_filter::{Interval, Value};
///
/// let closed = Interval::closed(Value::Int(2), Value::Int(4));
/// let at_least = Interval::at_least(Value::Int(10));
/// assert!(Interval::new(lagrene_filter::BoundKind::Open, Some(Value::Int(1)), None).is_err());
/// # let _ = (closed, at_least);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
	kind: BoundKind,
	left: Option<Value>,
	right: Option<Value>,
}

impl Interval {
	/// Checked constructor: endpoints must be present exactly on bounded sides.
	pub fn new(kind: BoundKind, left: Option<Value>, right: Option<Value>) -> FilterResult<Self> {
		if left.is_some() != kind.left_bounded() {
			return Err(FilterError::Validation(format!(
				"interval {kind:?} requires the left endpoint to be {}",
				if kind.left_bounded() { "present" } else { "absent" }
			)));
		}
		if right.is_some() != kind.right_bounded() {
			return Err(FilterError::Validation(format!(
				"interval {kind:?} requires the right endpoint to be {}",
				if kind.right_bounded() { "present" } else { "absent" }
			)));
		}
		Ok(Self { kind, left, right })
	}

	pub fn open(left: impl Into<Value>, right: impl Into<Value>) -> Self {
		Self {
			kind: BoundKind::Open,
			left: Some(left.into()),
			right: Some(right.into()),
		}
	}

	pub fn closed(left: impl Into<Value>, right: impl Into<Value>) -> Self {
		Self {
			kind: BoundKind::Closed,
			left: Some(left.into()),
			right: Some(right.into()),
		}
	}

	pub fn left_closed_right_open(left: impl Into<Value>, right: impl Into<Value>) -> Self {
		Self {
			kind: BoundKind::LeftClosedRightOpen,
			left: Some(left.into()),
			right: Some(right.into()),
		}
	}

	pub fn left_open_right_closed(left: impl Into<Value>, right: impl Into<Value>) -> Self {
		Self {
			kind: BoundKind::LeftOpenRightClosed,
			left: Some(left.into()),
			right: Some(right.into()),
		}
	}

	/// `(left, +inf)`
	pub fn greater_than(left: impl Into<Value>) -> Self {
		Self {
			kind: BoundKind::LeftOpenRightUnbounded,
			left: Some(left.into()),
			right: None,
		}
	}

	/// `[left, +inf)`
	pub fn at_least(left: impl Into<Value>) -> Self {
		Self {
			kind: BoundKind::LeftClosedRightUnbounded,
			left: Some(left.into()),
			right: None,
		}
	}

	/// `(-inf, right)`
	pub fn less_than(right: impl Into<Value>) -> Self {
		Self {
			kind: BoundKind::LeftUnboundedRightOpen,
			left: None,
			right: Some(right.into()),
		}
	}

	/// `(-inf, right]`
	pub fn at_most(right: impl Into<Value>) -> Self {
		Self {
			kind: BoundKind::LeftUnboundedRightClosed,
			left: None,
			right: Some(right.into()),
		}
	}

	pub fn unbounded() -> Self {
		Self {
			kind: BoundKind::Unbounded,
			left: None,
			right: None,
		}
	}

	pub fn kind(&self) -> BoundKind {
		self.kind
	}

	pub fn left(&self) -> Option<&Value> {
		self.left.as_ref()
	}

	pub fn right(&self) -> Option<&Value> {
		self.right.as_ref()
	}
}

/// A closed time period `[start, end]`.
///
/// `start <= end` is the caller's responsibility, mirroring the interval
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePeriod {
	pub start: DateTime<Utc>,
	pub end: DateTime<Utc>,
}

impl TimePeriod {
	pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
		Self { start, end }
	}
}

/// A single typed constraint on one backend attribute.
///
/// For [`Condition::Equality`], an absent value denotes a null-test
/// (`IS NULL` / `IS NOT NULL`), never a comparison against a null literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
	Equality {
		mode: EqualityMode,
		value: Option<Value>,
	},
	Comparison {
		mode: ComparisonMode,
		value: Value,
	},
	Interval {
		mode: MembershipMode,
		interval: Interval,
	},
	Membership {
		mode: MembershipMode,
		values: Vec<Value>,
	},
	Text {
		mode: TextMode,
		value: String,
	},
	Period {
		mode: MembershipMode,
		period: TimePeriod,
	},
}

impl Condition {
	pub fn equal_to(value: impl Into<Value>) -> Self {
		Condition::Equality {
			mode: EqualityMode::Equal,
			value: Some(value.into()),
		}
	}

	pub fn unequal_to(value: impl Into<Value>) -> Self {
		Condition::Equality {
			mode: EqualityMode::Unequal,
			value: Some(value.into()),
		}
	}

	/// Selects rows whose attribute is absent (`IS NULL`).
	pub fn is_absent() -> Self {
		Condition::Equality {
			mode: EqualityMode::Equal,
			value: None,
		}
	}

	/// Selects rows whose attribute is present (`IS NOT NULL`).
	pub fn is_present() -> Self {
		Condition::Equality {
			mode: EqualityMode::Unequal,
			value: None,
		}
	}

	pub fn less_than(value: impl Into<Value>) -> Self {
		Condition::Comparison {
			mode: ComparisonMode::LessThan,
			value: value.into(),
		}
	}

	pub fn at_most(value: impl Into<Value>) -> Self {
		Condition::Comparison {
			mode: ComparisonMode::AtMost,
			value: value.into(),
		}
	}

	pub fn exactly(value: impl Into<Value>) -> Self {
		Condition::Comparison {
			mode: ComparisonMode::Exactly,
			value: value.into(),
		}
	}

	pub fn at_least(value: impl Into<Value>) -> Self {
		Condition::Comparison {
			mode: ComparisonMode::AtLeast,
			value: value.into(),
		}
	}

	pub fn greater_than(value: impl Into<Value>) -> Self {
		Condition::Comparison {
			mode: ComparisonMode::GreaterThan,
			value: value.into(),
		}
	}

	pub fn within(interval: Interval) -> Self {
		Condition::Interval {
			mode: MembershipMode::In,
			interval,
		}
	}

	pub fn outside(interval: Interval) -> Self {
		Condition::Interval {
			mode: MembershipMode::NotIn,
			interval,
		}
	}

	/// Membership in a literal set. An empty set is a validation error.
	pub fn any_of<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> FilterResult<Self> {
		let values: Vec<Value> = values.into_iter().map(Into::into).collect();
		if values.is_empty() {
			return Err(FilterError::Validation(
				"set membership requires at least one value".to_string(),
			));
		}
		Ok(Condition::Membership {
			mode: MembershipMode::In,
			values,
		})
	}

	/// Exclusion from a literal set. An empty set is a validation error.
	pub fn none_of<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> FilterResult<Self> {
		let values: Vec<Value> = values.into_iter().map(Into::into).collect();
		if values.is_empty() {
			return Err(FilterError::Validation(
				"set membership requires at least one value".to_string(),
			));
		}
		Ok(Condition::Membership {
			mode: MembershipMode::NotIn,
			values,
		})
	}

	pub fn text_equals(value: impl Into<String>) -> Self {
		Condition::Text {
			mode: TextMode::Equal,
			value: value.into(),
		}
	}

	pub fn text_differs(value: impl Into<String>) -> Self {
		Condition::Text {
			mode: TextMode::Unequal,
			value: value.into(),
		}
	}

	pub fn starts_with(value: impl Into<String>) -> Self {
		Condition::Text {
			mode: TextMode::StartsWith,
			value: value.into(),
		}
	}

	pub fn contains(value: impl Into<String>) -> Self {
		Condition::Text {
			mode: TextMode::Contains,
			value: value.into(),
		}
	}

	pub fn ends_with(value: impl Into<String>) -> Self {
		Condition::Text {
			mode: TextMode::EndsWith,
			value: value.into(),
		}
	}

	pub fn during(period: TimePeriod) -> Self {
		Condition::Period {
			mode: MembershipMode::In,
			period,
		}
	}

	pub fn outside_period(period: TimePeriod) -> Self {
		Condition::Period {
			mode: MembershipMode::NotIn,
			period,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn interval_endpoints_must_match_bound_kind() {
		assert!(Interval::new(BoundKind::Closed, Some(Value::Int(1)), Some(Value::Int(2))).is_ok());
		assert!(Interval::new(BoundKind::Closed, Some(Value::Int(1)), None).is_err());
		assert!(Interval::new(BoundKind::Unbounded, None, Some(Value::Int(2))).is_err());
		assert!(
			Interval::new(BoundKind::LeftClosedRightUnbounded, Some(Value::Int(1)), None).is_ok()
		);
	}

	#[test]
	fn empty_membership_set_is_rejected() {
		let empty: Vec<Value> = Vec::new();
		assert!(matches!(
			Condition::any_of(empty.clone()),
			Err(FilterError::Validation(_))
		));
		assert!(matches!(
			Condition::none_of(empty),
			Err(FilterError::Validation(_))
		));
	}

	#[test]
	fn null_test_factories_carry_no_value() {
		assert_eq!(
			Condition::is_absent(),
			Condition::Equality {
				mode: EqualityMode::Equal,
				value: None
			}
		);
		assert_eq!(
			Condition::is_present(),
			Condition::Equality {
				mode: EqualityMode::Unequal,
				value: None
			}
		);
	}

	#[test]
	fn bound_kind_sides() {
		assert!(BoundKind::LeftClosedRightOpen.left_closed());
		assert!(!BoundKind::LeftClosedRightOpen.right_closed());
		assert!(!BoundKind::Unbounded.left_bounded());
		assert!(!BoundKind::Unbounded.right_bounded());
		assert!(BoundKind::LeftUnboundedRightClosed.right_closed());
	}
}
