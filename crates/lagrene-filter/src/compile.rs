//! The predicate compiler: conditions in, backend-native predicates out.
//!
//! A compiler is configured once per entity type with an ordered table of
//! column bindings (attribute name, native column token, literal encoder).
//! Configuration problems surface at setup as
//! [`FilterError::Configuration`]; compiling against an attribute that was
//! never bound is [`FilterError::UnknownAttribute`].

use crate::condition::{
	ComparisonMode, Condition, EqualityMode, Interval, MembershipMode, TextMode, TimePeriod,
};
use crate::error::{FilterError, FilterResult};
use crate::predicate::{CompareOp, Predicate};
use crate::value::{SqlValueEncoder, Value, ValueEncoder};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

/// The wildcard token inserted around text literals for pattern predicates.
pub const WILDCARD: char = '%';

/// One attribute's native column token plus its literal encoder.
#[derive(Clone)]
pub struct ColumnBinding {
	token: String,
	encoder: Arc<dyn ValueEncoder>,
}

impl ColumnBinding {
	/// Binding with the default SQL-style literal encoder.
	pub fn new(token: impl Into<String>) -> Self {
		Self {
			token: token.into(),
			encoder: Arc::new(SqlValueEncoder),
		}
	}

	pub fn with_encoder(token: impl Into<String>, encoder: Arc<dyn ValueEncoder>) -> Self {
		Self {
			token: token.into(),
			encoder,
		}
	}

	pub fn token(&self) -> &str {
		&self.token
	}
}

/// Compiles [`Condition`]s into [`Predicate`]s and renders predicates as
/// query-language text fragments.
///
/// # Examples
///
/// ```
/// use lagrene_filter::{ColumnBinding, Condition, Interval, PredicateCompiler};
///
/// let compiler = PredicateCompiler::new([
///     ("number", ColumnBinding::new("t.number")),
/// ]).unwrap();
///
/// let predicate = compiler
///     .compile("number", &Condition::within(Interval::closed(2, 4)))
///     .unwrap();
/// assert_eq!(
///     compiler.render(&predicate).unwrap(),
///     "(t.number >= 2 AND t.number <= 4)"
/// );
/// ```
pub struct PredicateCompiler {
	bindings: IndexMap<String, ColumnBinding>,
	encoders_by_token: HashMap<String, Arc<dyn ValueEncoder>>,
}

impl PredicateCompiler {
	/// Build a compiler from an ordered attribute table.
	///
	/// Fails with [`FilterError::Configuration`] on an empty attribute name
	/// or token, or on a duplicate attribute or token.
	pub fn new<A: Into<String>>(
		bindings: impl IntoIterator<Item = (A, ColumnBinding)>,
	) -> FilterResult<Self> {
		let mut table: IndexMap<String, ColumnBinding> = IndexMap::new();
		let mut encoders_by_token: HashMap<String, Arc<dyn ValueEncoder>> = HashMap::new();
		for (attribute, binding) in bindings {
			let attribute = attribute.into();
			if attribute.is_empty() {
				return Err(FilterError::Configuration(
					"attribute name must not be empty".to_string(),
				));
			}
			if binding.token.is_empty() {
				return Err(FilterError::Configuration(format!(
					"attribute {attribute} has an empty column token"
				)));
			}
			if encoders_by_token
				.insert(binding.token.clone(), binding.encoder.clone())
				.is_some()
			{
				return Err(FilterError::Configuration(format!(
					"duplicate column token: {}",
					binding.token
				)));
			}
			if table.insert(attribute.clone(), binding).is_some() {
				return Err(FilterError::Configuration(format!(
					"duplicate attribute: {attribute}"
				)));
			}
		}
		Ok(Self {
			bindings: table,
			encoders_by_token,
		})
	}

	/// The native column token bound to an attribute.
	pub fn token_of(&self, attribute: &str) -> FilterResult<&str> {
		self.bindings
			.get(attribute)
			.map(|b| b.token.as_str())
			.ok_or_else(|| FilterError::UnknownAttribute(attribute.to_string()))
	}

	/// Compile one condition against one attribute.
	pub fn compile(&self, attribute: &str, condition: &Condition) -> FilterResult<Predicate> {
		let binding = self
			.bindings
			.get(attribute)
			.ok_or_else(|| FilterError::UnknownAttribute(attribute.to_string()))?;
		let column = binding.token.as_str();
		Ok(match condition {
			Condition::Equality { mode, value } => match value {
				Some(value) => Predicate::Comparison {
					column: column.to_string(),
					op: match mode {
						EqualityMode::Equal => CompareOp::Eq,
						EqualityMode::Unequal => CompareOp::Ne,
					},
					literal: value.clone(),
				},
				None => Predicate::Null {
					column: column.to_string(),
					negated: *mode == EqualityMode::Unequal,
				},
			},
			Condition::Comparison { mode, value } => Predicate::Comparison {
				column: column.to_string(),
				op: match mode {
					ComparisonMode::LessThan => CompareOp::Lt,
					ComparisonMode::AtMost => CompareOp::Lte,
					ComparisonMode::Exactly => CompareOp::Eq,
					ComparisonMode::AtLeast => CompareOp::Gte,
					ComparisonMode::GreaterThan => CompareOp::Gt,
				},
				literal: value.clone(),
			},
			Condition::Interval { mode, interval } => {
				membership(interval_predicate(column, interval), *mode)
			}
			Condition::Membership { mode, values } => membership(
				Predicate::InSet {
					column: column.to_string(),
					literals: values.clone(),
				},
				*mode,
			),
			Condition::Text { mode, value } => text_predicate(column, *mode, value),
			Condition::Period { mode, period } => {
				membership(interval_predicate(column, &period_interval(period)), *mode)
			}
		})
	}

	/// Render a compiled predicate as a WHERE-clause-body text fragment.
	///
	/// Literals go through the encoder of the column they are compared
	/// against; rendering a predicate that names an unbound column token is
	/// [`FilterError::UnknownColumn`].
	pub fn render(&self, predicate: &Predicate) -> FilterResult<String> {
		Ok(match predicate {
			Predicate::Tautology => "TRUE".to_string(),
			Predicate::Contradiction => "FALSE".to_string(),
			Predicate::And(operands) => self.render_nary(operands, " AND ")?,
			Predicate::Or(operands) => self.render_nary(operands, " OR ")?,
			Predicate::Not(operand) => format!("NOT ({})", self.render(operand)?),
			Predicate::Comparison {
				column,
				op,
				literal,
			} => {
				let encoder = self.encoder_of(column)?;
				format!("{column} {} {}", op.token(), encoder.encode(literal))
			}
			Predicate::Null { column, negated } => {
				self.encoder_of(column)?;
				if *negated {
					format!("{column} IS NOT NULL")
				} else {
					format!("{column} IS NULL")
				}
			}
			Predicate::InSet { column, literals } => {
				let encoder = self.encoder_of(column)?;
				let rendered: Vec<String> =
					literals.iter().map(|l| encoder.encode(l)).collect();
				format!("{column} IN ({})", rendered.join(", "))
			}
			Predicate::Like { column, pattern } => {
				let encoder = self.encoder_of(column)?;
				format!(
					"{column} LIKE {}",
					encoder.encode(&Value::Str(pattern.clone()))
				)
			}
		})
	}

	fn render_nary(&self, operands: &[Predicate], separator: &str) -> FilterResult<String> {
		if operands.is_empty() {
			return Ok("TRUE".to_string());
		}
		let rendered: Vec<String> = operands
			.iter()
			.map(|p| self.render(p))
			.collect::<FilterResult<_>>()?;
		Ok(format!("({})", rendered.join(separator)))
	}

	fn encoder_of(&self, token: &str) -> FilterResult<&Arc<dyn ValueEncoder>> {
		self.encoders_by_token
			.get(token)
			.ok_or_else(|| FilterError::UnknownColumn(token.to_string()))
	}
}

fn membership(inner: Predicate, mode: MembershipMode) -> Predicate {
	match mode {
		MembershipMode::In => inner,
		MembershipMode::NotIn => Predicate::not(inner),
	}
}

/// Decompose an interval into 0-2 comparisons ANDed together, selected by
/// boundary kind. A fully unbounded interval is a tautology.
fn interval_predicate(column: &str, interval: &Interval) -> Predicate {
	let kind = interval.kind();
	let mut parts = Vec::new();
	if let Some(left) = interval.left() {
		parts.push(Predicate::Comparison {
			column: column.to_string(),
			op: if kind.left_closed() {
				CompareOp::Gte
			} else {
				CompareOp::Gt
			},
			literal: left.clone(),
		});
	}
	if let Some(right) = interval.right() {
		parts.push(Predicate::Comparison {
			column: column.to_string(),
			op: if kind.right_closed() {
				CompareOp::Lte
			} else {
				CompareOp::Lt
			},
			literal: right.clone(),
		});
	}
	Predicate::and(parts)
}

/// A time period is an equivalent closed interval `[start, end]`.
fn period_interval(period: &TimePeriod) -> Interval {
	Interval::closed(period.start, period.end)
}

fn text_predicate(column: &str, mode: TextMode, value: &str) -> Predicate {
	match mode {
		TextMode::Equal => Predicate::Comparison {
			column: column.to_string(),
			op: CompareOp::Eq,
			literal: Value::Str(value.to_string()),
		},
		TextMode::Unequal => Predicate::Comparison {
			column: column.to_string(),
			op: CompareOp::Ne,
			literal: Value::Str(value.to_string()),
		},
		// The literal itself is not escaped: an embedded wildcard stays a
		// wildcard.
		TextMode::StartsWith => Predicate::Like {
			column: column.to_string(),
			pattern: format!("{value}{WILDCARD}"),
		},
		TextMode::Contains => Predicate::Like {
			column: column.to_string(),
			pattern: format!("{WILDCARD}{value}{WILDCARD}"),
		},
		TextMode::EndsWith => Predicate::Like {
			column: column.to_string(),
			pattern: format!("{WILDCARD}{value}"),
		},
	}
}
