//! Filters: per-entity-type bundles of named conditions.

use crate::compile::PredicateCompiler;
use crate::condition::Condition;
use crate::error::FilterResult;
use crate::predicate::Predicate;

/// The complete set of conditions and their combination logic for one query
/// against one entity type.
///
/// Implementations name each condition by the attribute it constrains; the
/// default combination ANDs the compiled conditions together. DAO-specific
/// filters override [`EntityFilter::combine`] when they need different
/// logic (an OR across search fields, say).
pub trait EntityFilter: Send + Sync {
	/// The named conditions, in declaration order.
	fn conditions(&self) -> Vec<(&str, &Condition)>;

	/// Assemble the compiled conditions into one predicate.
	fn combine(&self, compiled: Vec<Predicate>) -> Predicate {
		Predicate::and(compiled)
	}

	/// A trivial filter constrains nothing; paged reads take a faster path
	/// for it.
	fn is_match_all(&self) -> bool {
		self.conditions().is_empty()
	}

	/// Compile every named condition and combine the results.
	fn to_predicate(&self, compiler: &PredicateCompiler) -> FilterResult<Predicate> {
		let mut compiled = Vec::new();
		for (attribute, condition) in self.conditions() {
			compiled.push(compiler.compile(attribute, condition)?);
		}
		Ok(self.combine(compiled))
	}
}

/// The common filter shape: an ordered list of `(attribute, condition)`
/// pairs, AND-combined.
///
/// # Examples
///
/// ```
/// use lagrene_filter::{AttributeFilter, Condition, EntityFilter};
///
/// let filter = AttributeFilter::new()
///     .with("status", Condition::equal_to("active"))
///     .with("age", Condition::at_least(18));
/// assert!(!filter.is_match_all());
/// assert_eq!(filter.conditions().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AttributeFilter {
	conditions: Vec<(String, Condition)>,
}

impl AttributeFilter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, attribute: impl Into<String>, condition: Condition) -> Self {
		self.conditions.push((attribute.into(), condition));
		self
	}

	pub fn push(&mut self, attribute: impl Into<String>, condition: Condition) {
		self.conditions.push((attribute.into(), condition));
	}

	pub fn is_empty(&self) -> bool {
		self.conditions.is_empty()
	}
}

impl EntityFilter for AttributeFilter {
	fn conditions(&self) -> Vec<(&str, &Condition)> {
		self.conditions
			.iter()
			.map(|(attribute, condition)| (attribute.as_str(), condition))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compile::ColumnBinding;

	#[test]
	fn empty_filter_compiles_to_tautology() {
		let compiler = PredicateCompiler::new([("a", ColumnBinding::new("a"))]).unwrap();
		let filter = AttributeFilter::new();
		assert!(filter.is_match_all());
		assert_eq!(
			filter.to_predicate(&compiler).unwrap(),
			Predicate::Tautology
		);
	}

	#[test]
	fn conditions_are_and_combined_in_order() {
		let compiler = PredicateCompiler::new([
			("a", ColumnBinding::new("a")),
			("b", ColumnBinding::new("b")),
		])
		.unwrap();
		let filter = AttributeFilter::new()
			.with("a", Condition::at_least(1))
			.with("b", Condition::equal_to("x"));
		let rendered = compiler.render(&filter.to_predicate(&compiler).unwrap()).unwrap();
		assert_eq!(rendered, "(a >= 1 AND b = 'x')");
	}

	#[test]
	fn custom_combination_logic() {
		struct EitherField(AttributeFilter);

		impl EntityFilter for EitherField {
			fn conditions(&self) -> Vec<(&str, &Condition)> {
				self.0.conditions()
			}

			fn combine(&self, compiled: Vec<Predicate>) -> Predicate {
				Predicate::or(compiled)
			}
		}

		let compiler = PredicateCompiler::new([
			("name", ColumnBinding::new("name")),
			("email", ColumnBinding::new("email")),
		])
		.unwrap();
		let filter = EitherField(
			AttributeFilter::new()
				.with("name", Condition::contains("alice"))
				.with("email", Condition::contains("alice")),
		);
		let rendered = compiler.render(&filter.to_predicate(&compiler).unwrap()).unwrap();
		assert_eq!(rendered, "(name LIKE '%alice%' OR email LIKE '%alice%')");
	}
}
