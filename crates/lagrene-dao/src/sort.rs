//! Sort specifications: ordered `(attribute, direction)` pairs.

use crate::schema::ColumnMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
	#[default]
	Ascending,
	Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
	pub attribute: String,
	pub direction: SortDirection,
}

/// An ordered sequence of sort keys. Empty means the backend's default
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
	keys: Vec<SortKey>,
}

impl SortSpec {
	pub fn unsorted() -> Self {
		Self::default()
	}

	pub fn ascending(attribute: impl Into<String>) -> Self {
		Self::unsorted().then_ascending(attribute)
	}

	pub fn descending(attribute: impl Into<String>) -> Self {
		Self::unsorted().then_descending(attribute)
	}

	pub fn then_ascending(mut self, attribute: impl Into<String>) -> Self {
		self.keys.push(SortKey {
			attribute: attribute.into(),
			direction: SortDirection::Ascending,
		});
		self
	}

	pub fn then_descending(mut self, attribute: impl Into<String>) -> Self {
		self.keys.push(SortKey {
			attribute: attribute.into(),
			direction: SortDirection::Descending,
		});
		self
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	pub fn keys(&self) -> &[SortKey] {
		&self.keys
	}

	/// Compare two entities under this specification through their column
	/// map. An absent value orders before any present one; values of
	/// mismatched types compare equal.
	pub fn compare<E>(&self, columns: &ColumnMap<E>, a: &E, b: &E) -> Ordering {
		for key in &self.keys {
			let va = columns.value_of(a, &key.attribute);
			let vb = columns.value_of(b, &key.attribute);
			let ordering = match (&va, &vb) {
				(None, None) => Ordering::Equal,
				(None, Some(_)) => Ordering::Less,
				(Some(_), None) => Ordering::Greater,
				(Some(va), Some(vb)) => va.partial_cmp(vb).unwrap_or(Ordering::Equal),
			};
			let ordering = match key.direction {
				SortDirection::Ascending => ordering,
				SortDirection::Descending => ordering.reverse(),
			};
			if ordering != Ordering::Equal {
				return ordering;
			}
		}
		Ordering::Equal
	}
}
