//! Explicit column mapping: one statically declared table per entity type.
//!
//! A [`ColumnMap`] pairs each filterable attribute with its native column
//! token and accessor closures, resolved once at DAO construction. It feeds
//! the predicate compiler, drives per-field patch application on update, and
//! adapts entities to [`RowAccess`] for in-memory predicate execution.

use crate::error::{StoreError, StoreResult};
use lagrene_filter::{ColumnBinding, PredicateCompiler, RowAccess, Value, ValueEncoder};
use std::collections::HashMap;
use std::sync::Arc;

/// One attribute's declaration: native token plus accessor closures.
///
/// A spec without a setter is read-only for patch purposes — the identity
/// column is the usual case.
pub struct ColumnSpec<E> {
	attribute: &'static str,
	token: &'static str,
	get: fn(&E) -> Option<Value>,
	set: Option<fn(&mut E, Value)>,
	encoder: Option<Arc<dyn ValueEncoder>>,
}

impl<E> ColumnSpec<E> {
	/// A read-only column.
	pub fn new(attribute: &'static str, token: &'static str, get: fn(&E) -> Option<Value>) -> Self {
		Self {
			attribute,
			token,
			get,
			set: None,
			encoder: None,
		}
	}

	/// A column that participates in per-field patch application.
	pub fn writable(
		attribute: &'static str,
		token: &'static str,
		get: fn(&E) -> Option<Value>,
		set: fn(&mut E, Value),
	) -> Self {
		Self {
			attribute,
			token,
			get,
			set: Some(set),
			encoder: None,
		}
	}

	/// Override the default literal encoder for this column.
	pub fn with_encoder(mut self, encoder: Arc<dyn ValueEncoder>) -> Self {
		self.encoder = Some(encoder);
		self
	}

	pub fn attribute(&self) -> &'static str {
		self.attribute
	}

	pub fn token(&self) -> &'static str {
		self.token
	}
}

impl<E> Clone for ColumnSpec<E> {
	fn clone(&self) -> Self {
		Self {
			attribute: self.attribute,
			token: self.token,
			get: self.get,
			set: self.set,
			encoder: self.encoder.clone(),
		}
	}
}

/// The resolved attribute table for one entity type.
pub struct ColumnMap<E> {
	specs: Vec<ColumnSpec<E>>,
	by_attribute: HashMap<&'static str, usize>,
	by_token: HashMap<&'static str, usize>,
}

impl<E> ColumnMap<E> {
	/// Resolve the table, failing on duplicate attributes or tokens.
	pub fn new(specs: Vec<ColumnSpec<E>>) -> StoreResult<Self> {
		let mut by_attribute = HashMap::new();
		let mut by_token = HashMap::new();
		for (index, spec) in specs.iter().enumerate() {
			if by_attribute.insert(spec.attribute, index).is_some() {
				return Err(StoreError::Configuration(format!(
					"duplicate column attribute: {}",
					spec.attribute
				)));
			}
			if by_token.insert(spec.token, index).is_some() {
				return Err(StoreError::Configuration(format!(
					"duplicate column token: {}",
					spec.token
				)));
			}
		}
		Ok(Self {
			specs,
			by_attribute,
			by_token,
		})
	}

	/// Build the predicate compiler for this entity type.
	pub fn compiler(&self) -> StoreResult<PredicateCompiler> {
		let bindings = self.specs.iter().map(|spec| {
			let binding = match &spec.encoder {
				Some(encoder) => ColumnBinding::with_encoder(spec.token, encoder.clone()),
				None => ColumnBinding::new(spec.token),
			};
			(spec.attribute, binding)
		});
		Ok(PredicateCompiler::new(bindings)?)
	}

	pub fn specs(&self) -> &[ColumnSpec<E>] {
		&self.specs
	}

	/// The typed value of one attribute on one entity.
	pub fn value_of(&self, entity: &E, attribute: &str) -> Option<Value> {
		self.by_attribute
			.get(attribute)
			.and_then(|index| (self.specs[*index].get)(entity))
	}

	/// Per-field patch application: every writable attribute that yields a
	/// value on the incoming entity overwrites the stored value; absent
	/// attributes leave the stored value untouched. Returns the number of
	/// fields applied.
	pub fn apply_patch(&self, stored: &mut E, incoming: &E) -> usize {
		let mut applied = 0;
		for spec in &self.specs {
			let Some(set) = spec.set else { continue };
			if let Some(value) = (spec.get)(incoming) {
				set(stored, value);
				applied += 1;
			}
		}
		applied
	}

	/// Adapt an entity to [`RowAccess`] keyed by column token.
	pub fn row<'a>(&'a self, entity: &'a E) -> EntityRow<'a, E> {
		EntityRow { map: self, entity }
	}
}

/// [`RowAccess`] over one entity through its column map.
pub struct EntityRow<'a, E> {
	map: &'a ColumnMap<E>,
	entity: &'a E,
}

impl<E> RowAccess for EntityRow<'_, E> {
	fn value_of(&self, column: &str) -> Option<Value> {
		self.map
			.by_token
			.get(column)
			.and_then(|index| (self.map.specs[*index].get)(self.entity))
	}
}
