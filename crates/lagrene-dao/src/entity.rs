//! Entity traits: identity, optimistic versioning, owner-bound dependents.

use std::fmt::Display;
use std::hash::Hash;

/// An entity with an immutable identity unique within its type.
///
/// The identity is absent until the store assigns one on insert. `Ord` on
/// the identity defines the store's position-tracking order used by
/// mark-based paging.
pub trait Entity: Clone + Send + Sync + 'static {
	type Id: Clone + Ord + Hash + Display + Send + Sync + 'static;

	/// The type's name, used in error reporting and logging.
	fn entity_name() -> &'static str;

	fn id(&self) -> Option<Self::Id>;

	fn set_id(&mut self, id: Self::Id);
}

/// An entity carrying a version token for optimistic concurrency.
///
/// An update first reads the stored version; a mismatch against the
/// submitted version fails before any field is written.
pub trait Versioned: Entity {
	fn version(&self) -> Option<i64>;

	fn set_version(&mut self, version: i64);
}

/// An entity whose storage lifecycle is mediated by an owning aggregate.
pub trait Dependent: Entity {
	type OwnerId: Clone + Eq + Hash + Display + Send + Sync + 'static;

	fn owner_id(&self) -> &Self::OwnerId;
}
