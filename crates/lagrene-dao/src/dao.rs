//! DAO contracts: the operation surface consuming compiled predicates.
//!
//! Every operation takes the caller-supplied context handle explicitly —
//! a connection, session, or transaction obtained from an external
//! provider. The contracts hold no ambient state, spawn nothing, and
//! delegate cancellation and timeout semantics entirely to the context.

use crate::entity::{Dependent, Entity};
use crate::error::StoreResult;
use crate::page::{Page, PageRequest};
use crate::reconcile::ReconcileReport;
use crate::sort::SortSpec;
use async_trait::async_trait;
use lagrene_filter::EntityFilter;

/// Object-level persistence operations for one entity type.
///
/// An absent filter means match-all; an empty sort specification means the
/// backend's default order. `update` applies fields one by one (partial
/// patch semantics) and, for versioned entity types, fails with a version
/// conflict before any field is written when the stored version does not
/// match the submitted one.
#[async_trait]
pub trait EntityDao<E: Entity>: Send + Sync {
	/// The caller-supplied backing-store handle.
	type Context: Send + Sync;

	/// Insert the entity; a generated identity may be assigned.
	async fn create(&self, cx: &Self::Context, entity: E) -> StoreResult<E>;

	/// Patch the stored entity, failing `NotFound` when the identity is
	/// absent.
	async fn update(&self, cx: &Self::Context, entity: E) -> StoreResult<E>;

	async fn delete(&self, cx: &Self::Context, id: &E::Id) -> StoreResult<()>;

	/// Absence is a normal result, never an error.
	async fn get(&self, cx: &Self::Context, id: &E::Id) -> StoreResult<Option<E>>;

	async fn exists(&self, cx: &Self::Context, id: &E::Id) -> StoreResult<bool> {
		Ok(self.get(cx, id).await?.is_some())
	}

	async fn find(
		&self,
		cx: &Self::Context,
		filter: Option<&dyn EntityFilter>,
		sort: &SortSpec,
	) -> StoreResult<Vec<E>>;

	async fn count(
		&self,
		cx: &Self::Context,
		filter: Option<&dyn EntityFilter>,
	) -> StoreResult<u64>;

	/// Bulk delete; returns the number of rows removed.
	async fn delete_matching(
		&self,
		cx: &Self::Context,
		filter: &dyn EntityFilter,
	) -> StoreResult<u64>;
}

/// Paged reads over a DAO, in both addressing styles.
#[async_trait]
pub trait PagedDao<E: Entity>: EntityDao<E> {
	async fn find_page(
		&self,
		cx: &Self::Context,
		filter: Option<&dyn EntityFilter>,
		request: &PageRequest<E::Id>,
	) -> StoreResult<Page<E>>;
}

/// Operations on owner-bound dependents.
///
/// Creation and deletion of dependents is mediated by the owning aggregate
/// through [`DependentDao::converge`] rather than exposed directly.
#[async_trait]
pub trait DependentDao<E: Dependent>: Send + Sync {
	type Context: Send + Sync;

	async fn find_by_owner(
		&self,
		cx: &Self::Context,
		owner: &E::OwnerId,
		sort: &SortSpec,
	) -> StoreResult<Vec<E>>;

	/// Converge the persisted dependent collection of one owner toward the
	/// desired state. Callers must serialize concurrent convergence for the
	/// same owner.
	async fn converge(
		&self,
		cx: &Self::Context,
		owner: &E::OwnerId,
		desired: Vec<E>,
	) -> StoreResult<ReconcileReport>;
}
