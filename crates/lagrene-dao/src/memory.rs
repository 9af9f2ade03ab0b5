//! In-memory backend implementing every DAO contract.
//!
//! Rows live in a `BTreeMap` keyed by identity, which doubles as the
//! position-tracking index for mark-based paging: identity order is the
//! scan order, and the `<=`-count is a range count over the key space.
//! Compiled predicates execute structurally against entities through their
//! column map.

use crate::dao::{DependentDao, EntityDao, PagedDao};
use crate::entity::{Dependent, Entity, Versioned};
use crate::error::{StoreError, StoreResult};
use crate::page::{Page, PageRequest};
use crate::pager::{self, MarkScan};
use crate::reconcile::{self, ReconcileDelegate, ReconcileReport};
use crate::schema::ColumnMap;
use crate::sort::SortSpec;
use async_trait::async_trait;
use lagrene_filter::{EntityFilter, Predicate, PredicateCompiler};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Context handle for [`MemoryStore`] operations.
///
/// The store carries its own state, so the handle is empty; it exists to
/// keep call sites on the explicit-context contract shared with real
/// backends.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemorySession;

/// Version-token accessors, registered at store construction for entity
/// types that opt into optimistic concurrency.
pub struct VersionAccess<E> {
	pub get: fn(&E) -> Option<i64>,
	pub set: fn(&mut E, i64),
}

impl<E: Versioned> VersionAccess<E> {
	pub fn of() -> Self {
		Self {
			get: E::version,
			set: E::set_version,
		}
	}
}

impl<E> Clone for VersionAccess<E> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<E> Copy for VersionAccess<E> {}

pub struct MemoryStore<E: Entity> {
	columns: ColumnMap<E>,
	compiler: PredicateCompiler,
	rows: RwLock<BTreeMap<E::Id, E>>,
	id_seq: AtomicU64,
	next_id: fn(u64) -> E::Id,
	versioning: Option<VersionAccess<E>>,
}

impl<E: Entity> MemoryStore<E> {
	/// A store without version checking. `next_id` turns the store's
	/// monotonic counter into a fresh identity for inserts that carry none.
	pub fn new(columns: ColumnMap<E>, next_id: fn(u64) -> E::Id) -> StoreResult<Self> {
		let compiler = columns.compiler()?;
		Ok(Self {
			columns,
			compiler,
			rows: RwLock::new(BTreeMap::new()),
			id_seq: AtomicU64::new(0),
			next_id,
			versioning: None,
		})
	}

	/// A store enforcing the optimistic-concurrency update contract.
	pub fn versioned(columns: ColumnMap<E>, next_id: fn(u64) -> E::Id) -> StoreResult<Self>
	where
		E: Versioned,
	{
		let mut store = Self::new(columns, next_id)?;
		store.versioning = Some(VersionAccess::of());
		Ok(store)
	}

	pub fn columns(&self) -> &ColumnMap<E> {
		&self.columns
	}

	pub fn compiler(&self) -> &PredicateCompiler {
		&self.compiler
	}

	fn generate_id(&self, taken: &BTreeMap<E::Id, E>) -> E::Id {
		loop {
			let candidate = (self.next_id)(self.id_seq.fetch_add(1, Ordering::Relaxed) + 1);
			if !taken.contains_key(&candidate) {
				return candidate;
			}
		}
	}

	/// Compile a non-trivial filter; `None` means match-all.
	fn predicate_for(&self, filter: Option<&dyn EntityFilter>) -> StoreResult<Option<Predicate>> {
		match filter {
			Some(filter) if !filter.is_match_all() => {
				Ok(Some(filter.to_predicate(&self.compiler)?))
			}
			_ => Ok(None),
		}
	}

	fn selects(&self, predicate: &Option<Predicate>, entity: &E) -> bool {
		match predicate {
			Some(predicate) => predicate.matches(&self.columns.row(entity)),
			None => true,
		}
	}
}

#[async_trait]
impl<E: Entity> EntityDao<E> for MemoryStore<E> {
	type Context = MemorySession;

	async fn create(&self, _cx: &MemorySession, mut entity: E) -> StoreResult<E> {
		let mut rows = self.rows.write().await;
		let id = match entity.id() {
			Some(id) => {
				if rows.contains_key(&id) {
					return Err(StoreError::Duplicate {
						entity: E::entity_name(),
						id: id.to_string(),
					});
				}
				id
			}
			None => {
				let id = self.generate_id(&rows);
				entity.set_id(id.clone());
				id
			}
		};
		if let Some(versioning) = &self.versioning {
			if (versioning.get)(&entity).is_none() {
				(versioning.set)(&mut entity, 1);
			}
		}
		rows.insert(id.clone(), entity.clone());
		debug!(entity = E::entity_name(), id = %id, "created");
		Ok(entity)
	}

	async fn update(&self, _cx: &MemorySession, entity: E) -> StoreResult<E> {
		let id = entity.id().ok_or_else(|| StoreError::NotFound {
			entity: E::entity_name(),
			id: "unassigned".to_string(),
		})?;
		let mut rows = self.rows.write().await;
		let stored = rows.get(&id).ok_or_else(|| StoreError::NotFound {
			entity: E::entity_name(),
			id: id.to_string(),
		})?;

		if let Some(versioning) = &self.versioning {
			let stored_version = (versioning.get)(stored);
			let submitted = (versioning.get)(&entity);
			if stored_version != submitted {
				return Err(StoreError::version_conflict(
					E::entity_name(),
					id.to_string(),
					stored_version,
					submitted,
				));
			}
		}

		let mut merged = stored.clone();
		let applied = self.columns.apply_patch(&mut merged, &entity);
		if let Some(versioning) = &self.versioning {
			let next = (versioning.get)(&merged).unwrap_or(0) + 1;
			(versioning.set)(&mut merged, next);
		}
		rows.insert(id.clone(), merged.clone());
		debug!(entity = E::entity_name(), id = %id, applied, "updated");
		Ok(merged)
	}

	async fn delete(&self, _cx: &MemorySession, id: &E::Id) -> StoreResult<()> {
		let mut rows = self.rows.write().await;
		rows.remove(id).ok_or_else(|| StoreError::NotFound {
			entity: E::entity_name(),
			id: id.to_string(),
		})?;
		debug!(entity = E::entity_name(), id = %id, "deleted");
		Ok(())
	}

	async fn get(&self, _cx: &MemorySession, id: &E::Id) -> StoreResult<Option<E>> {
		Ok(self.rows.read().await.get(id).cloned())
	}

	async fn find(
		&self,
		_cx: &MemorySession,
		filter: Option<&dyn EntityFilter>,
		sort: &SortSpec,
	) -> StoreResult<Vec<E>> {
		let predicate = self.predicate_for(filter)?;
		let rows = self.rows.read().await;
		let mut selected: Vec<E> = rows
			.values()
			.filter(|entity| self.selects(&predicate, entity))
			.cloned()
			.collect();
		drop(rows);
		if !sort.is_empty() {
			selected.sort_by(|a, b| sort.compare(&self.columns, a, b));
		}
		Ok(selected)
	}

	async fn count(
		&self,
		_cx: &MemorySession,
		filter: Option<&dyn EntityFilter>,
	) -> StoreResult<u64> {
		let predicate = self.predicate_for(filter)?;
		let rows = self.rows.read().await;
		Ok(rows
			.values()
			.filter(|entity| self.selects(&predicate, entity))
			.count() as u64)
	}

	async fn delete_matching(
		&self,
		_cx: &MemorySession,
		filter: &dyn EntityFilter,
	) -> StoreResult<u64> {
		let predicate = self.predicate_for(Some(filter))?;
		let mut rows = self.rows.write().await;
		let doomed: Vec<E::Id> = rows
			.iter()
			.filter(|(_, entity)| self.selects(&predicate, entity))
			.map(|(id, _)| id.clone())
			.collect();
		for id in &doomed {
			rows.remove(id);
		}
		debug!(
			entity = E::entity_name(),
			removed = doomed.len(),
			"bulk delete"
		);
		Ok(doomed.len() as u64)
	}
}

#[async_trait]
impl<E: Entity> MarkScan<E> for MemoryStore<E> {
	type Context = MemorySession;

	async fn position_count(&self, _cx: &MemorySession, mark: &E::Id) -> StoreResult<u64> {
		let rows = self.rows.read().await;
		Ok(rows.range((Bound::Unbounded, Bound::Included(mark))).count() as u64)
	}

	async fn scan(
		&self,
		_cx: &MemorySession,
		offset: u64,
		limit: Option<u64>,
	) -> StoreResult<Vec<E>> {
		let rows = self.rows.read().await;
		let iter = rows.values().skip(offset as usize);
		Ok(match limit {
			Some(limit) => iter.take(limit as usize).cloned().collect(),
			None => iter.cloned().collect(),
		})
	}

	async fn scan_matching(
		&self,
		_cx: &MemorySession,
		filter: &dyn EntityFilter,
	) -> StoreResult<Vec<E>> {
		let predicate = self.predicate_for(Some(filter))?;
		let rows = self.rows.read().await;
		Ok(rows
			.values()
			.filter(|entity| self.selects(&predicate, entity))
			.cloned()
			.collect())
	}
}

#[async_trait]
impl<E: Entity> PagedDao<E> for MemoryStore<E> {
	async fn find_page(
		&self,
		cx: &MemorySession,
		filter: Option<&dyn EntityFilter>,
		request: &PageRequest<E::Id>,
	) -> StoreResult<Page<E>> {
		match request {
			PageRequest::Mark { mark, size } => {
				pager::fetch_page(self, cx, filter, mark.as_ref(), *size).await
			}
			PageRequest::Offset { page, size } => {
				let offset = page * size;
				let lookahead = pager::lookahead_limit(*size);
				let rows = match filter {
					Some(filter) if !filter.is_match_all() => {
						let matching = self.scan_matching(cx, filter).await?;
						pager::window(matching, offset, lookahead)
					}
					_ => self.scan(cx, offset, lookahead).await?,
				};
				let (items, next_mark) = pager::trim_lookahead(rows, lookahead);
				Ok(Page {
					items,
					previous_mark: None,
					next_mark,
				})
			}
		}
	}
}

#[async_trait]
impl<E: Entity> ReconcileDelegate<E> for MemoryStore<E> {
	type Context = MemorySession;

	async fn add(&self, cx: &MemorySession, entity: E) -> StoreResult<E> {
		EntityDao::create(self, cx, entity).await
	}

	async fn update(&self, cx: &MemorySession, _current: E, desired: E) -> StoreResult<E> {
		EntityDao::update(self, cx, desired).await
	}

	async fn remove(&self, cx: &MemorySession, entity: E) -> StoreResult<()> {
		let id = entity.id().ok_or_else(|| StoreError::NotFound {
			entity: E::entity_name(),
			id: "unassigned".to_string(),
		})?;
		EntityDao::delete(self, cx, &id).await
	}
}

#[async_trait]
impl<E: Dependent> DependentDao<E> for MemoryStore<E> {
	type Context = MemorySession;

	async fn find_by_owner(
		&self,
		_cx: &MemorySession,
		owner: &E::OwnerId,
		sort: &SortSpec,
	) -> StoreResult<Vec<E>> {
		let rows = self.rows.read().await;
		let mut selected: Vec<E> = rows
			.values()
			.filter(|entity| entity.owner_id() == owner)
			.cloned()
			.collect();
		drop(rows);
		if !sort.is_empty() {
			selected.sort_by(|a, b| sort.compare(&self.columns, a, b));
		}
		Ok(selected)
	}

	async fn converge(
		&self,
		cx: &MemorySession,
		owner: &E::OwnerId,
		desired: Vec<E>,
	) -> StoreResult<ReconcileReport> {
		let current = self.find_by_owner(cx, owner, &SortSpec::unsorted()).await?;
		reconcile::converge(self, cx, current, desired).await
	}
}
