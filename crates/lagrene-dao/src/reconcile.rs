//! Dependent-collection reconciliation: converge persisted one-to-many
//! children toward a desired state with the minimal add/update/remove
//! sequence.

use crate::entity::Entity;
use crate::error::StoreResult;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One scheduled reconciliation step.
#[derive(Debug, Clone)]
pub enum ReconcileOp<E> {
	Remove(E),
	Update { current: E, desired: E },
	Add(E),
}

/// Counts of the steps applied by a convergence run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
	pub removed: usize,
	pub updated: usize,
	pub added: usize,
}

/// Compute the reconciliation plan for one owner's dependent collection.
///
/// Matching is strictly by identity equality, never by content: a desired
/// entity without an assigned identity is always new, a desired entity whose
/// identity matches a current record is an update, and a current record
/// whose identity is absent from the desired set is removed. The plan is
/// ordered: all removes, then all updates, then all adds.
pub fn plan<E: Entity>(current: Vec<E>, desired: Vec<E>) -> Vec<ReconcileOp<E>> {
	let desired_ids: HashSet<E::Id> = desired.iter().filter_map(Entity::id).collect();

	let mut removes = Vec::new();
	let mut kept: HashMap<E::Id, E> = HashMap::new();
	for entity in current {
		match entity.id() {
			Some(id) if desired_ids.contains(&id) => {
				kept.insert(id, entity);
			}
			_ => removes.push(entity),
		}
	}

	let mut updates = Vec::new();
	let mut adds = Vec::new();
	for entity in desired {
		match entity.id() {
			None => adds.push(entity),
			Some(id) => {
				// A desired entity carrying an identity unknown to the
				// store matches nothing and is not scheduled.
				if let Some(current) = kept.remove(&id) {
					updates.push((current, entity));
				}
			}
		}
	}

	let mut ops: Vec<ReconcileOp<E>> = Vec::new();
	ops.extend(removes.into_iter().map(ReconcileOp::Remove));
	ops.extend(
		updates
			.into_iter()
			.map(|(current, desired)| ReconcileOp::Update { current, desired }),
	);
	ops.extend(adds.into_iter().map(ReconcileOp::Add));
	ops
}

/// Performs the individual reconciliation steps against the backing store.
#[async_trait]
pub trait ReconcileDelegate<E: Entity>: Send + Sync {
	type Context: Send + Sync;

	async fn add(&self, cx: &Self::Context, entity: E) -> StoreResult<E>;

	async fn update(&self, cx: &Self::Context, current: E, desired: E) -> StoreResult<E>;

	async fn remove(&self, cx: &Self::Context, entity: E) -> StoreResult<()>;
}

/// Apply the plan for `current` → `desired` through the delegate.
///
/// The first delegate failure propagates immediately; steps already applied
/// are not rolled back here — atomicity, if required, is the caller's
/// transactional boundary.
pub async fn converge<E, D>(
	delegate: &D,
	cx: &D::Context,
	current: Vec<E>,
	desired: Vec<E>,
) -> StoreResult<ReconcileReport>
where
	E: Entity,
	D: ReconcileDelegate<E> + ?Sized,
{
	let mut report = ReconcileReport::default();
	for op in plan(current, desired) {
		match op {
			ReconcileOp::Remove(entity) => {
				delegate.remove(cx, entity).await?;
				report.removed += 1;
			}
			ReconcileOp::Update { current, desired } => {
				delegate.update(cx, current, desired).await?;
				report.updated += 1;
			}
			ReconcileOp::Add(entity) => {
				delegate.add(cx, entity).await?;
				report.added += 1;
			}
		}
	}
	debug!(
		entity = E::entity_name(),
		removed = report.removed,
		updated = report.updated,
		added = report.added,
		"dependent collection converged"
	);
	Ok(report)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, Clone, PartialEq)]
	struct Child {
		id: Option<i64>,
		label: String,
	}

	impl Entity for Child {
		type Id = i64;

		fn entity_name() -> &'static str {
			"child"
		}

		fn id(&self) -> Option<i64> {
			self.id
		}

		fn set_id(&mut self, id: i64) {
			self.id = Some(id);
		}
	}

	fn child(id: Option<i64>, label: &str) -> Child {
		Child {
			id,
			label: label.to_string(),
		}
	}

	#[test]
	fn plan_schedules_remove_update_add_in_that_order() {
		let current = vec![child(Some(1), "A"), child(Some(2), "B")];
		let desired = vec![child(Some(2), "B-modified"), child(None, "C")];

		let ops = plan(current, desired);
		assert_eq!(ops.len(), 3);
		assert!(
			matches!(&ops[0], ReconcileOp::Remove(e) if e.id == Some(1)),
			"first op should remove A, got {:?}",
			ops[0]
		);
		assert!(matches!(
			&ops[1],
			ReconcileOp::Update { current, desired }
				if current.label == "B" && desired.label == "B-modified"
		));
		assert!(matches!(&ops[2], ReconcileOp::Add(e) if e.label == "C"));
	}

	#[test]
	fn identical_collections_plan_updates_only() {
		let current = vec![child(Some(1), "A")];
		let desired = vec![child(Some(1), "A")];
		let ops = plan(current, desired);
		// Matching is by identity, never deep comparison: an unchanged
		// child is still scheduled as an update.
		assert_eq!(ops.len(), 1);
		assert!(matches!(&ops[0], ReconcileOp::Update { .. }));
	}

	#[test]
	fn desired_with_unknown_identity_is_not_scheduled() {
		let ops = plan(vec![child(Some(1), "A")], vec![child(Some(99), "ghost")]);
		assert_eq!(ops.len(), 1);
		assert!(matches!(&ops[0], ReconcileOp::Remove(_)));
	}

	#[test]
	fn empty_desired_removes_everything() {
		let ops = plan(
			vec![child(Some(1), "A"), child(Some(2), "B")],
			Vec::new(),
		);
		assert_eq!(ops.len(), 2);
		assert!(ops.iter().all(|op| matches!(op, ReconcileOp::Remove(_))));
	}
}
