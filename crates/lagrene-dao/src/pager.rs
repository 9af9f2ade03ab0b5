//! Mark-based paging over stores without a native offset primitive.
//!
//! The pager emulates offsets by counting: the mark is the identity of the
//! row after the previous page's content (fetched there as the lookahead
//! row), its ordinal position is recomputed per request from a
//! position-tracking index, and one extra row per fetch decides whether a
//! further page exists.
//!
//! Because the offset is recomputed by counting rather than carried as a
//! server-held cursor, concurrent inserts or deletes before the mark shift
//! the effective window: rows may be skipped or repeated across pages under
//! concurrent mutation. That weak-consistency property is inherent to the
//! count-then-fetch design; no lock spans the two steps.

use crate::entity::Entity;
use crate::error::StoreResult;
use crate::page::Page;
use async_trait::async_trait;
use lagrene_filter::EntityFilter;
use tracing::debug;

/// The backend primitives the pager runs on. All three operate in identity
/// order — the order the position-tracking index counts in.
#[async_trait]
pub trait MarkScan<E: Entity>: Send + Sync {
	type Context: Send + Sync;

	/// Number of entities with identity `<=` the mark, inclusive. A mark
	/// referencing a deleted identity still counts its preceding rows, so a
	/// stale mark degrades to the nearest preceding position instead of
	/// failing.
	async fn position_count(&self, cx: &Self::Context, mark: &E::Id) -> StoreResult<u64>;

	/// Rows from the given zero-based offset, at most `limit` of them
	/// (`None` = all).
	async fn scan(
		&self,
		cx: &Self::Context,
		offset: u64,
		limit: Option<u64>,
	) -> StoreResult<Vec<E>>;

	/// Every row satisfying the filter, for the full-scan fallback — the
	/// position index cannot evaluate an arbitrary filter positionally.
	async fn scan_matching(
		&self,
		cx: &Self::Context,
		filter: &dyn EntityFilter,
	) -> StoreResult<Vec<E>>;
}

/// Fetch one page of up to `size` entities (0 = unbounded), resuming after
/// `mark` when one is supplied.
///
/// A failure in either the count-resolution step or the fetch step aborts
/// the whole request; no partial page is returned.
pub async fn fetch_page<E, S>(
	source: &S,
	cx: &S::Context,
	filter: Option<&dyn EntityFilter>,
	mark: Option<&E::Id>,
	size: u64,
) -> StoreResult<Page<E>>
where
	E: Entity,
	S: MarkScan<E> + ?Sized,
{
	let lookahead = lookahead_limit(size);
	let rows = match filter {
		Some(filter) if !filter.is_match_all() => {
			// Full-scan fallback: the position index cannot evaluate an
			// arbitrary filter positionally, so the mark's ordinal is
			// resolved against the materialized matching rows instead.
			let matching = source.scan_matching(cx, filter).await?;
			let offset = match mark {
				Some(mark) => count_le(&matching, mark).saturating_sub(1),
				None => 0,
			};
			debug!(
				entity = E::entity_name(),
				offset, size, "resolved page window (filtered scan)"
			);
			window(matching, offset, lookahead)
		}
		_ => {
			let offset = match mark {
				Some(mark) => source.position_count(cx, mark).await?.saturating_sub(1),
				None => 0,
			};
			debug!(
				entity = E::entity_name(),
				offset, size, "resolved page window"
			);
			source.scan(cx, offset, lookahead).await?
		}
	};

	let (items, next_mark) = trim_lookahead(rows, lookahead);
	Ok(Page {
		items,
		previous_mark: mark.cloned(),
		next_mark,
	})
}

/// Inclusive `<=`-count over materialized rows, mirroring the position
/// index's counting semantics for the filtered fallback.
fn count_le<E: Entity>(rows: &[E], mark: &E::Id) -> u64 {
	rows.iter()
		.filter(|row| row.id().is_some_and(|id| id <= *mark))
		.count() as u64
}

/// `size + 1`: the requested rows plus one lookahead row. A size of zero is
/// unbounded and disables the lookahead.
pub(crate) fn lookahead_limit(size: u64) -> Option<u64> {
	if size == 0 { None } else { Some(size + 1) }
}

/// Apply offset and limit to an already-materialized row list.
pub(crate) fn window<E>(rows: Vec<E>, offset: u64, limit: Option<u64>) -> Vec<E> {
	let iter = rows.into_iter().skip(offset as usize);
	match limit {
		Some(limit) => iter.take(limit as usize).collect(),
		None => iter.collect(),
	}
}

/// When a full lookahead's worth of rows came back, the last row is the
/// next-page mark and only the rows before it are content; otherwise there
/// is no further page.
pub(crate) fn trim_lookahead<E: Entity>(
	mut rows: Vec<E>,
	lookahead: Option<u64>,
) -> (Vec<E>, Option<E::Id>) {
	match lookahead {
		Some(lookahead) if rows.len() as u64 == lookahead => {
			let next_mark = rows.pop().and_then(|row| row.id());
			(rows, next_mark)
		}
		_ => (rows, None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Clone)]
	struct Stub(i64);

	impl Entity for Stub {
		type Id = i64;

		fn entity_name() -> &'static str {
			"stub"
		}

		fn id(&self) -> Option<i64> {
			Some(self.0)
		}

		fn set_id(&mut self, id: i64) {
			self.0 = id;
		}
	}

	#[test]
	fn zero_size_disables_lookahead() {
		assert_eq!(lookahead_limit(0), None);
		assert_eq!(lookahead_limit(3), Some(4));
	}

	#[test]
	fn window_applies_offset_then_limit() {
		let rows: Vec<Stub> = (1..=5).map(Stub).collect();
		let out = window(rows, 2, Some(2));
		let ids: Vec<i64> = out.iter().map(|s| s.0).collect();
		assert_eq!(ids, vec![3, 4]);
	}

	#[test]
	fn full_lookahead_yields_a_next_mark() {
		let rows: Vec<Stub> = (1..=4).map(Stub).collect();
		let (items, next) = trim_lookahead(rows, Some(4));
		assert_eq!(items.len(), 3);
		assert_eq!(next, Some(4));
	}

	#[test]
	fn short_fetch_means_no_further_page() {
		let rows: Vec<Stub> = (1..=2).map(Stub).collect();
		let (items, next) = trim_lookahead(rows, Some(4));
		assert_eq!(items.len(), 2);
		assert_eq!(next, None);
	}
}
