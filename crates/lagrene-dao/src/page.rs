//! Page request/response value objects.

use crate::entity::Entity;
use serde::{Deserialize, Serialize};

/// How one page of results is addressed.
///
/// Offset-style addressing needs a backend with a native offset primitive;
/// mark-style addressing resumes from the previous page's boundary identity
/// and works on stores without one. A size of `0` means unbounded: all
/// remaining rows in one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageRequest<I> {
	Offset { page: u64, size: u64 },
	Mark { mark: Option<I>, size: u64 },
}

impl<I> PageRequest<I> {
	/// The first mark-style page.
	pub fn first(size: u64) -> Self {
		PageRequest::Mark { mark: None, size }
	}

	/// The mark-style page after the given boundary.
	pub fn after(mark: I, size: u64) -> Self {
		PageRequest::Mark {
			mark: Some(mark),
			size,
		}
	}

	pub fn size(&self) -> u64 {
		match self {
			PageRequest::Offset { size, .. } | PageRequest::Mark { size, .. } => *size,
		}
	}
}

/// One page of content plus its pagination boundaries.
///
/// `next_mark` is absent when there is no further page.
#[derive(Clone)]
pub struct Page<E: Entity> {
	pub items: Vec<E>,
	pub previous_mark: Option<E::Id>,
	pub next_mark: Option<E::Id>,
}

impl<E: Entity> Page<E> {
	pub fn has_next(&self) -> bool {
		self.next_mark.is_some()
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}
