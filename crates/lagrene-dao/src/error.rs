//! Persistence error types.
//!
//! Backend-specific failures wrap into a single [`StoreError::Backend`]
//! carrying the original cause. A versioned-update mismatch is the distinct
//! [`StoreError::VersionConflict`] so callers can retry with a fresh read.
//! "Not found" on a `get` is a normal absent result, never an error.

use lagrene_filter::FilterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("{entity} not found: {id}")]
	NotFound { entity: &'static str, id: String },

	#[error("{entity} already exists: {id}")]
	Duplicate { entity: &'static str, id: String },

	#[error("version conflict on {entity} {id}: stored {stored}, submitted {submitted}")]
	VersionConflict {
		entity: &'static str,
		id: String,
		stored: String,
		submitted: String,
	},

	#[error("store configuration error: {0}")]
	Configuration(String),

	#[error(transparent)]
	Filter(#[from] FilterError),

	#[error("backend failure: {0}")]
	Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
	/// Wrap a backend-specific failure, keeping the original cause.
	pub fn backend(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
		StoreError::Backend(cause.into())
	}

	pub fn version_conflict(
		entity: &'static str,
		id: String,
		stored: Option<i64>,
		submitted: Option<i64>,
	) -> Self {
		let render = |v: Option<i64>| v.map_or_else(|| "none".to_string(), |v| v.to_string());
		StoreError::VersionConflict {
			entity,
			id,
			stored: render(stored),
			submitted: render(submitted),
		}
	}
}

pub type StoreResult<T> = Result<T, StoreError>;
