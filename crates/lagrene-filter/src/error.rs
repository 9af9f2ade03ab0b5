//! Error types for condition construction and predicate compilation.

use thiserror::Error;

/// Errors raised by the filter layer.
///
/// `Validation` is raised at condition construction time, before any query
/// execution. `Configuration` is raised when a compiler is set up with an
/// inconsistent column table, never per query.
#[derive(Debug, Error)]
pub enum FilterError {
	#[error("invalid condition: {0}")]
	Validation(String),

	#[error("compiler configuration error: {0}")]
	Configuration(String),

	#[error("no column binding for attribute: {0}")]
	UnknownAttribute(String),

	#[error("no value encoder for column token: {0}")]
	UnknownColumn(String),
}

pub type FilterResult<T> = Result<T, FilterError>;
