//! Typed filter conditions compiled into backend-native query predicates.
//!
//! The filter layer is backend-agnostic: callers build [`Condition`]s
//! through validating factories, bundle them into an [`EntityFilter`], and a
//! [`PredicateCompiler`] configured with per-column bindings turns the
//! bundle into one [`Predicate`] — an AST that renders to a WHERE-clause
//! text fragment or evaluates structurally against in-memory rows.

pub mod compile;
pub mod condition;
pub mod error;
pub mod filter;
pub mod predicate;
pub mod value;

pub use compile::{ColumnBinding, PredicateCompiler, WILDCARD};
pub use condition::{
	BoundKind, ComparisonMode, Condition, EqualityMode, Interval, MembershipMode, TextMode,
	TimePeriod,
};
pub use error::{FilterError, FilterResult};
pub use filter::{AttributeFilter, EntityFilter};
pub use predicate::{CompareOp, Predicate, RowAccess};
pub use value::{SqlValueEncoder, Value, ValueEncoder};
