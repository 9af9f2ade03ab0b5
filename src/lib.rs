//! Facade crate for the lagrene persistence toolkit.
//!
//! Re-exports the filter layer (typed conditions compiled into
//! backend-native predicates) and the DAO layer (persistence contracts,
//! mark-based pagination, dependent-collection reconciliation).

pub use lagrene_dao as dao;
pub use lagrene_filter as filter;

pub mod prelude {
	pub use lagrene_dao::{
		ColumnMap, ColumnSpec, Dependent, DependentDao, Entity, EntityDao, MarkScan,
		MemorySession, MemoryStore, Page, PageRequest, PagedDao, ReconcileDelegate, ReconcileOp,
		ReconcileReport, SortDirection, SortKey, SortSpec, StoreError, StoreResult, Versioned,
	};
	pub use lagrene_filter::{
		AttributeFilter, BoundKind, ColumnBinding, Condition, EntityFilter, FilterError,
		FilterResult, Interval, Predicate, PredicateCompiler, RowAccess, SqlValueEncoder,
		TimePeriod, Value, ValueEncoder,
	};
}
