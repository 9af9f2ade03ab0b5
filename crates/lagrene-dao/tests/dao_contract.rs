//! The DAO operation surface against the in-memory backend: CRUD, patch
//! semantics, optimistic versioning, filtered finds and bulk deletes.

mod common;

use common::{Ticket, ticket_store};
use lagrene_dao::{EntityDao, MemorySession, SortSpec, StoreError};
use lagrene_filter::{AttributeFilter, Condition, Interval};

#[tokio::test]
async fn create_assigns_an_identity_and_an_initial_version() {
	let store = ticket_store();
	let cx = MemorySession;

	let created = store
		.create(&cx, Ticket::titled("first"))
		.await
		.expect("create");
	assert!(created.id.is_some());
	assert_eq!(created.version, Some(1));

	let id = created.id.unwrap();
	assert!(store.exists(&cx, &id).await.unwrap());
	assert_eq!(store.get(&cx, &id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn get_of_an_unknown_identity_is_a_normal_absent_result() {
	let store = ticket_store();
	let cx = MemorySession;
	assert_eq!(store.get(&cx, &404).await.unwrap(), None);
	assert!(!store.exists(&cx, &404).await.unwrap());
}

#[tokio::test]
async fn create_with_a_taken_identity_is_a_duplicate() {
	let store = ticket_store();
	let cx = MemorySession;
	let created = store.create(&cx, Ticket::titled("a")).await.unwrap();

	let mut clash = Ticket::titled("b");
	clash.id = created.id;
	assert!(matches!(
		store.create(&cx, clash).await,
		Err(StoreError::Duplicate { .. })
	));
}

#[tokio::test]
async fn update_of_a_missing_entity_fails_not_found() {
	let store = ticket_store();
	let cx = MemorySession;

	let mut ghost = Ticket::titled("ghost");
	ghost.id = Some(9);
	assert!(matches!(
		store.update(&cx, ghost).await,
		Err(StoreError::NotFound { .. })
	));

	assert!(matches!(
		store.update(&cx, Ticket::titled("no id")).await,
		Err(StoreError::NotFound { .. })
	));
}

#[tokio::test]
async fn update_applies_fields_one_by_one() {
	let store = ticket_store();
	let cx = MemorySession;
	let created = store
		.create(&cx, Ticket::titled("original").with_priority(3))
		.await
		.unwrap();

	// Only the title travels on the patch; priority stays untouched.
	let patch = Ticket {
		id: created.id,
		version: created.version,
		title: Some("renamed".into()),
		priority: None,
		assignee: None,
	};
	let updated = store.update(&cx, patch).await.unwrap();
	assert_eq!(updated.title.as_deref(), Some("renamed"));
	assert_eq!(updated.priority, Some(3));
	assert_eq!(updated.version, Some(2));
}

#[tokio::test]
async fn stale_version_conflicts_before_any_field_is_written() {
	let store = ticket_store();
	let cx = MemorySession;
	let created = store.create(&cx, Ticket::titled("contended")).await.unwrap();
	let id = created.id.unwrap();

	// A first writer bumps the stored version.
	let mut fresh = created.clone();
	fresh.title = Some("first writer".into());
	store.update(&cx, fresh).await.unwrap();

	// A second writer still holds version 1.
	let mut stale = created;
	stale.title = Some("second writer".into());
	let err = store.update(&cx, stale).await.unwrap_err();
	assert!(matches!(err, StoreError::VersionConflict { .. }));

	let stored = store.get(&cx, &id).await.unwrap().unwrap();
	assert_eq!(stored.title.as_deref(), Some("first writer"));
	assert_eq!(stored.version, Some(2));
}

#[tokio::test]
async fn delete_removes_the_row_and_reports_missing_identities() {
	let store = ticket_store();
	let cx = MemorySession;
	let created = store.create(&cx, Ticket::titled("doomed")).await.unwrap();
	let id = created.id.unwrap();

	store.delete(&cx, &id).await.unwrap();
	assert_eq!(store.get(&cx, &id).await.unwrap(), None);
	assert!(matches!(
		store.delete(&cx, &id).await,
		Err(StoreError::NotFound { .. })
	));
}

#[tokio::test]
async fn find_without_a_filter_matches_all_in_identity_order() {
	let store = ticket_store();
	let cx = MemorySession;
	for title in ["a", "b", "c"] {
		store.create(&cx, Ticket::titled(title)).await.unwrap();
	}

	let all = store.find(&cx, None, &SortSpec::unsorted()).await.unwrap();
	let titles: Vec<&str> = all.iter().filter_map(|t| t.title.as_deref()).collect();
	assert_eq!(titles, vec!["a", "b", "c"]);
	assert_eq!(store.count(&cx, None).await.unwrap(), 3);
}

#[tokio::test]
async fn find_with_an_interval_filter_and_sort() {
	let store = ticket_store();
	let cx = MemorySession;
	for (title, priority) in [("low", 1), ("mid", 3), ("high", 5), ("top", 4)] {
		store
			.create(&cx, Ticket::titled(title).with_priority(priority))
			.await
			.unwrap();
	}

	let filter =
		AttributeFilter::new().with("priority", Condition::within(Interval::closed(3, 5)));
	let found = store
		.find(&cx, Some(&filter), &SortSpec::descending("priority"))
		.await
		.unwrap();
	let titles: Vec<&str> = found.iter().filter_map(|t| t.title.as_deref()).collect();
	assert_eq!(titles, vec!["high", "top", "mid"]);
}

#[tokio::test]
async fn null_test_filters_split_assigned_and_unassigned() {
	let store = ticket_store();
	let cx = MemorySession;
	store
		.create(&cx, Ticket::titled("claimed").assigned_to("alice"))
		.await
		.unwrap();
	store.create(&cx, Ticket::titled("open")).await.unwrap();

	let unassigned = AttributeFilter::new().with("assignee", Condition::is_absent());
	let found = store
		.find(&cx, Some(&unassigned), &SortSpec::unsorted())
		.await
		.unwrap();
	assert_eq!(found.len(), 1);
	assert_eq!(found[0].title.as_deref(), Some("open"));

	let assigned = AttributeFilter::new().with("assignee", Condition::is_present());
	assert_eq!(store.count(&cx, Some(&assigned)).await.unwrap(), 1);
}

#[tokio::test]
async fn text_filters_match_the_reference_semantics() {
	let store = ticket_store();
	let cx = MemorySession;
	for n in 1..=5 {
		store
			.create(&cx, Ticket::titled(&format!("Model Object {n}")))
			.await
			.unwrap();
	}

	let starts = AttributeFilter::new().with("title", Condition::starts_with("Object"));
	assert_eq!(store.count(&cx, Some(&starts)).await.unwrap(), 0);

	let contains = AttributeFilter::new().with("title", Condition::contains("Object"));
	assert_eq!(store.count(&cx, Some(&contains)).await.unwrap(), 5);
}

#[tokio::test]
async fn bulk_delete_removes_exactly_the_matching_rows() {
	let store = ticket_store();
	let cx = MemorySession;
	for priority in 1..=5 {
		store
			.create(&cx, Ticket::titled("t").with_priority(priority))
			.await
			.unwrap();
	}

	let filter = AttributeFilter::new().with("priority", Condition::at_most(2));
	assert_eq!(store.delete_matching(&cx, &filter).await.unwrap(), 2);
	assert_eq!(store.count(&cx, None).await.unwrap(), 3);
}

#[tokio::test]
async fn filters_over_unmapped_attributes_are_rejected() {
	let store = ticket_store();
	let cx = MemorySession;
	let filter = AttributeFilter::new().with("nonexistent", Condition::equal_to(1));
	assert!(matches!(
		store.find(&cx, Some(&filter), &SortSpec::unsorted()).await,
		Err(StoreError::Filter(_))
	));
}
