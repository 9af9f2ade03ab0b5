//! Shared fixtures: a versioned `Ticket` entity, an owner-bound `Comment`
//! dependent, and their column maps.
#![allow(dead_code)]

use lagrene_dao::{ColumnMap, ColumnSpec, Dependent, Entity, MemoryStore, Versioned};
use lagrene_filter::Value;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ticket {
	pub id: Option<i64>,
	pub version: Option<i64>,
	pub title: Option<String>,
	pub priority: Option<i64>,
	pub assignee: Option<String>,
}

impl Ticket {
	pub fn titled(title: &str) -> Self {
		Self {
			title: Some(title.to_string()),
			..Self::default()
		}
	}

	pub fn with_priority(mut self, priority: i64) -> Self {
		self.priority = Some(priority);
		self
	}

	pub fn assigned_to(mut self, assignee: &str) -> Self {
		self.assignee = Some(assignee.to_string());
		self
	}
}

impl Entity for Ticket {
	type Id = i64;

	fn entity_name() -> &'static str {
		"ticket"
	}

	fn id(&self) -> Option<i64> {
		self.id
	}

	fn set_id(&mut self, id: i64) {
		self.id = Some(id);
	}
}

impl Versioned for Ticket {
	fn version(&self) -> Option<i64> {
		self.version
	}

	fn set_version(&mut self, version: i64) {
		self.version = Some(version);
	}
}

pub fn ticket_columns() -> ColumnMap<Ticket> {
	ColumnMap::new(vec![
		ColumnSpec::new("id", "t.id", |t: &Ticket| t.id.map(Value::Int)),
		ColumnSpec::writable(
			"title",
			"t.title",
			|t: &Ticket| t.title.clone().map(Value::Str),
			|t: &mut Ticket, v| {
				if let Value::Str(s) = v {
					t.title = Some(s);
				}
			},
		),
		ColumnSpec::writable(
			"priority",
			"t.priority",
			|t: &Ticket| t.priority.map(Value::Int),
			|t: &mut Ticket, v| {
				if let Value::Int(i) = v {
					t.priority = Some(i);
				}
			},
		),
		ColumnSpec::writable(
			"assignee",
			"t.assignee",
			|t: &Ticket| t.assignee.clone().map(Value::Str),
			|t: &mut Ticket, v| {
				if let Value::Str(s) = v {
					t.assignee = Some(s);
				}
			},
		),
	])
	.expect("ticket column map")
}

pub fn ticket_store() -> MemoryStore<Ticket> {
	MemoryStore::versioned(ticket_columns(), |n| n as i64).expect("ticket store")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
	pub id: Option<i64>,
	pub ticket_id: i64,
	pub body: Option<String>,
}

impl Comment {
	pub fn on(ticket_id: i64, body: &str) -> Self {
		Self {
			id: None,
			ticket_id,
			body: Some(body.to_string()),
		}
	}

	pub fn existing(id: i64, ticket_id: i64, body: &str) -> Self {
		Self {
			id: Some(id),
			ticket_id,
			body: Some(body.to_string()),
		}
	}
}

impl Entity for Comment {
	type Id = i64;

	fn entity_name() -> &'static str {
		"comment"
	}

	fn id(&self) -> Option<i64> {
		self.id
	}

	fn set_id(&mut self, id: i64) {
		self.id = Some(id);
	}
}

impl Dependent for Comment {
	type OwnerId = i64;

	fn owner_id(&self) -> &i64 {
		&self.ticket_id
	}
}

pub fn comment_columns() -> ColumnMap<Comment> {
	ColumnMap::new(vec![
		ColumnSpec::new("id", "c.id", |c: &Comment| c.id.map(Value::Int)),
		ColumnSpec::new("ticket_id", "c.ticket_id", |c: &Comment| {
			Some(Value::Int(c.ticket_id))
		}),
		ColumnSpec::writable(
			"body",
			"c.body",
			|c: &Comment| c.body.clone().map(Value::Str),
			|c: &mut Comment, v| {
				if let Value::Str(s) = v {
					c.body = Some(s);
				}
			},
		),
	])
	.expect("comment column map")
}

pub fn comment_store() -> MemoryStore<Comment> {
	MemoryStore::new(comment_columns(), |n| n as i64).expect("comment store")
}
