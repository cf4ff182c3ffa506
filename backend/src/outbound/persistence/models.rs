//! Internal Diesel row structs for the `todos` table.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Todo, TodoForSave, TodoId};

use super::schema::todos;

/// Row struct for reading from the todos table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TodoRow {
    pub id: Uuid,
    pub name: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Self {
            id: TodoId::from(row.id),
            name: row.name,
            completed_at: row.completed_at,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

/// Insertable struct for todo upserts.
///
/// Timestamps are omitted so the column defaults apply on insert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = todos)]
pub(crate) struct NewTodoRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub completed_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a TodoForSave> for NewTodoRow<'a> {
    fn from(todo: &'a TodoForSave) -> Self {
        Self {
            id: *todo.id.as_uuid(),
            name: todo.name.as_str(),
            completed_at: todo.completed_at,
        }
    }
}
