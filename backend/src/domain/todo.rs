//! Todo data model.
//!
//! [`Todo`] is the canonical persisted record. The `TodoFor*` types carry only
//! what a caller controls for each write path; [`TodoForSave`] is the shape
//! handed to repositories and owns the completion merge rule.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of characters accepted in a todo name.
///
/// Mirrors the `todos_name_length` check constraint in the schema.
pub const TODO_NAME_MAX: usize = 255;

/// Validation errors raised when parsing todo identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoIdError {
    /// The identifier was empty.
    #[error("todo id must not be empty")]
    Empty,
    /// The identifier was not a UUID.
    #[error("todo id must be a valid UUID")]
    Invalid,
}

/// Stable todo identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Parse a [`TodoId`] from its string form.
    pub fn parse(id: impl AsRef<str>) -> Result<Self, TodoIdError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(TodoIdError::Empty);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| TodoIdError::Invalid)
    }

    /// Generate a new random [`TodoId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for TodoId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Canonical todo record as persisted.
///
/// ## Invariants
/// - `completed_at` is `Some` exactly when the todo is completed.
/// - `created_at <= modified_at`; both are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub name: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Todo {
    /// Whether the todo has been completed.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Project the caller-controlled fields for a subsequent save.
    pub fn to_save(&self) -> TodoForSave {
        TodoForSave {
            id: self.id,
            name: self.name.clone(),
            completed_at: self.completed_at,
        }
    }
}

/// Fields a caller supplies when creating a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoForCreate {
    pub name: String,
}

impl TodoForCreate {
    /// Build the initial persisted state under a freshly assigned id.
    pub fn into_save(self, id: TodoId) -> TodoForSave {
        TodoForSave {
            id,
            name: self.name,
            completed_at: None,
        }
    }
}

/// Fields a caller supplies when updating a todo.
///
/// `completed: None` is treated like `Some(true)`: the todo is marked
/// completed unless it already is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoForUpdate {
    pub id: TodoId,
    pub name: String,
    pub completed: Option<bool>,
}

/// State written by repository upserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoForSave {
    pub id: TodoId,
    pub name: String,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TodoForSave {
    /// Merge an update into the current state.
    ///
    /// - `completed == Some(false)` clears the completion timestamp.
    /// - Otherwise an existing completion timestamp is kept and a missing one
    ///   is set to `now`, so re-completing never resets the clock.
    pub fn apply_update(&mut self, update: &TodoForUpdate, now: DateTime<Utc>) {
        self.name.clone_from(&update.name);
        self.completed_at = match update.completed {
            Some(false) => None,
            Some(true) | None => Some(self.completed_at.unwrap_or(now)),
        };
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for todo identifiers and the completion merge rule.

    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn open_todo() -> TodoForSave {
        TodoForSave {
            id: TodoId::random(),
            name: "Buy milk".to_owned(),
            completed_at: None,
        }
    }

    fn update_for(todo: &TodoForSave, completed: Option<bool>) -> TodoForUpdate {
        TodoForUpdate {
            id: todo.id,
            name: "Buy oat milk".to_owned(),
            completed,
        }
    }

    #[rstest]
    #[case("")]
    fn parse_rejects_empty_ids(#[case] raw: &str) {
        assert_eq!(TodoId::parse(raw), Err(TodoIdError::Empty));
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("123")]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    fn parse_rejects_malformed_ids(#[case] raw: &str) {
        assert_eq!(TodoId::parse(raw), Err(TodoIdError::Invalid));
    }

    #[rstest]
    fn parse_round_trips_display() {
        let id = TodoId::random();
        assert_eq!(TodoId::parse(id.to_string()), Ok(id));
    }

    #[rstest]
    #[case(Some(true))]
    #[case(None)]
    fn completing_an_open_todo_sets_the_timestamp(
        mut open_todo: TodoForSave,
        #[case] completed: Option<bool>,
    ) {
        let update = update_for(&open_todo, completed);
        open_todo.apply_update(&update, at(9));

        assert_eq!(open_todo.completed_at, Some(at(9)));
        assert_eq!(open_todo.name, "Buy oat milk");
    }

    #[rstest]
    #[case(Some(true))]
    #[case(None)]
    fn recompleting_keeps_the_original_timestamp(
        mut open_todo: TodoForSave,
        #[case] completed: Option<bool>,
    ) {
        open_todo.completed_at = Some(at(9));
        let update = update_for(&open_todo, completed);
        open_todo.apply_update(&update, at(17));

        assert_eq!(open_todo.completed_at, Some(at(9)));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(9))]
    fn uncompleting_always_clears_the_timestamp(
        mut open_todo: TodoForSave,
        #[case] completed_hour: Option<u32>,
    ) {
        open_todo.completed_at = completed_hour.map(at);
        let update = update_for(&open_todo, Some(false));
        open_todo.apply_update(&update, at(17));

        assert_eq!(open_todo.completed_at, None);
    }

    #[rstest]
    fn create_starts_uncompleted() {
        let id = TodoId::random();
        let save = TodoForCreate {
            name: "Write report".to_owned(),
        }
        .into_save(id);

        assert_eq!(save.id, id);
        assert_eq!(save.completed_at, None);
    }

    #[rstest]
    fn to_save_keeps_caller_controlled_fields() {
        let todo = Todo {
            id: TodoId::random(),
            name: "Walk the dog".to_owned(),
            completed_at: Some(at(8)),
            created_at: at(7),
            modified_at: at(8),
        };

        let save = todo.to_save();
        assert!(todo.is_completed());
        assert_eq!(save.id, todo.id);
        assert_eq!(save.name, todo.name);
        assert_eq!(save.completed_at, todo.completed_at);
    }
}
