//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Todo items.
    ///
    /// `name` is limited to 1..=255 characters by the `todos_name_length`
    /// check constraint, and `modified_at >= created_at` by
    /// `todos_modified_after_created`.
    todos (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        name -> Text,
        /// Set while the todo is completed, null otherwise.
        completed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        /// Stamped on every write; never moves backwards.
        modified_at -> Timestamptz,
    }
}
