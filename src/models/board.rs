use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kanban board of a project
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::boards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Board {
    /// Unique identifier for the board (UUID v4 as string)
    id: String,

    /// The project this board belongs to; a project has at most one board
    project_id: String,

    /// Display name of the board
    name: String,

    /// When this board was created
    created_at: NaiveDateTime,

    /// When this board or one of its columns or cards last changed
    updated_at: NaiveDateTime,
}

impl Board {
    /// Creates a new, empty board for a project
    pub fn new(project_id: String, name: String) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            project_id,
            name,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_project_id(&self) -> String {
        self.project_id.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}
