use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Priority;

/// Represents a card on a kanban board
#[derive(Queryable, Selectable, Insertable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::cards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Card {
    /// Unique identifier for the card (UUID v4 as string)
    id: String,

    /// The column this card currently sits in
    column_id: String,

    /// Short summary shown on the board
    title: String,

    /// Free-form details, empty when not set
    description: String,

    /// Optional deadline
    due_date: Option<NaiveDateTime>,

    /// How urgent the card is
    priority: Priority,

    /// Zero-based index among the cards of its column
    position: i32,

    /// When this card was created
    created_at: NaiveDateTime,

    /// When this card was last edited or moved
    updated_at: NaiveDateTime,
}

impl Card {
    /// Creates a new card at the given position of a column
    ///
    /// ### Arguments
    ///
    /// * `column_id` - The ID of the column the card is created in
    /// * `title` - The card title
    /// * `position` - The index of the card within the column
    ///
    /// ### Returns
    ///
    /// A new `Card` with an empty description, medium priority and no due date
    pub fn new(column_id: String, title: String, position: i32) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            column_id,
            title,
            description: String::new(),
            due_date: None,
            priority: Priority::default(),
            position,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_column_id(&self) -> String {
        self.column_id.clone()
    }

    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn get_description(&self) -> String {
        self.description.clone()
    }

    pub fn set_description(&mut self, description: String) {
        self.description = description;
    }

    /// Gets the card's due date as a DateTime<Utc>
    pub fn get_due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
    }

    pub fn get_due_date_raw(&self) -> Option<NaiveDateTime> {
        self.due_date
    }

    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>) {
        self.due_date = due_date.map(|dt| dt.naive_utc());
    }

    pub fn get_priority(&self) -> Priority {
        self.priority
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn get_position(&self) -> i32 {
        self.position
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }

    pub fn get_updated_at_raw(&self) -> NaiveDateTime {
        self.updated_at
    }

    /// Marks the card as edited now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().naive_utc();
    }
}
