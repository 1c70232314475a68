use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Color given to labels created without one
pub const DEFAULT_LABEL_COLOR: &str = "#6366f1";

/// An inline label attached to a card
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::card_labels)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CardLabel {
    id: String,
    card_id: String,
    text: String,
    color: String,
    /// Index of the label in the card's label list
    sort_order: i32,
}

impl CardLabel {
    pub fn new(card_id: String, text: String, color: Option<String>, sort_order: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            card_id,
            text,
            color: color.unwrap_or_else(|| DEFAULT_LABEL_COLOR.to_string()),
            sort_order,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_card_id(&self) -> String {
        self.card_id.clone()
    }

    pub fn get_text(&self) -> String {
        self.text.clone()
    }

    pub fn get_color(&self) -> String {
        self.color.clone()
    }

    pub fn get_sort_order(&self) -> i32 {
        self.sort_order
    }
}
