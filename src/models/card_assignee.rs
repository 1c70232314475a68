use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Represents an association between a card and an assigned user
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::card_assignees)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CardAssignee {
    /// The ID of the card
    card_id: String,

    /// The ID of the assigned user
    user_id: String,
}

impl CardAssignee {
    pub fn new(card_id: String, user_id: String) -> Self {
        Self { card_id, user_id }
    }

    pub fn get_card_id(&self) -> String {
        self.card_id.clone()
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }
}
