use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person that cards can be assigned to
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: String,
    name: String,
    email: String,
    avatar: Option<String>,
    created_at: NaiveDateTime,
}

impl User {
    pub fn new(name: String, email: String, avatar: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            avatar,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_email(&self) -> String {
        self.email.clone()
    }

    pub fn get_avatar(&self) -> Option<String> {
        self.avatar.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
