use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::StoreError;
use crate::models::{BoardColumn, Card, Priority};

/// Deserializes a field that distinguishes "absent" from an explicit `null`
///
/// Used together with `#[serde(default)]`: a missing key stays `None`, a
/// `null` becomes `Some(None)` and a value becomes `Some(Some(value))`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trims a title and rejects it when nothing is left
pub fn validate_title(title: &str) -> Result<String, StoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation("Title is required".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Checks a caller supplied target index
///
/// Negative indexes are rejected. Indexes past the end of the collection are
/// accepted and later clamped to "append", so anything beyond `i32::MAX` is
/// simply treated as the end.
pub fn validate_position(position: i64) -> Result<i32, StoreError> {
    if position < 0 {
        return Err(StoreError::Validation(format!(
            "Target position must be a non-negative integer, got {}",
            position
        )));
    }
    Ok(i32::try_from(position).unwrap_or(i32::MAX))
}

/// Data transfer object for an inline card label
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LabelDto {
    /// The label text
    #[serde(default)]
    pub text: String,

    /// The label color, defaults to indigo
    #[serde(default)]
    pub color: Option<String>,
}

/// Data transfer object for creating a new column
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateColumnDto {
    /// The column heading
    pub title: String,

    /// The header color, defaults to slate
    #[serde(default)]
    pub color: Option<String>,
}

/// Data transfer object for a partial column update
///
/// Only the fields present in the request are applied. Position is not
/// editable here; columns are reordered through the move operation.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct UpdateColumnDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl UpdateColumnDto {
    /// Applies the present fields to a column
    pub fn apply(&self, column: &mut BoardColumn) -> Result<(), StoreError> {
        if let Some(title) = &self.title {
            column.set_title(validate_title(title)?);
        }
        if let Some(color) = &self.color {
            column.set_color(color.clone());
        }
        Ok(())
    }
}

/// Data transfer object for creating a new card
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardDto {
    /// The card title, required and non-empty
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub priority: Option<Priority>,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    /// IDs of the users assigned to the card
    #[serde(default)]
    pub assignees: Vec<String>,

    #[serde(default)]
    pub labels: Vec<LabelDto>,
}

impl CreateCardDto {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            priority: None,
            due_date: None,
            assignees: Vec::new(),
            labels: Vec::new(),
        }
    }
}

/// Data transfer object for a partial card update
///
/// Absent fields are left untouched. `dueDate: null` clears the due date,
/// while `assignees` and `labels` replace the whole set when present.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateCardDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<LabelDto>>,
}

impl UpdateCardDto {
    /// Applies the present scalar fields to a card
    ///
    /// Assignees and labels live in side tables and are replaced by the repository.
    pub fn apply(&self, card: &mut Card) -> Result<(), StoreError> {
        if let Some(title) = &self.title {
            card.set_title(validate_title(title)?);
        }
        if let Some(description) = &self.description {
            card.set_description(description.clone());
        }
        if let Some(priority) = self.priority {
            card.set_priority(priority);
        }
        if let Some(due_date) = self.due_date {
            card.set_due_date(due_date);
        }
        card.touch();
        Ok(())
    }
}

/// Data transfer object for relocating a card
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MoveCardDto {
    /// The column the card currently belongs to
    pub source_column_id: String,

    /// The column the card should end up in, possibly the same one
    pub target_column_id: String,

    /// The card to move
    pub card_id: String,

    /// Desired index of the card in the target column after the move
    pub target_position: i64,
}

/// Data transfer object for reordering a column within its board
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MoveColumnDto {
    pub column_id: String,

    /// Desired index of the column after the move
    pub target_position: i64,
}

/// Data transfer object for creating a new user
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Identity of a user assigned to a card, as shown on the board
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AssigneeView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

/// A card label as shown on the board
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LabelView {
    pub text: String,
    pub color: String,
}

/// A card with its assignees and labels expanded
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: String,
    pub column_id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub position: i32,
    pub assignees: Vec<AssigneeView>,
    pub labels: Vec<LabelView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A column with its cards in position order
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub id: String,
    pub title: String,
    pub position: i32,
    pub color: String,
    pub cards: Vec<CardView>,
}

/// The denormalized board aggregate returned after every board operation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub columns: Vec<ColumnView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BoardView {
    /// Finds a column by title
    pub fn column(&self, title: &str) -> Option<&ColumnView> {
        self.columns.iter().find(|column| column.title == title)
    }
}

impl ColumnView {
    /// Card titles in position order
    pub fn card_titles(&self) -> Vec<String> {
        self.cards.iter().map(|card| card.title.clone()).collect()
    }

    /// Card positions in the order the cards are listed
    pub fn card_positions(&self) -> Vec<i32> {
        self.cards.iter().map(|card| card.position).collect()
    }
}
