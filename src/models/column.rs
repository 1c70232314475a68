use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Color given to columns created without one
pub const DEFAULT_COLUMN_COLOR: &str = "#94a3b8";

/// A column of a board, ordered by `position` among its siblings
#[derive(Queryable, Selectable, Insertable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::board_columns)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BoardColumn {
    /// Unique identifier for the column (UUID v4 as string)
    id: String,

    /// The board this column belongs to
    board_id: String,

    /// Column heading
    title: String,

    /// Zero-based index among the columns of the board
    position: i32,

    /// CSS color used for the column header
    color: String,
}

impl BoardColumn {
    /// Creates a column at the given position of a board
    ///
    /// The caller is responsible for choosing a position that keeps the
    /// board's columns dense, normally the current column count.
    pub fn new(board_id: String, title: String, position: i32, color: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            board_id,
            title,
            position,
            color: color.unwrap_or_else(|| DEFAULT_COLUMN_COLOR.to_string()),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_board_id(&self) -> String {
        self.board_id.clone()
    }

    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn get_position(&self) -> i32 {
        self.position
    }

    pub fn get_color(&self) -> String {
        self.color.clone()
    }

    pub fn set_color(&mut self, color: String) {
        self.color = color;
    }
}
