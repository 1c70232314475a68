/// Data models module
///
/// This module defines the rows stored for a kanban board: boards, their
/// ordered columns, the ordered cards inside each column, and the labels and
/// assignees hanging off a card.

// Re-export all model types
mod priority;
pub use priority::Priority;

mod board;
pub use board::Board;

mod column;
pub use column::{BoardColumn, DEFAULT_COLUMN_COLOR};

mod card;
pub use card::Card;

mod card_label;
pub use card_label::{CardLabel, DEFAULT_LABEL_COLOR};

mod card_assignee;
pub use card_assignee::CardAssignee;

mod user;
pub use user::User;
