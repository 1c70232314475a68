/// Repository module
///
/// This module provides the data access layer for the board service. Every
/// public operation takes the explicit [`Store`](crate::db::Store) handle,
/// runs its writes in a single immediate transaction, and returns the
/// reloaded board aggregate.
///
/// The ordering rules for cards and columns live in [`position`]; the other
/// repositories only ever change positions through it.

pub mod position;
mod board_repo;
mod column_repo;
mod card_repo;
mod user_repo;

// Re-export all repository functions
pub use board_repo::*;
pub use column_repo::*;
pub use card_repo::*;
pub use user_repo::*;
