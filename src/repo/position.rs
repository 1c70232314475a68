//! Position index for ordered sibling sets
//!
//! Cards within a column and columns within a board carry a zero-based
//! `position` that must stay dense: for `n` siblings the positions are exactly
//! `0..n`. Every edit goes through the primitives below, and every primitive
//! expects to run inside a transaction opened by the caller, since each one
//! issues several statements that are only consistent together.

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, instrument};

use crate::errors::StoreError;
use crate::schema::{board_columns, cards};

/// An ordered sibling set, identified by its parent key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Siblings<'a> {
    /// The cards of the column with this ID
    CardsIn(&'a str),
    /// The columns of the board with this ID
    ColumnsIn(&'a str),
}

impl Siblings<'_> {
    fn item_kind(&self) -> &'static str {
        match self {
            Siblings::CardsIn(_) => "Card",
            Siblings::ColumnsIn(_) => "Column",
        }
    }

    /// Number of items currently in the set
    pub fn count(&self, conn: &mut SqliteConnection) -> QueryResult<i32> {
        let count: i64 = match *self {
            Siblings::CardsIn(column_id) => cards::table
                .filter(cards::column_id.eq(column_id))
                .count()
                .get_result(conn)?,
            Siblings::ColumnsIn(board_id) => board_columns::table
                .filter(board_columns::board_id.eq(board_id))
                .count()
                .get_result(conn)?,
        };
        Ok(i32::try_from(count).unwrap_or(i32::MAX))
    }

    /// Position for an item appended at the end of the set
    pub fn append(&self, conn: &mut SqliteConnection) -> QueryResult<i32> {
        self.count(conn)
    }

    /// All positions of the set in ascending order
    pub fn positions(&self, conn: &mut SqliteConnection) -> QueryResult<Vec<i32>> {
        match *self {
            Siblings::CardsIn(column_id) => cards::table
                .filter(cards::column_id.eq(column_id))
                .select(cards::position)
                .order_by(cards::position.asc())
                .load(conn),
            Siblings::ColumnsIn(board_id) => board_columns::table
                .filter(board_columns::board_id.eq(board_id))
                .select(board_columns::position)
                .order_by(board_columns::position.asc())
                .load(conn),
        }
    }

    /// Position of an item, or `None` when it is not a member of this set
    pub fn position_of(&self, conn: &mut SqliteConnection, item_id: &str) -> QueryResult<Option<i32>> {
        match *self {
            Siblings::CardsIn(column_id) => cards::table
                .filter(cards::id.eq(item_id))
                .filter(cards::column_id.eq(column_id))
                .select(cards::position)
                .first(conn)
                .optional(),
            Siblings::ColumnsIn(board_id) => board_columns::table
                .filter(board_columns::id.eq(item_id))
                .filter(board_columns::board_id.eq(board_id))
                .select(board_columns::position)
                .first(conn)
                .optional(),
        }
    }

    fn require_position(&self, conn: &mut SqliteConnection, item_id: &str) -> Result<i32, StoreError> {
        self.position_of(conn, item_id)?
            .ok_or_else(|| StoreError::not_found(self.item_kind(), item_id))
    }

    /// Adds `delta` to the position of every sibling in `from..=to`, except `exclude`
    fn shift_range(
        &self,
        conn: &mut SqliteConnection,
        from: i32,
        to: i32,
        delta: i32,
        exclude: &str,
    ) -> QueryResult<usize> {
        match *self {
            Siblings::CardsIn(column_id) => diesel::update(
                cards::table
                    .filter(cards::column_id.eq(column_id))
                    .filter(cards::position.between(from, to))
                    .filter(cards::id.ne(exclude)),
            )
            .set(cards::position.eq(cards::position + delta))
            .execute(conn),
            Siblings::ColumnsIn(board_id) => diesel::update(
                board_columns::table
                    .filter(board_columns::board_id.eq(board_id))
                    .filter(board_columns::position.between(from, to))
                    .filter(board_columns::id.ne(exclude)),
            )
            .set(board_columns::position.eq(board_columns::position + delta))
            .execute(conn),
        }
    }

    /// Makes `item_id` a member of this set at `position`
    fn attach(&self, conn: &mut SqliteConnection, item_id: &str, position: i32) -> QueryResult<usize> {
        match *self {
            Siblings::CardsIn(column_id) => diesel::update(cards::table.find(item_id))
                .set((cards::column_id.eq(column_id), cards::position.eq(position)))
                .execute(conn),
            Siblings::ColumnsIn(board_id) => diesel::update(board_columns::table.find(item_id))
                .set((board_columns::board_id.eq(board_id), board_columns::position.eq(position)))
                .execute(conn),
        }
    }

    fn delete_row(&self, conn: &mut SqliteConnection, item_id: &str) -> QueryResult<usize> {
        match *self {
            Siblings::CardsIn(_) => diesel::delete(cards::table.find(item_id)).execute(conn),
            Siblings::ColumnsIn(_) => diesel::delete(board_columns::table.find(item_id)).execute(conn),
        }
    }

    /// Closes the gap an item leaves behind, without deleting the item
    ///
    /// Every sibling after the item moves up by one. The item keeps its row
    /// (and its stale position) until it is attached somewhere else.
    /// Returns the position the item had.
    #[instrument(skip(conn))]
    pub fn detach(&self, conn: &mut SqliteConnection, item_id: &str) -> Result<i32, StoreError> {
        let position = self.require_position(conn, item_id)?;
        let shifted = self.shift_range(conn, position + 1, i32::MAX, -1, item_id)?;
        debug!("Detached {} from position {}, shifted {} siblings", item_id, position, shifted);
        Ok(position)
    }

    /// Deletes an item and renumbers the remaining siblings densely
    ///
    /// Returns the position the item had.
    #[instrument(skip(conn))]
    pub fn remove_and_compact(&self, conn: &mut SqliteConnection, item_id: &str) -> Result<i32, StoreError> {
        let position = self.detach(conn, item_id)?;
        self.delete_row(conn, item_id)?;
        Ok(position)
    }

    /// Places a detached item at `target`, opening a slot for it
    ///
    /// The target is clamped to `0..=count`, so anything past the end appends.
    /// Every sibling at or after the target moves down by one. Returns the
    /// position the item landed on.
    #[instrument(skip(conn))]
    pub fn insert_at(&self, conn: &mut SqliteConnection, item_id: &str, target: i32) -> Result<i32, StoreError> {
        let count = self.count(conn)?;
        let target = target.clamp(0, count);
        let shifted = self.shift_range(conn, target, i32::MAX, 1, item_id)?;
        self.attach(conn, item_id, target)?;
        debug!("Inserted {} at position {}, shifted {} siblings", item_id, target, shifted);
        Ok(target)
    }

    /// Moves a member of the set to another index of the same set
    ///
    /// The target is clamped to `0..count`. Only the siblings between the old
    /// and the new index shift, each by one towards the vacated slot; the
    /// moved item itself is never shifted, so moving an item onto its own
    /// index writes nothing. Returns the position the item landed on.
    #[instrument(skip(conn))]
    pub fn reorder_within(&self, conn: &mut SqliteConnection, item_id: &str, target: i32) -> Result<i32, StoreError> {
        let current = self.require_position(conn, item_id)?;
        let count = self.count(conn)?;
        let target = target.clamp(0, count - 1);

        if target == current {
            debug!("{} already at position {}", item_id, current);
            return Ok(current);
        }

        let shifted = if target < current {
            self.shift_range(conn, target, current - 1, 1, item_id)?
        } else {
            self.shift_range(conn, current + 1, target, -1, item_id)?
        };
        self.attach(conn, item_id, target)?;
        debug!("Reordered {} from {} to {}, shifted {} siblings", item_id, current, target, shifted);
        Ok(target)
    }
}
