use diesel::prelude::*;
use tracing::{info, instrument};

use super::board_repo::{get_board_view, require_board, require_column, touch_board};
use super::position::Siblings;
use crate::db::Store;
use crate::dto::{validate_position, validate_title, BoardView, CreateColumnDto, MoveColumnDto, UpdateColumnDto};
use crate::errors::StoreError;
use crate::models::BoardColumn;
use crate::schema::board_columns;

/// Appends a new column at the end of the board
///
/// ### Errors
///
/// - `Validation` when the title is blank
/// - `NotFound` when the project has no board yet
#[instrument(skip(store, dto), fields(title = %dto.title))]
pub async fn add_column(store: &Store, project_id: &str, dto: &CreateColumnDto) -> Result<BoardView, StoreError> {
    let title = validate_title(&dto.title)?;

    let project = project_id.to_string();
    let color = dto.color.clone();
    let column_id = store
        .write("add_column", move |conn| {
            let board = require_board(conn, &project)?;
            let position = Siblings::ColumnsIn(&board.get_id()).append(conn)?;
            let column = BoardColumn::new(board.get_id(), title.clone(), position, color.clone());
            diesel::insert_into(board_columns::table).values(&column).execute(conn)?;
            touch_board(conn, &board.get_id())?;
            Ok(column.get_id())
        })
        .await?;

    info!("Created column {}", column_id);
    get_board_view(store, project_id).await
}

/// Applies a partial update to a column's title and color
#[instrument(skip(store, dto))]
pub async fn update_column(
    store: &Store,
    project_id: &str,
    column_id: &str,
    dto: &UpdateColumnDto,
) -> Result<BoardView, StoreError> {
    let project = project_id.to_string();
    let column_key = column_id.to_string();
    let dto = dto.clone();
    store
        .write("update_column", move |conn| {
            let board = require_board(conn, &project)?;
            let mut column = require_column(conn, &board.get_id(), &column_key)?;
            dto.apply(&mut column)?;
            diesel::update(board_columns::table.find(column.get_id()))
                .set((
                    board_columns::title.eq(column.get_title()),
                    board_columns::color.eq(column.get_color()),
                ))
                .execute(conn)?;
            touch_board(conn, &board.get_id())?;
            Ok(())
        })
        .await?;

    get_board_view(store, project_id).await
}

/// Deletes a column with all of its cards and renumbers the remaining columns
#[instrument(skip(store))]
pub async fn delete_column(store: &Store, project_id: &str, column_id: &str) -> Result<BoardView, StoreError> {
    let project = project_id.to_string();
    let column = column_id.to_string();
    let position = store
        .write("delete_column", move |conn| {
            let board = require_board(conn, &project)?;
            let position = Siblings::ColumnsIn(&board.get_id()).remove_and_compact(conn, &column)?;
            touch_board(conn, &board.get_id())?;
            Ok(position)
        })
        .await?;

    info!("Deleted column {} from position {}", column_id, position);
    get_board_view(store, project_id).await
}

/// Moves a column to another index of its board
///
/// Indexes past the last column are clamped to the end.
#[instrument(skip(store, dto), fields(column_id = %dto.column_id))]
pub async fn move_column(store: &Store, project_id: &str, dto: &MoveColumnDto) -> Result<BoardView, StoreError> {
    let target = validate_position(dto.target_position)?;

    let project = project_id.to_string();
    let moved = dto.clone();
    let landed = store
        .write("move_column", move |conn| {
            let dto = &moved;
            let board_id = require_board(conn, &project)?.get_id();
            let columns = Siblings::ColumnsIn(&board_id);
            let original = columns
                .position_of(conn, &dto.column_id)?
                .ok_or_else(|| StoreError::not_found("Column", &dto.column_id))?;
            let landed = columns.reorder_within(conn, &dto.column_id, target)?;
            if landed != original {
                touch_board(conn, &board_id)?;
            }
            Ok(landed)
        })
        .await?;

    info!("Moved column {} to position {}", dto.column_id, landed);
    get_board_view(store, project_id).await
}
