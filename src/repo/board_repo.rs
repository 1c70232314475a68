use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info, instrument};

use crate::db::Store;
use crate::dto::{AssigneeView, BoardView, CardView, ColumnView, LabelView};
use crate::errors::StoreError;
use crate::models::{Board, BoardColumn, Card, CardLabel, User};
use crate::schema::{board_columns, boards, card_assignees, card_labels, cards, users};

/// Name given to boards created on first access
pub const DEFAULT_BOARD_NAME: &str = "Main board";

/// Columns every new board starts with, in position order
pub const DEFAULT_COLUMNS: [(&str, &str); 4] = [
    ("To do", "#94a3b8"),
    ("In progress", "#3b82f6"),
    ("In review", "#f59e0b"),
    ("Done", "#22c55e"),
];

/// Looks up the board of a project
pub fn find_board(conn: &mut SqliteConnection, project_id: &str) -> QueryResult<Option<Board>> {
    boards::table
        .filter(boards::project_id.eq(project_id))
        .select(Board::as_select())
        .first(conn)
        .optional()
}

/// Looks up the board of a project, failing with `NotFound` when there is none
pub fn require_board(conn: &mut SqliteConnection, project_id: &str) -> Result<Board, StoreError> {
    find_board(conn, project_id)?
        .ok_or_else(|| StoreError::NotFound(format!("Board for project {} not found", project_id)))
}

/// Looks up a column, failing with `NotFound` unless it belongs to the board
pub fn require_column(
    conn: &mut SqliteConnection,
    board_id: &str,
    column_id: &str,
) -> Result<BoardColumn, StoreError> {
    board_columns::table
        .filter(board_columns::id.eq(column_id))
        .filter(board_columns::board_id.eq(board_id))
        .select(BoardColumn::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| StoreError::not_found("Column", column_id))
}

/// Records that something on the board changed
pub fn touch_board(conn: &mut SqliteConnection, board_id: &str) -> QueryResult<usize> {
    diesel::update(boards::table.find(board_id))
        .set(boards::updated_at.eq(Utc::now().naive_utc()))
        .execute(conn)
}

/// Inserts a board with the default columns
///
/// Must run inside a write transaction: the existence check and the insert
/// are only race free under the write lock.
#[instrument(skip(conn))]
fn create_default_board(conn: &mut SqliteConnection, project_id: &str) -> Result<Board, StoreError> {
    if let Some(board) = find_board(conn, project_id)? {
        debug!("Board was created concurrently, reusing it");
        return Ok(board);
    }

    let board = Board::new(project_id.to_string(), DEFAULT_BOARD_NAME.to_string());
    diesel::insert_into(boards::table).values(&board).execute(conn)?;

    let columns: Vec<BoardColumn> = DEFAULT_COLUMNS
        .iter()
        .enumerate()
        .map(|(position, (title, color))| {
            BoardColumn::new(board.get_id(), title.to_string(), position as i32, Some(color.to_string()))
        })
        .collect();
    diesel::insert_into(board_columns::table).values(&columns).execute(conn)?;

    info!("Created default board {} for project {}", board.get_id(), project_id);
    Ok(board)
}

/// Assembles the board aggregate: ordered columns, ordered cards, assignees and labels
///
/// Side-effect free. Call it inside a transaction to get a consistent snapshot.
#[instrument(skip(conn, board), fields(board_id = %board.get_id()))]
pub fn load_board_view(conn: &mut SqliteConnection, board: &Board) -> Result<BoardView, StoreError> {
    let columns: Vec<BoardColumn> = board_columns::table
        .filter(board_columns::board_id.eq(board.get_id()))
        .order_by(board_columns::position.asc())
        .select(BoardColumn::as_select())
        .load(conn)?;
    let column_ids: Vec<String> = columns.iter().map(|column| column.get_id()).collect();

    let card_rows: Vec<Card> = cards::table
        .filter(cards::column_id.eq_any(&column_ids))
        .order_by((cards::column_id.asc(), cards::position.asc()))
        .select(Card::as_select())
        .load(conn)?;
    let card_ids: Vec<String> = card_rows.iter().map(|card| card.get_id()).collect();

    let assignee_rows: Vec<(String, User)> = card_assignees::table
        .inner_join(users::table)
        .filter(card_assignees::card_id.eq_any(&card_ids))
        .order_by(users::name.asc())
        .select((card_assignees::card_id, User::as_select()))
        .load(conn)?;
    let mut assignees_by_card: HashMap<String, Vec<AssigneeView>> = HashMap::new();
    for (card_id, user) in assignee_rows {
        assignees_by_card.entry(card_id).or_default().push(AssigneeView {
            id: user.get_id(),
            name: user.get_name(),
            email: user.get_email(),
            avatar: user.get_avatar(),
        });
    }

    let label_rows: Vec<CardLabel> = card_labels::table
        .filter(card_labels::card_id.eq_any(&card_ids))
        .order_by((card_labels::card_id.asc(), card_labels::sort_order.asc()))
        .select(CardLabel::as_select())
        .load(conn)?;
    let mut labels_by_card: HashMap<String, Vec<LabelView>> = HashMap::new();
    for label in label_rows {
        labels_by_card.entry(label.get_card_id()).or_default().push(LabelView {
            text: label.get_text(),
            color: label.get_color(),
        });
    }

    let mut cards_by_column: HashMap<String, Vec<CardView>> = HashMap::new();
    for card in card_rows {
        let card_id = card.get_id();
        cards_by_column.entry(card.get_column_id()).or_default().push(CardView {
            assignees: assignees_by_card.remove(&card_id).unwrap_or_default(),
            labels: labels_by_card.remove(&card_id).unwrap_or_default(),
            id: card_id,
            column_id: card.get_column_id(),
            title: card.get_title(),
            description: card.get_description(),
            priority: card.get_priority(),
            due_date: card.get_due_date(),
            position: card.get_position(),
            created_at: card.get_created_at(),
            updated_at: card.get_updated_at(),
        });
    }

    let columns = columns
        .into_iter()
        .map(|column| ColumnView {
            cards: cards_by_column.remove(&column.get_id()).unwrap_or_default(),
            id: column.get_id(),
            title: column.get_title(),
            position: column.get_position(),
            color: column.get_color(),
        })
        .collect();

    Ok(BoardView {
        id: board.get_id(),
        project_id: board.get_project_id(),
        name: board.get_name(),
        columns,
        created_at: board.get_created_at(),
        updated_at: board.get_updated_at(),
    })
}

/// Loads the aggregate of an existing board in a fresh snapshot
pub async fn get_board_view(store: &Store, project_id: &str) -> Result<BoardView, StoreError> {
    let project = project_id.to_string();
    store
        .query(move |conn| {
            let board = require_board(conn, &project)?;
            load_board_view(conn, &board)
        })
        .await
}

/// Loads the board of a project, creating the default board on first access
///
/// ### Arguments
///
/// * `store` - The storage handle
/// * `project_id` - The project whose board is requested
///
/// ### Returns
///
/// The board aggregate with columns and cards in position order
#[instrument(skip(store))]
pub async fn get_or_create_board(store: &Store, project_id: &str) -> Result<BoardView, StoreError> {
    let project = project_id.to_string();
    let existing = store
        .query(move |conn| match find_board(conn, &project)? {
            Some(board) => load_board_view(conn, &board).map(Some),
            None => Ok(None),
        })
        .await?;
    if let Some(view) = existing {
        debug!("Loaded board with {} columns", view.columns.len());
        return Ok(view);
    }

    let project = project_id.to_string();
    store
        .write("create_board", move |conn| create_default_board(conn, &project))
        .await?;
    get_board_view(store, project_id).await
}
