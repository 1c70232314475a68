use std::collections::BTreeSet;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info, instrument};

use super::board_repo::{get_board_view, require_board, require_column, touch_board};
use super::position::Siblings;
use crate::db::Store;
use crate::dto::{validate_position, validate_title, BoardView, CreateCardDto, LabelDto, MoveCardDto, UpdateCardDto};
use crate::errors::StoreError;
use crate::models::{Board, Card, CardAssignee, CardLabel};
use crate::schema::{card_assignees, card_labels, cards, users};

/// Retrieves a card by ID, failing with `NotFound` unless it sits in the column
pub fn require_card_in_column(
    conn: &mut SqliteConnection,
    column_id: &str,
    card_id: &str,
) -> Result<Card, StoreError> {
    cards::table
        .filter(cards::id.eq(card_id))
        .filter(cards::column_id.eq(column_id))
        .select(Card::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| StoreError::not_found("Card", card_id))
}

/// Replaces the assignee set of a card
///
/// Duplicate IDs collapse into one assignment. Every ID must name an existing user.
fn replace_assignees(conn: &mut SqliteConnection, card_id: &str, user_ids: &[String]) -> Result<(), StoreError> {
    let wanted: BTreeSet<String> = user_ids.iter().cloned().collect();
    let wanted: Vec<String> = wanted.into_iter().collect();

    let known: Vec<String> = users::table
        .filter(users::id.eq_any(&wanted))
        .select(users::id)
        .load(conn)?;
    if let Some(missing) = wanted.iter().find(|id| !known.contains(id)) {
        return Err(StoreError::not_found("User", missing));
    }

    diesel::delete(card_assignees::table.filter(card_assignees::card_id.eq(card_id))).execute(conn)?;
    let rows: Vec<CardAssignee> = wanted
        .into_iter()
        .map(|user_id| CardAssignee::new(card_id.to_string(), user_id))
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(card_assignees::table).values(&rows).execute(conn)?;
    }
    Ok(())
}

/// Replaces the label list of a card, keeping the given order
fn replace_labels(conn: &mut SqliteConnection, card_id: &str, labels: &[LabelDto]) -> Result<(), StoreError> {
    diesel::delete(card_labels::table.filter(card_labels::card_id.eq(card_id))).execute(conn)?;
    let rows: Vec<CardLabel> = labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            CardLabel::new(card_id.to_string(), label.text.clone(), label.color.clone(), index as i32)
        })
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(card_labels::table).values(&rows).execute(conn)?;
    }
    Ok(())
}

/// Appends a new card at the end of a column
///
/// ### Arguments
///
/// * `store` - The storage handle
/// * `project_id` - The project owning the board
/// * `column_id` - The column receiving the card
/// * `dto` - The card content
///
/// ### Returns
///
/// The reloaded board aggregate
///
/// ### Errors
///
/// - `Validation` when the title is blank
/// - `NotFound` when the board, the column or an assignee does not exist
#[instrument(skip(store, dto), fields(title = %dto.title))]
pub async fn add_card(
    store: &Store,
    project_id: &str,
    column_id: &str,
    dto: &CreateCardDto,
) -> Result<BoardView, StoreError> {
    let title = validate_title(&dto.title)?;

    let project = project_id.to_string();
    let column = column_id.to_string();
    let dto = dto.clone();
    let card_id = store
        .write("add_card", move |conn| {
            let board = require_board(conn, &project)?;
            require_column(conn, &board.get_id(), &column)?;

            let position = Siblings::CardsIn(&column).append(conn)?;
            let mut card = Card::new(column.clone(), title.clone(), position);
            if let Some(description) = &dto.description {
                card.set_description(description.clone());
            }
            if let Some(priority) = dto.priority {
                card.set_priority(priority);
            }
            card.set_due_date(dto.due_date);

            diesel::insert_into(cards::table).values(&card).execute(conn)?;
            replace_assignees(conn, &card.get_id(), &dto.assignees)?;
            replace_labels(conn, &card.get_id(), &dto.labels)?;
            touch_board(conn, &board.get_id())?;
            Ok(card.get_id())
        })
        .await?;

    info!("Created card {} in column {}", card_id, column_id);
    get_board_view(store, project_id).await
}

/// Applies a partial update to a card without moving it
#[instrument(skip(store, dto))]
pub async fn update_card(
    store: &Store,
    project_id: &str,
    column_id: &str,
    card_id: &str,
    dto: &UpdateCardDto,
) -> Result<BoardView, StoreError> {
    let project = project_id.to_string();
    let column = column_id.to_string();
    let card_key = card_id.to_string();
    let dto = dto.clone();
    store
        .write("update_card", move |conn| {
            let board = require_board(conn, &project)?;
            require_column(conn, &board.get_id(), &column)?;
            let card_id = card_key.as_str();
            let mut card = require_card_in_column(conn, &column, card_id)?;

            dto.apply(&mut card)?;
            diesel::update(cards::table.find(card_id))
                .set((
                    cards::title.eq(card.get_title()),
                    cards::description.eq(card.get_description()),
                    cards::priority.eq(card.get_priority()),
                    cards::due_date.eq(card.get_due_date_raw()),
                    cards::updated_at.eq(card.get_updated_at_raw()),
                ))
                .execute(conn)?;

            if let Some(assignees) = &dto.assignees {
                replace_assignees(conn, card_id, assignees)?;
            }
            if let Some(labels) = &dto.labels {
                replace_labels(conn, card_id, labels)?;
            }
            touch_board(conn, &board.get_id())?;
            Ok(())
        })
        .await?;

    debug!("Updated card {}", card_id);
    get_board_view(store, project_id).await
}

/// Deletes a card and closes the gap it leaves in its column
#[instrument(skip(store))]
pub async fn delete_card(
    store: &Store,
    project_id: &str,
    column_id: &str,
    card_id: &str,
) -> Result<BoardView, StoreError> {
    let project = project_id.to_string();
    let column = column_id.to_string();
    let card = card_id.to_string();
    let position = store
        .write("delete_card", move |conn| {
            let board = require_board(conn, &project)?;
            require_column(conn, &board.get_id(), &column)?;
            let position = Siblings::CardsIn(&column).remove_and_compact(conn, &card)?;
            touch_board(conn, &board.get_id())?;
            Ok(position)
        })
        .await?;

    info!("Deleted card {} from position {}", card_id, position);
    get_board_view(store, project_id).await
}

/// Relocates a card inside an open transaction
///
/// Moving within one column reorders that column, excluding the card from
/// every shift. Moving across columns closes the gap in the source column,
/// then opens a slot in the target column. The target is clamped so that
/// anything past the end appends. Moving a card onto its current index
/// changes nothing, not even timestamps.
///
/// Returns the position the card landed on.
pub fn move_card_in(
    conn: &mut SqliteConnection,
    board: &Board,
    dto: &MoveCardDto,
    target: i32,
) -> Result<i32, StoreError> {
    let board_id = board.get_id();
    require_column(conn, &board_id, &dto.source_column_id)?;
    require_column(conn, &board_id, &dto.target_column_id)?;

    let source = Siblings::CardsIn(&dto.source_column_id);
    let original = source
        .position_of(conn, &dto.card_id)?
        .ok_or_else(|| StoreError::not_found("Card", &dto.card_id))?;

    let landed = if dto.source_column_id == dto.target_column_id {
        let landed = source.reorder_within(conn, &dto.card_id, target)?;
        if landed == original {
            return Ok(landed);
        }
        landed
    } else {
        source.detach(conn, &dto.card_id)?;
        Siblings::CardsIn(&dto.target_column_id).insert_at(conn, &dto.card_id, target)?
    };

    let now = Utc::now().naive_utc();
    diesel::update(cards::table.find(&dto.card_id))
        .set(cards::updated_at.eq(now))
        .execute(conn)?;
    touch_board(conn, &board_id)?;
    Ok(landed)
}

/// Moves a card to a position of the same or another column, atomically
///
/// ### Arguments
///
/// * `store` - The storage handle
/// * `project_id` - The project owning the board
/// * `dto` - Source column, target column, card and desired target index
///
/// ### Returns
///
/// The reloaded board aggregate reflecting the new ordering
///
/// ### Errors
///
/// - `Validation` when the target position is negative
/// - `NotFound` when the board or a column is missing, or the card is not in the source column
/// - `Conflict` when concurrent writers kept the board locked past the retry budget
#[instrument(skip(store, dto), fields(card_id = %dto.card_id, source = %dto.source_column_id, target = %dto.target_column_id))]
pub async fn move_card(store: &Store, project_id: &str, dto: &MoveCardDto) -> Result<BoardView, StoreError> {
    let target = validate_position(dto.target_position)?;

    let project = project_id.to_string();
    let moved = dto.clone();
    let landed = store
        .write("move_card", move |conn| {
            let board = require_board(conn, &project)?;
            move_card_in(conn, &board, &moved, target)
        })
        .await?;

    info!("Moved card {} to position {} of column {}", dto.card_id, landed, dto.target_column_id);
    get_board_view(store, project_id).await
}
