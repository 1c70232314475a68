use crate::*;
use proptest::prelude::*;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::{RetryConfig, Store};
use crate::dto::{BoardView, CreateCardDto};
use crate::models::Priority;

/// Sets up a test store with migrations applied
///
/// Plain ":memory:" gives each pooled connection its own database, so every
/// test gets a uniquely named shared-cache in-memory database instead: all
/// connections of the pool see the same schema while tests stay isolated.
pub fn setup_test_db() -> Arc<Store> {
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::init_pool(&database_url).expect("Failed to create pool");

    let mut conn = pool.get().expect("Failed to get connection");
    run_migrations(&mut conn).expect("Failed to run migrations");
    drop(conn);

    Arc::new(Store::new(pool, RetryConfig::default()))
}

/// Sets up a file backed store, for tests that need real concurrent writers
///
/// The returned directory must outlive the store.
pub fn setup_file_db(max_retries: u32) -> (tempfile::TempDir, Arc<Store>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("board.db");
    let pool = db::init_pool(&path.to_string_lossy()).expect("Failed to create pool");

    let mut conn = pool.get().expect("Failed to get connection");
    run_migrations(&mut conn).expect("Failed to run migrations");
    drop(conn);

    (dir, Arc::new(Store::new(pool, RetryConfig::with_max_retries(max_retries))))
}

/// Creates the default board of a project and returns it
pub async fn board_for(store: &Store, project_id: &str) -> BoardView {
    repo::get_or_create_board(store, project_id)
        .await
        .expect("Failed to create board")
}

/// Appends cards with the given titles to a column, returning the final board
pub async fn seed_cards(store: &Store, project_id: &str, column_id: &str, titles: &[&str]) -> BoardView {
    let mut board = board_for(store, project_id).await;
    for title in titles {
        board = repo::add_card(store, project_id, column_id, &CreateCardDto::new(title))
            .await
            .expect("Failed to add card");
    }
    board
}

/// Looks up the ID of a card by title
pub fn card_id(board: &BoardView, title: &str) -> String {
    board
        .columns
        .iter()
        .flat_map(|column| column.cards.iter())
        .find(|card| card.title == title)
        .map(|card| card.id.clone())
        .unwrap_or_else(|| panic!("No card titled {}", title))
}

/// Looks up the ID of a column by title
pub fn column_id(board: &BoardView, title: &str) -> String {
    board
        .column(title)
        .map(|column| column.id.clone())
        .unwrap_or_else(|| panic!("No column titled {}", title))
}

/// True when the positions are exactly `0..n` in order
pub fn is_dense(positions: &[i32]) -> bool {
    positions.iter().enumerate().all(|(index, position)| *position == index as i32)
}

/// Checks that every column of the board and the columns themselves are dense
pub fn assert_board_dense(board: &BoardView) {
    let column_positions: Vec<i32> = board.columns.iter().map(|column| column.position).collect();
    assert!(is_dense(&column_positions), "column positions {:?}", column_positions);
    for column in &board.columns {
        let positions = column.card_positions();
        assert!(is_dense(&positions), "card positions of {}: {:?}", column.title, positions);
    }
}

/// Card positions of a column as stored, ignoring the view
pub fn stored_card_positions(conn: &mut SqliteConnection, column_id: &str) -> Vec<i32> {
    schema::cards::table
        .filter(schema::cards::column_id.eq(column_id))
        .order_by(schema::cards::position.asc())
        .select(schema::cards::position)
        .load(conn)
        .expect("Failed to load positions")
}

#[tokio::test]
async fn test_setup_test_db() {
    use diesel::sql_types::Text;

    #[derive(QueryableByName, Debug)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let store = setup_test_db();
    let mut conn = store.pool().get().unwrap();
    let table_names: Vec<TableName> = diesel::sql_query("SELECT name FROM sqlite_master WHERE type='table'")
        .load(&mut conn)
        .expect("Failed to load table names");

    for table in ["users", "boards", "board_columns", "cards", "card_assignees", "card_labels"] {
        assert!(
            table_names.iter().any(|t| t.name == table),
            "Table '{}' not found in database",
            table
        );
    }
}

#[tokio::test]
async fn test_setup_test_db_is_isolated() {
    let first = setup_test_db();
    let second = setup_test_db();
    board_for(&first, "alpha").await;

    let found = second.read(|conn| Ok(repo::find_board(conn, "alpha")?)).unwrap();
    assert!(found.is_none());
}

/// Generates an arbitrary DateTime<Utc> within 2020-01-01 to 2030-01-01
pub fn arb_datetime_utc() -> impl Strategy<Value = DateTime<Utc>> {
    (1_577_836_800i64..1_893_456_000i64)
        .prop_map(|ts| DateTime::from_timestamp(ts, 0).unwrap())
}

/// Generates an optional arbitrary DateTime<Utc>
pub fn arb_optional_datetime_utc() -> impl Strategy<Value = Option<DateTime<Utc>>> {
    prop_oneof![
        Just(None),
        arb_datetime_utc().prop_map(Some),
    ]
}

/// Generates any priority level
pub fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
        Just(Priority::Urgent),
    ]
}

/// Generates a title that survives trimming
pub fn arb_title() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,30}"
}

/// Generates strings with surrounding whitespace and control characters
pub fn arb_messy_string() -> impl Strategy<Value = String> {
    "[ \t\n]{0,3}[a-zA-Z0-9:/._-]{0,20}[ \t\n]{0,3}"
}

/// One step of a random board edit session
///
/// Indexes are resolved against the current state modulo its size, so every
/// generated step is applicable.
#[derive(Debug, Clone)]
pub enum BoardOp {
    Add { column: usize },
    Delete { column: usize, card: usize },
    Move { from: usize, card: usize, to: usize, position: i64 },
}

/// Generates a sequence of board edits over `columns` columns
pub fn arb_board_ops(columns: usize, max_len: usize) -> impl Strategy<Value = Vec<BoardOp>> {
    let op = prop_oneof![
        3 => (0..columns).prop_map(|column| BoardOp::Add { column }),
        1 => (0..columns, 0usize..16).prop_map(|(column, card)| BoardOp::Delete { column, card }),
        4 => (0..columns, 0usize..16, 0..columns, 0i64..12)
            .prop_map(|(from, card, to, position)| BoardOp::Move { from, card, to, position }),
    ];
    prop::collection::vec(op, 1..max_len)
}
