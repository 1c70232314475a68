use chrono::{DateTime, Utc};
use clap::Subcommand;
use teamflow::dto::{CreateCardDto, LabelDto, MoveCardDto, UpdateCardDto};
use teamflow::models::Priority;

use crate::client::TeamflowClient;
use crate::output::{self, OutputConfig};

/// Card management commands
#[derive(Subcommand, Debug)]
pub enum CardCommands {
    /// Append a card to a column
    Add {
        /// The column ID
        column: String,
        /// The card title
        title: String,
        #[clap(long)]
        description: Option<String>,
        /// low, medium, high or urgent
        #[clap(long)]
        priority: Option<Priority>,
        /// Due date (RFC 3339)
        #[clap(long)]
        due: Option<DateTime<Utc>>,
        /// User ID to assign; repeat for several users
        #[clap(long = "assignee")]
        assignees: Vec<String>,
        /// Label text; repeat for several labels
        #[clap(long = "label")]
        labels: Vec<String>,
    },
    /// Edit a card without moving it
    Update {
        /// The column the card is in
        column: String,
        /// The card ID
        id: String,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        description: Option<String>,
        #[clap(long)]
        priority: Option<Priority>,
        /// New due date (RFC 3339)
        #[clap(long, conflicts_with = "clear_due")]
        due: Option<DateTime<Utc>>,
        /// Remove the due date
        #[clap(long)]
        clear_due: bool,
    },
    /// Delete a card
    Delete {
        /// The column the card is in
        column: String,
        /// The card ID
        id: String,
    },
    /// Move a card within its column or to another column
    Move {
        /// The card ID
        id: String,
        /// The column the card is in
        #[clap(long)]
        from: String,
        /// The destination column; defaults to the source column
        #[clap(long)]
        to: Option<String>,
        /// Target position; anything past the end appends
        #[clap(long, default_value_t = 0)]
        position: i64,
    },
}

/// Executes a card command
pub async fn execute(
    client: &TeamflowClient,
    project: &str,
    cmd: CardCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let board = match cmd {
        CardCommands::Add { column, title, description, priority, due, assignees, labels } => {
            let dto = CreateCardDto {
                title,
                description,
                priority,
                due_date: due,
                assignees,
                labels: labels
                    .into_iter()
                    .map(|text| LabelDto { text, color: None })
                    .collect(),
            };
            client.add_card(project, &column, &dto).await?
        }
        CardCommands::Update { column, id, title, description, priority, due, clear_due } => {
            let due_date = if clear_due { Some(None) } else { due.map(Some) };
            let dto = UpdateCardDto {
                title,
                description,
                priority,
                due_date,
                ..UpdateCardDto::default()
            };
            client.update_card(project, &column, &id, &dto).await?
        }
        CardCommands::Delete { column, id } => client.delete_card(project, &column, &id).await?,
        CardCommands::Move { id, from, to, position } => {
            let dto = MoveCardDto {
                target_column_id: to.unwrap_or_else(|| from.clone()),
                source_column_id: from,
                card_id: id,
                target_position: position,
            };
            client.move_card(project, &dto).await?
        }
    };
    output::print_board(&board, config);
    Ok(())
}
