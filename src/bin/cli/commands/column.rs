use clap::Subcommand;
use teamflow::dto::{CreateColumnDto, MoveColumnDto, UpdateColumnDto};

use crate::client::TeamflowClient;
use crate::output::{self, OutputConfig};

/// Column management commands
#[derive(Subcommand, Debug)]
pub enum ColumnCommands {
    /// Append a column to the board
    Add {
        /// The column title
        title: String,
        /// Header color, e.g. "#3b82f6"
        #[clap(long)]
        color: Option<String>,
    },
    /// Rename or recolor a column
    Update {
        /// The column ID
        id: String,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        color: Option<String>,
    },
    /// Delete a column and all of its cards
    Delete {
        /// The column ID
        id: String,
    },
    /// Move a column to another position (0 is leftmost)
    Move {
        /// The column ID
        id: String,
        /// Target position; anything past the end moves the column last
        position: i64,
    },
}

/// Executes a column command
pub async fn execute(
    client: &TeamflowClient,
    project: &str,
    cmd: ColumnCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let board = match cmd {
        ColumnCommands::Add { title, color } => {
            client.add_column(project, &CreateColumnDto { title, color }).await?
        }
        ColumnCommands::Update { id, title, color } => {
            client.update_column(project, &id, &UpdateColumnDto { title, color }).await?
        }
        ColumnCommands::Delete { id } => client.delete_column(project, &id).await?,
        ColumnCommands::Move { id, position } => {
            let dto = MoveColumnDto { column_id: id, target_position: position };
            client.move_column(project, &dto).await?
        }
    };
    output::print_board(&board, config);
    Ok(())
}
