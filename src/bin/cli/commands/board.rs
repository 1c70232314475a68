use clap::Subcommand;

use crate::client::TeamflowClient;
use crate::output::{self, OutputConfig};

/// Board commands
#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// Show the board of the project, creating it on first access
    Show,
}

/// Executes a board command
pub async fn execute(
    client: &TeamflowClient,
    project: &str,
    cmd: BoardCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        BoardCommands::Show => {
            let board = client.get_board(project).await?;
            output::print_board(&board, config);
        }
    }
    Ok(())
}
