use clap::Subcommand;
use teamflow::dto::CreateUserDto;

use crate::client::TeamflowClient;
use crate::output::{self, OutputConfig};

/// User management commands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Create a user that cards can be assigned to
    Create {
        name: String,
        email: String,
        /// Avatar image URL
        #[clap(long)]
        avatar: Option<String>,
    },
    /// List all users
    List,
    /// Show one user
    Show {
        user_id: String,
    },
}

/// Executes a user command
pub async fn execute(
    client: &TeamflowClient,
    cmd: UserCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        UserCommands::Create { name, email, avatar } => {
            let user = client.create_user(&CreateUserDto { name, email, avatar }).await?;
            output::print_user(&user, config);
        }
        UserCommands::List => {
            let users = client.list_users().await?;
            output::print_users(&users, config);
        }
        UserCommands::Show { user_id } => {
            let user = client.get_user(&user_id).await?;
            output::print_user(&user, config);
        }
    }
    Ok(())
}
