use clap::ValueEnum;
use serde::Serialize;
use teamflow::dto::{BoardView, CardView};
use teamflow::models::User;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just IDs)
    pub quiet: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("Failed to serialize output: {}", err),
    }
}

/// One line summary of a card: title, priority, due date and assignees
fn card_line(card: &CardView) -> String {
    let mut line = format!("{} [{}]", card.title, card.priority);
    if let Some(due) = card.due_date {
        line.push_str(&format!(" due {}", due.format("%Y-%m-%d")));
    }
    if !card.assignees.is_empty() {
        let names: Vec<&str> = card.assignees.iter().map(|a| a.name.as_str()).collect();
        line.push_str(&format!(" @{}", names.join(", @")));
    }
    if !card.labels.is_empty() {
        let labels: Vec<&str> = card.labels.iter().map(|l| l.text.as_str()).collect();
        line.push_str(&format!(" #{}", labels.join(" #")));
    }
    line
}

/// Prints a board with its columns and cards in position order
pub fn print_board(board: &BoardView, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", board.id);
                return;
            }
            println!("{} ({})", board.name, board.project_id);
            for column in &board.columns {
                println!();
                println!("{}. {} ({})  {}", column.position, column.title, column.cards.len(), column.id);
                if column.cards.is_empty() {
                    println!("   (empty)");
                }
                for card in &column.cards {
                    println!("   {}. {}  {}", card.position, card_line(card), card.id);
                }
            }
        }
        OutputFormat::Json => print_json(board),
    }
}

/// Prints a list of users in the specified format
pub fn print_users(users: &[User], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if users.is_empty() {
                if !config.quiet {
                    println!("No users found.");
                }
                return;
            }
            if config.quiet {
                for user in users {
                    println!("{}", user.get_id());
                }
                return;
            }
            let max_id = users.iter().map(|u| u.get_id().len()).max().unwrap_or(2);
            let max_name = users.iter().map(|u| u.get_name().len()).max().unwrap_or(4).max(4);
            println!("{:<id_w$}  {:<name_w$}  EMAIL", "ID", "NAME", id_w = max_id, name_w = max_name);
            for user in users {
                println!(
                    "{:<id_w$}  {:<name_w$}  {}",
                    user.get_id(),
                    user.get_name(),
                    user.get_email(),
                    id_w = max_id,
                    name_w = max_name,
                );
            }
        }
        OutputFormat::Json => print_json(users),
    }
}

/// Prints a single user in the specified format
pub fn print_user(user: &User, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", user.get_id());
                return;
            }
            println!("ID:      {}", user.get_id());
            println!("Name:    {}", user.get_name());
            println!("Email:   {}", user.get_email());
            if let Some(avatar) = user.get_avatar() {
                println!("Avatar:  {}", avatar);
            }
            println!("Created: {}", user.get_created_at());
        }
        OutputFormat::Json => print_json(user),
    }
}
