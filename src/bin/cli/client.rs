use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use teamflow::dto::{
    BoardView, CreateCardDto, CreateColumnDto, CreateUserDto, MoveCardDto, MoveColumnDto,
    UpdateCardDto, UpdateColumnDto,
};
use teamflow::models::User;

/// Error type for CLI client operations
#[derive(Debug)]
pub enum ClientError {
    /// Server returned an error status with a message body
    Server { status: reqwest::StatusCode, message: String },
    /// Network/connection/request error
    Request(reqwest::Error),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status.as_u16(), message)
            }
            ClientError::Request(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Request(err) => Some(err),
            ClientError::Server { .. } => None,
        }
    }
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<serde_json::Value>().await {
            Ok(body) => body.get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// HTTP client wrapper for communicating with the TeamFlow server
pub struct TeamflowClient {
    /// The base URL of the server (e.g. "http://localhost:3000")
    base_url: String,
    /// The underlying HTTP client
    client: Client,
}

impl TeamflowClient {
    /// Creates a new TeamflowClient
    ///
    /// ### Arguments
    ///
    /// * `base_url` - The base URL of the TeamFlow server
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn board_url(&self, project: &str) -> String {
        format!("{}/boards/{}", self.base_url, project)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T, ClientError> {
        self.send(self.client.post(url).json(body)).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T, ClientError> {
        self.send(self.client.put(url).json(body)).await
    }

    // ── Board endpoints ──────────────────────────────────────────────

    /// Loads the board of a project, creating it on first access
    pub async fn get_board(&self, project: &str) -> Result<BoardView, ClientError> {
        self.send(self.client.get(self.board_url(project))).await
    }

    /// Moves a card to a position of the same or another column
    pub async fn move_card(&self, project: &str, dto: &MoveCardDto) -> Result<BoardView, ClientError> {
        self.post(&format!("{}/move-card", self.board_url(project)), dto).await
    }

    /// Moves a column to another position
    pub async fn move_column(&self, project: &str, dto: &MoveColumnDto) -> Result<BoardView, ClientError> {
        self.post(&format!("{}/move-column", self.board_url(project)), dto).await
    }

    // ── Column endpoints ─────────────────────────────────────────────

    /// Appends a column to the board
    pub async fn add_column(&self, project: &str, dto: &CreateColumnDto) -> Result<BoardView, ClientError> {
        self.post(&format!("{}/columns", self.board_url(project)), dto).await
    }

    /// Renames or recolors a column
    pub async fn update_column(
        &self,
        project: &str,
        column_id: &str,
        dto: &UpdateColumnDto,
    ) -> Result<BoardView, ClientError> {
        self.put(&format!("{}/columns/{}", self.board_url(project), column_id), dto).await
    }

    /// Deletes a column with its cards
    pub async fn delete_column(&self, project: &str, column_id: &str) -> Result<BoardView, ClientError> {
        let url = format!("{}/columns/{}", self.board_url(project), column_id);
        self.send(self.client.delete(&url)).await
    }

    // ── Card endpoints ───────────────────────────────────────────────

    /// Appends a card to a column
    pub async fn add_card(
        &self,
        project: &str,
        column_id: &str,
        dto: &CreateCardDto,
    ) -> Result<BoardView, ClientError> {
        self.post(&format!("{}/columns/{}/cards", self.board_url(project), column_id), dto).await
    }

    /// Applies a partial update to a card
    pub async fn update_card(
        &self,
        project: &str,
        column_id: &str,
        card_id: &str,
        dto: &UpdateCardDto,
    ) -> Result<BoardView, ClientError> {
        let url = format!("{}/columns/{}/cards/{}", self.board_url(project), column_id, card_id);
        self.put(&url, dto).await
    }

    /// Deletes a card
    pub async fn delete_card(&self, project: &str, column_id: &str, card_id: &str) -> Result<BoardView, ClientError> {
        let url = format!("{}/columns/{}/cards/{}", self.board_url(project), column_id, card_id);
        self.send(self.client.delete(&url)).await
    }

    // ── User endpoints ───────────────────────────────────────────────

    /// Creates a user
    pub async fn create_user(&self, dto: &CreateUserDto) -> Result<User, ClientError> {
        self.post(&format!("{}/users", self.base_url), dto).await
    }

    /// Lists all users
    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.send(self.client.get(format!("{}/users", self.base_url))).await
    }

    /// Fetches one user
    pub async fn get_user(&self, user_id: &str) -> Result<User, ClientError> {
        self.send(self.client.get(format!("{}/users/{}", self.base_url, user_id))).await
    }
}
