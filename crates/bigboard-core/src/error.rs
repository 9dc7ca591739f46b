use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("custom stickers missing for colors: {}", missing.join(", "))]
    CatalogIncomplete { missing: Vec<String> },

    #[error("sticker catalog is not populated")]
    CatalogNotPopulated,

    #[error("no config found: create bigboard.yaml or pass --config")]
    ConfigNotFound,

    #[error("missing Trello credentials: set TRELLO_API_KEY and TRELLO_TOKEN")]
    MissingCredentials,

    #[error("unknown board '{0}': add it under `boards:` in the config")]
    BoardNotFound(String),

    #[error("card not found: {0}")]
    CardNotFound(String),

    #[error("board {0} has no lists")]
    NoLists(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("Trello API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Deployment problems that must abort setup rather than be retried.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BoardError::CatalogIncomplete { .. }
                | BoardError::CatalogNotPopulated
                | BoardError::ConfigNotFound
                | BoardError::MissingCredentials
                | BoardError::BoardNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
