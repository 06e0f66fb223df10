use thiserror::Error;

/// Errors surfaced by the quiz core and its storage layer
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("No items available: {0}")]
    NoItemsAvailable(String),

    #[error("Invalid quiz mode: {0}")]
    InvalidMode(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No question is awaiting an answer")]
    NoActiveQuestion,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;
