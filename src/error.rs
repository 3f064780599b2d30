// ABOUTME: Error types with structured exit codes for CLI
// ABOUTME: Separates configuration, transport, and remote GraphQL failures

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: {status}")]
    Transport { status: u16 },

    #[error("{0}")]
    Remote(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("{0}")]
    Document(String),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Configuration(_) => 2,
            Error::Network(_) => 3,
            Error::Transport { .. } => 4,
            Error::Remote(_) => 5,
            Error::Parse(_) => 6,
            Error::Filesystem(_) => 7,
            Error::Document(_) => 8,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
