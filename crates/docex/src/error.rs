use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocexError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Unexpected row data: {0}")]
    RowData(String),

    #[error("Cannot create output folder {path}: {source}")]
    OutputRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create folder {path}: {source}")]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("User input error: {0}")]
    UserInput(String),
}

impl From<dialoguer::Error> for DocexError {
    fn from(err: dialoguer::Error) -> Self {
        DocexError::UserInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DocexError>;
