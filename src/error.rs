use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Download interrupted")]
    Interrupted,

    #[error("Download failed: {message}")]
    Downloader { message: String },

    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid download request: {message}")]
    InvalidRequest { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    #[error("Transfer tool not found: {name}")]
    ToolNotFound { name: String },
}

impl FetchError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        FetchError::ConfigError {
            message: message.into(),
        }
    }

    pub fn downloader<S: Into<String>>(message: S) -> Self {
        FetchError::Downloader {
            message: message.into(),
        }
    }

    /// True when the caller cancelled the transfer rather than it failing.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, FetchError::Interrupted)
    }
}
