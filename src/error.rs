use thiserror::Error;

/// Errors that can occur while generating, storing or sharing recipes
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Failed to load configuration
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// No credential for the generative-AI services
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    /// The text service failed or returned an incomplete recipe
    #[error("Failed to generate recipe: {0}")]
    GenerationError(String),

    /// HTTP client could not be built or a request failed outright
    #[error("Request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Saved recipes could not be written
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Unknown cuisine or meal type
    #[error("Invalid {kind}: {value}")]
    InvalidFilter { kind: &'static str, value: String },

    /// Share link could not be parsed
    #[error("Invalid share link: {0}")]
    InvalidShareLink(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),
}

impl From<std::io::Error> for RecipeError {
    fn from(err: std::io::Error) -> Self {
        RecipeError::StorageError(err.to_string())
    }
}
