//! Error types for the viewer.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Sprite {0} not present in sprite table")]
    MissingSprite(u32),

    #[error("Sprite {0} has no body organ")]
    MissingBodyOrgan(u32),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Errors that only affect a single creature for a single frame.
    pub fn is_per_creature(&self) -> bool {
        matches!(
            self,
            Error::MissingSprite(_) | Error::MissingBodyOrgan(_) | Error::Layout(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
