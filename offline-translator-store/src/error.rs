//! Error types for the model store.

use offline_translator_core::SdkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model package: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model package is for '{found}', expected '{expected}'")]
    LanguageMismatch { expected: String, found: String },

    #[error("Invalid language code: '{0}'")]
    InvalidLanguageCode(String),

    #[error("No model installed for '{0}'")]
    NotInstalled(String),
}

impl From<StoreError> for SdkError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Io(e) => SdkError::Io(e),
            StoreError::NotInstalled(language) => SdkError::ModelNotFound(language),
            other => SdkError::Other(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
