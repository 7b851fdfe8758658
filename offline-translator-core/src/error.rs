//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

use crate::channel::MethodResponse;

/// Errors raised by a translation SDK implementation.
///
/// Messages are forwarded verbatim to the caller of the channel method that
/// triggered the SDK call.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("No model available for language '{0}'")]
    ModelNotFound(String),

    #[error("Model download failed: {0}")]
    Download(String),

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Translator for {0} has been closed")]
    Closed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type SdkResult<T> = std::result::Result<T, SdkError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidArguments(String),

    #[error("{0}")]
    InvalidLanguage(String),

    #[error("A model download for '{language}' is already in progress")]
    AlreadyDownloading { language: String },

    #[error("{0}")]
    ModelDownload(String),

    #[error("{0}")]
    Translation(String),

    #[error("{0}")]
    LanguageList(String),

    #[error("{0}")]
    CheckModel(String),

    #[error("{0}")]
    Delete(String),

    #[error("TOML parse error in {context}: {error}")]
    Config {
        error: toml::de::Error,
        context: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Channel error code reported for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidArguments(_) => "INVALID_ARGUMENTS",
            Error::InvalidLanguage(_) => "INVALID_LANGUAGE",
            Error::AlreadyDownloading { .. } => "ALREADY_DOWNLOADING",
            Error::ModelDownload(_) => "MODEL_DOWNLOAD_ERROR",
            Error::Translation(_) => "TRANSLATION_ERROR",
            Error::LanguageList(_) => "LANGUAGE_LIST_ERROR",
            Error::CheckModel(_) => "CHECK_MODEL_ERROR",
            Error::Delete(_) => "DELETE_ERROR",
            Error::Config { .. }
            | Error::InvalidConfig(_)
            | Error::ConfigNotFound(_)
            | Error::Io(_) => "INTERNAL_ERROR",
        }
    }

    /// Converts the error into a channel error response.
    pub fn into_response(self) -> MethodResponse {
        MethodResponse::Error {
            code: self.code().to_string(),
            message: self.to_string(),
            details: None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::Config {
            error,
            context: "translator config".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            Error::InvalidArguments("x".into()).code(),
            "INVALID_ARGUMENTS"
        );
        assert_eq!(
            Error::AlreadyDownloading {
                language: "fr".into()
            }
            .code(),
            "ALREADY_DOWNLOADING"
        );
        assert_eq!(Error::InvalidConfig("capacity".into()).code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_sdk_message_passthrough() {
        let sdk = SdkError::Download("network unreachable".to_string());
        let err = Error::ModelDownload(sdk.to_string());
        assert_eq!(err.to_string(), "Model download failed: network unreachable");
    }
}
