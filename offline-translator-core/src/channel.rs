//! Method-call values exchanged with the host application.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A method name plus its argument bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// A call without arguments.
    pub fn bare(method: impl Into<String>) -> Self {
        Self::new(method, Value::Null)
    }

    /// Returns the argument `name` if it is a non-empty string.
    ///
    /// A missing or non-object argument bag has no arguments.
    pub fn string_arg(&self, name: &str) -> Option<&str> {
        self.arguments
            .as_object()
            .and_then(|args: &Map<String, Value>| args.get(name))
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Methods the bridge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Translate,
    GetAvailableLanguages,
    DownloadLanguageModel,
    IsLanguageDownloaded,
    DeleteLanguageModel,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Translate,
        Method::GetAvailableLanguages,
        Method::DownloadLanguageModel,
        Method::IsLanguageDownloaded,
        Method::DeleteLanguageModel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Translate => "translate",
            Method::GetAvailableLanguages => "getAvailableLanguages",
            Method::DownloadLanguageModel => "downloadLanguageModel",
            Method::IsLanguageDownloaded => "isLanguageDownloaded",
            Method::DeleteLanguageModel => "deleteLanguageModel",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned for method names the bridge does not implement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown method '{}'", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// Outcome of a method call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResponse {
    Success {
        result: Value,
    },
    Error {
        code: String,
        message: String,
        details: Option<Value>,
    },
    NotImplemented,
}

impl MethodResponse {
    pub fn success<T: Into<Value>>(result: T) -> Self {
        MethodResponse::Success {
            result: result.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MethodResponse::Success { .. })
    }

    /// The error code, if this is an error response.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            MethodResponse::Error { code, .. } => Some(code),
            _ => None,
        }
    }
}
