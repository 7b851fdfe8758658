//! Language pair keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered (source, target) pair of language codes.
///
/// Comparison is exact and case-sensitive on both components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Returns true if either side of the pair is `language`.
    pub fn involves(&self, language: &str) -> bool {
        self.source == language || self.target == language
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}

impl<S: Into<String>, T: Into<String>> From<(S, T)> for LanguagePair {
    fn from((source, target): (S, T)) -> Self {
        Self::new(source, target)
    }
}
