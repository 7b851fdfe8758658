//! Glossary language models.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// A language model package: words of one language mapped to English.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageModel {
    pub language: String,
    #[serde(default = "default_version")]
    pub version: u32,
    /// Lowercase word -> English gloss.
    pub entries: BTreeMap<String, String>,
    #[serde(skip)]
    reverse: HashMap<String, String>,
}

fn default_version() -> u32 {
    1
}

impl LanguageModel {
    pub fn new(language: impl Into<String>, entries: BTreeMap<String, String>) -> Self {
        let mut model = Self {
            language: language.into(),
            version: default_version(),
            entries,
            reverse: HashMap::new(),
        };
        model.build_reverse_index();
        model
    }

    /// Parses a model package and checks it is for `expected_language`.
    pub fn from_json(bytes: &[u8], expected_language: &str) -> Result<Self> {
        let mut model: LanguageModel = serde_json::from_slice(bytes)?;
        if model.language != expected_language {
            return Err(StoreError::LanguageMismatch {
                expected: expected_language.to_string(),
                found: model.language,
            });
        }
        model.entries = model
            .entries
            .into_iter()
            .map(|(word, gloss)| (word.to_lowercase(), gloss.to_lowercase()))
            .collect();
        model.build_reverse_index();
        Ok(model)
    }

    // Entries iterate in word order, so the first word seen for a gloss is
    // the lexicographically smallest one.
    fn build_reverse_index(&mut self) {
        self.reverse.clear();
        for (word, gloss) in &self.entries {
            self.reverse
                .entry(gloss.clone())
                .or_insert_with(|| word.clone());
        }
    }

    pub fn to_english(&self, word: &str) -> Option<&str> {
        self.entries.get(word).map(String::as_str)
    }

    pub fn from_english(&self, word: &str) -> Option<&str> {
        self.reverse.get(word).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Translates `text` word by word through English.
///
/// `None` on either side stands for English itself, and English to English
/// returns `text` unchanged. Words missing from a glossary are kept as they
/// are. Punctuation around a word is preserved, and so is its casing: all
/// capitals, a leading capital, or the original spelling when the word maps
/// to itself.
pub fn translate_words(
    text: &str,
    source: Option<&LanguageModel>,
    target: Option<&LanguageModel>,
) -> String {
    if source.is_none() && target.is_none() {
        return text.to_string();
    }
    text.split_whitespace()
        .map(|token| translate_token(token, source, target))
        .collect::<Vec<_>>()
        .join(" ")
}

fn translate_token(
    token: &str,
    source: Option<&LanguageModel>,
    target: Option<&LanguageModel>,
) -> String {
    let Some(start) = token.find(|c: char| c.is_alphanumeric()) else {
        return token.to_string();
    };
    let end = token
        .rfind(|c: char| c.is_alphanumeric())
        .map(|i| i + token[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(token.len());
    let (prefix, word, suffix) = (&token[..start], &token[start..end], &token[end..]);

    let lower = word.to_lowercase();
    let english = match source {
        Some(model) => model.to_english(&lower),
        None => Some(lower.as_str()),
    };
    let translated = english.and_then(|en| match target {
        Some(model) => model.from_english(en),
        None => Some(en),
    });

    let replacement = match translated {
        Some(t) => restore_case(word, &lower, t),
        None => word.to_string(),
    };
    format!("{}{}{}", prefix, replacement, suffix)
}

fn restore_case(original: &str, lower: &str, translated: &str) -> String {
    if translated == lower {
        return original.to_string();
    }
    let letters: Vec<char> = original.chars().filter(|c| c.is_alphabetic()).collect();
    let all_caps = letters.len() > 1 && letters.iter().all(|c| c.is_uppercase());
    if all_caps {
        translated.to_uppercase()
    } else if original.chars().next().is_some_and(char::is_uppercase) {
        capitalize(translated)
    } else {
        translated.to_string()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
