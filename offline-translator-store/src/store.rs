//! On-disk store of installed language models.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::model::LanguageModel;

const TEMP_DIR: &str = "tmp";
const MODEL_EXTENSION: &str = "json";

/// A directory holding one `<language>.json` package per installed model.
///
/// Packages are written to `tmp/` first and renamed into place, so a
/// reader never sees a partially written model.
#[derive(Debug, Clone)]
pub struct ModelStore {
    root: PathBuf,
}

impl ModelStore {
    /// Opens (creating if needed) the store at `root` and removes temp files
    /// left behind by interrupted installs.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let temp_dir = root.join(TEMP_DIR);
        fs::create_dir_all(&temp_dir)?;

        let mut cleaned = 0usize;
        for entry in fs::read_dir(&temp_dir)? {
            let path = entry?.path();
            if path.is_file() {
                match fs::remove_file(&path) {
                    Ok(()) => cleaned += 1,
                    Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove stale temp file"),
                }
            }
        }
        if cleaned > 0 {
            debug!(cleaned, root = %root.display(), "Removed stale temp files");
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validates `bytes` as the model for `language` and installs it,
    /// replacing any previous version.
    pub async fn install(&self, language: &str, bytes: &[u8]) -> Result<LanguageModel> {
        let target = self.model_path(language)?;
        let model = LanguageModel::from_json(bytes, language)?;

        let temp_path = self
            .root
            .join(TEMP_DIR)
            .join(format!("{}.{}", Uuid::new_v4(), MODEL_EXTENSION));
        tokio::fs::write(&temp_path, bytes).await?;

        if let Err(e) = tokio::fs::rename(&temp_path, &target).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        info!(language, version = model.version, words = model.len(), "Installed language model");
        Ok(model)
    }

    pub async fn remove(&self, language: &str) -> Result<()> {
        let path = self.model_path(language)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(language, "Removed language model");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotInstalled(language.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn contains(&self, language: &str) -> Result<bool> {
        let path = self.model_path(language)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    pub async fn load(&self, language: &str) -> Result<LanguageModel> {
        let path = self.model_path(language)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotInstalled(language.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        LanguageModel::from_json(&bytes, language)
    }

    /// Languages with an installed package, sorted.
    pub async fn installed(&self) -> Result<Vec<String>> {
        let mut languages = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(MODEL_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_code(stem) {
                    languages.push(stem.to_string());
                }
            }
        }
        languages.sort();
        Ok(languages)
    }

    fn model_path(&self, language: &str) -> Result<PathBuf> {
        if !is_valid_code(language) {
            return Err(StoreError::InvalidLanguageCode(language.to_string()));
        }
        Ok(self.root.join(format!("{}.{}", language, MODEL_EXTENSION)))
    }
}

/// Path of the package for `language` inside a repository directory.
pub(crate) fn package_path(repository: &Path, language: &str) -> Result<PathBuf> {
    if !is_valid_code(language) {
        return Err(StoreError::InvalidLanguageCode(language.to_string()));
    }
    Ok(repository.join(format!("{}.{}", language, MODEL_EXTENSION)))
}

// Codes become file names, so only short lowercase tags are accepted.
fn is_valid_code(language: &str) -> bool {
    !language.is_empty()
        && language.len() <= 16
        && language
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FRENCH: &[u8] = br#"{"language":"fr","version":2,"entries":{"bonjour":"hello"}}"#;

    #[tokio::test]
    async fn test_install_load_remove() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::open(dir.path()).unwrap();

        assert!(!store.contains("fr").await.unwrap());
        store.install("fr", FRENCH).await.unwrap();
        assert!(store.contains("fr").await.unwrap());
        assert_eq!(store.installed().await.unwrap(), vec!["fr".to_string()]);

        let model = store.load("fr").await.unwrap();
        assert_eq!(model.version, 2);
        assert_eq!(model.to_english("bonjour"), Some("hello"));

        store.remove("fr").await.unwrap();
        assert!(!store.contains("fr").await.unwrap());
        assert!(matches!(
            store.remove("fr").await,
            Err(StoreError::NotInstalled(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_mismatched_package() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::open(dir.path()).unwrap();

        let result = store.install("de", FRENCH).await;
        assert!(matches!(result, Err(StoreError::LanguageMismatch { .. })));
        assert!(!store.contains("de").await.unwrap());
        assert_eq!(fs::read_dir(dir.path().join(TEMP_DIR)).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_rejects_path_like_codes() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::open(dir.path()).unwrap();

        for code in ["", "../fr", "FR", "fr/x"] {
            assert!(matches!(
                store.contains(code).await,
                Err(StoreError::InvalidLanguageCode(_))
            ));
        }
    }

    #[test]
    fn test_open_cleans_stale_temp_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(TEMP_DIR)).unwrap();
        fs::write(dir.path().join(TEMP_DIR).join("stale.json"), b"{").unwrap();

        ModelStore::open(dir.path()).unwrap();
        assert_eq!(fs::read_dir(dir.path().join(TEMP_DIR)).unwrap().count(), 0);
    }
}
