//! [`TranslationSdk`] implementation backed by a model repository directory.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use offline_translator_core::{
    DownloadConditions, LanguagePair, SdkError, SdkResult, TranslationSdk, Translator,
};
use tracing::{debug, info};

use crate::languages::{is_supported, ENGLISH, SUPPORTED_LANGUAGES};
use crate::model::{translate_words, LanguageModel};
use crate::store::{package_path, ModelStore};

struct Inner {
    repository: PathBuf,
    store: ModelStore,
}

impl Inner {
    async fn is_downloaded(&self, language: &str) -> SdkResult<bool> {
        if language == ENGLISH {
            return Ok(true);
        }
        Ok(self.store.contains(language).await?)
    }

    async fn download(&self, language: &str, conditions: &DownloadConditions) -> SdkResult<()> {
        if language == ENGLISH {
            return Ok(());
        }
        if !is_supported(language) {
            return Err(SdkError::ModelNotFound(language.to_string()));
        }

        let source = package_path(&self.repository, language)?;
        debug!(
            language,
            source = %source.display(),
            allow_cellular = conditions.allow_cellular,
            allow_background = conditions.allow_background,
            "Fetching model package"
        );
        let bytes = match tokio::fs::read(&source).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SdkError::ModelNotFound(language.to_string()))
            }
            Err(e) => return Err(SdkError::Download(e.to_string())),
        };

        self.store
            .install(language, &bytes)
            .await
            .map_err(|e| SdkError::Download(e.to_string()))?;
        Ok(())
    }

    async fn load(&self, language: &str) -> SdkResult<Option<LanguageModel>> {
        if language == ENGLISH {
            return Ok(None);
        }
        Ok(Some(self.store.load(language).await?))
    }
}

/// Translation SDK that installs JSON glossary packages from a repository
/// directory into a [`ModelStore`].
#[derive(Clone)]
pub struct FilesystemSdk {
    inner: Arc<Inner>,
}

impl FilesystemSdk {
    pub fn new(repository: impl Into<PathBuf>, models_dir: impl AsRef<Path>) -> SdkResult<Self> {
        let store = ModelStore::open(models_dir)?;
        Ok(Self {
            inner: Arc::new(Inner {
                repository: repository.into(),
                store,
            }),
        })
    }

    pub fn repository(&self) -> &Path {
        &self.inner.repository
    }

    pub fn store(&self) -> &ModelStore {
        &self.inner.store
    }
}

#[async_trait]
impl TranslationSdk for FilesystemSdk {
    fn create_translator(&self, pair: &LanguagePair) -> Box<dyn Translator> {
        Box::new(FilesystemTranslator {
            pair: pair.clone(),
            inner: Arc::clone(&self.inner),
            closed: AtomicBool::new(false),
        })
    }

    async fn available_languages(&self) -> SdkResult<Vec<String>> {
        Ok(SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect())
    }

    async fn download_model(&self, language: &str, conditions: &DownloadConditions) -> SdkResult<()> {
        self.inner.download(language, conditions).await
    }

    async fn is_model_downloaded(&self, language: &str) -> SdkResult<bool> {
        self.inner.is_downloaded(language).await
    }

    async fn delete_model(&self, language: &str) -> SdkResult<()> {
        if language == ENGLISH {
            return Err(SdkError::Other(
                "The English model is built in and cannot be deleted".to_string(),
            ));
        }
        self.inner.store.remove(language).await?;
        Ok(())
    }
}

/// Word-by-word translator pivoting through English.
pub struct FilesystemTranslator {
    pair: LanguagePair,
    inner: Arc<Inner>,
    closed: AtomicBool,
}

impl FilesystemTranslator {
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> SdkResult<()> {
        if self.is_closed() {
            return Err(SdkError::Closed(self.pair.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Translator for FilesystemTranslator {
    fn pair(&self) -> &LanguagePair {
        &self.pair
    }

    async fn download_model_if_needed(&self, conditions: &DownloadConditions) -> SdkResult<()> {
        self.ensure_open()?;
        for language in [&self.pair.source, &self.pair.target] {
            if !self.inner.is_downloaded(language).await? {
                info!(language = %language, pair = %self.pair, "Downloading missing model");
                self.inner.download(language, conditions).await?;
            }
        }
        Ok(())
    }

    async fn translate(&self, text: &str) -> SdkResult<String> {
        self.ensure_open()?;
        let source = self.inner.load(&self.pair.source).await?;
        let target = self.inner.load(&self.pair.target).await?;
        Ok(translate_words(text, source.as_ref(), target.as_ref()))
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(pair = %self.pair, "Translator closed");
        }
    }
}

