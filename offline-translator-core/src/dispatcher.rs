//! Routing of method calls onto the translator cache, the download tracker
//! and the SDK.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::channel::{Method, MethodCall, MethodResponse};
use crate::config::{DownloadConditions, TranslatorConfig};
use crate::download_tracker::{DownloadGuard, DownloadTracker};
use crate::error::{Error, Result, SdkResult};
use crate::language::LanguagePair;
use crate::sdk::TranslationSdk;
use crate::translator_cache::TranslatorCache;

/// Request dispatcher for the translation bridge.
///
/// Shared across concurrent requests behind an `Arc`. Every failure is scoped
/// to the request that hit it; the cache and tracker stay consistent.
pub struct Dispatcher {
    sdk: Arc<dyn TranslationSdk>,
    cache: TranslatorCache,
    downloads: DownloadTracker,
    conditions: DownloadConditions,
}

impl Dispatcher {
    pub fn new(sdk: Arc<dyn TranslationSdk>, config: &TranslatorConfig) -> Self {
        Self {
            cache: TranslatorCache::new(Arc::clone(&sdk), config.cache_capacity),
            sdk,
            downloads: DownloadTracker::new(),
            conditions: config.download,
        }
    }

    pub fn with_defaults(sdk: Arc<dyn TranslationSdk>) -> Self {
        Self::new(sdk, &TranslatorConfig::default())
    }

    pub fn cache(&self) -> &TranslatorCache {
        &self.cache
    }

    pub fn downloads(&self) -> &DownloadTracker {
        &self.downloads
    }

    /// Handles one method call from the channel.
    pub async fn handle(&self, call: &MethodCall) -> MethodResponse {
        let method = match call.method.parse::<Method>() {
            Ok(method) => method,
            Err(_) => {
                debug!(method = %call.method, "method not implemented");
                return MethodResponse::NotImplemented;
            }
        };

        self.dispatch(method, call)
            .await
            .unwrap_or_else(Error::into_response)
    }

    async fn dispatch(&self, method: Method, call: &MethodCall) -> Result<MethodResponse> {
        match method {
            Method::Translate => {
                let (text, from, to) = match (
                    call.string_arg("text"),
                    call.string_arg("fromLanguage"),
                    call.string_arg("toLanguage"),
                ) {
                    (Some(text), Some(from), Some(to)) => (text, from, to),
                    _ => return Err(invalid_translate_arguments()),
                };
                let translated = self.translate(text, from, to).await?;
                Ok(MethodResponse::success(translated))
            }
            Method::GetAvailableLanguages => {
                let languages = self.available_languages().await?;
                Ok(MethodResponse::success(languages))
            }
            Method::DownloadLanguageModel => {
                self.download_language_model(language_arg(call, method)?)
                    .await?;
                Ok(MethodResponse::success(Value::Null))
            }
            Method::IsLanguageDownloaded => {
                let downloaded = self
                    .is_language_downloaded(language_arg(call, method)?)
                    .await?;
                Ok(MethodResponse::success(downloaded))
            }
            Method::DeleteLanguageModel => {
                self.delete_language_model(language_arg(call, method)?)
                    .await?;
                Ok(MethodResponse::success(Value::Null))
            }
        }
    }

    /// Translates `text` from `from` into `to`.
    ///
    /// Reuses the cached translator for the pair, creating it on first use.
    /// Languages whose model is missing are marked pending in the download
    /// tracker while the translator downloads them; a language another
    /// request is already downloading is waited for, not fetched twice.
    pub async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String> {
        if text.is_empty() || from.is_empty() || to.is_empty() {
            return Err(invalid_translate_arguments());
        }

        let pair = LanguagePair::new(from, to);
        let handle = self.cache.get_or_create(&pair);

        let reserved = self.reserve_missing_models(&pair).await.map_err(|e| {
            warn!(%pair, error = %e, "model check for translation failed");
            Error::ModelDownload(e.to_string())
        })?;
        if !reserved.is_empty() {
            handle
                .translator()
                .download_model_if_needed(&self.conditions)
                .await
                .map_err(|e| {
                    warn!(%pair, error = %e, "model download for translation failed");
                    Error::ModelDownload(e.to_string())
                })?;
        }
        drop(reserved);

        handle.translator().translate(text).await.map_err(|e| {
            warn!(%pair, error = %e, "translation failed");
            Error::Translation(e.to_string())
        })
    }

    // Marks every language of `pair` whose model is missing as pending.
    // Languages are taken in sorted order so two translations never wait on
    // each other's marks.
    async fn reserve_missing_models(&self, pair: &LanguagePair) -> SdkResult<Vec<DownloadGuard<'_>>> {
        let mut languages = vec![pair.source.as_str(), pair.target.as_str()];
        languages.sort_unstable();
        languages.dedup();

        let mut reserved = Vec::new();
        for language in languages {
            loop {
                if self.sdk.is_model_downloaded(language).await? {
                    break;
                }
                match self.downloads.begin(language) {
                    Some(guard) => {
                        reserved.push(guard);
                        break;
                    }
                    None => {
                        debug!(language, "waiting for pending model download");
                        self.downloads.wait_until_idle(language).await;
                    }
                }
            }
        }
        Ok(reserved)
    }

    /// Lists the language codes the SDK supports.
    pub async fn available_languages(&self) -> Result<Vec<String>> {
        self.sdk
            .available_languages()
            .await
            .map_err(|e| Error::LanguageList(e.to_string()))
    }

    /// Downloads the model for `language`.
    ///
    /// Fails with `AlreadyDownloading` while another download of the same
    /// language is running. The pending mark is cleared whatever the outcome.
    pub async fn download_language_model(&self, language: &str) -> Result<()> {
        require_language(language)?;

        let _guard = self
            .downloads
            .begin(language)
            .ok_or_else(|| Error::AlreadyDownloading {
                language: language.to_string(),
            })?;

        info!(language, "downloading language model");
        self.sdk
            .download_model(language, &self.conditions)
            .await
            .map_err(|e| {
                warn!(language, error = %e, "language model download failed");
                Error::ModelDownload(e.to_string())
            })?;
        info!(language, "language model downloaded");
        Ok(())
    }

    pub async fn is_language_downloaded(&self, language: &str) -> Result<bool> {
        require_language(language)?;

        self.sdk
            .is_model_downloaded(language)
            .await
            .map_err(|e| Error::CheckModel(e.to_string()))
    }

    /// Deletes the model for `language` and drops every cached translator
    /// that depended on it.
    pub async fn delete_language_model(&self, language: &str) -> Result<()> {
        require_language(language)?;

        self.sdk.delete_model(language).await.map_err(|e| {
            warn!(language, error = %e, "language model deletion failed");
            Error::Delete(e.to_string())
        })?;
        info!(language, "language model deleted");

        self.cache.invalidate_language(language);
        Ok(())
    }

    /// Evicts and releases every cached translator.
    ///
    /// In-flight requests keep their own reference to the translator they
    /// are using until they finish.
    pub fn shutdown(&self) -> usize {
        self.cache.evict_all()
    }
}

fn invalid_translate_arguments() -> Error {
    Error::InvalidArguments("Invalid arguments for translate".to_string())
}

fn require_language(language: &str) -> Result<()> {
    if language.is_empty() {
        return Err(Error::InvalidLanguage(
            "language must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}

fn language_arg(call: &MethodCall, method: Method) -> Result<&str> {
    call.string_arg("language").ok_or_else(|| {
        Error::InvalidLanguage(format!("Invalid language argument for {}", method))
    })
}
