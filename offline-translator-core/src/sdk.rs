//! Traits for the on-device translation SDK the bridge drives.

use async_trait::async_trait;

use crate::config::DownloadConditions;
use crate::error::SdkResult;
use crate::language::LanguagePair;

/// A live translator bound to one language pair.
///
/// Instances are owned by a [`TranslatorHandle`](crate::TranslatorHandle),
/// which calls [`close`](Translator::close) exactly once when the last
/// reference to the handle goes away.
#[async_trait]
pub trait Translator: Send + Sync {
    /// The pair this translator was built for.
    fn pair(&self) -> &LanguagePair;

    /// Makes sure the models backing this translator are on the device,
    /// downloading whatever is missing.
    async fn download_model_if_needed(&self, conditions: &DownloadConditions) -> SdkResult<()>;

    /// Translates `text` from the pair's source into its target language.
    async fn translate(&self, text: &str) -> SdkResult<String>;

    /// Releases the SDK resources held by this translator.
    fn close(&self);
}

/// Translator factory and model manager.
///
/// All operations except translator construction are async; failures are
/// reported as [`SdkError`](crate::SdkError) and passed through to callers
/// without retries.
#[async_trait]
pub trait TranslationSdk: Send + Sync {
    /// Builds a translator for `pair`. Construction does not touch models.
    fn create_translator(&self, pair: &LanguagePair) -> Box<dyn Translator>;

    /// Lists every language code the SDK can translate.
    async fn available_languages(&self) -> SdkResult<Vec<String>>;

    /// Downloads the model for `language`.
    async fn download_model(&self, language: &str, conditions: &DownloadConditions)
        -> SdkResult<()>;

    /// Checks whether the model for `language` is on the device.
    async fn is_model_downloaded(&self, language: &str) -> SdkResult<bool>;

    /// Deletes the model for `language` from the device.
    async fn delete_model(&self, language: &str) -> SdkResult<()>;
}
