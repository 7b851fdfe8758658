#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use offline_translator_core::{
    DownloadConditions, LanguagePair, SdkError, SdkResult, TranslationSdk, Translator,
};
use tokio::sync::Notify;

/// Shared bookkeeping between a `MockSdk` and the translators it creates.
#[derive(Default)]
pub struct MockState {
    pub created: AtomicUsize,
    pub sdk_calls: AtomicUsize,
    pub closed: Mutex<Vec<LanguagePair>>,
    pub downloaded: Mutex<HashSet<String>>,
    pub fail_download: Mutex<Option<String>>,
    pub fail_translate: Mutex<Option<String>>,
    pub fail_delete: Mutex<Option<String>>,
    pub fail_languages: Mutex<Option<String>>,
    pub download_gate: Mutex<Option<Arc<Notify>>>,
    pub panic_on_create: Mutex<Option<LanguagePair>>,
}

impl MockState {
    fn call(&self) {
        self.sdk_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MockSdk {
    pub state: Arc<MockState>,
}

impl MockSdk {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn created(&self) -> usize {
        self.state.created.load(Ordering::SeqCst)
    }

    pub fn sdk_calls(&self) -> usize {
        self.state.sdk_calls.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> Vec<LanguagePair> {
        self.state.closed.lock().unwrap().clone()
    }

    pub fn mark_downloaded(&self, language: &str) {
        self.state
            .downloaded
            .lock()
            .unwrap()
            .insert(language.to_string());
    }

    pub fn fail_downloads(&self, message: Option<&str>) {
        *self.state.fail_download.lock().unwrap() = message.map(str::to_string);
    }

    pub fn fail_translations(&self, message: Option<&str>) {
        *self.state.fail_translate.lock().unwrap() = message.map(str::to_string);
    }

    pub fn fail_deletes(&self, message: Option<&str>) {
        *self.state.fail_delete.lock().unwrap() = message.map(str::to_string);
    }

    pub fn fail_language_list(&self, message: Option<&str>) {
        *self.state.fail_languages.lock().unwrap() = message.map(str::to_string);
    }

    /// Makes `create_translator` panic for `pair`.
    pub fn panic_on_create(&self, pair: LanguagePair) {
        *self.state.panic_on_create.lock().unwrap() = Some(pair);
    }

    /// Makes the next model download wait until the returned notify fires.
    pub fn gate_next_download(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.state.download_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    async fn download(&self, languages: &[&str]) -> SdkResult<()> {
        let gate = self.state.download_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(message) = self.state.fail_download.lock().unwrap().clone() {
            return Err(SdkError::Download(message));
        }
        let mut downloaded = self.state.downloaded.lock().unwrap();
        for language in languages {
            downloaded.insert(language.to_string());
        }
        Ok(())
    }
}

pub struct MockTranslator {
    pair: LanguagePair,
    sdk: MockSdk,
}

#[async_trait]
impl Translator for MockTranslator {
    fn pair(&self) -> &LanguagePair {
        &self.pair
    }

    async fn download_model_if_needed(&self, _conditions: &DownloadConditions) -> SdkResult<()> {
        self.sdk.state.call();
        self.sdk
            .download(&[self.pair.source.as_str(), self.pair.target.as_str()])
            .await
    }

    async fn translate(&self, text: &str) -> SdkResult<String> {
        self.sdk.state.call();
        if let Some(message) = self.sdk.state.fail_translate.lock().unwrap().clone() {
            return Err(SdkError::Translation(message));
        }
        Ok(format!("[{}] {}", self.pair, text))
    }

    fn close(&self) {
        self.sdk.state.closed.lock().unwrap().push(self.pair.clone());
    }
}

#[async_trait]
impl TranslationSdk for MockSdk {
    fn create_translator(&self, pair: &LanguagePair) -> Box<dyn Translator> {
        self.state.call();
        let panicking = self.state.panic_on_create.lock().unwrap().clone();
        if panicking.as_ref() == Some(pair) {
            panic!("translator construction failed for {}", pair);
        }
        self.state.created.fetch_add(1, Ordering::SeqCst);
        Box::new(MockTranslator {
            pair: pair.clone(),
            sdk: MockSdk {
                state: Arc::clone(&self.state),
            },
        })
    }

    async fn available_languages(&self) -> SdkResult<Vec<String>> {
        self.state.call();
        if let Some(message) = self.state.fail_languages.lock().unwrap().clone() {
            return Err(SdkError::Other(message));
        }
        Ok(["de", "en", "es", "fr", "it"]
            .iter()
            .map(|l| l.to_string())
            .collect())
    }

    async fn download_model(
        &self,
        language: &str,
        _conditions: &DownloadConditions,
    ) -> SdkResult<()> {
        self.state.call();
        self.download(&[language]).await
    }

    async fn is_model_downloaded(&self, language: &str) -> SdkResult<bool> {
        self.state.call();
        Ok(self.state.downloaded.lock().unwrap().contains(language))
    }

    async fn delete_model(&self, language: &str) -> SdkResult<()> {
        self.state.call();
        if let Some(message) = self.state.fail_delete.lock().unwrap().clone() {
            return Err(SdkError::Other(message));
        }
        if !self.state.downloaded.lock().unwrap().remove(language) {
            return Err(SdkError::ModelNotFound(language.to_string()));
        }
        Ok(())
    }
}
