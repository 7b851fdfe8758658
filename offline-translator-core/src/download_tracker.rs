//! Tracking of in-flight model downloads.

use dashmap::DashSet;
use tokio::sync::Notify;
use tracing::debug;

/// Set of language codes whose model download is currently running.
///
/// Marking a language pending is an atomic test-and-set, so two concurrent
/// requests for the same language can never both start a download.
#[derive(Debug, Default)]
pub struct DownloadTracker {
    pending: DashSet<String>,
    released: Notify,
}

impl DownloadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `language` pending.
    ///
    /// Returns `false` without side effects if it already was.
    pub fn try_begin(&self, language: &str) -> bool {
        let started = self.pending.insert(language.to_string());
        if started {
            debug!(language, "model download marked pending");
        } else {
            debug!(language, "model download already pending");
        }
        started
    }

    /// Clears the pending mark for `language`, whatever the outcome of the
    /// download was.
    pub fn end(&self, language: &str) {
        if self.pending.remove(language).is_some() {
            debug!(language, "model download no longer pending");
            self.released.notify_waiters();
        }
    }

    /// Waits until `language` is no longer pending.
    ///
    /// Returns immediately if it is not pending now. Another request may mark
    /// it pending again before the caller acts, so callers retry `begin`.
    pub async fn wait_until_idle(&self, language: &str) {
        loop {
            let released = self.released.notified();
            tokio::pin!(released);
            released.as_mut().enable();
            if !self.is_pending(language) {
                return;
            }
            released.await;
        }
    }

    /// Scoped form of [`try_begin`](Self::try_begin).
    ///
    /// The returned guard clears the mark when dropped.
    pub fn begin(&self, language: &str) -> Option<DownloadGuard<'_>> {
        if self.try_begin(language) {
            Some(DownloadGuard {
                tracker: self,
                language: language.to_string(),
            })
        } else {
            None
        }
    }

    pub fn is_pending(&self, language: &str) -> bool {
        self.pending.contains(language)
    }

    /// Pending language codes, sorted.
    pub fn pending(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.pending.iter().map(|l| l.key().clone()).collect();
        languages.sort();
        languages
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Clears a pending download mark on drop.
#[derive(Debug)]
pub struct DownloadGuard<'a> {
    tracker: &'a DownloadTracker,
    language: String,
}

impl DownloadGuard<'_> {
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Drop for DownloadGuard<'_> {
    fn drop(&mut self) {
        self.tracker.end(&self.language);
    }
}
