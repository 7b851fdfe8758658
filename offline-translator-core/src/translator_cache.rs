//! Bounded LRU cache of live translators.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::language::LanguagePair;
use crate::sdk::{TranslationSdk, Translator};

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Shared owner of one SDK translator.
///
/// The translator is closed when the last `Arc<TranslatorHandle>` is dropped,
/// so an operation that cloned the handle keeps it usable even after the
/// cache has evicted it.
pub struct TranslatorHandle {
    id: u64,
    translator: Box<dyn Translator>,
}

impl TranslatorHandle {
    pub fn new(translator: Box<dyn Translator>) -> Self {
        Self {
            id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            translator,
        }
    }

    /// Process-unique identity of this handle.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn pair(&self) -> &LanguagePair {
        self.translator.pair()
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }
}

impl fmt::Debug for TranslatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorHandle")
            .field("id", &self.id)
            .field("pair", self.pair())
            .finish()
    }
}

impl Drop for TranslatorHandle {
    fn drop(&mut self) {
        debug!(id = self.id, pair = %self.pair(), "releasing translator");
        self.translator.close();
    }
}

/// Lookup statistics for a [`TranslatorCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct CacheState {
    // Iteration order is recency order: front is least recently used.
    entries: IndexMap<LanguagePair, Arc<TranslatorHandle>>,
    stats: CacheStats,
}

/// Least-recently-used cache mapping language pairs to translators.
///
/// Lookup, construction, insertion and eviction all happen under a single
/// lock, so concurrent requests for the same pair share one translator.
pub struct TranslatorCache {
    sdk: Arc<dyn TranslationSdk>,
    capacity: usize,
    state: Mutex<CacheState>,
}

impl TranslatorCache {
    /// Creates an empty cache holding at most `capacity` translators.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(sdk: Arc<dyn TranslationSdk>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            sdk,
            capacity,
            state: Mutex::new(CacheState {
                entries: IndexMap::with_capacity(capacity + 1),
                stats: CacheStats::default(),
            }),
        }
    }

    // A panic while the lock is held can only come from the SDK constructor,
    // which runs before the map is touched, so the state is still consistent.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("translator cache lock poisoned by a panicking translator constructor; recovering");
            self.state.clear_poison();
            PoisonError::into_inner(poisoned)
        })
    }

    /// Returns the translator for `pair`, constructing it on a miss.
    ///
    /// A hit marks the entry most recently used. A miss inserts the new
    /// translator as most recently used and then evicts from the least
    /// recently used end until the cache is back within capacity. Evicted
    /// handles are dropped before this returns.
    pub fn get_or_create(&self, pair: &LanguagePair) -> Arc<TranslatorHandle> {
        let mut evicted = Vec::new();
        let handle = {
            let mut state = self.lock();

            if let Some(index) = state.entries.get_index_of(pair) {
                let last = state.entries.len() - 1;
                state.entries.move_index(index, last);
                state.stats.hits += 1;
                let handle = Arc::clone(&state.entries[last]);
                debug!(%pair, id = handle.id(), "translator cache hit");
                return handle;
            }

            state.stats.misses += 1;
            let handle = Arc::new(TranslatorHandle::new(self.sdk.create_translator(pair)));
            debug!(%pair, id = handle.id(), "translator cache miss, created translator");
            state.entries.insert(pair.clone(), Arc::clone(&handle));

            while state.entries.len() > self.capacity {
                if let Some((evicted_pair, entry)) = state.entries.shift_remove_index(0) {
                    state.stats.evictions += 1;
                    info!(pair = %evicted_pair, id = entry.id(), "evicting least recently used translator");
                    evicted.push(entry);
                }
            }
            handle
        };

        drop(evicted);
        handle
    }

    /// Removes every translator whose pair involves `language`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_language(&self, language: &str) -> usize {
        let removed: Vec<_> = {
            let mut state = self.lock();
            let stale: Vec<LanguagePair> = state
                .entries
                .keys()
                .filter(|pair| pair.involves(language))
                .cloned()
                .collect();
            let removed = stale
                .iter()
                .filter_map(|pair| state.entries.shift_remove(pair))
                .collect();
            removed
        };

        let count = removed.len();
        drop(removed);
        if count > 0 {
            info!(language, removed = count, "invalidated cached translators");
        }
        count
    }

    /// Removes and releases every resident translator.
    ///
    /// Returns the number of entries removed.
    pub fn evict_all(&self) -> usize {
        let drained: Vec<_> = {
            let mut state = self.lock();
            let drained = state.entries.drain(..).collect();
            drained
        };
        let count = drained.len();
        drop(drained);
        if count > 0 {
            info!(count, "evicted all cached translators");
        }
        count
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks residency without touching recency.
    pub fn contains(&self, pair: &LanguagePair) -> bool {
        self.lock().entries.contains_key(pair)
    }

    /// Resident pairs from least to most recently used.
    pub fn pairs(&self) -> Vec<LanguagePair> {
        self.lock().entries.keys().cloned().collect()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }
}
