mod common;

use std::sync::Arc;

use common::MockSdk;
use offline_translator_core::{CacheStats, LanguagePair, TranslatorCache};

fn pair(source: &str, target: &str) -> LanguagePair {
    LanguagePair::new(source, target)
}

#[test]
fn test_same_pair_returns_same_handle() {
    let sdk = MockSdk::new();
    let cache = TranslatorCache::new(sdk.clone(), 3);

    let first = cache.get_or_create(&pair("en", "fr"));
    let second = cache.get_or_create(&pair("en", "fr"));

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.id(), second.id());
    assert_eq!(sdk.created(), 1);
}

#[test]
fn test_pairs_are_ordered() {
    let sdk = MockSdk::new();
    let cache = TranslatorCache::new(sdk.clone(), 3);

    let forward = cache.get_or_create(&pair("en", "fr"));
    let backward = cache.get_or_create(&pair("fr", "en"));

    assert!(!Arc::ptr_eq(&forward, &backward));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_fourth_pair_evicts_least_recently_used() {
    let sdk = MockSdk::new();
    let cache = TranslatorCache::new(sdk.clone(), 3);

    for target in ["fr", "de", "es"] {
        cache.get_or_create(&pair("en", target));
    }
    assert!(sdk.closed().is_empty());

    cache.get_or_create(&pair("en", "it"));

    assert_eq!(sdk.closed(), vec![pair("en", "fr")]);
    assert!(!cache.contains(&pair("en", "fr")));
    assert_eq!(
        cache.pairs(),
        vec![pair("en", "de"), pair("en", "es"), pair("en", "it")]
    );
    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 0,
            misses: 4,
            evictions: 1
        }
    );
}

#[test]
fn test_hit_protects_entry_from_eviction() {
    let sdk = MockSdk::new();
    let cache = TranslatorCache::new(sdk.clone(), 3);

    for target in ["fr", "de", "es"] {
        cache.get_or_create(&pair("en", target));
    }
    cache.get_or_create(&pair("en", "fr"));
    cache.get_or_create(&pair("en", "it"));

    assert_eq!(sdk.closed(), vec![pair("en", "de")]);
    assert!(cache.contains(&pair("en", "fr")));
}

#[test]
fn test_evicted_handle_stays_alive_while_held() {
    let sdk = MockSdk::new();
    let cache = TranslatorCache::new(sdk.clone(), 1);

    let in_flight = cache.get_or_create(&pair("en", "fr"));
    cache.get_or_create(&pair("en", "de"));

    assert!(!cache.contains(&pair("en", "fr")));
    assert!(sdk.closed().is_empty());
    assert_eq!(in_flight.pair(), &pair("en", "fr"));

    drop(in_flight);
    assert_eq!(sdk.closed(), vec![pair("en", "fr")]);
}

#[test]
fn test_evict_all() {
    let sdk = MockSdk::new();
    let cache = TranslatorCache::new(sdk.clone(), 3);

    cache.get_or_create(&pair("en", "fr"));
    cache.get_or_create(&pair("en", "de"));

    assert_eq!(cache.evict_all(), 2);
    assert!(cache.is_empty());
    assert_eq!(sdk.closed().len(), 2);
    assert_eq!(cache.evict_all(), 0);
}

#[test]
fn test_invalidate_language_matches_source_and_target() {
    let sdk = MockSdk::new();
    let cache = TranslatorCache::new(sdk.clone(), 3);

    cache.get_or_create(&pair("en", "fr"));
    cache.get_or_create(&pair("fr", "de"));
    cache.get_or_create(&pair("en", "de"));

    assert_eq!(cache.invalidate_language("fr"), 2);
    assert_eq!(cache.pairs(), vec![pair("en", "de")]);
    assert_eq!(cache.invalidate_language("it"), 0);
}

#[test]
fn test_concurrent_get_or_create_constructs_once() {
    let sdk = MockSdk::new();
    let cache = TranslatorCache::new(sdk.clone(), 3);

    let handles: Vec<_> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| cache.get_or_create(&pair("en", "fr"))))
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    assert_eq!(sdk.created(), 1);
    assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));
}

#[test]
fn test_panicking_constructor_leaves_cache_usable() {
    let sdk = MockSdk::new();
    let cache = TranslatorCache::new(sdk.clone(), 3);
    let resident = cache.get_or_create(&pair("en", "fr"));

    sdk.panic_on_create(pair("en", "xx"));
    let crashed = std::thread::scope(|scope| {
        scope
            .spawn(|| cache.get_or_create(&pair("en", "xx")))
            .join()
    });
    assert!(crashed.is_err());

    assert_eq!(cache.len(), 1);
    assert!(cache.contains(&pair("en", "fr")));
    assert!(Arc::ptr_eq(&cache.get_or_create(&pair("en", "fr")), &resident));

    cache.get_or_create(&pair("en", "de"));
    assert_eq!(cache.pairs(), vec![pair("en", "fr"), pair("en", "de")]);
    assert_eq!(sdk.created(), 2);
}
