//! Stats cache behavior under concurrency, invalidation, and refresh.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use vitrine_storage::{
    CacheStatus, DatasetStore, InMemoryDatasetStore, InvalidationSource, StatsCache,
};
use vitrine_test_utils::assertions::assert_summary_matches;
use vitrine_test_utils::fixtures::{numbered_items, sample_items};
use vitrine_test_utils::StorageError;

fn setup(items: Vec<vitrine_test_utils::Item>) -> (Arc<InMemoryDatasetStore>, Arc<StatsCache>) {
    let store = Arc::new(InMemoryDatasetStore::new(items));
    let cache = Arc::new(StatsCache::new(
        Arc::clone(&store) as Arc<dyn DatasetStore>
    ));
    (store, cache)
}

#[tokio::test]
async fn test_hit_after_recompute_returns_identical_data() {
    let (_, cache) = setup(sample_items());
    let miss = cache.read().await.unwrap();
    let hit = cache.read().await.unwrap();

    assert_eq!(miss.status(), CacheStatus::Miss);
    assert_eq!(hit.status(), CacheStatus::Hit);
    assert!(Arc::ptr_eq(miss.value(), hit.value()));
    assert_summary_matches(hit.value(), &sample_items());
}

#[tokio::test]
async fn test_equal_modification_time_is_hit() {
    let (store, cache) = setup(sample_items());
    cache.read().await.unwrap();

    let recorded = cache.last_modified().unwrap();
    store.set_modification_time(Some(recorded)).unwrap();
    assert!(cache.read().await.unwrap().was_cache_hit());

    store
        .set_modification_time(Some(recorded + chrono::Duration::milliseconds(1)))
        .unwrap();
    assert!(cache.read().await.unwrap().was_cache_miss());
}

#[tokio::test]
async fn test_concurrent_reads_after_invalidate_compute_once() {
    let (store, cache) = setup(numbered_items(50));
    cache.read().await.unwrap();
    store.set_read_delay(Some(Duration::from_millis(50))).unwrap();
    cache.invalidate(InvalidationSource::Manual).unwrap();
    let reads_before = store.read_count();

    let (a, b) = tokio::join!(cache.read(), cache.read());
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.status(), CacheStatus::Miss);
    assert_eq!(b.status(), CacheStatus::Miss);
    assert_eq!(a.value(), b.value());
    assert_eq!(store.read_count() - reads_before, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_readers_share_one_computation() {
    let (store, cache) = setup(numbered_items(10));
    store.set_read_delay(Some(Duration::from_millis(100))).unwrap();

    let reads = join_all((0..16).map(|_| {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move { cache.read().await })
    }))
    .await;

    for read in reads {
        let read = read.unwrap().unwrap();
        assert_eq!(read.value().total, 10);
    }
    assert_eq!(store.read_count(), 1);
    assert_eq!(cache.stats().recomputations, 1);
}

#[tokio::test]
async fn test_refresh_recomputes_even_when_valid() {
    let (store, cache) = setup(sample_items());
    cache.read().await.unwrap();
    assert!(cache.read().await.unwrap().was_cache_hit());

    // Change the data without moving the modification time: only a forced
    // refresh can observe it.
    store.replace_items_silently(numbered_items(3)).unwrap();
    assert_eq!(cache.read().await.unwrap().value().total, 5);

    let refreshed = cache.refresh().await.unwrap();
    assert_eq!(refreshed.total, 3);
    assert_eq!(store.read_count(), 2);
    assert!(cache.read().await.unwrap().was_cache_hit());
}

#[tokio::test]
async fn test_invalidation_during_recompute_discards_store() {
    let (store, cache) = setup(sample_items());
    store.set_read_delay(Some(Duration::from_millis(100))).unwrap();

    let reader = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move { cache.read().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(cache.is_computing());
    cache.invalidate(InvalidationSource::FileChange).unwrap();

    let read = reader.await.unwrap().unwrap();
    assert!(read.was_cache_miss());
    assert!(cache.peek().is_none());
    assert_eq!(cache.stats().discarded_stores, 1);

    store.set_read_delay(None).unwrap();
    assert!(cache.read().await.unwrap().was_cache_miss());
    assert!(cache.peek().is_some());
}

#[tokio::test]
async fn test_cancelled_recompute_releases_flight() {
    let (store, cache) = setup(sample_items());
    store.set_read_delay(Some(Duration::from_secs(5))).unwrap();

    let timed_out = tokio::time::timeout(Duration::from_millis(20), cache.read()).await;
    assert!(timed_out.is_err());
    assert!(!cache.is_computing());

    store.set_read_delay(None).unwrap();
    assert!(cache.read().await.unwrap().was_cache_miss());
}

#[tokio::test]
async fn test_waiter_retries_after_leader_failure() {
    let (store, cache) = setup(sample_items());
    store
        .fail_reads(Some(StorageError::Parse {
            reason: "bad json".to_string(),
        }))
        .unwrap();

    let err = cache.read().await.unwrap_err();
    assert!(matches!(err, StorageError::Parse { .. }));
    assert!(cache.peek().is_none());

    store.fail_reads(None).unwrap();
    let read = cache.read().await.unwrap();
    assert!(read.was_cache_miss());
    assert_eq!(cache.stats().failures, 1);
    assert_eq!(cache.stats().recomputations, 2);
}

#[tokio::test]
async fn test_refresh_propagates_failure() {
    let (store, cache) = setup(sample_items());
    cache.read().await.unwrap();
    store
        .fail_reads(Some(StorageError::DatasetMissing {
            path: "items.json".into(),
        }))
        .unwrap();

    assert!(cache.refresh().await.is_err());
    assert!(cache.peek().is_none());
    assert!(!cache.is_computing());
}

#[tokio::test]
async fn test_counters_track_hits_and_misses() {
    let (_, cache) = setup(sample_items());
    for _ in 0..4 {
        cache.read().await.unwrap();
    }
    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 3);
    assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
}
