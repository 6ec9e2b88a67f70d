//! Unit tests for the signal computation cache

use chrono::{Days, NaiveDate};
use stockpilot::models::{PriceBar, Signal, SignalLevels};
use stockpilot::signals::{CacheKey, SignalCache, SignalSnapshot};

fn snapshot() -> SignalSnapshot {
    let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    SignalSnapshot {
        levels: SignalLevels {
            latest_price: 100.0,
            best_entry: 100.0,
            target: 110.0,
            stop_loss: 95.0,
            signal: Signal::Buy,
        },
        series: vec![PriceBar::new(date, 100.0)],
    }
}

#[tokio::test]
async fn hit_requires_identical_key() {
    let cache = SignalCache::new();
    let as_of = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    cache
        .insert(CacheKey::new("AAPL", 20, as_of), snapshot())
        .await;

    assert!(cache.get(&CacheKey::new("AAPL", 20, as_of)).await.is_some());
    assert!(cache.get(&CacheKey::new("MSFT", 20, as_of)).await.is_none());
    assert!(cache.get(&CacheKey::new("AAPL", 50, as_of)).await.is_none());
    assert!(cache
        .get(&CacheKey::new("AAPL", 20, as_of + Days::new(1)))
        .await
        .is_none());
}

#[tokio::test]
async fn ticker_case_does_not_split_the_key() {
    let cache = SignalCache::new();
    let as_of = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    cache
        .insert(CacheKey::new("aapl", 20, as_of), snapshot())
        .await;

    assert!(cache.get(&CacheKey::new("AAPL", 20, as_of)).await.is_some());
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn earlier_trading_days_are_evicted_on_insert() {
    let cache = SignalCache::new();
    let day_one = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    cache.insert(CacheKey::new("AAPL", 20, day_one), snapshot()).await;
    cache.insert(CacheKey::new("MSFT", 20, day_one), snapshot()).await;

    let day_two = day_one + Days::new(1);
    cache.insert(CacheKey::new("AAPL", 20, day_two), snapshot()).await;

    assert!(cache.get(&CacheKey::new("AAPL", 20, day_one)).await.is_none());
    assert!(cache.get(&CacheKey::new("MSFT", 20, day_one)).await.is_none());
    assert!(cache.get(&CacheKey::new("AAPL", 20, day_two)).await.is_some());
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn cache_does_not_grow_across_trading_days() {
    // A long-lived process inserting one snapshot per day for a single
    // (ticker, window) holds only the current day's entry.
    let cache = SignalCache::new();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for day in 0..365 {
        let key = CacheKey::new("AAPL", 20, start + Days::new(day));
        cache.insert(key, snapshot()).await;
    }

    assert_eq!(cache.len().await, 1);
    assert!(cache
        .get(&CacheKey::new("AAPL", 20, start + Days::new(364)))
        .await
        .is_some());
}

#[tokio::test]
async fn insert_replaces_existing_snapshot() {
    let cache = SignalCache::new();
    let as_of = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    let key = CacheKey::new("AAPL", 20, as_of);

    cache.insert(key.clone(), snapshot()).await;
    let mut updated = snapshot();
    updated.levels.latest_price = 120.0;
    cache.insert(key.clone(), updated.clone()).await;

    assert_eq!(cache.get(&key).await, Some(updated));
    assert_eq!(cache.len().await, 1);
}
