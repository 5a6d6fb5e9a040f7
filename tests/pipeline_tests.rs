mod common;

use common::*;
use estate_tracker::models::ListingType;
use estate_tracker::pipeline::{ConcurrencyLimiter, Crawler, ErrorPolicy};
use estate_tracker::storage::InMemoryEstateStore;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn crawler(
    feeds: StaticFeeds,
    extractor: Arc<EchoExtractor>,
    store: Arc<InMemoryEstateStore>,
    capacity: usize,
) -> Crawler {
    Crawler::new(
        Arc::new(feeds),
        extractor,
        store,
        ConcurrencyLimiter::new(capacity, CancellationToken::new()),
    )
    .with_batch_size(10)
}

#[tokio::test]
async fn test_crawl_stores_every_listing() {
    let store = Arc::new(InMemoryEstateStore::new());
    let extractor = Arc::new(EchoExtractor::new(29_800_000));
    let feeds = StaticFeeds::default()
        .with(HOUSE_FEED, listings("https://suumo.jp/chukoikkodate", 23))
        .with(LAND_FEED, listings("https://suumo.jp/tochi", 4));
    let crawler = crawler(feeds, extractor.clone(), store.clone(), 20);

    let report = crawler
        .crawl_all(&[HOUSE_FEED.to_string(), LAND_FEED.to_string()])
        .await;

    assert!(report.is_clean());
    assert_eq!(report.records(), 27);
    assert_eq!(report.feeds[0].batches, 3);
    assert_eq!(report.feeds[1].batches, 1);
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 4);
    assert_eq!(store.len(), 27);

    let house = store.get("https://suumo.jp/chukoikkodate/nc_22/").unwrap();
    assert_eq!(house.estate_type, ListingType::UsedHouse);
    let land = store.get("https://suumo.jp/tochi/nc_0/").unwrap();
    assert_eq!(land.estate_type, ListingType::Land);
    assert_eq!(land.first_appeared, land.updated_at);
}

#[tokio::test]
async fn test_one_failed_batch_does_not_stop_the_others() {
    let store = Arc::new(InMemoryEstateStore::new());
    let mut items = listings("https://suumo.jp/chukoikkodate", 30);
    items[15] = listing("https://suumo.jp/fail/nc_15/");
    let feeds = StaticFeeds::default().with(HOUSE_FEED, items);
    let crawler = crawler(feeds, Arc::new(EchoExtractor::new(1)), store.clone(), 2)
        .with_error_policy(ErrorPolicy::Collect);

    let report = crawler.crawl_all(&[HOUSE_FEED.to_string()]).await;

    assert_eq!(store.len(), 20);
    assert!(store.get("https://suumo.jp/chukoikkodate/nc_14/").is_none());
    assert!(store.get("https://suumo.jp/chukoikkodate/nc_29/").is_some());
    assert_eq!(report.feeds[0].completed, 2);
    assert_eq!(report.feeds[0].failed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, "extraction");
    assert_eq!(report.failures[0].batch, Some(1));
}

#[tokio::test]
async fn test_undecodable_payload_drops_only_its_batch() {
    let store = Arc::new(InMemoryEstateStore::new());
    let mut items = listings("https://suumo.jp/tochi", 12);
    items[0] = listing("https://suumo.jp/garbled/nc_0/");
    let feeds = StaticFeeds::default().with(LAND_FEED, items);
    let crawler = crawler(feeds, Arc::new(EchoExtractor::new(1)), store.clone(), 4)
        .with_error_policy(ErrorPolicy::Collect);

    let report = crawler.crawl_all(&[LAND_FEED.to_string()]).await;

    assert_eq!(store.len(), 2);
    assert_eq!(report.failures[0].stage, "decode");
}

#[tokio::test]
async fn test_unreachable_feed_is_skipped() {
    let store = Arc::new(InMemoryEstateStore::new());
    let feeds = StaticFeeds::default()
        .with(LAND_FEED, listings("https://suumo.jp/tochi", 5))
        .with(HOUSE_FEED, Vec::new());
    let crawler = crawler(feeds, Arc::new(EchoExtractor::new(1)), store.clone(), 4);

    let report = crawler
        .crawl_all(&[
            DEAD_FEED.to_string(),
            HOUSE_FEED.to_string(),
            LAND_FEED.to_string(),
        ])
        .await;

    assert_eq!(report.feeds.len(), 3);
    assert!(!report.feeds[0].fetched);
    assert_eq!(report.feeds[1].batches, 0);
    assert_eq!(report.feeds[2].records, 5);
    assert_eq!(store.len(), 5);
    // best effort: counted, not collected
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_recrawl_keeps_first_appearance() {
    let store = Arc::new(InMemoryEstateStore::new());
    let feeds = || StaticFeeds::default().with(HOUSE_FEED, listings("https://suumo.jp/chukoikkodate", 3));

    crawler(feeds(), Arc::new(EchoExtractor::new(30_000_000)), store.clone(), 4)
        .crawl_all(&[HOUSE_FEED.to_string()])
        .await;
    let first = store.get("https://suumo.jp/chukoikkodate/nc_1/").unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    crawler(feeds(), Arc::new(EchoExtractor::new(27_500_000)), store.clone(), 4)
        .crawl_all(&[HOUSE_FEED.to_string()])
        .await;
    let second = store.get("https://suumo.jp/chukoikkodate/nc_1/").unwrap();

    assert_eq!(store.len(), 3);
    assert_eq!(second.value, 27_500_000);
    assert_eq!(second.id, first.id);
    assert_eq!(second.first_appeared, first.first_appeared);
    assert_eq!(second.created_date, first.created_date);
    assert!(second.last_appeared > first.last_appeared);
    assert!(second.updated_at > first.updated_at);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancellation_skips_pending_batches() {
    let store = Arc::new(InMemoryEstateStore::new());
    let cancel = CancellationToken::new();
    let feeds = StaticFeeds::default().with(HOUSE_FEED, listings("https://suumo.jp/chukoikkodate", 50));
    let crawler = Arc::new(
        Crawler::new(
            Arc::new(feeds),
            Arc::new(EchoExtractor::new(1).with_delay(Duration::from_millis(100))),
            store.clone(),
            ConcurrencyLimiter::new(1, cancel.clone()),
        )
        .with_batch_size(10),
    );

    let run = {
        let crawler = Arc::clone(&crawler);
        tokio::spawn(async move { crawler.crawl_all(&[HOUSE_FEED.to_string()]).await })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;
    cancel.cancel();
    let report = run.await.unwrap();

    let feed = &report.feeds[0];
    assert_eq!(feed.completed, 1);
    assert_eq!(feed.skipped, 4);
    assert_eq!(store.len(), 10);
}

#[tokio::test]
async fn test_dropped_crawl_lets_running_batches_finish() {
    let store = Arc::new(InMemoryEstateStore::new());
    let extractor = Arc::new(EchoExtractor::new(1).with_delay(Duration::from_millis(200)));
    let feeds = StaticFeeds::default().with(HOUSE_FEED, listings("https://suumo.jp/chukoikkodate", 20));
    let crawler = crawler(feeds, extractor.clone(), store.clone(), 20);

    let dropped = tokio::time::timeout(
        Duration::from_millis(50),
        crawler.crawl_all(&[HOUSE_FEED.to_string()]),
    )
    .await;
    assert!(dropped.is_err());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.len(), 20);
}
