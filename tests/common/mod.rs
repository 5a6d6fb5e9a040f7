#![allow(dead_code)]

use async_trait::async_trait;
use estate_tracker::extraction::{ExtractionClient, ExtractionRequest};
use estate_tracker::feeds::FeedSource;
use estate_tracker::models::{ListingItem, ListingType};
use estate_tracker::{PipelineError, Result};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const HOUSE_FEED: &str = "https://suumo.jp/jj/bukken/ichiran/JJ012FC001/?ar=040&bs=021&rssFlg=1";
pub const LAND_FEED: &str = "https://suumo.jp/jj/bukken/ichiran/JJ012FC001/?ar=040&bs=030&rssFlg=1";
pub const DEAD_FEED: &str = "https://suumo.jp/jj/bukken/ichiran/JJ012FC001/?ar=040&bs=020&rssFlg=1";

pub fn listing(link: impl Into<String>) -> ListingItem {
    ListingItem {
        title: "中古一戸建て".to_string(),
        link: link.into(),
        description: "2980万円 4LDK".to_string(),
        published: None,
    }
}

pub fn listings(prefix: &str, count: usize) -> Vec<ListingItem> {
    (0..count)
        .map(|n| listing(format!("{}/nc_{}/", prefix, n)))
        .collect()
}

/// Feed source serving fixed items per URL; unknown URLs fail to fetch
#[derive(Default)]
pub struct StaticFeeds {
    feeds: HashMap<String, Vec<ListingItem>>,
}

impl StaticFeeds {
    pub fn with(mut self, url: &str, items: Vec<ListingItem>) -> Self {
        self.feeds.insert(url.to_string(), items);
        self
    }
}

#[async_trait]
impl FeedSource for StaticFeeds {
    async fn fetch(&self, url: &str) -> Result<Vec<ListingItem>> {
        self.feeds
            .get(url)
            .cloned()
            .ok_or_else(|| PipelineError::fetch(url, "connection refused"))
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// Items embedded in the instruction of an extraction request
pub fn embedded_items(request: &ExtractionRequest) -> Vec<ListingItem> {
    let content = &request.messages[0].content;
    let start = content.find('[').expect("batch array in instruction");
    serde_json::from_str(&content[start..]).expect("batch json")
}

/// Embedded listing type, read back from the instruction
pub fn embedded_type(request: &ExtractionRequest) -> ListingType {
    let content = &request.messages[0].content;
    ListingType::ALL
        .into_iter()
        .find(|t| content.contains(t.as_str()))
        .expect("listing type in instruction")
}

/// Extraction service echoing one estate per listing.
///
/// Fails batches containing a link with "fail", returns garbage for "garbled".
pub struct EchoExtractor {
    pub price: i64,
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl EchoExtractor {
    pub fn new(price: i64) -> Self {
        Self {
            price,
            delay: Duration::from_millis(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl ExtractionClient for EchoExtractor {
    async fn extract(&self, request: &ExtractionRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        let items = embedded_items(request);
        if items.iter().any(|i| i.link.contains("fail")) {
            return Err(PipelineError::Extraction("timeout".into()));
        }
        if items.iter().any(|i| i.link.contains("garbled")) {
            return Ok("{\"estates\": [{\"url\": 1}]}".to_string());
        }

        let estate_type = embedded_type(request);
        let estates: Vec<_> = items
            .iter()
            .map(|i| {
                json!({
                    "url": i.link,
                    "address": "松本市",
                    "estate_type": estate_type,
                    "value": self.price,
                    "railway": "松本駅",
                    "land_area": 165.2,
                    "building_area": 99.4,
                    "floor_plan": "4LDK",
                    "year_of_construction": 1995
                })
            })
            .collect();
        Ok(json!({ "estates": estates }).to_string())
    }
}
