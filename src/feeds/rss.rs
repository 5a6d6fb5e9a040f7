use crate::error::{PipelineError, Result};
use crate::feeds::traits::FeedSource;
use crate::models::ListingItem;
use anyhow::Context;
use async_trait::async_trait;
use feed_rs::model::Entry;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, info, warn};

/// RSS/Atom feed source over HTTP
pub struct RssFeedSource {
    client: Client,
}

impl RssFeedSource {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    async fn fetch(&self, url: &str) -> Result<Vec<ListingItem>> {
        debug!("Fetching feed: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::fetch(url, e))?;

        if !response.status().is_success() {
            warn!("Feed returned status: {}", response.status());
            return Err(PipelineError::fetch(
                url,
                format!("unexpected status {}", response.status()),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PipelineError::fetch(url, e))?;

        debug!("Downloaded {} bytes of feed", body.len());

        let items = parse_feed(url, &body)?;
        info!(feed = %url, items = items.len(), "Parsed feed");
        Ok(items)
    }

    fn source_name(&self) -> &'static str {
        "RSS"
    }
}

/// Parse an RSS/Atom document into listing items, preserving entry order
pub fn parse_feed(url: &str, body: &[u8]) -> Result<Vec<ListingItem>> {
    let feed = feed_rs::parser::parse(body).map_err(|e| PipelineError::fetch(url, e))?;
    Ok(feed.entries.into_iter().map(entry_to_item).collect())
}

fn entry_to_item(entry: Entry) -> ListingItem {
    let description = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body))
        .unwrap_or_default();

    ListingItem {
        title: entry.title.map(|t| t.content).unwrap_or_default(),
        link: entry
            .links
            .into_iter()
            .next()
            .map(|l| l.href)
            .unwrap_or_default(),
        description: html_to_text(&description),
        published: entry.published.or(entry.updated),
    }
}

fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
