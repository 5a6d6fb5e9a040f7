use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::pipeline::ErrorPolicy;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_MAX_CONCURRENCY: usize = 20;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-5-mini";

/// Feeds crawled when `FEED_URLS` is not set
pub const DEFAULT_FEED_URLS: [&str; 3] = [
    "https://suumo.jp/jj/bukken/ichiran/JJ012FC001/?ar=040&bs=020&ekTjCd=&ekTjNm=&hb=0&ht=9999999&kb=1&km=1&kt=9999999&sc=20217&ta=20&tb=0&tj=0&tt=9999999&rssFlg=1",
    "https://suumo.jp/jj/bukken/ichiran/JJ012FC001/?ar=040&bs=021&cn=9999999&cnb=0&ekTjCd=&ekTjNm=&hb=0&ht=9999999&kb=1&kt=9999999&sc=20217&ta=20&tb=0&tj=0&tt=9999999&rssFlg=1",
    "https://suumo.jp/jj/bukken/ichiran/JJ012FC001/?ar=040&bs=030&ekTjCd=&ekTjNm=&kb=1&kj=9&km=1&kt=9999999&sc=20217&ta=20&tb=0&tj=0&tt=9999999&rssFlg=1",
];

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub feed_urls: Vec<String>,
    pub batch_size: usize,
    pub max_concurrency: usize,
    pub error_policy: ErrorPolicy,
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let config = Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
            port: parse_var("PORT", 8080)?,
            openai_api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            feed_urls: env::var("FEED_URLS")
                .map(|raw| split_feed_urls(&raw))
                .unwrap_or_else(|_| DEFAULT_FEED_URLS.iter().map(|s| s.to_string()).collect()),
            batch_size: parse_var("CRAWL_BATCH_SIZE", DEFAULT_BATCH_SIZE)?,
            max_concurrency: parse_var("CRAWL_MAX_CONCURRENCY", DEFAULT_MAX_CONCURRENCY)?,
            error_policy: parse_var("CRAWL_ERROR_POLICY", ErrorPolicy::BestEffort)?,
            http_timeout: Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS", 120)?),
        };

        if config.batch_size == 0 {
            bail!("CRAWL_BATCH_SIZE must be greater than zero");
        }
        if config.max_concurrency == 0 {
            bail!("CRAWL_MAX_CONCURRENCY must be greater than zero");
        }

        Ok(config)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} is invalid: {}", name, e)),
        Err(_) => Ok(default),
    }
}

fn split_feed_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
