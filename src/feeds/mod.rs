pub mod rss;
pub mod traits;

pub use rss::RssFeedSource;
pub use traits::FeedSource;
