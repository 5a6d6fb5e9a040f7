mod crawl;
mod health;
mod util;

pub use crawl::{crawl, sample_feed};
pub use health::{health, hello};
pub use util::new_id;
