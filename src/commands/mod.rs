pub mod crawl;
pub mod inspect;
pub mod merge;

// Re-export command functions for convenience
pub use crawl::{crawl, CrawlParams};
pub use inspect::{classify, editions, urls};
pub use merge::merge;
