pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    CrawlOverrides, is_yes, parse_absent_container, prune_from_flags, read_answer,
    resolve_profile_url,
};

// Re-export crawl functionality from friendmap-core
pub use friendmap_core::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl, normalize_profile_url};
