pub mod crawler;
pub mod document;
pub mod error;
pub mod fetch;
pub mod privacy;
pub mod result;

pub use crawler::{Crawler, ProgressCallback};
pub use document::{DocumentQuery, HtmlDocument, ProfileSummary, Selectors};
pub use error::{FetchError, ScanError};
pub use fetch::{Fetcher, HttpFetcher};
pub use privacy::AbsentContainerPolicy;
pub use result::{ConnectionEntry, CrawlOutcome, CrawlResult, PrivacyState, ProfileRef, RootProfile};
