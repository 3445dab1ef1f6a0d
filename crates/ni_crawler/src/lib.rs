pub mod config;
pub mod extract;
pub mod jsonld;
pub mod listing;
pub mod pipeline;

pub use config::{CrawlConfig, Section};
pub use extract::{extract_article, ExtractedArticle};
pub use pipeline::{ArticleOutcome, CrawlSummary, Crawler};

pub mod prelude {
    pub use super::config::{CrawlConfig, Section};
    pub use super::pipeline::{ArticleOutcome, CrawlSummary, Crawler};
    pub use ni_core::{ArticleRecord, Error, Result};
}
