use std::path::Path;
use std::time::Duration;

use ni_core::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// One category to crawl: a name and the listing page URL. The listing
/// URL doubles as the prefix a discovered link must carry to belong to
/// the section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    pub sections: Vec<Section>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Politeness delay between article fetches against the origin.
    #[serde(default = "default_article_delay_ms")]
    pub article_delay_ms: u64,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_article_delay_ms() -> u64 {
    1000
}

impl CrawlConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration problems are the only startup-fatal error class.
    pub fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            return Err(Error::Config("no sections configured".to_string()));
        }
        for section in &self.sections {
            Url::parse(&section.url).map_err(|e| {
                Error::Config(format!("section {}: bad url {}: {}", section.name, section.url, e))
            })?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn article_delay(&self) -> Duration {
        Duration::from_millis(self.article_delay_ms)
    }
}
