use std::sync::Arc;

use ni_core::{ArticleRecord, DocumentStore, Embedder, Error, IndexDocument, Result};
use ni_index::{IndexWriter, WriteOutcome};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, info, warn};

use crate::config::{CrawlConfig, Section};
use crate::extract;
use crate::listing;

/// What happened to one discovered link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleOutcome {
    Indexed(usize),
    AlreadyPresent,
    NotArticle,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CrawlSummary {
    pub sections_crawled: usize,
    pub sections_failed: usize,
    pub articles_indexed: usize,
    pub documents_indexed: usize,
    pub duplicates: usize,
    pub non_articles: usize,
    pub links_skipped: usize,
    pub failures: usize,
}

/// Walks configured sections and drives fetch, extract, embed and
/// dedup+write for every in-section link. One article is in flight at a
/// time; the politeness delay and the dedup check-then-write sequence
/// both rely on that.
pub struct Crawler {
    http: reqwest::Client,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn DocumentStore>,
    writer: IndexWriter,
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(
        config: CrawlConfig,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::Config(format!("bad user agent: {}", e)))?,
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            embedder,
            store: store.clone(),
            writer: IndexWriter::new(store),
            config,
        })
    }

    /// Crawl every configured section. A failed section is logged and
    /// never stops the others.
    pub async fn run(&self) -> CrawlSummary {
        let mut summary = CrawlSummary::default();
        for section in &self.config.sections {
            match self.crawl_section(section, &mut summary).await {
                Ok(()) => summary.sections_crawled += 1,
                Err(e) => {
                    summary.sections_failed += 1;
                    warn!(section = %section.name, url = %section.url, error = %e, "section crawl failed");
                }
            }
        }
        info!(
            sections = summary.sections_crawled,
            articles = summary.articles_indexed,
            documents = summary.documents_indexed,
            duplicates = summary.duplicates,
            failures = summary.failures,
            "crawl finished"
        );
        summary
    }

    async fn crawl_section(&self, section: &Section, summary: &mut CrawlSummary) -> Result<()> {
        info!(section = %section.name, url = %section.url, "crawling section");
        let html = self.fetch(&section.url).await?;

        let links = listing::discover_links(&html, &section.url);
        if links.is_empty() {
            info!(section = %section.name, "no article links found");
            return Ok(());
        }

        for link in links {
            if !listing::matches_section(&section.url, &link) {
                debug!(section = %section.name, url = %link, "link outside section, skipped");
                summary.links_skipped += 1;
                continue;
            }

            match self.ingest_article(section, &link).await {
                Ok(ArticleOutcome::Indexed(documents)) => {
                    summary.articles_indexed += 1;
                    summary.documents_indexed += documents;
                }
                Ok(ArticleOutcome::AlreadyPresent) => {
                    summary.duplicates += 1;
                    info!(url = %link, "article already present");
                }
                Ok(ArticleOutcome::NotArticle) => {
                    summary.non_articles += 1;
                    debug!(url = %link, "not an article, skipped");
                }
                Err(e) => {
                    // Log with the URL so the link can be re-ingested later.
                    summary.failures += 1;
                    warn!(url = %link, error = %e, "article ingestion failed");
                }
            }

            tokio::time::sleep(self.config.article_delay()).await;
        }

        Ok(())
    }

    /// Fetch, extract, embed and index one article URL.
    pub async fn ingest_article(&self, section: &Section, url: &str) -> Result<ArticleOutcome> {
        if self.store.exists(url).await? {
            return Ok(ArticleOutcome::AlreadyPresent);
        }

        let html = self.fetch(url).await?;
        let Some(extracted) = extract::extract_article(&html)? else {
            return Ok(ArticleOutcome::NotArticle);
        };

        let record = extracted.into_record(&section.name, url);
        let documents = self.build_documents(&record).await?;

        match self.writer.write(&record, &documents).await? {
            WriteOutcome::Indexed(written) => Ok(ArticleOutcome::Indexed(written)),
            WriteOutcome::AlreadyPresent => Ok(ArticleOutcome::AlreadyPresent),
        }
    }

    /// One document per non-empty text unit, in canonical write order.
    pub async fn build_documents(&self, record: &ArticleRecord) -> Result<Vec<IndexDocument>> {
        let units = record.text_units();
        let mut documents = Vec::with_capacity(units.len());
        for (kind, text) in units {
            let embedding = self.embedder.embed(text).await?;
            documents.push(IndexDocument {
                metadata: record.metadata(kind),
                text: text.to_string(),
                embedding,
            });
        }
        Ok(documents)
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}
