use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ni_core::{DocumentStore, Embedder, Error, Result};
use ni_crawler::{CrawlConfig, CrawlSummary, Crawler, Section};
use ni_embed::{DummyEmbedder, EmbedConfig, HttpEmbedder};
use ni_index::backends::qdrant::{QdrantConfig, QdrantStore};
use ni_index::MemoryStore;
use tracing::info;

const STORE_INIT_RETRIES: u32 = 3;

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_value = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                match c {
                    's' => total_seconds += num,
                    'm' => total_seconds += num * 60,
                    'h' => total_seconds += num * 3600,
                    'd' => total_seconds += num * 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                }
                current_number.clear();
                has_value = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A trailing number without a unit counts as seconds.
        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds += num;
            has_value = true;
        }

        if !has_value {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Crawl configuration file (sections, user agent, politeness delay).
    #[arg(long, default_value = "sections.json")]
    config: PathBuf,
    #[arg(
        long,
        default_value = "memory",
        help = "Document store backend. Available: memory (default), qdrant"
    )]
    store: String,
    #[arg(
        long,
        default_value = "http",
        help = "Embedding backend. Available: http (default), dummy"
    )]
    embedder: String,
    /// Base URL of the OpenAI-style embedding endpoint.
    #[arg(long)]
    embedder_url: Option<String>,
    #[arg(long, env = "NI_EMBED_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, help = "Embedding model name served by the backend")]
    model: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Crawl every configured section once, or periodically with --interval.
    Crawl {
        /// Repeat forever with this pause between runs (e.g. 1h, 30m, 1h15m30s).
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// Ingest a single article URL under a configured section.
    Url { section: String, url: String },
    /// List the configured sections.
    Sections,
}

async fn create_store(kind: &str) -> Result<Arc<dyn DocumentStore>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "qdrant" => {
            let mut retries = STORE_INIT_RETRIES;
            loop {
                match QdrantStore::new(QdrantConfig::new()).await {
                    Ok(store) => return Ok(Arc::new(store)),
                    Err(e) if retries > 1 => {
                        retries -= 1;
                        info!("Store initialization failed ({}), retrying...", e);
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        other => Err(Error::Config(format!("unknown store backend: {}", other))),
    }
}

fn create_embedder(cli: &Cli) -> Result<Arc<dyn Embedder>> {
    match cli.embedder.as_str() {
        "dummy" => Ok(Arc::new(DummyEmbedder::new())),
        "http" => {
            let mut config = EmbedConfig::default();
            if let Some(url) = &cli.embedder_url {
                config.base_url = url.clone();
            }
            if let Some(model) = &cli.model {
                config.model = model.clone();
            }
            config.api_key = cli.api_key.clone();
            Ok(Arc::new(HttpEmbedder::new(config)))
        }
        other => Err(Error::Config(format!("unknown embedder: {}", other))),
    }
}

fn log_summary(summary: &CrawlSummary) {
    info!(
        "📊 {} sections crawled ({} failed), {} articles / {} documents indexed, {} already present, {} non-articles, {} failures",
        summary.sections_crawled,
        summary.sections_failed,
        summary.articles_indexed,
        summary.documents_indexed,
        summary.duplicates,
        summary.non_articles,
        summary.failures
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
    let cli = Cli::parse();

    let config = CrawlConfig::from_file(&cli.config)?;

    let store = create_store(cli.store.as_str()).await?;
    info!("🏦 Store initialized (using {})", cli.store);

    let embedder = create_embedder(&cli)?;
    info!("🧠 Embedder initialized (using {})", embedder.name());

    let crawler = Crawler::new(config.clone(), embedder, store)?;

    match cli.command {
        Commands::Crawl { interval } => {
            if let Some(interval) = interval {
                info!("Running in periodic mode, {}s interval", interval.0.as_secs());
                loop {
                    let summary = crawler.run().await;
                    log_summary(&summary);
                    info!("Waiting {}s before next crawl", interval.0.as_secs());
                    tokio::time::sleep(interval.0).await;
                }
            } else {
                let summary = crawler.run().await;
                log_summary(&summary);
            }
        }
        Commands::Url { section, url } => {
            let section: &Section = config
                .sections
                .iter()
                .find(|s| s.name == section)
                .ok_or_else(|| Error::Config(format!("unknown section: {}", section)))?;
            let outcome = crawler.ingest_article(section, &url).await?;
            info!("✨ {}: {:?}", url, outcome);
        }
        Commands::Sections => {
            for section in &config.sections {
                println!("{}: {}", section.name, section.url);
            }
        }
    }

    Ok(())
}
