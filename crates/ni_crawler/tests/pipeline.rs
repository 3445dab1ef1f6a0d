use std::sync::Arc;

use httpmock::prelude::*;
use ni_core::DocumentKind;
use ni_crawler::{CrawlConfig, Crawler, Section};
use ni_embed::DummyEmbedder;
use ni_index::MemoryStore;

const ARTICLE_HTML: &str = r#"
    <html><body>
    <main>
        <h1>Superavit fiscale nel primo trimestre</h1>
        <span class="writer">Mario Rossi</span>
        <p class="summary-art">Il governo annuncia i conti.</p>
        <p class="is-last-update" datetime="2024-12-18T10:30:00+01:00">18 dicembre</p>
        <div class="content" id="c1">Primo blocco.</div>
        <div class="content" id="c2">Secondo blocco.</div>
        <div class="content" id="c3">Terzo blocco.</div>
    </main>
    </body></html>
"#;

const NON_ARTICLE_HTML: &str = "<html><body><div>solo un teaser</div></body></html>";

fn listing_html(server: &MockServer) -> String {
    format!(
        r#"
        <html><body>
        <section class="body-hp">
            <div class="media-news__content">
                <a href="{art}">Uno</a>
                <a href="{non_article}">Due</a>
            </div>
            <div class="media-news__content">
                <a href="{missing}">Tre</a>
                <a href="https://ads.example/x">Pubblicita</a>
            </div>
        </section>
        </body></html>
        "#,
        art = server.url("/politica/art1"),
        non_article = server.url("/politica/nonarticle"),
        missing = server.url("/politica/missing"),
    )
}

fn config(server: &MockServer) -> CrawlConfig {
    serde_json::from_value(serde_json::json!({
        "sections": [{"name": "politica", "url": server.url("/politica")}],
        "article_delay_ms": 0,
    }))
    .unwrap()
}

async fn mock_site(server: &MockServer) {
    let listing = listing_html(server);
    server
        .mock_async(|when, then| {
            when.method(GET).path("/politica");
            then.status(200).body(&listing);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/politica/art1");
            then.status(200).body(ARTICLE_HTML);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/politica/nonarticle");
            then.status(200).body(NON_ARTICLE_HTML);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/politica/missing");
            then.status(404);
        })
        .await;
}

#[tokio::test]
async fn test_crawl_section_end_to_end() {
    let server = MockServer::start_async().await;
    mock_site(&server).await;

    let store = Arc::new(MemoryStore::new());
    let crawler = Crawler::new(
        config(&server),
        Arc::new(DummyEmbedder::new()),
        store.clone(),
    )
    .unwrap();

    let summary = crawler.run().await;
    assert_eq!(summary.sections_crawled, 1);
    assert_eq!(summary.articles_indexed, 1);
    assert_eq!(summary.documents_indexed, 5);
    assert_eq!(summary.non_articles, 1);
    assert_eq!(summary.failures, 1);
    assert_eq!(summary.links_skipped, 1);

    // Title + summary + 3 content blocks, one article id across all.
    let documents = store.documents().await;
    assert_eq!(documents.len(), 5);
    let kinds: Vec<_> = documents.iter().map(|d| d.metadata.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DocumentKind::Title,
            DocumentKind::Summary,
            DocumentKind::Content,
            DocumentKind::Content,
            DocumentKind::Content,
        ]
    );
    let first = &documents[0].metadata;
    assert!(documents.iter().all(|d| d.metadata.id == first.id));
    assert!(documents
        .iter()
        .all(|d| d.metadata.url == server.url("/politica/art1")));
    assert!(documents.iter().all(|d| d.metadata.section == "politica"));
    assert_eq!(
        documents[0].metadata.date.as_deref(),
        Some("2024-12-18T10:30:00+0100")
    );
    assert_eq!(documents[0].metadata.author.as_deref(), Some("Mario Rossi"));

    for document in &documents {
        let norm: f32 = document.embedding.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}

#[tokio::test]
async fn test_second_crawl_writes_nothing() {
    let server = MockServer::start_async().await;
    mock_site(&server).await;

    let store = Arc::new(MemoryStore::new());
    let crawler = Crawler::new(
        config(&server),
        Arc::new(DummyEmbedder::new()),
        store.clone(),
    )
    .unwrap();

    let first = crawler.run().await;
    assert_eq!(first.articles_indexed, 1);
    let indexed = store.len().await;

    let second = crawler.run().await;
    assert_eq!(second.articles_indexed, 0);
    assert_eq!(second.duplicates, 1);
    assert_eq!(store.len().await, indexed);
}

#[tokio::test]
async fn test_gone_article_surfaces_transport_error() {
    let server = MockServer::start_async().await;
    mock_site(&server).await;

    let store = Arc::new(MemoryStore::new());
    let crawler = Crawler::new(
        config(&server),
        Arc::new(DummyEmbedder::new()),
        store.clone(),
    )
    .unwrap();

    let section = Section {
        name: "politica".to_string(),
        url: server.url("/politica"),
    };
    let result = crawler
        .ingest_article(&section, &server.url("/politica/missing"))
        .await;
    assert!(matches!(
        result,
        Err(ni_core::Error::Status { status: 404, .. })
    ));
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_listing_failure_aborts_only_that_section() {
    let server = MockServer::start_async().await;
    mock_site(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/esteri");
            then.status(500);
        })
        .await;

    let config: CrawlConfig = serde_json::from_value(serde_json::json!({
        "sections": [
            {"name": "esteri", "url": server.url("/esteri")},
            {"name": "politica", "url": server.url("/politica")},
        ],
        "article_delay_ms": 0,
    }))
    .unwrap();

    let store = Arc::new(MemoryStore::new());
    let crawler = Crawler::new(config, Arc::new(DummyEmbedder::new()), store.clone()).unwrap();

    let summary = crawler.run().await;
    assert_eq!(summary.sections_failed, 1);
    assert_eq!(summary.sections_crawled, 1);
    assert_eq!(summary.articles_indexed, 1);
}
