use chrono::DateTime;
use ni_core::{ArticleRecord, Error, Result};
use scraper::{ElementRef, Html, Selector};
use uuid::Uuid;

use crate::jsonld;

/// Timestamp wire format the index consumers expect: ISO-8601 with offset,
/// no fractional seconds.
pub const DATE_WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Extraction output before the crawl context is known. `section` and
/// `url` are injected by the orchestrator via [`ExtractedArticle::into_record`].
#[derive(Debug, Clone)]
pub struct ExtractedArticle {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub content: Vec<String>,
    pub date: Option<String>,
}

impl ExtractedArticle {
    pub fn into_record(self, section: &str, url: &str) -> ArticleRecord {
        ArticleRecord {
            id: self.id,
            title: Some(self.title),
            author: self.author,
            summary: self.summary,
            content: self.content,
            date: self.date,
            section: section.to_string(),
            url: url.to_string(),
        }
    }
}

/// Parses one fetched article page.
///
/// `Ok(None)` means the page has no primary content region and is not an
/// article (listing pages link to plenty of those). A missing title inside
/// the region is a structural failure: the whole extraction is reported as
/// an error. Author, summary and date degrade to `None` independently.
pub fn extract_article(html: &str) -> Result<Option<ExtractedArticle>> {
    let document = Html::parse_document(html);

    let region_selector = Selector::parse("main").unwrap();
    let Some(region) = document.select(&region_selector).next() else {
        return Ok(None);
    };

    let title = select_text(&region, "h1")
        .ok_or_else(|| Error::Structure("article region has no title".to_string()))?;

    let author = select_text(&region, "span.writer").or_else(|| jsonld::extract_author(&document));
    let summary = select_text(&region, "p.summary-art");

    let content_selector = Selector::parse("div.content[id]").unwrap();
    let content: Vec<String> = region
        .select(&content_selector)
        .map(collect_text)
        .filter(|block| !block.is_empty())
        .collect();

    let date_selector = Selector::parse("p.is-last-update").unwrap();
    let date = region
        .select(&date_selector)
        .next()
        .and_then(|el| el.value().attr("datetime"))
        .and_then(parse_timestamp);

    Ok(Some(ExtractedArticle {
        id: Uuid::new_v4(),
        title,
        author,
        summary,
        content,
        date,
    }))
}

/// Parse a source datetime (RFC 3339, offset required) and re-render into
/// the wire format. Anything unparsable yields `None`, never an error.
pub fn parse_timestamp(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.format(DATE_WIRE_FORMAT).to_string())
}

fn select_text(region: &ElementRef, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    region
        .select(&selector)
        .next()
        .map(|el| collect_text(el))
        .filter(|text| !text.is_empty())
}

fn collect_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_ARTICLE: &str = r#"
        <html><body>
        <main>
            <h1>Superavit fiscale nel primo trimestre</h1>
            <span class="writer">Mario Rossi</span>
            <p class="summary-art">Il governo annuncia i conti.</p>
            <p class="is-last-update" datetime="2024-12-18T10:30:00+01:00">18 dicembre</p>
            <div class="content" id="c1">Primo blocco.</div>
            <div class="content" id="c2">Secondo blocco.</div>
            <div class="content">Senza id, ignorato.</div>
        </main>
        </body></html>
    "#;

    #[test]
    fn test_extract_full_article() {
        let article = extract_article(FULL_ARTICLE).unwrap().unwrap();
        assert_eq!(article.title, "Superavit fiscale nel primo trimestre");
        assert_eq!(article.author.as_deref(), Some("Mario Rossi"));
        assert_eq!(article.summary.as_deref(), Some("Il governo annuncia i conti."));
        assert_eq!(article.content, vec!["Primo blocco.", "Secondo blocco."]);
        assert_eq!(article.date.as_deref(), Some("2024-12-18T10:30:00+0100"));
    }

    #[test]
    fn test_optional_fields_degrade_independently() {
        let html = r#"
            <main>
                <h1>Solo titolo</h1>
                <p class="is-last-update" datetime="not-a-date">ieri</p>
            </main>
        "#;
        let article = extract_article(html).unwrap().unwrap();
        assert_eq!(article.title, "Solo titolo");
        assert_eq!(article.author, None);
        assert_eq!(article.summary, None);
        assert_eq!(article.date, None);
        assert!(article.content.is_empty());
    }

    #[test]
    fn test_not_an_article() {
        let html = "<html><body><div>homepage teaser</div></body></html>";
        assert!(extract_article(html).unwrap().is_none());
    }

    #[test]
    fn test_missing_title_is_structural_failure() {
        let html = r#"<main><p class="summary-art">solo sommario</p></main>"#;
        let result = extract_article(html);
        assert!(matches!(result, Err(Error::Structure(_))));
    }

    #[test]
    fn test_author_falls_back_to_jsonld() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">{"author": {"name": "Anna Bianchi"}}</script>
            </head><body>
            <main><h1>Titolo</h1></main>
            </body></html>
        "#;
        let article = extract_article(html).unwrap().unwrap();
        assert_eq!(article.author.as_deref(), Some("Anna Bianchi"));
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(
            parse_timestamp("2024-10-15T08:00:00+02:00").as_deref(),
            Some("2024-10-15T08:00:00+0200")
        );
        assert_eq!(parse_timestamp("2024-10-15"), None);
        assert_eq!(parse_timestamp("domani"), None);
    }

    #[test]
    fn test_fresh_id_per_extraction() {
        let first = extract_article(FULL_ARTICLE).unwrap().unwrap();
        let second = extract_article(FULL_ARTICLE).unwrap().unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_into_record_injects_context() {
        let record = extract_article(FULL_ARTICLE)
            .unwrap()
            .unwrap()
            .into_record("politica", "https://site/politica/art1");
        assert_eq!(record.section, "politica");
        assert_eq!(record.url, "https://site/politica/art1");
        assert_eq!(record.title.as_deref(), Some("Superavit fiscale nel primo trimestre"));
    }
}
