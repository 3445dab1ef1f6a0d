use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One extracted article. Transient: built by the crawler, fanned out into
/// [`IndexDocument`]s, then dropped. `url` is the deduplication key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: Uuid,
    pub title: Option<String>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub content: Vec<String>,
    /// Pre-rendered `%Y-%m-%dT%H:%M:%S%z`, or `None` when the source
    /// timestamp did not parse.
    pub date: Option<String>,
    pub section: String,
    pub url: String,
}

impl ArticleRecord {
    /// The text units to index, in canonical write order: title, summary,
    /// then content blocks in reading order. Units that are empty after
    /// trimming are treated as absent and never surfaced.
    pub fn text_units(&self) -> Vec<(DocumentKind, &str)> {
        let mut units = Vec::with_capacity(2 + self.content.len());
        if let Some(title) = non_empty(self.title.as_deref()) {
            units.push((DocumentKind::Title, title));
        }
        if let Some(summary) = non_empty(self.summary.as_deref()) {
            units.push((DocumentKind::Summary, summary));
        }
        for block in &self.content {
            if let Some(block) = non_empty(Some(block.as_str())) {
                units.push((DocumentKind::Content, block));
            }
        }
        units
    }

    /// Metadata shared by every document of this article.
    pub fn metadata(&self, kind: DocumentKind) -> DocumentMetadata {
        DocumentMetadata {
            id: self.id,
            author: self.author.clone(),
            date: self.date.clone(),
            section: self.section.clone(),
            url: self.url.clone(),
            kind,
        }
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

/// Which part of the article a document carries. The serialized names are
/// a fixed contract with the downstream retrieval layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Title,
    Summary,
    Content,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Title => "title",
            DocumentKind::Summary => "summary",
            DocumentKind::Content => "content",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub id: Uuid,
    pub author: Option<String>,
    pub date: Option<String>,
    pub section: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
}

/// The durable indexed unit: one text unit with its embedding and the
/// article metadata. Field names (`metadata.*`, `text`, `embedding`) are
/// the downstream contract and must not change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDocument {
    pub metadata: DocumentMetadata,
    pub text: String,
    pub embedding: Vec<f32>,
}
