use scraper::{Html, Selector};

/// Fallback author extraction from JSON-LD metadata when the byline
/// element is missing. Multiple authors are joined into one string.
pub fn extract_author(document: &Html) -> Option<String> {
    let authors = extract_authors(document);
    if authors.is_empty() {
        None
    } else {
        Some(authors.join(", "))
    }
}

fn extract_authors(document: &Html) -> Vec<String> {
    let mut authors = Vec::new();

    if let Ok(script_selector) = Selector::parse("script[type='application/ld+json']") {
        for script in document.select(&script_selector) {
            let raw = script.text().collect::<String>();
            let Ok(json) = serde_json::from_str::<serde_json::Value>(raw.trim()) else {
                continue;
            };
            let Some(author) = json.get("author") else {
                continue;
            };
            match author {
                serde_json::Value::Array(entries) => {
                    for entry in entries {
                        if let Some(name) = entry.get("name").and_then(|n| n.as_str()) {
                            authors.push(name.trim().to_string());
                        }
                    }
                }
                serde_json::Value::Object(entry) => {
                    if let Some(name) = entry.get("name").and_then(|n| n.as_str()) {
                        authors.push(name.trim().to_string());
                    }
                }
                serde_json::Value::String(name) => {
                    authors.push(name.trim().to_string());
                }
                _ => {}
            }
        }
    }

    authors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_from_object() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">
                {"@type": "NewsArticle", "author": {"name": "Mario Rossi"}}
            </script>
            </head><body></body></html>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(extract_author(&document), Some("Mario Rossi".to_string()));
    }

    #[test]
    fn test_author_from_array() {
        let html = r#"
            <script type="application/ld+json">
                {"author": [{"name": "Mario Rossi"}, {"name": "Anna Bianchi"}]}
            </script>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(
            extract_author(&document),
            Some("Mario Rossi, Anna Bianchi".to_string())
        );
    }

    #[test]
    fn test_no_author() {
        let document = Html::parse_document("<html><body><p>no metadata</p></body></html>");
        assert_eq!(extract_author(&document), None);
    }

    #[test]
    fn test_malformed_json_is_skipped() {
        let html = r#"<script type="application/ld+json">{not json</script>"#;
        let document = Html::parse_document(html);
        assert_eq!(extract_author(&document), None);
    }
}
