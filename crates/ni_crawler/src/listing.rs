use scraper::{Html, Selector};
use url::Url;

/// True when a discovered link belongs to the section being crawled: the
/// section's listing URL must appear in the article URL. Kept as a named
/// predicate so link classification stays testable on its own.
pub fn matches_section(section_url: &str, link: &str) -> bool {
    link.contains(section_url)
}

/// Collects candidate article URLs from a listing page: every `a[href]`
/// inside the news containers of the page body, absolutized against the
/// listing URL, sorted and deduplicated.
pub fn discover_links(html: &str, listing_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let container_selector = Selector::parse("section.body-hp").unwrap();
    let teaser_selector = Selector::parse(".media-news__content").unwrap();
    let link_selector = Selector::parse("a[href]").unwrap();

    let mut urls = Vec::new();
    for container in document.select(&container_selector) {
        for teaser in container.select(&teaser_selector) {
            for link in teaser.select(&link_selector) {
                if let Some(href) = link.value().attr("href") {
                    urls.push(absolutize(listing_url, href));
                }
            }
        }
    }

    urls.sort();
    urls.dedup();
    urls
}

fn absolutize(listing_url: &str, href: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }
    match Url::parse(listing_url).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}
