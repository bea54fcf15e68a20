//! Feed test utilities

use async_trait::async_trait;

use godotkit::feed::{FeedSource, FetchError};

/// In-memory feed for testing
pub struct MemoryFeed {
    body: Result<Vec<u8>, String>,
}

impl MemoryFeed {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: Ok(body.into()),
        }
    }

    pub fn not_found(location: &str) -> Self {
        Self {
            body: Err(location.to_string()),
        }
    }
}

#[async_trait]
impl FeedSource for MemoryFeed {
    fn location(&self) -> String {
        "memory".to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        match &self.body {
            Ok(body) => Ok(body.clone()),
            Err(location) => Err(FetchError::NotFound(location.clone())),
        }
    }
}

/// RSS 2.0 document with one item per `(title, pubDate)`
pub fn rss_feed(items: &[(&str, &str)]) -> String {
    let items: String = items
        .iter()
        .map(|(title, date)| {
            format!(
                "    <item>\n      <title>{title}</title>\n      <pubDate>{date}</pubDate>\n    </item>\n"
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\">\n  <channel>\n    <title>Godot Engine</title>\n{items}  </channel>\n</rss>\n"
    )
}

/// Atom document with one entry per `(title, updated)`
pub fn atom_feed(entries: &[(&str, &str)]) -> String {
    let entries: String = entries
        .iter()
        .map(|(title, updated)| {
            format!("  <entry>\n    <title>{title}</title>\n    <updated>{updated}</updated>\n  </entry>\n")
        })
        .collect();
    format!("<feed xmlns=\"http://www.w3.org/2005/Atom\">\n{entries}</feed>\n")
}
