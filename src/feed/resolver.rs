//! Syndication feed → ordered release candidates
//!
//! Supports RSS 2.0 (`<rss><channel><item>`), RSS 1.0 (`<rdf:RDF><item>`)
//! and Atom (`<feed><entry>`). Entries are read one at a time: an entry
//! whose title carries no version, or that cannot be read at all, is skipped
//! and reported, never fatal.

use chrono::{DateTime, FixedOffset};
use quick_xml::de::from_str;
use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::reader::Reader;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::feed::error::FeedFormatError;
use crate::feed::types::{AssetLink, FeedResolution, ReleaseCandidate, SkipReason, SkippedEntry};
use crate::version::Version;

/// Element text, ignoring any attributes (`<title type="html">`)
#[derive(Debug, Deserialize)]
struct Text {
    #[serde(rename = "$text", default)]
    value: String,
}

// Child elements are read as lists so a repeated element never fails an entry

#[derive(Debug, Deserialize)]
struct RssItem {
    #[serde(default)]
    title: Vec<Text>,
    #[serde(default)]
    link: Vec<Text>,
    #[serde(default)]
    guid: Vec<Text>,
    #[serde(rename = "pubDate", default)]
    pub_date: Vec<Text>,
    #[serde(rename = "enclosure", default)]
    enclosures: Vec<RssEnclosure>,
}

#[derive(Debug, Deserialize)]
struct RssEnclosure {
    #[serde(rename = "@url")]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(default)]
    title: Vec<Text>,
    #[serde(default)]
    id: Vec<Text>,
    #[serde(default)]
    published: Vec<Text>,
    #[serde(default)]
    updated: Vec<Text>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
    #[serde(rename = "@title")]
    title: Option<String>,
}

/// Feed entry reduced to the fields release discovery looks at
struct FeedEntry {
    title: Option<String>,
    identifier: Option<String>,
    published_at: Option<DateTime<FixedOffset>>,
    asset_links: Vec<AssetLink>,
}

/// First non-empty text among repeated elements
fn text(nodes: Vec<Text>) -> Option<String> {
    nodes
        .into_iter()
        .map(|t| t.value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn parse_date(
    raw: Option<String>,
    parse: fn(&str) -> chrono::ParseResult<DateTime<FixedOffset>>,
) -> Option<DateTime<FixedOffset>> {
    let raw = raw?;
    parse(&raw)
        .inspect_err(|e| warn!("Failed to parse feed date '{}': {}", raw, e))
        .ok()
}

fn file_name(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("enclosure")
        .to_string()
}

impl From<RssItem> for FeedEntry {
    fn from(item: RssItem) -> Self {
        let mut asset_links = Vec::new();
        if let Some(url) = text(item.link) {
            asset_links.push(AssetLink {
                name: "article".to_string(),
                url,
            });
        }
        asset_links.extend(
            item.enclosures
                .into_iter()
                .filter_map(|enclosure| enclosure.url)
                .map(|url| AssetLink {
                    name: file_name(&url),
                    url,
                }),
        );

        Self {
            title: text(item.title),
            identifier: text(item.guid),
            published_at: parse_date(text(item.pub_date), DateTime::parse_from_rfc2822),
            asset_links,
        }
    }
}

impl From<AtomEntry> for FeedEntry {
    fn from(entry: AtomEntry) -> Self {
        let date = text(entry.published).or_else(|| text(entry.updated));
        let asset_links = entry
            .links
            .into_iter()
            .filter_map(|link| {
                let url = link.href?;
                let name = link
                    .title
                    .or(link.rel)
                    .unwrap_or_else(|| "alternate".to_string());
                Some(AssetLink { name, url })
            })
            .collect();

        Self {
            title: text(entry.title),
            identifier: text(entry.id),
            published_at: parse_date(date, DateTime::parse_from_rfc3339),
            asset_links,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedKind {
    /// RSS 2.0: `<rss><channel><item>`
    Rss,
    /// RSS 1.0: `<rdf:RDF><item>`
    Rdf,
    /// `<feed><entry>`
    Atom,
}

impl FeedKind {
    fn from_root(name: &str) -> Result<Self, FeedFormatError> {
        match name {
            "rss" => Ok(FeedKind::Rss),
            "RDF" => Ok(FeedKind::Rdf),
            "feed" => Ok(FeedKind::Atom),
            other => Err(FeedFormatError::UnrecognizedRoot(other.to_string())),
        }
    }

    fn entry_element(self) -> &'static str {
        match self {
            FeedKind::Rss | FeedKind::Rdf => "item",
            FeedKind::Atom => "entry",
        }
    }

    fn read_entry(self, xml: &str) -> Result<FeedEntry, String> {
        match self {
            FeedKind::Rss | FeedKind::Rdf => from_str::<RssItem>(xml).map(FeedEntry::from),
            FeedKind::Atom => from_str::<AtomEntry>(xml).map(FeedEntry::from),
        }
        .map_err(|e| e.to_string())
    }
}

fn malformed(error: quick_xml::Error) -> FeedFormatError {
    FeedFormatError::Malformed(error.to_string())
}

/// Split the document into entries, each deserialized on its own
///
/// The document must be well-formed; an entry that does not deserialize is
/// returned as its error message.
fn read_entries(xml: &str) -> Result<Vec<Result<FeedEntry, String>>, FeedFormatError> {
    let mut reader = Reader::from_str(xml);
    let mut kind = None;
    let mut saw_channel = false;
    let mut entries = Vec::new();

    loop {
        let start = reader.buffer_position() as usize;
        let (element, is_empty) = match reader.read_event().map_err(malformed)? {
            Event::Start(element) => (element, false),
            Event::Empty(element) => (element, true),
            Event::Eof => break,
            _ => continue,
        };
        let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();

        let Some(feed) = kind else {
            kind = Some(FeedKind::from_root(&name)?);
            continue;
        };
        if name == "channel" {
            saw_channel = true;
            continue;
        }
        if name != feed.entry_element() {
            continue;
        }

        if !is_empty {
            let end = element.name().as_ref().to_vec();
            reader.read_to_end(QName(&end)).map_err(malformed)?;
        }
        let end = reader.buffer_position() as usize;
        entries.push(feed.read_entry(&xml[start..end]));
    }

    match kind {
        None => Err(FeedFormatError::Empty),
        Some(FeedKind::Rss) if !saw_channel => Err(FeedFormatError::MissingChannel),
        Some(_) => Ok(entries),
    }
}

fn version_of(entry: &FeedEntry) -> Result<Version, SkipReason> {
    let sources = [entry.title.as_deref(), entry.identifier.as_deref()];
    let mut first_error = None;
    for source in sources.into_iter().flatten() {
        match Version::parse(source) {
            Ok(version) => return Ok(version),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    Err(first_error.map_or(SkipReason::Untitled, SkipReason::NoVersion))
}

/// Extract release candidates from raw feed bytes, latest version first
pub fn parse_feed(raw: &[u8]) -> Result<FeedResolution, FeedFormatError> {
    let xml = std::str::from_utf8(raw).map_err(|e| FeedFormatError::Malformed(e.to_string()))?;
    let xml = xml.trim_start_matches('\u{feff}');

    let mut resolution = FeedResolution::default();
    for (index, entry) in read_entries(xml)?.into_iter().enumerate() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(message) => {
                warn!("Skipping unreadable feed entry {}: {}", index, message);
                resolution.skipped.push(SkippedEntry {
                    index,
                    title: None,
                    reason: SkipReason::Malformed(message),
                });
                continue;
            }
        };
        match version_of(&entry) {
            Ok(version) => resolution.candidates.push(ReleaseCandidate {
                version,
                title: entry.title,
                published_at: entry.published_at,
                asset_links: entry.asset_links,
            }),
            Err(reason) => {
                debug!("Skipping feed entry {}: {:?} ({:?})", index, entry.title, reason);
                resolution.skipped.push(SkippedEntry {
                    index,
                    title: entry.title,
                    reason,
                });
            }
        }
    }

    resolution.candidates.sort_by(|a, b| {
        b.version
            .cmp(&a.version)
            .then_with(|| b.published_at.cmp(&a.published_at))
    });

    debug!(
        "Resolved {} release candidates, skipped {} entries",
        resolution.candidates.len(),
        resolution.skipped.len()
    );
    Ok(resolution)
}

/// Highest candidate, ignoring prereleases unless asked for
///
/// Among equal versions the first one in `candidates` wins.
pub fn latest(candidates: &[ReleaseCandidate], include_prerelease: bool) -> Option<&ReleaseCandidate> {
    candidates
        .iter()
        .filter(|candidate| include_prerelease || !candidate.version.is_prerelease())
        .fold(None, |best: Option<&ReleaseCandidate>, candidate| match best {
            Some(best) if best.version >= candidate.version => Some(best),
            _ => Some(candidate),
        })
}
