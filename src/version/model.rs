//! Engine version identifiers and their ordering
//!
//! Accepted forms:
//! - `4.2.1`, `4.2` (patch defaults to 0)
//! - `4.3.0-rc1`, `4.4-dev3`, `4.2-stable` (`stable` means no prerelease)
//! - any leading prefix: `v4.2.1`, `Godot 4.2.1`, `Maintenance release: Godot 4.2.2`
//! - channel words separated by spaces: `4.3 RC 1`, `4.4 dev 3` (normalized to `4.3-rc1`)
//! - a C# build marker after the version: `4.5.1-stable (.NET)`, `3.6 (Mono)`

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::error::VersionError;

/// Label that marks a release as stable when written after the dash
const STABLE_LABEL: &str = "stable";

/// `MAJOR.MINOR[.PATCH]` anywhere in the input (leftmost match wins)
static CORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

/// `-LABEL` directly after the numeric core
static DASH_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-([0-9A-Za-z]+(?:\.[0-9A-Za-z]+)*)").unwrap());

/// ` RC 1`, ` dev3`, ` beta 2` directly after the numeric core
static CHANNEL_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s+(dev|alpha|beta|rc)\s*(\d+)?\b").unwrap());

/// ` (Mono)`, ` (.NET)`, ` (dotnet)` after the version
static CSHARP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*\((mono|\.net|dotnet)\)").unwrap());

/// Release tag directory of a GitHub download URL
static DOWNLOAD_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/download/([^/]+)/").unwrap());

/// File name markers of C# builds
const CSHARP_FILE_MARKERS: [&str; 3] = ["_mono", "_dotnet", ".net"];

/// Splits a label into its stem and trailing number (`rc10` -> `rc`, 10)
static NUMERIC_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)(\d+)$").unwrap());

/// Prerelease label such as `rc1`, `dev`, `beta2`
///
/// Ordered by stem first (lexicographic), then by the trailing number
/// compared numerically. A label without a number sorts before the same stem
/// with any number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prerelease {
    label: String,
    stem: String,
    number: Option<u64>,
}

impl Prerelease {
    fn new(label: &str) -> Self {
        let label = label.to_ascii_lowercase();
        let (stem, number) = match NUMERIC_SUFFIX_RE.captures(&label) {
            Some(caps) => match caps[2].parse::<u64>() {
                Ok(number) => (caps[1].to_string(), Some(number)),
                Err(_) => (label.clone(), None),
            },
            None => (label.clone(), None),
        };
        Self {
            label,
            stem,
            number,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn number(&self) -> Option<u64> {
        self.number
    }
}

impl Ord for Prerelease {
    fn cmp(&self, other: &Self) -> Ordering {
        self.stem
            .cmp(&other.stem)
            .then(self.number.cmp(&other.number))
            // `rc01` and `rc1` share stem and number; keep the order total
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl PartialOrd for Prerelease {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Prerelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Engine build flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildVariant {
    Standard,
    /// C# build of Godot 3
    Mono,
    /// C# build of Godot 4 and later
    DotNet,
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildVariant::Standard => "Standard",
            BuildVariant::Mono => "Mono",
            BuildVariant::DotNet => ".NET",
        })
    }
}

/// An engine release version
///
/// Identity and ordering ignore `raw`: `4.2` and `4.2.0` are equal. A C#
/// build sorts right after the standard build of the same version.
#[derive(Debug, Clone)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    prerelease: Option<Prerelease>,
    csharp: bool,
    raw: String,
}

impl Version {
    /// Parse a version out of a tag, title or bare version string
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let caps = CORE_RE
            .captures(input)
            .ok_or_else(|| VersionError::new(input))?;
        let core = caps.get(0).unwrap();

        let number = |index: usize| -> Result<u64, VersionError> {
            match caps.get(index) {
                Some(m) => m.as_str().parse().map_err(|_| VersionError::new(input)),
                None => Ok(0),
            }
        };
        let major = number(1)?;
        let minor = number(2)?;
        let patch = number(3)?;

        let rest = &input[core.end()..];
        let (prerelease, raw, end) = if let Some(label) = DASH_LABEL_RE.captures(rest) {
            let end = core.end() + label.get(0).unwrap().end();
            let raw = input[core.start()..end].to_string();
            let label = &label[1];
            if label.eq_ignore_ascii_case(STABLE_LABEL) {
                (None, raw, end)
            } else {
                (Some(Prerelease::new(label)), raw, end)
            }
        } else if let Some(channel) = CHANNEL_WORD_RE.captures(rest) {
            let end = core.end() + channel.get(0).unwrap().end();
            let label = format!(
                "{}{}",
                channel[1].to_ascii_lowercase(),
                channel.get(2).map_or("", |m| m.as_str())
            );
            let raw = format!("{}-{}", core.as_str(), label);
            (Some(Prerelease::new(&label)), raw, end)
        } else {
            (None, core.as_str().to_string(), core.end())
        };

        Ok(Self {
            major,
            minor,
            patch,
            prerelease,
            csharp: CSHARP_RE.is_match(&input[end..]),
            raw,
        })
    }

    /// Parse the version of a GitHub release asset URL
    ///
    /// The version comes from the `/download/<tag>/` segment, the build
    /// variant from the file name (`Godot_v4.3-stable_mono_win64.zip`).
    pub fn from_url(url: &str) -> Result<Self, VersionError> {
        let tag = DOWNLOAD_TAG_RE
            .captures(url)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| VersionError::new(url))?;
        let mut version = Self::parse(tag.as_str())?;

        let file_name = url.rsplit('/').next().unwrap_or_default().to_ascii_lowercase();
        version.csharp = CSHARP_FILE_MARKERS
            .iter()
            .any(|marker| file_name.contains(marker));
        Ok(version)
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn prerelease(&self) -> Option<&Prerelease> {
        self.prerelease.as_ref()
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// Godot 3 ships C# as "Mono", Godot 4 as ".NET"
    pub fn variant(&self) -> BuildVariant {
        match (self.csharp, self.major) {
            (false, _) => BuildVariant::Standard,
            (true, major) if major >= 4 => BuildVariant::DotNet,
            (true, _) => BuildVariant::Mono,
        }
    }

    pub fn is_csharp(&self) -> bool {
        self.csharp
    }

    pub fn is_mono(&self) -> bool {
        self.variant() == BuildVariant::Mono
    }

    pub fn is_dotnet(&self) -> bool {
        self.variant() == BuildVariant::DotNet
    }

    /// The matched version text, without any stripped prefix
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Godot feature tag form, e.g. `4.3`
    pub fn major_minor(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    /// True when the raw text spelled out a patch component
    pub fn has_explicit_patch(&self) -> bool {
        CORE_RE
            .captures(&self.raw)
            .is_some_and(|caps| caps.get(3).is_some())
    }

    fn key(&self) -> (u64, u64, u64, Option<&Prerelease>, bool) {
        (
            self.major,
            self.minor,
            self.patch,
            self.prerelease.as_ref(),
            self.csharp,
        )
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
            .then(self.csharp.cmp(&other.csharp))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)?;
        if self.csharp {
            write!(f, " ({})", self.variant())?;
        }
        Ok(())
    }
}
