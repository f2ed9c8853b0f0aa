use once_cell::sync::Lazy;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

use crate::model::{Post, PostCollection, RawRecord};

pub const TOPIC_DELIMITER: char = '|';

/// Columns that may hold the post location, in lookup order.
const PATH_COLUMNS: [&str; 2] = ["path", "url"];

/// Characters left alone by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static ABSOLUTE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("valid absolute url regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Substituted when a row has no excerpt.
    pub excerpt_placeholder: String,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn normalize(&self, raw: &RawRecord) -> Post {
        let path = PATH_COLUMNS
            .iter()
            .find_map(|column| raw.get(column).filter(|value| !value.trim().is_empty()))
            .unwrap_or_default();

        let excerpt = raw.get("excerpt").map(str::trim).unwrap_or_default();
        let excerpt = if excerpt.is_empty() {
            self.options.excerpt_placeholder.trim().to_string()
        } else {
            excerpt.to_string()
        };

        Post {
            title: raw.get("title").map(str::trim).unwrap_or_default().to_string(),
            url: resolve_url(path),
            topics: raw.get("topics").map(split_topics).unwrap_or_default(),
            excerpt,
        }
    }

    pub fn normalize_all<I>(&self, rows: I) -> PostCollection
    where
        I: IntoIterator<Item = RawRecord>,
    {
        rows.into_iter().map(|row| self.normalize(&row)).collect()
    }
}

/// Absolute http(s) references pass through; anything else is treated as a
/// site path and each `/` segment is encoded on its own.
pub fn resolve_url(raw: &str) -> String {
    let raw = raw.trim();
    if ABSOLUTE_URL_RE.is_match(raw) {
        return raw.to_string();
    }
    raw.split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

// Decoding first keeps already-encoded paths stable.
fn encode_segment(segment: &str) -> String {
    let segment = segment.trim();
    let decoded = percent_decode_str(segment)
        .decode_utf8()
        .unwrap_or(std::borrow::Cow::Borrowed(segment));
    utf8_percent_encode(&decoded, URI_COMPONENT).to_string()
}

/// Empty pieces (`a||b`, a trailing `|`) are dropped.
pub fn split_topics(raw: &str) -> Vec<String> {
    raw.split(TOPIC_DELIMITER)
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
        .map(str::to_string)
        .collect()
}
