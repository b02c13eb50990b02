// src/types/ids.rs
//! Notion object identifiers.
//!
//! Every page, database, block, and entry id that crosses the crawl goes through
//! [`NotionId::normalize`], so two spellings of the same id (dashed or undashed)
//! compare equal everywhere: in the visited set, the parent table, and the
//! exported document map.

use super::ValidationError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Offsets at which the canonical `8-4-4-4-12` form carries a dash.
const DASH_OFFSETS: [usize; 4] = [8, 13, 18, 23];

lazy_static! {
    /// A 32-hex-digit id, optionally dashed, at the end of a URL path segment.
    static ref URL_ID_PATTERN: Regex = Regex::new(
        r"([0-9a-fA-F]{8}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{12})$"
    )
    .expect("Failed to compile Notion ID regex - this is a bug in the code");
}

/// An identifier for a Notion page, database, block, or user.
///
/// Equality is exact string equality after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotionId(String);

impl NotionId {
    /// Canonicalizes an identifier.
    ///
    /// A 32-character id without separators gains dashes at offsets 8, 12, 16
    /// and 20. A 36-character id with dashes at offsets 8, 13, 18 and 23 keeps
    /// its shape. Both forms fold to lower case, the case the API answers in.
    /// Anything else is kept as-is and logged as suspicious.
    pub fn normalize(raw: &str) -> Self {
        if raw.len() == 32 && raw.is_ascii() && !raw.contains('-') {
            let raw = raw.to_ascii_lowercase();
            return NotionId(format!(
                "{}-{}-{}-{}-{}",
                &raw[0..8],
                &raw[8..12],
                &raw[12..16],
                &raw[16..20],
                &raw[20..32]
            ));
        }

        if is_dashed_form(raw) {
            return NotionId(raw.to_ascii_lowercase());
        }
        log::warn!("Notion ID is not in the expected format. ID: {}", raw);
        NotionId(raw.to_string())
    }

    /// Accepts either a raw id or a Notion URL whose last path segment ends in an id.
    pub fn from_input(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::EmptyField("notion id"));
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            return extract_id_from_url(input)
                .map(|id| Self::normalize(&id))
                .ok_or_else(|| {
                    ValidationError::InvalidId(format!("Could not extract ID from URL: {}", input))
                });
        }

        Ok(Self::normalize(input))
    }

    /// A random id for rows the crawler synthesizes itself.
    pub fn synthetic() -> Self {
        NotionId(Uuid::new_v4().hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id with every dash removed, as used in `www.notion.so/<id>` links.
    pub fn to_compact(&self) -> String {
        self.0.replace('-', "")
    }
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NotionId {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

fn is_dashed_form(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 36 && DASH_OFFSETS.iter().all(|&offset| bytes[offset] == b'-')
}

/// Extracts the id from `https://www.notion.so/<workspace>/<Title>-<id>?v=...` style URLs.
fn extract_id_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let last_segment = parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()?;

    URL_ID_PATTERN
        .captures(last_segment)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}
