// src/model/blocks.rs
//! Payloads carried by the individual block kinds.

use crate::types::RichTextItem;
use serde::Deserialize;

/// Text-bearing blocks: paragraphs, headings, list items, quotes, toggles.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TextBlockContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ToDoContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CalloutContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
    #[serde(default)]
    pub icon: Option<Icon>,
}

/// Only emoji icons render; file and external icons are ignored.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Icon {
    #[serde(default)]
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CodeContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
    #[serde(default)]
    pub caption: Vec<RichTextItem>,
    #[serde(default)]
    pub language: String,
}

/// Inline references to a child page or child database.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ChildTitle {
    #[serde(default)]
    pub title: String,
}

/// Bookmarks, embeds, and link previews.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct UrlContent {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub caption: Vec<RichTextItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EquationContent {
    #[serde(default)]
    pub expression: String,
}

/// Images, videos, PDFs, and generic files. Notion-hosted files arrive
/// under `file`, externally hosted ones under `external`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FileContent {
    #[serde(default)]
    pub file: Option<FileUrl>,
    #[serde(default)]
    pub external: Option<FileUrl>,
    #[serde(default)]
    pub caption: Vec<RichTextItem>,
}

impl FileContent {
    pub fn url(&self) -> &str {
        self.file
            .as_ref()
            .or(self.external.as_ref())
            .map(|f| f.url.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FileUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TableRowContent {
    #[serde(default)]
    pub cells: Vec<Vec<RichTextItem>>,
}
