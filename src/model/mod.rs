// src/model/mod.rs
//! Typed records for everything the exporter reads from Notion.

mod block;
pub mod blocks;
pub mod properties;

pub use block::{Block, BlockKind};
pub use properties::{
    DateRange, FileReference, FormulaValue, PropertyValue, RelationReference, RollupValue,
    SchemaProperty, SelectOption,
};

use crate::constants::UNTITLED_DATABASE;
use crate::types::{first_plain_text, NotionId, RichTextItem};
use indexmap::IndexMap;
use serde::Deserialize;

/// Parent reference with typed IDs
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Parent {
    PageId { page_id: NotionId },
    DatabaseId { database_id: NotionId },
    BlockId { block_id: NotionId },
    Workspace,
    #[serde(other)]
    Unknown,
}

impl Parent {
    pub fn id(&self) -> Option<&NotionId> {
        match self {
            Parent::PageId { page_id } => Some(page_id),
            Parent::DatabaseId { database_id } => Some(database_id),
            Parent::BlockId { block_id } => Some(block_id),
            Parent::Workspace | Parent::Unknown => None,
        }
    }

    pub fn is_database(&self) -> bool {
        matches!(self, Parent::DatabaseId { .. })
    }
}

/// A user as referenced from another object. Notion includes the name
/// only for some references, so it is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A page object, either a standalone page or a database entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageRecord {
    pub id: NotionId,
    #[serde(default)]
    pub url: String,
    pub created_by: UserRef,
    pub last_edited_by: UserRef,
    #[serde(default)]
    pub last_edited_time: String,
    pub parent: Parent,
    #[serde(default, deserialize_with = "properties::lenient_properties")]
    pub properties: IndexMap<String, PropertyValue>,
}

impl PageRecord {
    /// Entries take their title from the title-typed column; standalone
    /// pages from the property literally named `title`.
    pub fn title(&self) -> String {
        let title_value = if self.parent.is_database() {
            self.properties.values().find(|value| value.is_title())
        } else {
            self.properties.get("title")
        };

        match title_value {
            Some(PropertyValue::Title { title }) => first_plain_text(title),
            _ => String::new(),
        }
    }
}

/// A database object with its column schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatabaseRecord {
    pub id: NotionId,
    #[serde(default)]
    pub title: Vec<RichTextItem>,
    #[serde(default)]
    pub description: Vec<RichTextItem>,
    #[serde(default)]
    pub url: String,
    pub created_by: UserRef,
    pub last_edited_by: UserRef,
    #[serde(default)]
    pub last_edited_time: String,
    pub parent: Parent,
    #[serde(default)]
    pub properties: IndexMap<String, SchemaProperty>,
}

impl DatabaseRecord {
    pub fn title(&self) -> String {
        match self.title.first() {
            Some(span) => span.plain_text.clone(),
            None => UNTITLED_DATABASE.to_string(),
        }
    }

    pub fn description(&self) -> String {
        first_plain_text(&self.description)
    }
}

/// Everything front matter needs to know about one exported root.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageMeta {
    pub id: NotionId,
    pub title: String,
    pub url: String,
    pub created_by: String,
    pub last_edited_by: String,
    pub last_edited_time: String,
    pub parent_id: Option<NotionId>,
    /// Rendered `name -> value` pairs; present only for database entries.
    pub properties: Option<IndexMap<String, String>>,
}

impl PageMeta {
    /// Metadata for a database the integration cannot read.
    pub fn inaccessible_database(id: NotionId) -> Self {
        Self {
            id,
            title: UNTITLED_DATABASE.to_string(),
            ..Self::default()
        }
    }
}
