// src/model/block.rs
use super::blocks::*;
use crate::types::{NotionId, RichTextItem};
use serde::Deserialize;

/// One block as listed under its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NotionId,
    /// The page or block this block was listed under, when Notion reports it.
    pub parent_id: Option<NotionId>,
    pub has_children: bool,
    pub kind: BlockKind,
}

/// The block kinds the exporter knows how to render.
///
/// Deserialized from the full block object: `type` selects the variant and
/// the payload lives under the key of the same name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Bookmark {
        bookmark: UrlContent,
    },
    Breadcrumb,
    BulletedListItem {
        bulleted_list_item: TextBlockContent,
    },
    Callout {
        callout: CalloutContent,
    },
    ChildDatabase {
        child_database: ChildTitle,
    },
    ChildPage {
        child_page: ChildTitle,
    },
    Code {
        code: CodeContent,
    },
    Column,
    ColumnList,
    Divider,
    Embed {
        embed: UrlContent,
    },
    Equation {
        equation: EquationContent,
    },
    File {
        file: FileContent,
    },
    #[serde(rename = "heading_1")]
    Heading1 {
        heading_1: TextBlockContent,
    },
    #[serde(rename = "heading_2")]
    Heading2 {
        heading_2: TextBlockContent,
    },
    #[serde(rename = "heading_3")]
    Heading3 {
        heading_3: TextBlockContent,
    },
    Image {
        image: FileContent,
    },
    LinkPreview {
        link_preview: UrlContent,
    },
    NumberedListItem {
        numbered_list_item: TextBlockContent,
    },
    Paragraph {
        paragraph: TextBlockContent,
    },
    Pdf {
        pdf: FileContent,
    },
    Quote {
        quote: TextBlockContent,
    },
    SyncedBlock,
    Table,
    TableOfContents,
    TableRow {
        table_row: TableRowContent,
    },
    ToDo {
        to_do: ToDoContent,
    },
    Toggle {
        toggle: TextBlockContent,
    },
    Video {
        video: FileContent,
    },
    #[serde(other)]
    Unsupported,
}

impl BlockKind {
    /// Kinds rendered as Markdown list items; their nested list children indent.
    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            BlockKind::BulletedListItem { .. }
                | BlockKind::NumberedListItem { .. }
                | BlockKind::ToDo { .. }
                | BlockKind::Toggle { .. }
        )
    }

    pub fn is_table_row(&self) -> bool {
        matches!(self, BlockKind::TableRow { .. })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            BlockKind::Bookmark { .. } => "bookmark",
            BlockKind::Breadcrumb => "breadcrumb",
            BlockKind::BulletedListItem { .. } => "bulleted_list_item",
            BlockKind::Callout { .. } => "callout",
            BlockKind::ChildDatabase { .. } => "child_database",
            BlockKind::ChildPage { .. } => "child_page",
            BlockKind::Code { .. } => "code",
            BlockKind::Column => "column",
            BlockKind::ColumnList => "column_list",
            BlockKind::Divider => "divider",
            BlockKind::Embed { .. } => "embed",
            BlockKind::Equation { .. } => "equation",
            BlockKind::File { .. } => "file",
            BlockKind::Heading1 { .. } => "heading_1",
            BlockKind::Heading2 { .. } => "heading_2",
            BlockKind::Heading3 { .. } => "heading_3",
            BlockKind::Image { .. } => "image",
            BlockKind::LinkPreview { .. } => "link_preview",
            BlockKind::NumberedListItem { .. } => "numbered_list_item",
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::Pdf { .. } => "pdf",
            BlockKind::Quote { .. } => "quote",
            BlockKind::SyncedBlock => "synced_block",
            BlockKind::Table => "table",
            BlockKind::TableOfContents => "table_of_contents",
            BlockKind::TableRow { .. } => "table_row",
            BlockKind::ToDo { .. } => "to_do",
            BlockKind::Toggle { .. } => "toggle",
            BlockKind::Video { .. } => "video",
            BlockKind::Unsupported => "unsupported",
        }
    }
}

impl Block {
    /// The header separator row inserted after the first row of a table.
    pub fn table_delimiter(cell_count: usize, parent_id: Option<NotionId>) -> Self {
        Self {
            id: NotionId::synthetic(),
            parent_id,
            has_children: false,
            kind: BlockKind::TableRow {
                table_row: TableRowContent {
                    cells: vec![vec![RichTextItem::plain_text("---")]; cell_count],
                },
            },
        }
    }

    /// Number of cells when this is a table row.
    pub fn cell_count(&self) -> Option<usize> {
        match &self.kind {
            BlockKind::TableRow { table_row } => Some(table_row.cells.len()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_from_full_block_object() {
        let kind: BlockKind = serde_json::from_value(json!({
            "object": "block",
            "id": "12345678-1234-1234-1234-123456789abc",
            "has_children": false,
            "type": "heading_2",
            "heading_2": {
                "rich_text": [{ "type": "text", "text": { "content": "Goals", "link": null },
                                "plain_text": "Goals", "href": null }],
                "color": "default",
                "is_toggleable": false
            }
        }))
        .unwrap();

        match kind {
            BlockKind::Heading2 { heading_2 } => {
                assert_eq!(heading_2.rich_text[0].plain_text, "Goals")
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_content_free_kinds_ignore_their_payload() {
        let kind: BlockKind =
            serde_json::from_value(json!({ "type": "divider", "divider": {} })).unwrap();
        assert_eq!(kind, BlockKind::Divider);

        let kind: BlockKind = serde_json::from_value(
            json!({ "type": "column_list", "column_list": {}, "has_children": true }),
        )
        .unwrap();
        assert_eq!(kind, BlockKind::ColumnList);
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        let kind: BlockKind = serde_json::from_value(
            json!({ "type": "audio", "audio": { "type": "external", "external": { "url": "x" } } }),
        )
        .unwrap();
        assert_eq!(kind, BlockKind::Unsupported);
        assert_eq!(kind.type_name(), "unsupported");
    }

    #[test]
    fn test_list_item_classification() {
        let toggle: BlockKind = serde_json::from_value(
            json!({ "type": "toggle", "toggle": { "rich_text": [] } }),
        )
        .unwrap();
        assert!(toggle.is_list_item());
        assert!(!BlockKind::Divider.is_list_item());
    }

    #[test]
    fn test_table_delimiter_row() {
        let row = Block::table_delimiter(3, None);
        assert_eq!(row.cell_count(), Some(3));
        assert!(!row.has_children);
        match row.kind {
            BlockKind::TableRow { table_row } => {
                assert!(table_row.cells.iter().all(|cell| cell[0].plain_text == "---"))
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }
}
