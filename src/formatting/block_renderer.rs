// src/formatting/block_renderer.rs
//! Block rendering engine: converts one Notion block into one Markdown fragment.
//!
//! Rendering is a pure function of the block except for numbered list items,
//! whose numbers come from a [`ListCounter`] shared by every crawl of one
//! export run. Indentation is applied by the crawler, not here.

use super::rich_text::render_rich_text;
use crate::constants::NOTION_LINK_HOST;
use crate::model::blocks::{FileContent, TextBlockContent, UrlContent};
use crate::model::{Block, BlockKind};
use crate::types::{plain_text_of, NotionId, RichTextItem};
use dashmap::DashMap;

/// Numbered list positions keyed by the parent the items were listed under.
///
/// Counts only ever grow during a run, so items of one list fetched in
/// separate batches keep numbering where the previous batch stopped.
#[derive(Debug, Default)]
pub struct ListCounter {
    counts: DashMap<Option<NotionId>, usize>,
}

impl ListCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments and returns the position for the next item under `parent`.
    pub fn next(&self, parent: Option<&NotionId>) -> usize {
        let mut count = self.counts.entry(parent.cloned()).or_insert(0);
        *count += 1;
        *count
    }
}

/// Markdown renderer for blocks, scoped to one export run.
#[derive(Debug, Default)]
pub struct BlockRenderer {
    list_counter: ListCounter,
}

impl BlockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `block` without indentation. Kinds with no Markdown form render `""`.
    pub fn render_block(&self, block: &Block) -> String {
        match &block.kind {
            BlockKind::Paragraph { paragraph } => text(paragraph),
            BlockKind::Heading1 { heading_1 } => format!("## {}", text(heading_1)),
            BlockKind::Heading2 { heading_2 } => format!("### {}", text(heading_2)),
            BlockKind::Heading3 { heading_3 } => format!("#### {}", text(heading_3)),
            BlockKind::BulletedListItem { bulleted_list_item } => {
                format!("- {}", text(bulleted_list_item))
            }
            BlockKind::NumberedListItem { numbered_list_item } => {
                let position = self.list_counter.next(block.parent_id.as_ref());
                format!("{}. {}", position, text(numbered_list_item))
            }
            BlockKind::ToDo { to_do } => {
                let mark = if to_do.checked { "x" } else { " " };
                format!("- [{}] {}", mark, render_rich_text(&to_do.rich_text))
            }
            BlockKind::Toggle { toggle } => format!("- {}", text(toggle)),
            BlockKind::Quote { quote } => format!("> {}", text(quote)),
            BlockKind::Callout { callout } => {
                let emoji = callout
                    .icon
                    .as_ref()
                    .and_then(|icon| icon.emoji.as_deref())
                    .unwrap_or_default();
                format!("{} {}", emoji, render_rich_text(&callout.rich_text))
            }
            BlockKind::Code { code } => format!(
                "```{}\n{}\n```{}",
                code.language,
                plain_text_of(&code.rich_text),
                caption(&code.caption)
            ),
            BlockKind::Equation { equation } => format!("$$ {} $$", equation.expression),
            BlockKind::Divider => "___".to_string(),
            BlockKind::Bookmark { bookmark } => {
                format!("{}{}", self_link(bookmark), caption(&bookmark.caption))
            }
            BlockKind::Embed { embed } => self_link(embed),
            BlockKind::LinkPreview { link_preview } => self_link(link_preview),
            BlockKind::Image { image } => format!("!{}", media_link(image)),
            BlockKind::File { file } => media_link(file),
            BlockKind::Pdf { pdf } => media_link(pdf),
            BlockKind::Video { video } => media_link(video),
            BlockKind::ChildPage { child_page } => page_link(&child_page.title, &block.id),
            BlockKind::ChildDatabase { child_database } => {
                page_link(&child_database.title, &block.id)
            }
            BlockKind::TableRow { table_row } => {
                let cells: String = table_row
                    .cells
                    .iter()
                    .map(|cell| format!("{}|", render_rich_text(cell)))
                    .collect();
                format!("|{}", cells)
            }
            BlockKind::Breadcrumb
            | BlockKind::Column
            | BlockKind::ColumnList
            | BlockKind::SyncedBlock
            | BlockKind::Table
            | BlockKind::TableOfContents
            | BlockKind::Unsupported => String::new(),
        }
    }
}

fn text(content: &TextBlockContent) -> String {
    render_rich_text(&content.rich_text)
}

fn caption(spans: &[RichTextItem]) -> String {
    if spans.is_empty() {
        String::new()
    } else {
        format!("\n\n{}", render_rich_text(spans))
    }
}

fn self_link(content: &UrlContent) -> String {
    format!("[{}]({})", content.url, content.url)
}

fn media_link(content: &FileContent) -> String {
    let url = content.url();
    format!("[{}]({}){}", file_name(url), url, caption(&content.caption))
}

fn page_link(title: &str, id: &NotionId) -> String {
    format!("[{}]({}/{})", title, NOTION_LINK_HOST, id)
}

/// Last path segment of a file URL, query string excluded.
fn file_name(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .unwrap_or_default(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .unwrap_or_default()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn block(value: serde_json::Value) -> Block {
        crate::api::parser::parse_block(&value).unwrap()
    }

    fn span(content: &str) -> serde_json::Value {
        json!({ "type": "text", "text": { "content": content, "link": null },
                "plain_text": content, "href": null })
    }

    const PARENT: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";

    fn numbered(id: &str, parent: &str, content: &str) -> Block {
        block(json!({
            "id": id,
            "parent": { "type": "block_id", "block_id": parent },
            "has_children": false,
            "type": "numbered_list_item",
            "numbered_list_item": { "rich_text": [span(content)] }
        }))
    }

    #[test]
    fn test_text_kinds() {
        let renderer = BlockRenderer::new();
        let cases = [
            ("paragraph", "Body"),
            ("heading_1", "## Body"),
            ("heading_2", "### Body"),
            ("heading_3", "#### Body"),
            ("bulleted_list_item", "- Body"),
            ("toggle", "- Body"),
            ("quote", "> Body"),
        ];

        for (kind, expected) in cases {
            let rendered = renderer.render_block(&block(json!({
                "id": "11111111-1111-1111-1111-111111111111",
                "has_children": false,
                "type": kind,
                kind: { "rich_text": [span("Body")] }
            })));
            assert_eq!(rendered, expected, "{}", kind);
        }
    }

    #[test]
    fn test_to_do_and_callout() {
        let renderer = BlockRenderer::new();
        let done = block(json!({
            "id": "11111111-1111-1111-1111-111111111111", "type": "to_do",
            "to_do": { "rich_text": [span("Ship")], "checked": true }
        }));
        let callout = block(json!({
            "id": "11111111-1111-1111-1111-111111111112", "type": "callout",
            "callout": { "rich_text": [span("Careful")], "icon": { "type": "emoji", "emoji": "⚠️" } }
        }));

        assert_eq!(renderer.render_block(&done), "- [x] Ship");
        assert_eq!(renderer.render_block(&callout), "⚠️ Careful");
    }

    #[test]
    fn test_code_with_caption() {
        let rendered = BlockRenderer::new().render_block(&block(json!({
            "id": "11111111-1111-1111-1111-111111111111", "type": "code",
            "code": { "rich_text": [span("fn main() {}")], "language": "rust",
                      "caption": [span("entry point")] }
        })));
        assert_eq!(rendered, "```rust\nfn main() {}\n```\n\nentry point");
    }

    #[test]
    fn test_media_uses_file_name() {
        let renderer = BlockRenderer::new();
        let image = block(json!({
            "id": "11111111-1111-1111-1111-111111111111", "type": "image",
            "image": { "type": "file",
                       "file": { "url": "https://s3.aws/bucket/diagram.png?X-Amz=1", "expiry_time": "x" },
                       "caption": [] }
        }));
        let video = block(json!({
            "id": "11111111-1111-1111-1111-111111111112", "type": "video",
            "video": { "type": "external", "external": { "url": "https://cdn.io/v/demo.mp4" },
                       "caption": [span("Demo")] }
        }));

        assert_eq!(
            renderer.render_block(&image),
            "![diagram.png](https://s3.aws/bucket/diagram.png?X-Amz=1)"
        );
        assert_eq!(
            renderer.render_block(&video),
            "[demo.mp4](https://cdn.io/v/demo.mp4)\n\nDemo"
        );
    }

    #[test]
    fn test_links_and_child_references() {
        let renderer = BlockRenderer::new();
        let bookmark = block(json!({
            "id": "11111111-1111-1111-1111-111111111111", "type": "bookmark",
            "bookmark": { "url": "https://rust-lang.org", "caption": [] }
        }));
        let child = block(json!({
            "id": "22222222-2222-2222-2222-222222222222", "type": "child_page",
            "child_page": { "title": "Roadmap" }
        }));

        assert_eq!(
            renderer.render_block(&bookmark),
            "[https://rust-lang.org](https://rust-lang.org)"
        );
        assert_eq!(
            renderer.render_block(&child),
            "[Roadmap](www.notion.so/22222222-2222-2222-2222-222222222222)"
        );
    }

    #[test]
    fn test_content_free_and_unknown_kinds_render_empty() {
        let renderer = BlockRenderer::new();
        for kind in ["divider", "column_list", "table", "audio"] {
            let rendered = renderer.render_block(&block(json!({
                "id": "11111111-1111-1111-1111-111111111111", "type": kind, kind: {}
            })));
            let expected = if kind == "divider" { "___" } else { "" };
            assert_eq!(rendered, expected, "{}", kind);
        }
    }

    #[test]
    fn test_table_row_and_delimiter() {
        let renderer = BlockRenderer::new();
        let row = block(json!({
            "id": "11111111-1111-1111-1111-111111111111", "type": "table_row",
            "table_row": { "cells": [[span("a")], [span("b")], []] }
        }));

        assert_eq!(renderer.render_block(&row), "|a|b||");
        assert_eq!(
            renderer.render_block(&Block::table_delimiter(3, None)),
            "|---|---|---|"
        );
    }

    #[test]
    fn test_numbering_is_per_parent_and_never_resets() {
        let renderer = BlockRenderer::new();
        let other = "bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb";

        let render_batch = |labels: [&str; 3]| -> Vec<String> {
            labels
                .iter()
                .map(|n| {
                    let id = format!("11111111-1111-1111-1111-00000000000{}", n);
                    renderer.render_block(&numbered(&id, PARENT, n))
                })
                .collect()
        };

        let first_batch = render_batch(["1", "2", "3"]);
        let nested =
            renderer.render_block(&numbered("33333333-3333-3333-3333-333333333333", other, "x"));
        let second_batch = render_batch(["4", "5", "6"]);

        assert_eq!(first_batch, vec!["1. 1", "2. 2", "3. 3"]);
        assert_eq!(nested, "1. x");
        assert_eq!(second_batch, vec!["4. 4", "5. 5", "6. 6"]);
    }

    #[test]
    fn test_file_name_extraction() {
        assert_eq!(file_name("https://a.io/x/report%20q1.pdf"), "report%20q1.pdf");
        assert_eq!(file_name("https://a.io/x/"), "");
        assert_eq!(file_name("not a url/notes.txt?v=2"), "notes.txt");
    }
}
