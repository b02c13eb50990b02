// src/formatting/rich_text/mod.rs
//! Formats arrays of Notion rich text spans into Markdown.

mod annotations;

pub use annotations::{MarkdownStyleRenderer, TextStyle};

use crate::types::{RichTextItem, RichTextKind};

/// Renders a sequence of spans into one Markdown string.
pub fn render_rich_text(items: &[RichTextItem]) -> String {
    items.iter().map(render_span).collect()
}

/// Renders a single span.
fn render_span(item: &RichTextItem) -> String {
    match &item.kind {
        RichTextKind::Text { content, link } => {
            let url = link
                .as_ref()
                .map(|link| link.url.clone())
                .or_else(|| item.href.clone());
            let style = TextStyle::from(&item.annotations).with_link(url);
            MarkdownStyleRenderer::apply_styles(content, &style)
        }
        // Equations ignore styling
        RichTextKind::Equation { expression } => format!("${}$", expression),
        RichTextKind::Mention => match &item.href {
            Some(href) if !href.is_empty() && !item.plain_text.trim().is_empty() => {
                format!("[{}]({})", item.plain_text, href)
            }
            _ => item.plain_text.clone(),
        },
        RichTextKind::Unknown => item.plain_text.clone(),
    }
}
