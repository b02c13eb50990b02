// src/formatting/rich_text/annotations.rs
//! Annotation processing for rich text.
//!
//! This module handles the application of text annotations (styling)
//! in a structured and composable way.

use crate::types::Annotations;

/// Markdown-relevant styling of one span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub link: Option<String>,
}

impl TextStyle {
    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = link.filter(|url| !url.is_empty());
        self
    }
}

impl From<&Annotations> for TextStyle {
    fn from(annotations: &Annotations) -> Self {
        Self {
            bold: annotations.bold,
            italic: annotations.italic,
            strikethrough: annotations.strikethrough,
            underline: annotations.underline,
            code: annotations.code,
            link: None, // Links are handled separately
        }
    }
}

/// Renderer for text styles to Markdown.
pub struct MarkdownStyleRenderer;

impl MarkdownStyleRenderer {
    /// Applies styles to text content for Markdown output.
    ///
    /// Leading and trailing whitespace stays outside the markers, and
    /// whitespace-only content is returned untouched: `** **` is not bold.
    pub fn apply_styles(content: &str, style: &TextStyle) -> String {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return content.to_string();
        }

        let start = content.len() - content.trim_start().len();
        let leading = &content[..start];
        let trailing = &content[start + trimmed.len()..];

        let mut result = trimmed.to_string();

        // Apply code style first (it affects how other styles are applied)
        if style.code {
            result = format!("`{}`", result);
        }

        if style.strikethrough {
            result = format!("~~{}~~", result);
        }

        if style.bold {
            result = format!("**{}**", result);
        }

        if style.italic {
            result = format!("*{}*", result);
        }

        // Underline requires HTML
        if style.underline {
            result = format!("<u>{}</u>", result);
        }

        if let Some(url) = &style.link {
            result = format!("[{}]({})", result, url);
        }

        format!("{}{}{}", leading, result, trailing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_style_application() {
        let style = TextStyle {
            bold: true,
            italic: true,
            ..Default::default()
        };

        let result = MarkdownStyleRenderer::apply_styles("test", &style);
        assert_eq!(result, "***test***");
    }

    #[test]
    fn test_code_style_priority() {
        let style = TextStyle {
            code: true,
            bold: true,
            ..Default::default()
        };

        let result = MarkdownStyleRenderer::apply_styles("test", &style);
        assert_eq!(result, "**`test`**");
    }

    #[test]
    fn test_full_marker_order_then_link() {
        let style = TextStyle {
            code: true,
            strikethrough: true,
            bold: true,
            italic: true,
            underline: true,
            link: None,
        }
        .with_link(Some("https://x.io".to_string()));

        assert_eq!(
            MarkdownStyleRenderer::apply_styles("t", &style),
            "[<u>***~~`t`~~***</u>](https://x.io)"
        );
    }

    #[test]
    fn test_whitespace_stays_outside_markers() {
        let style = TextStyle {
            bold: true,
            ..Default::default()
        };

        assert_eq!(MarkdownStyleRenderer::apply_styles("  ", &style), "  ");
        assert_eq!(
            MarkdownStyleRenderer::apply_styles(" word ", &style),
            " **word** "
        );
    }

    #[test]
    fn test_empty_link_is_ignored() {
        let style = TextStyle::default().with_link(Some(String::new()));
        assert_eq!(style.link, None);
    }
}
