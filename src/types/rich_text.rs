// src/types/rich_text.rs
//! Rich text spans as delivered by the Notion API.

use serde::Deserialize;

/// One styled span of rich text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "WireRichText")]
pub struct RichTextItem {
    pub kind: RichTextKind,
    pub annotations: Annotations,
    pub plain_text: String,
    pub href: Option<String>,
}

/// What a span carries besides its plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum RichTextKind {
    Text { content: String, link: Option<Link> },
    Equation { expression: String },
    Mention,
    Unknown,
}

impl RichTextItem {
    /// An unstyled text span.
    pub fn plain_text(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            kind: RichTextKind::Text {
                content: content.clone(),
                link: None,
            },
            annotations: Annotations::default(),
            plain_text: content,
            href: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

/// Concatenates the plain text of every span.
pub fn plain_text_of(spans: &[RichTextItem]) -> String {
    spans.iter().map(|span| span.plain_text.as_str()).collect()
}

/// Plain text of the first span, or an empty string.
pub fn first_plain_text(spans: &[RichTextItem]) -> String {
    spans
        .first()
        .map(|span| span.plain_text.clone())
        .unwrap_or_default()
}

#[derive(Deserialize)]
struct WireRichText {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<WireText>,
    #[serde(default)]
    equation: Option<WireEquation>,
    #[serde(default)]
    annotations: Annotations,
    #[serde(default)]
    plain_text: String,
    #[serde(default)]
    href: Option<String>,
}

#[derive(Deserialize)]
struct WireText {
    #[serde(default)]
    content: String,
    #[serde(default)]
    link: Option<Link>,
}

#[derive(Deserialize)]
struct WireEquation {
    #[serde(default)]
    expression: String,
}

impl From<WireRichText> for RichTextItem {
    fn from(wire: WireRichText) -> Self {
        let kind = match (wire.kind.as_str(), wire.text, wire.equation) {
            ("text", Some(text), _) => RichTextKind::Text {
                content: text.content,
                link: text.link,
            },
            ("equation", _, Some(equation)) => RichTextKind::Equation {
                expression: equation.expression,
            },
            ("mention", _, _) => RichTextKind::Mention,
            _ => RichTextKind::Unknown,
        };

        Self {
            kind,
            annotations: wire.annotations,
            plain_text: wire.plain_text,
            href: wire.href,
        }
    }
}
