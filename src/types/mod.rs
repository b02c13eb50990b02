// src/types/mod.rs
//! Value types shared by the gateway, the renderers, and the export engine.

use thiserror::Error;

mod domain_types;
mod ids;
mod rich_text;

pub use domain_types::ApiKey;
pub use ids::NotionId;
pub use rich_text::{first_plain_text, plain_text_of, Annotations, Link, RichTextItem, RichTextKind};

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },
}
