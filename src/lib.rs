// src/lib.rs
//! notion-exporter library: concurrently crawls Notion pages and databases
//! and exports them as Markdown documents.
//!
//! # Public API
//!
//! - **Export engine**: `NotionExporter`, `TreeCrawler`, `ExportState`
//! - **Gateway**: the `NotionGateway` trait and its HTTP implementation `NotionHttpClient`
//! - **Retries**: `RetryPolicy` and its wait strategies
//! - **Rendering**: `BlockRenderer`, `TableBuilder`, `render_property`, `render_rich_text`
//! - **Domain model**: `Block`, `PageRecord`, `DatabaseRecord`, `PageMeta`, `NotionId`
//! - **Errors**: `AppError`, `ValidationError`

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod error_recovery;
pub mod export;
pub mod formatting;
pub mod model;
pub mod output;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ExportConfig, ExportOptions};

// --- Export Engine ---
pub use crate::export::{CrawlOutput, ExportState, NotionExporter, TreeCrawler};

// --- Gateway ---
pub use crate::api::{NotionGateway, NotionHttpClient};
pub use crate::error_recovery::{ExponentialBackoff, RetryAfterHeader, RetryPolicy, WaitStrategy};

// --- Rendering ---
pub use crate::formatting::{
    escape_for_table, render_property, render_rich_text, BlockRenderer, ListCounter, TableBuilder,
};

// --- Domain Model ---
pub use crate::model::{
    Block, BlockKind, DatabaseRecord, PageMeta, PageRecord, Parent, PropertyValue, UserRef,
};
pub use crate::types::{Annotations, ApiKey, Link, NotionId, RichTextItem, RichTextKind};
