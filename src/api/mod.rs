// src/api/mod.rs
//! Notion API interaction: the ability to read content from a workspace.
//!
//! The export engine depends only on [`NotionGateway`]; the HTTP details live
//! in [`client`], and turning response bodies into typed records in [`parser`].

pub mod client;
mod pagination;
pub mod parser;
mod types;

pub use client::NotionHttpClient;
pub use types::PaginatedResponse;

use crate::error::AppError;
use crate::model::{Block, DatabaseRecord, PageRecord, UserRef};
use crate::types::NotionId;

/// The read operations the exporter needs from Notion.
///
/// Listings are fully drained before returning and keep the API's order.
/// Failures surface as [`AppError`], classified by
/// [`AppError::is_retryable`], [`AppError::is_not_found`] and friends.
#[async_trait::async_trait]
pub trait NotionGateway: Send + Sync {
    async fn list_children(&self, block_id: &NotionId) -> Result<Vec<Block>, AppError>;
    async fn retrieve_page(&self, page_id: &NotionId) -> Result<PageRecord, AppError>;
    async fn retrieve_database(&self, database_id: &NotionId)
        -> Result<DatabaseRecord, AppError>;
    async fn query_database(&self, database_id: &NotionId) -> Result<Vec<PageRecord>, AppError>;
    async fn retrieve_user(&self, user_id: &str) -> Result<UserRef, AppError>;
}
