// src/api/parser.rs
//! Turns raw Notion responses into typed records and typed failures.
//!
//! Error bodies are decoded with notion-client's error object so the code
//! string Notion sends maps onto [`NotionErrorCode`].

use super::client::ApiResponse;
use super::types::PaginatedResponse;
use crate::error::{AppError, NotionErrorCode};
use crate::model::{Block, BlockKind, Parent};
use crate::types::NotionId;
use notion_client::objects::error::Error as NotionError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Parses a response: a typed record on success, a classified error otherwise.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    if result.status.is_success() {
        parse_body(&result.data, &result.url)
    } else {
        Err(parse_error_body(&result))
    }
}

fn parse_body<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::MalformedResponse(format!("{} (body: {})", e, preview(body)))
    })
}

/// Maps a non-2xx response onto [`AppError::NotionService`].
pub fn parse_error_body(result: &ApiResponse<String>) -> AppError {
    let status = result.status.as_u16();

    match serde_json::from_str::<NotionError>(&result.data) {
        Ok(notion_error) => AppError::NotionService {
            code: NotionErrorCode::from_api_response(&notion_error.code),
            message: notion_error.message,
            status,
            retry_after: result.retry_after,
        },
        Err(_) => AppError::NotionService {
            code: NotionErrorCode::from_http_status(status),
            message: format!("HTTP {} from {}", result.status, result.url),
            status,
            retry_after: result.retry_after,
        },
    }
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(500) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[derive(Deserialize)]
struct BlockHeader {
    id: NotionId,
    #[serde(default)]
    parent: Option<Parent>,
    #[serde(default)]
    has_children: bool,
    #[serde(rename = "type", default)]
    block_type: String,
}

/// Parses one block object.
///
/// A block of a known type whose payload doesn't match what we expect is
/// downgraded to [`BlockKind::Unsupported`] rather than failing its page.
pub fn parse_block(value: &Value) -> Result<Block, AppError> {
    let header = BlockHeader::deserialize(value)?;

    let kind = BlockKind::deserialize(value).unwrap_or_else(|e| {
        log::warn!(
            "Failed to parse {} block {}: {}. Skipping its content.",
            header.block_type,
            header.id,
            e
        );
        BlockKind::Unsupported
    });

    if kind == BlockKind::Unsupported {
        log::debug!(
            "Block {} has unsupported type '{}'",
            header.id,
            header.block_type
        );
    }

    Ok(Block {
        id: header.id,
        parent_id: header.parent.as_ref().and_then(Parent::id).cloned(),
        has_children: header.has_children,
        kind,
    })
}

/// Parses one page of a block children listing.
pub fn parse_blocks_page(result: ApiResponse<String>) -> Result<PaginatedResponse<Block>, AppError> {
    let raw: PaginatedResponse<Value> = parse_api_response(result)?;
    let results = raw
        .results
        .iter()
        .map(parse_block)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PaginatedResponse {
        results,
        next_cursor: raw.next_cursor,
        has_more: raw.has_more,
    })
}
