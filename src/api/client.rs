// src/api/client.rs
//! HTTP implementation of [`NotionGateway`](super::NotionGateway).
//!
//! A thin wrapper around reqwest: authentication headers, endpoint paths,
//! cursor parameters, and the `Retry-After` header. Parsing lives in
//! [`parser`](super::parser).

use super::pagination::fetch_all_pages;
use super::parser::{parse_api_response, parse_blocks_page};
use crate::constants::{DEFAULT_REQUEST_TIMEOUT, NOTION_API_BASE_URL, NOTION_API_VERSION};
use crate::error::AppError;
use crate::model::{Block, DatabaseRecord, PageRecord, UserRef};
use crate::types::{ApiKey, NotionId};
use reqwest::{header, Client, Response};
use serde::Serialize;
use std::time::Duration;

/// Notion API client over HTTPS.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a client for the production API.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        Self::with_base_url(api_key, NOTION_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a client against another base URL, e.g. a local mock server.
    pub fn with_base_url(
        api_key: &ApiKey,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a GET request to the specified endpoint.
    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {}", url);
        Ok(self.client.get(url).query(query).send().await?)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }
}

#[async_trait::async_trait]
impl super::NotionGateway for NotionHttpClient {
    async fn list_children(&self, block_id: &NotionId) -> Result<Vec<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", block_id);
        let drained = fetch_all_pages(|page_size, cursor| {
            let endpoint = endpoint.clone();
            async move {
                let mut query = vec![("page_size", page_size.to_string())];
                if let Some(cursor) = cursor {
                    query.push(("start_cursor", cursor));
                }
                let response = self.get(&endpoint, &query).await?;
                parse_blocks_page(extract_response_text(response).await?)
            }
        })
        .await?;
        log::debug!(
            "Listed {} children of {} across {} pages",
            drained.items.len(),
            block_id,
            drained.pages_fetched
        );
        Ok(drained.items)
    }

    async fn retrieve_page(&self, page_id: &NotionId) -> Result<PageRecord, AppError> {
        let response = self.get(&format!("pages/{}", page_id), &[]).await?;
        parse_api_response(extract_response_text(response).await?)
    }

    async fn retrieve_database(
        &self,
        database_id: &NotionId,
    ) -> Result<DatabaseRecord, AppError> {
        let response = self
            .get(&format!("databases/{}", database_id), &[])
            .await?;
        parse_api_response(extract_response_text(response).await?)
    }

    async fn query_database(&self, database_id: &NotionId) -> Result<Vec<PageRecord>, AppError> {
        let endpoint = format!("databases/{}/query", database_id);
        let drained = fetch_all_pages(|page_size, cursor| {
            let endpoint = endpoint.clone();
            async move {
                let mut body = serde_json::json!({ "page_size": page_size });
                if let Some(cursor) = cursor {
                    body["start_cursor"] = serde_json::json!(cursor);
                }
                let response = self.post(&endpoint, &body).await?;
                parse_api_response(extract_response_text(response).await?)
            }
        })
        .await?;
        log::debug!(
            "Queried {} entries of {} across {} pages",
            drained.items.len(),
            database_id,
            drained.pages_fetched
        );
        Ok(drained.items)
    }

    async fn retrieve_user(&self, user_id: &str) -> Result<UserRef, AppError> {
        let response = self.get(&format!("users/{}", user_id), &[]).await?;
        let user: notion_client::objects::user::User =
            parse_api_response(extract_response_text(response).await?)?;
        Ok(UserRef {
            id: user.id,
            name: user.name,
        })
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
    /// Parsed `Retry-After` header, in whole seconds.
    pub retry_after: Option<Duration>,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let retry_after = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs);
    let data = response.text().await?;

    Ok(ApiResponse {
        data,
        status,
        url,
        retry_after,
    })
}
