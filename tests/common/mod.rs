// tests/common/mod.rs
//! An in-memory Notion workspace for driving the export engine.

#![allow(dead_code)]

use indexmap::IndexMap;
use notion_exporter::api::parser::parse_block;
use notion_exporter::model::SchemaProperty;
use notion_exporter::{
    AppError, Block, DatabaseRecord, ExponentialBackoff, NotionErrorCode, NotionGateway,
    NotionId, PageRecord, Parent, PropertyValue, RetryPolicy, RichTextItem, UserRef,
};
use parking_lot::Mutex;
use rand::Rng;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// A dashed id whose first group is `n` in hex.
pub fn id(n: u32) -> NotionId {
    NotionId::from(format!("{:08x}-0000-0000-0000-000000000000", n).as_str())
}

pub fn named_user(name: &str) -> UserRef {
    UserRef {
        id: format!("user-{}", name.to_lowercase()),
        name: Some(name.to_string()),
    }
}

pub fn user_ref(user_id: &str) -> UserRef {
    UserRef {
        id: user_id.to_string(),
        name: None,
    }
}

pub fn under_page(parent: &NotionId) -> Parent {
    Parent::PageId {
        page_id: parent.clone(),
    }
}

pub fn under_database(parent: &NotionId) -> Parent {
    Parent::DatabaseId {
        database_id: parent.clone(),
    }
}

pub fn page(page_id: &NotionId, title: &str, parent: Parent) -> PageRecord {
    let mut properties = IndexMap::new();
    properties.insert(
        "title".to_string(),
        PropertyValue::Title {
            title: vec![RichTextItem::plain_text(title)],
        },
    );
    PageRecord {
        id: page_id.clone(),
        url: format!("https://www.notion.so/{}", page_id.to_compact()),
        created_by: named_user("Ada"),
        last_edited_by: named_user("Ada"),
        last_edited_time: "2024-05-01T10:00:00.000Z".to_string(),
        parent,
        properties,
    }
}

/// An entry of a database whose schema is `Name` (title) then `Status` (select).
pub fn entry(entry_id: &NotionId, database_id: &NotionId, name: &str, status: Option<&str>) -> PageRecord {
    let mut properties = IndexMap::new();
    properties.insert(
        "Name".to_string(),
        PropertyValue::Title {
            title: vec![RichTextItem::plain_text(name)],
        },
    );
    if let Some(status) = status {
        properties.insert(
            "Status".to_string(),
            serde_json::from_value(json!({ "type": "select", "select": { "name": status } }))
                .unwrap(),
        );
    }
    PageRecord {
        properties,
        ..page(entry_id, name, under_database(database_id))
    }
}

pub fn database(database_id: &NotionId, title: &str, parent: Parent) -> DatabaseRecord {
    let mut properties = IndexMap::new();
    properties.insert(
        "Status".to_string(),
        SchemaProperty {
            name: "Status".to_string(),
            property_type: "select".to_string(),
        },
    );
    properties.insert(
        "Name".to_string(),
        SchemaProperty {
            name: "Name".to_string(),
            property_type: "title".to_string(),
        },
    );
    DatabaseRecord {
        id: database_id.clone(),
        title: vec![RichTextItem::plain_text(title)],
        description: Vec::new(),
        url: format!("https://www.notion.so/{}", database_id.to_compact()),
        created_by: named_user("Ada"),
        last_edited_by: named_user("Ada"),
        last_edited_time: "2024-05-01T10:00:00.000Z".to_string(),
        parent,
        properties,
    }
}

/// A block as the API would list it. Table rows get `text` and an empty second cell.
pub fn block(block_id: &NotionId, kind: &str, text: &str, has_children: bool) -> Block {
    let payload = match kind {
        "table_row" => json!({ "cells": [[{ "type": "text", "text": { "content": text }, "plain_text": text }], []] }),
        "child_page" | "child_database" => json!({ "title": text }),
        "table" => json!({ "table_width": 2 }),
        _ => json!({ "rich_text": [{ "type": "text", "text": { "content": text }, "plain_text": text }] }),
    };
    parse_block(&json!({
        "id": block_id.as_str(),
        "type": kind,
        "has_children": has_children,
        kind: payload,
    }))
    .unwrap()
}

pub fn service_error(code: NotionErrorCode) -> AppError {
    AppError::NotionService {
        message: format!("{} from fake workspace", code),
        code,
        status: 400,
        retry_after: None,
    }
}

/// Retries quickly so tests exercising transient failures stay fast.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(
        3,
        ExponentialBackoff {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            max_jitter: Duration::ZERO,
        },
    )
}

/// Pages, databases and block trees served from memory.
///
/// Every call is counted under `"{operation}:{id}"`. Calls can be scripted
/// to fail once (`fail_once`) or always (`deny`), and each call may sleep a
/// random time up to `max_latency` to shuffle completion order.
#[derive(Default)]
pub struct FakeWorkspace {
    pages: HashMap<NotionId, PageRecord>,
    databases: HashMap<NotionId, DatabaseRecord>,
    entries: HashMap<NotionId, Vec<PageRecord>>,
    children: HashMap<NotionId, Vec<Block>>,
    users: HashMap<String, String>,
    denied: HashMap<String, NotionErrorCode>,
    scripted: Mutex<HashMap<String, VecDeque<NotionErrorCode>>>,
    calls: Mutex<HashMap<String, usize>>,
    max_latency: Duration,
}

impl FakeWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, max_latency: Duration) -> Self {
        self.max_latency = max_latency;
        self
    }

    pub fn add_page(&mut self, record: PageRecord, blocks: Vec<Block>) {
        self.children.insert(record.id.clone(), blocks);
        self.pages.insert(record.id.clone(), record);
    }

    pub fn add_database(&mut self, record: DatabaseRecord, rows: Vec<PageRecord>) {
        for row in &rows {
            self.pages.insert(row.id.clone(), row.clone());
        }
        self.entries.insert(record.id.clone(), rows);
        self.databases.insert(record.id.clone(), record);
    }

    pub fn add_children(&mut self, parent: &NotionId, blocks: Vec<Block>) {
        self.children.insert(parent.clone(), blocks);
    }

    pub fn add_user(&mut self, user_id: &str, name: &str) {
        self.users.insert(user_id.to_string(), name.to_string());
    }

    pub fn deny(&mut self, operation: &str, target: &str, code: NotionErrorCode) {
        self.denied.insert(format!("{}:{}", operation, target), code);
    }

    pub fn fail_once(&self, operation: &str, target: &str, code: NotionErrorCode) {
        self.scripted
            .lock()
            .entry(format!("{}:{}", operation, target))
            .or_default()
            .push_back(code);
    }

    pub fn calls(&self, operation: &str, target: &str) -> usize {
        self.calls
            .lock()
            .get(&format!("{}:{}", operation, target))
            .copied()
            .unwrap_or(0)
    }

    fn random_delay(&self) -> Duration {
        let max_ms = self.max_latency.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }

    async fn enter(&self, operation: &str, target: &str) -> Result<(), AppError> {
        let key = format!("{}:{}", operation, target);
        *self.calls.lock().entry(key.clone()).or_insert(0) += 1;

        let delay = self.random_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let scripted = self
            .scripted
            .lock()
            .get_mut(&key)
            .and_then(|queue| queue.pop_front());
        match scripted.or_else(|| self.denied.get(&key).cloned()) {
            Some(code) => Err(service_error(code)),
            None => Ok(()),
        }
    }
}

fn not_found() -> AppError {
    service_error(NotionErrorCode::ObjectNotFound)
}

#[async_trait::async_trait]
impl NotionGateway for FakeWorkspace {
    async fn list_children(&self, block_id: &NotionId) -> Result<Vec<Block>, AppError> {
        self.enter("list_children", block_id.as_str()).await?;
        Ok(self.children.get(block_id).cloned().unwrap_or_default())
    }

    async fn retrieve_page(&self, page_id: &NotionId) -> Result<PageRecord, AppError> {
        self.enter("retrieve_page", page_id.as_str()).await?;
        self.pages.get(page_id).cloned().ok_or_else(not_found)
    }

    async fn retrieve_database(&self, database_id: &NotionId) -> Result<DatabaseRecord, AppError> {
        self.enter("retrieve_database", database_id.as_str()).await?;
        self.databases.get(database_id).cloned().ok_or_else(not_found)
    }

    async fn query_database(&self, database_id: &NotionId) -> Result<Vec<PageRecord>, AppError> {
        self.enter("query_database", database_id.as_str()).await?;
        self.entries.get(database_id).cloned().ok_or_else(not_found)
    }

    async fn retrieve_user(&self, user_id: &str) -> Result<UserRef, AppError> {
        self.enter("retrieve_user", user_id).await?;
        self.users
            .get(user_id)
            .map(|name| UserRef {
                id: user_id.to_string(),
                name: Some(name.clone()),
            })
            .ok_or_else(not_found)
    }
}
