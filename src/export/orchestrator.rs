// src/export/orchestrator.rs
//! Drives one export run over requested and discovered roots.
//!
//! Roots are processed level by level. Within a level every page and
//! database is fetched concurrently, metadata alongside content; paths and
//! headers are composed once the whole level is in, so a parent's path is
//! always known before any of its children are composed.

use super::crawler::TreeCrawler;
use super::front_matter::{compose_document, compose_front_matter};
use super::state::ExportState;
use super::users::UserNames;
use crate::api::NotionGateway;
use crate::config::ExportOptions;
use crate::error::AppError;
use crate::error_recovery::RetryPolicy;
use crate::formatting::{render_property, BlockRenderer, TableBuilder};
use crate::model::PageMeta;
use crate::types::NotionId;
use futures::future::join_all;
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

/// Exports Notion pages and databases to Markdown documents.
pub struct NotionExporter {
    gateway: Arc<dyn NotionGateway>,
    options: ExportOptions,
    retry: RetryPolicy,
}

impl NotionExporter {
    pub fn new(gateway: Arc<dyn NotionGateway>, options: ExportOptions) -> Self {
        Self {
            gateway,
            options,
            retry: RetryPolicy::default(),
        }
    }

    /// Replaces the retry policy applied to every gateway call.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Exports the given roots and returns one document per exported id.
    ///
    /// Ids are normalized first; excluded ids are never fetched. With child
    /// export enabled, discovered child pages, child databases and database
    /// entries are exported too, each at most once per run. Fails with
    /// [`AppError::InvalidInput`] when no page or database id is given, and
    /// with the first unrecoverable failure of any root otherwise.
    pub async fn export_roots(
        &self,
        page_ids: &[NotionId],
        database_ids: &[NotionId],
        exclude_ids: &[NotionId],
    ) -> Result<IndexMap<NotionId, String>, AppError> {
        if page_ids.is_empty() && database_ids.is_empty() {
            return Err(AppError::InvalidInput(
                "No page or database ids to export".to_string(),
            ));
        }

        let run = ExportRun {
            gateway: self.gateway.as_ref(),
            options: &self.options,
            retry: &self.retry,
            state: ExportState::new(),
            renderer: BlockRenderer::new(),
            users: UserNames::new(),
        };

        for id in exclude_ids {
            run.state.mark_visited(&normalized(id));
        }

        let mut pages: IndexSet<NotionId> = page_ids.iter().map(normalized).collect();
        let mut databases: IndexSet<NotionId> = database_ids.iter().map(normalized).collect();
        let mut documents = IndexMap::new();
        let mut depth = 0;

        loop {
            let page_batch = run.claim(pages);
            let database_batch = run.claim(databases);
            if page_batch.is_empty() && database_batch.is_empty() {
                break;
            }

            log::debug!(
                "Export level {}: {} pages, {} databases",
                depth,
                page_batch.len(),
                database_batch.len()
            );

            let level = run.export_level(&page_batch, &database_batch).await?;
            documents.extend(level.documents);

            if !self.options.export_child_pages {
                break;
            }
            pages = level.child_pages;
            databases = level.child_databases;
            depth += 1;
        }

        log::info!("Exported {} documents", documents.len());
        Ok(documents)
    }
}

fn normalized(id: &NotionId) -> NotionId {
    NotionId::normalize(id.as_str())
}

/// Everything fetched for one root, before its header is composed.
struct RootExport {
    requested: NotionId,
    meta: PageMeta,
    body: String,
    child_pages: IndexSet<NotionId>,
    child_databases: IndexSet<NotionId>,
}

#[derive(Default)]
struct LevelOutcome {
    documents: IndexMap<NotionId, String>,
    child_pages: IndexSet<NotionId>,
    child_databases: IndexSet<NotionId>,
}

/// State scoped to a single call of [`NotionExporter::export_roots`].
struct ExportRun<'a> {
    gateway: &'a dyn NotionGateway,
    options: &'a ExportOptions,
    retry: &'a RetryPolicy,
    state: ExportState,
    renderer: BlockRenderer,
    users: UserNames,
}

impl ExportRun<'_> {
    /// Keeps the ids not yet visited and marks them visited.
    fn claim(&self, ids: IndexSet<NotionId>) -> Vec<NotionId> {
        ids.into_iter()
            .filter(|id| self.state.mark_visited(id))
            .collect()
    }

    async fn export_level(
        &self,
        pages: &[NotionId],
        databases: &[NotionId],
    ) -> Result<LevelOutcome, AppError> {
        let (page_results, database_results) = futures::join!(
            join_all(pages.iter().map(|id| self.export_page(id))),
            join_all(databases.iter().map(|id| self.export_database(id))),
        );

        let mut level = LevelOutcome::default();
        for root in page_results.into_iter().chain(database_results) {
            self.finish_root(root?, &mut level)?;
        }
        Ok(level)
    }

    /// Registers a root's children, composes its path and, unless its title
    /// is filtered out, its document.
    fn finish_root(&self, root: RootExport, level: &mut LevelOutcome) -> Result<(), AppError> {
        let RootExport {
            requested,
            meta,
            body,
            child_pages,
            child_databases,
        } = root;

        self.state.mark_visited(&meta.id);
        for child in child_pages.iter().chain(&child_databases) {
            if !self.state.is_visited(child) {
                self.state.register_child(child, &meta.id);
            }
        }

        let path = self.state.compose_path(&requested, &meta.id, &meta.title)?;

        if self.options.excludes_title(&meta.title) {
            log::info!(
                "Skipping '{}' ({}): title matches the exclusion filter",
                meta.title,
                meta.id
            );
        } else {
            let front_matter =
                compose_front_matter(&meta, &path, self.options.extract_page_metadata);
            level
                .documents
                .insert(meta.id.clone(), compose_document(&front_matter, &body));
        }

        level.child_pages.extend(child_pages);
        level.child_databases.extend(child_databases);
        Ok(())
    }

    async fn export_page(&self, id: &NotionId) -> Result<RootExport, AppError> {
        log::info!("Fetching page {}.", id);
        let crawler = TreeCrawler::new(self.gateway, &self.renderer, self.retry);
        let (meta, content) = futures::try_join!(self.page_meta(id), crawler.crawl(id))?;

        Ok(RootExport {
            requested: id.clone(),
            meta,
            body: content.lines.join("\n"),
            child_pages: content.child_pages,
            child_databases: content.child_databases,
        })
    }

    async fn export_database(&self, id: &NotionId) -> Result<RootExport, AppError> {
        log::info!("Fetching database {}.", id);
        let (meta, (body, entry_ids)) =
            futures::try_join!(self.database_meta(id), self.database_content(id))?;

        Ok(RootExport {
            requested: id.clone(),
            meta,
            body,
            child_pages: entry_ids,
            child_databases: IndexSet::new(),
        })
    }

    async fn page_meta(&self, id: &NotionId) -> Result<PageMeta, AppError> {
        let label = format!("retrieve page {}", id);
        let page = self
            .retry
            .execute(&label, || self.gateway.retrieve_page(id))
            .await?;

        let (created_by, last_edited_by) = futures::join!(
            self.users.name_of(self.gateway, self.retry, &page.created_by),
            self.users.name_of(self.gateway, self.retry, &page.last_edited_by),
        );

        let properties = page
            .parent
            .is_database()
            .then(|| {
                page.properties
                    .iter()
                    .map(|(name, value)| (name.clone(), render_property(value)))
                    .collect::<IndexMap<_, _>>()
            })
            .filter(|properties| !properties.is_empty());

        Ok(PageMeta {
            id: page.id.clone(),
            title: page.title(),
            url: page.url.clone(),
            created_by,
            last_edited_by,
            last_edited_time: page.last_edited_time.clone(),
            parent_id: page.parent.id().cloned(),
            properties,
        })
    }

    /// Database metadata; an inaccessible database gets placeholder metadata.
    async fn database_meta(&self, id: &NotionId) -> Result<PageMeta, AppError> {
        let label = format!("retrieve database {}", id);
        let database = match self
            .retry
            .execute(&label, || self.gateway.retrieve_database(id))
            .await
        {
            Ok(database) => database,
            Err(e) if e.is_inaccessible() => {
                log::warn!("Database {} is not accessible ({}); it might be linked", id, e);
                return Ok(PageMeta::inaccessible_database(id.clone()));
            }
            Err(e) => return Err(e),
        };

        let (created_by, last_edited_by) = futures::join!(
            self.users
                .name_of(self.gateway, self.retry, &database.created_by),
            self.users
                .name_of(self.gateway, self.retry, &database.last_edited_by),
        );

        Ok(PageMeta {
            id: database.id.clone(),
            title: database.title(),
            url: database.url.clone(),
            created_by,
            last_edited_by,
            last_edited_time: database.last_edited_time.clone(),
            parent_id: database.parent.id().cloned(),
            properties: None,
        })
    }

    /// The database table and its entry ids; empty when the database is inaccessible.
    async fn database_content(
        &self,
        id: &NotionId,
    ) -> Result<(String, IndexSet<NotionId>), AppError> {
        match self.database_table(id).await {
            Err(e) if e.is_inaccessible() => {
                log::info!("Skipping content of inaccessible database {}: {}", id, e);
                Ok((String::new(), IndexSet::new()))
            }
            other => other,
        }
    }

    async fn database_table(&self, id: &NotionId) -> Result<(String, IndexSet<NotionId>), AppError> {
        let database = self
            .retry
            .execute(&format!("retrieve database {}", id), || {
                self.gateway.retrieve_database(id)
            })
            .await?;
        let entries = self
            .retry
            .execute(&format!("query database {}", id), || {
                self.gateway.query_database(id)
            })
            .await?;

        let table = TableBuilder::new(&database, &entries).build();
        let entry_ids = entries.iter().map(|entry| entry.id.clone()).collect();
        Ok((table, entry_ids))
    }
}
