// src/export/crawler.rs
//! Recursive, concurrent rendering of one block subtree.
//!
//! Children of every block are fetched concurrently, but each level is
//! reassembled in the order Notion listed the siblings: a block's own line,
//! then its subtree's lines, then the next sibling.

use crate::api::NotionGateway;
use crate::error::AppError;
use crate::error_recovery::RetryPolicy;
use crate::formatting::BlockRenderer;
use crate::model::{Block, BlockKind};
use crate::types::NotionId;
use futures::future::{self, BoxFuture, FutureExt};
use indexmap::IndexSet;

/// Rendered lines of a subtree plus the child pages and databases it references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlOutput {
    pub lines: Vec<String>,
    pub child_pages: IndexSet<NotionId>,
    pub child_databases: IndexSet<NotionId>,
}

impl CrawlOutput {
    fn absorb(&mut self, subtree: CrawlOutput) {
        self.lines.extend(subtree.lines);
        self.child_pages.extend(subtree.child_pages);
        self.child_databases.extend(subtree.child_databases);
    }
}

/// Walks block trees through a gateway, rendering as it goes.
pub struct TreeCrawler<'a> {
    gateway: &'a dyn NotionGateway,
    renderer: &'a BlockRenderer,
    retry: &'a RetryPolicy,
}

impl<'a> TreeCrawler<'a> {
    pub fn new(
        gateway: &'a dyn NotionGateway,
        renderer: &'a BlockRenderer,
        retry: &'a RetryPolicy,
    ) -> Self {
        Self {
            gateway,
            renderer,
            retry,
        }
    }

    /// Renders everything below `root`.
    ///
    /// Child pages and child databases are recorded, never descended into.
    /// Any failure other than a missing object aborts the whole crawl; the
    /// sibling subtrees still in flight are dropped with it.
    pub async fn crawl(&self, root: &NotionId) -> Result<CrawlOutput, AppError> {
        self.crawl_level(root.clone(), false, 0).await
    }

    fn crawl_level(
        &self,
        block_id: NotionId,
        parent_is_list_item: bool,
        indent_level: usize,
    ) -> BoxFuture<'_, Result<CrawlOutput, AppError>> {
        async move {
            let blocks = insert_table_delimiter(self.fetch_children(&block_id).await?);

            let mut output = CrawlOutput::default();
            let mut lines = Vec::with_capacity(blocks.len());
            let mut subtrees = Vec::with_capacity(blocks.len());

            for block in &blocks {
                let is_list_item = block.kind.is_list_item();
                let rendered = self.renderer.render_block(block);
                let indent = parent_is_list_item && is_list_item;
                lines.push(indented(rendered, indent, indent_level));

                let is_reference = match &block.kind {
                    BlockKind::ChildPage { .. } => {
                        output.child_pages.insert(block.id.clone());
                        true
                    }
                    BlockKind::ChildDatabase { .. } => {
                        output.child_databases.insert(block.id.clone());
                        true
                    }
                    _ => false,
                };

                let subtree = if block.has_children && !is_reference {
                    self.crawl_level(block.id.clone(), is_list_item, indent_level + 1)
                } else {
                    future::ready(Ok(CrawlOutput::default())).boxed()
                };
                subtrees.push(subtree);
            }

            let subtrees = future::try_join_all(subtrees).await?;

            for (line, subtree) in lines.into_iter().zip(subtrees) {
                output.lines.push(line);
                output.absorb(subtree);
            }

            Ok(output)
        }
        .boxed()
    }

    /// Lists the children of `block_id`; a missing object has no children.
    async fn fetch_children(&self, block_id: &NotionId) -> Result<Vec<Block>, AppError> {
        let label = format!("list children of {}", block_id);
        match self
            .retry
            .execute(&label, || self.gateway.list_children(block_id))
            .await
        {
            Ok(mut blocks) => {
                for block in &mut blocks {
                    block.parent_id.get_or_insert_with(|| block_id.clone());
                }
                Ok(blocks)
            }
            Err(e) if e.is_not_found() => {
                log::info!("Children of {} are not accessible: {}", block_id, e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// Inserts a `---` separator row after the first row when the listing is a table.
fn insert_table_delimiter(mut blocks: Vec<Block>) -> Vec<Block> {
    if let Some(first) = blocks.first() {
        if let Some(cells) = first.cell_count() {
            let delimiter = Block::table_delimiter(cells, first.parent_id.clone());
            blocks.insert(1, delimiter);
        }
    }
    blocks
}

fn indented(line: String, indent: bool, indent_level: usize) -> String {
    if indent && !line.is_empty() {
        format!("{}{}", "\t".repeat(indent_level), line)
    } else {
        line
    }
}
