// src/export/state.rs
//! Bookkeeping shared by every crawl of one export run.
//!
//! Each table sits behind its own lock and every operation takes the lock
//! once, so updates are linearizable per key. No lock is held across an
//! `.await`.

use crate::constants::PATH_SEPARATOR;
use crate::error::AppError;
use crate::types::NotionId;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct ExportState {
    visited: Mutex<HashSet<NotionId>>,
    parent_of: Mutex<HashMap<NotionId, NotionId>>,
    paths: Mutex<HashMap<NotionId, String>>,
}

impl ExportState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as visited. Returns `true` only the first time.
    pub fn mark_visited(&self, id: &NotionId) -> bool {
        self.visited.lock().insert(id.clone())
    }

    pub fn is_visited(&self, id: &NotionId) -> bool {
        self.visited.lock().contains(id)
    }

    /// Records that `child` was discovered under `parent`. The first parent wins.
    pub fn register_child(&self, child: &NotionId, parent: &NotionId) {
        self.parent_of
            .lock()
            .entry(child.clone())
            .or_insert_with(|| parent.clone());
    }

    /// Removes and returns the parent registered for `child`.
    pub fn take_parent(&self, child: &NotionId) -> Option<NotionId> {
        self.parent_of.lock().remove(child)
    }

    pub fn path_of(&self, id: &NotionId) -> Option<String> {
        self.paths.lock().get(id).cloned()
    }

    /// Composes and stores the path of a root.
    ///
    /// `requested` is the id the root was discovered or requested under and
    /// `canonical` the id Notion reported for it; the path is stored under
    /// both. A root with a registered parent must come after that parent.
    pub fn compose_path(
        &self,
        requested: &NotionId,
        canonical: &NotionId,
        title: &str,
    ) -> Result<String, AppError> {
        let parent = self
            .take_parent(requested)
            .or_else(|| self.take_parent(canonical));

        let path = match parent {
            Some(parent_id) => {
                let parent_path = self.path_of(&parent_id).ok_or_else(|| {
                    AppError::MissingParentPath {
                        child_id: requested.to_string(),
                        parent_id: parent_id.to_string(),
                    }
                })?;
                format!("{}{}{}", parent_path, PATH_SEPARATOR, title)
            }
            None => title.to_string(),
        };

        let mut paths = self.paths.lock();
        paths.insert(canonical.clone(), path.clone());
        if requested != canonical {
            paths.insert(requested.clone(), path.clone());
        }
        Ok(path)
    }
}
