// src/output/paths.rs
//! Pure path calculations for exported documents.

use super::types::{DeliveryTarget, OutputPlan};
use crate::types::NotionId;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// `{id}.md`, with any character unsafe in a filename replaced by `_`.
pub fn document_file_name(id: &NotionId) -> String {
    let safe: String = id
        .as_str()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}.md", safe)
}

pub fn document_path(output_dir: &Path, id: &NotionId) -> PathBuf {
    output_dir.join(document_file_name(id))
}

/// Plans the output directory followed by one file per document.
pub fn plan_documents(output_dir: &Path, documents: &IndexMap<NotionId, String>) -> OutputPlan {
    documents.iter().fold(
        OutputPlan::new().with_operation(DeliveryTarget::CreateDirectory {
            path: output_dir.to_path_buf(),
        }),
        |plan, (id, content)| {
            plan.with_operation(DeliveryTarget::WriteFile {
                path: document_path(output_dir, id),
                content: content.clone(),
            })
        },
    )
}
