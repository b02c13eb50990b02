// src/output/types.rs
//! Plans and reports for persisting documents.

use std::path::PathBuf;

/// Filesystem operations for one export, in execution order.
#[derive(Debug, Clone, Default)]
pub struct OutputPlan {
    pub operations: Vec<DeliveryTarget>,
}

impl OutputPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: DeliveryTarget) -> Self {
        self.operations.push(operation);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    CreateDirectory { path: PathBuf },
    WriteFile { path: PathBuf, content: String },
}

impl DeliveryTarget {
    pub fn path(&self) -> &PathBuf {
        match self {
            DeliveryTarget::CreateDirectory { path } | DeliveryTarget::WriteFile { path, .. } => {
                path
            }
        }
    }
}

/// What happened when a plan was delivered.
#[derive(Debug, Clone, Default)]
pub struct OutputReport {
    pub completed: Vec<CompletedWrite>,
    pub failed: Vec<FailedWrite>,
    pub stats: ExecutionStats,
}

impl OutputReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, operation: DeliveryTarget, bytes_written: usize) {
        if matches!(operation, DeliveryTarget::WriteFile { .. }) {
            self.stats.files_written += 1;
        }
        self.stats.bytes_written += bytes_written;
        self.completed.push(CompletedWrite {
            operation,
            bytes_written,
        });
    }

    pub fn record_failure(&mut self, operation: DeliveryTarget, error: String) {
        self.failed.push(FailedWrite { operation, error });
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Files written, in plan order.
    pub fn written_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.completed
            .iter()
            .filter(|done| matches!(done.operation, DeliveryTarget::WriteFile { .. }))
            .map(|done| done.operation.path())
    }
}

#[derive(Debug, Clone)]
pub struct CompletedWrite {
    pub operation: DeliveryTarget,
    pub bytes_written: usize,
}

#[derive(Debug, Clone)]
pub struct FailedWrite {
    pub operation: DeliveryTarget,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct ExecutionStats {
    pub files_written: usize,
    pub bytes_written: usize,
    pub elapsed_ms: u64,
}
