// src/output/writer.rs
//! Executes output plans. This is the only place documents touch the disk.

use super::types::{DeliveryTarget, OutputPlan, OutputReport};
use crate::error::AppError;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Delivers every operation of the plan. A failed operation is recorded
/// and the remaining ones still run.
pub fn deliver(plan: OutputPlan) -> OutputReport {
    let started = Instant::now();
    let mut report = OutputReport::new();

    for operation in plan.operations {
        match execute(&operation) {
            Ok(bytes_written) => report.record_success(operation, bytes_written),
            Err(e) => {
                log::error!("Could not write {}: {}", operation.path().display(), e);
                report.record_failure(operation, e.to_string());
            }
        }
    }

    report.stats.elapsed_ms = started.elapsed().as_millis() as u64;
    log::info!(
        "Wrote {} files ({} bytes), {} failures",
        report.stats.files_written,
        report.stats.bytes_written,
        report.failed.len()
    );
    report
}

fn execute(operation: &DeliveryTarget) -> Result<usize, AppError> {
    match operation {
        DeliveryTarget::CreateDirectory { path } => ensure_directory(path).map(|_| 0),
        DeliveryTarget::WriteFile { path, content } => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
            log::debug!("Wrote {} bytes to {}", content.len(), path.display());
            Ok(content.len())
        }
    }
}

fn ensure_directory(path: &Path) -> Result<(), AppError> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} exists and is not a directory", path.display()),
        )));
    }
    fs::create_dir_all(path)?;
    log::info!("Created directory: {}", path.display());
    Ok(())
}
