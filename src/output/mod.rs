// src/output/mod.rs
//! Persistence of exported documents.
//!
//! Planning (which file gets which document) is kept apart from delivery,
//! the only place where the filesystem is touched.

mod paths;
mod types;
mod writer;

pub use paths::{document_file_name, document_path, plan_documents};
pub use types::{
    CompletedWrite, DeliveryTarget, ExecutionStats, FailedWrite, OutputPlan, OutputReport,
};
pub use writer::deliver;
