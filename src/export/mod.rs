// src/export/mod.rs
//! The export engine: crawling block trees and assembling documents.

mod crawler;
mod front_matter;
mod orchestrator;
mod state;
mod users;

pub use crawler::{CrawlOutput, TreeCrawler};
pub use front_matter::{compose_document, compose_front_matter};
pub use orchestrator::NotionExporter;
pub use state::ExportState;
