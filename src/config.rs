// src/config.rs
use crate::constants::DEFAULT_REQUEST_TIMEOUT;
use crate::error::AppError;
use crate::types::{ApiKey, NotionId};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Notion page URL or ID to export (repeatable)
    #[arg(short = 'p', long = "page", value_name = "ID|URL")]
    pub pages: Vec<String>,

    /// Notion database URL or ID to export (repeatable)
    #[arg(short = 'd', long = "database", value_name = "ID|URL")]
    pub databases: Vec<String>,

    /// Page or database URL or ID to skip (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "ID|URL")]
    pub exclude: Vec<String>,

    /// Also export child pages and databases discovered along the way
    #[arg(long, default_value_t = false)]
    pub export_child_pages: bool,

    /// Prefix every document with a YAML header of page metadata
    #[arg(long, default_value_t = false)]
    pub extract_page_metadata: bool,

    /// Skip pages whose title contains this text (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    pub exclude_title_containing: Option<String>,

    /// Directory the Markdown files are written to
    #[arg(short, long, default_value = "notion_export")]
    pub output_dir: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub request_timeout: u64,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// The switches the export engine itself recognizes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Keep exporting discovered child pages and databases, level by level.
    pub export_child_pages: bool,
    /// Emit the YAML metadata header before each document.
    pub extract_page_metadata: bool,
    /// Case-insensitive title filter; matching roots produce no document.
    pub exclude_title_containing: Option<String>,
}

impl ExportOptions {
    /// Whether `title` matches the exclusion filter.
    pub fn excludes_title(&self, title: &str) -> bool {
        match self.exclude_title_containing.as_deref() {
            Some(needle) if !needle.is_empty() => {
                title.to_lowercase().contains(&needle.to_lowercase())
            }
            _ => false,
        }
    }
}

/// Resolved configuration: validated and ready to drive an export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub api_key: ApiKey,
    pub page_ids: Vec<NotionId>,
    pub database_ids: Vec<NotionId>,
    pub exclude_ids: Vec<NotionId>,
    pub options: ExportOptions,
    pub output_dir: PathBuf,
    pub request_timeout: Duration,
    pub verbose: bool,
}

impl ExportConfig {
    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let api_key_str = std::env::var("NOTION_API_KEY").map_err(|_| {
            AppError::MissingConfiguration(
                "NOTION_API_KEY environment variable not set".to_string(),
            )
        })?;

        Self::from_parts(cli, api_key_str)
    }

    /// Resolves a configuration from CLI input and an explicit API token.
    pub fn from_parts(cli: CommandLineInput, api_key: String) -> Result<Self, AppError> {
        let api_key = ApiKey::new(api_key)?;

        if cli.pages.is_empty() && cli.databases.is_empty() {
            return Err(AppError::InvalidInput(
                "Specify at least one --page or --database".to_string(),
            ));
        }

        Ok(ExportConfig {
            api_key,
            page_ids: parse_ids(&cli.pages)?,
            database_ids: parse_ids(&cli.databases)?,
            exclude_ids: parse_ids(&cli.exclude)?,
            options: ExportOptions {
                export_child_pages: cli.export_child_pages,
                extract_page_metadata: cli.extract_page_metadata,
                exclude_title_containing: cli.exclude_title_containing,
            },
            output_dir: PathBuf::from(cli.output_dir),
            request_timeout: Duration::from_secs(cli.request_timeout),
            verbose: cli.verbose,
        })
    }
}

fn parse_ids(inputs: &[String]) -> Result<Vec<NotionId>, AppError> {
    inputs
        .iter()
        .map(|input| NotionId::from_input(input).map_err(AppError::from))
        .collect()
}
