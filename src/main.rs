// src/main.rs
use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_exporter::output::{deliver, plan_documents, OutputReport};
use notion_exporter::{CommandLineInput, ExportConfig, NotionExporter, NotionHttpClient};
use std::fs;
use std::sync::Arc;
use std::time::Instant;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("notion_exporter.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Fetches every requested root, writes one Markdown file per document.
async fn run_export(config: &ExportConfig) -> anyhow::Result<OutputReport> {
    let client = NotionHttpClient::with_base_url(
        &config.api_key,
        notion_exporter::constants::NOTION_API_BASE_URL,
        config.request_timeout,
    )?;
    let exporter = NotionExporter::new(Arc::new(client), config.options.clone());

    let documents = exporter
        .export_roots(&config.page_ids, &config.database_ids, &config.exclude_ids)
        .await
        .context("Export failed")?;

    Ok(deliver(plan_documents(&config.output_dir, &documents)))
}

fn report_completion(report: &OutputReport, elapsed_secs: f64) -> anyhow::Result<()> {
    let written = report.written_files().count();
    println!(
        "Exported {} documents ({} bytes) in {:.1}s",
        written, report.stats.bytes_written, elapsed_secs
    );

    if !report.is_success() {
        for failed in &report.failed {
            eprintln!("Failed: {}", failed.error);
        }
        anyhow::bail!("{} output operations failed", report.failed.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).map_err(|e| anyhow::anyhow!("Logging setup failed: {}", e))?;

    let config = ExportConfig::resolve(cli)?;

    let started = Instant::now();
    let report = run_export(&config).await?;
    report_completion(&report, started.elapsed().as_secs_f64())
}
