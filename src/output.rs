// src/output.rs
// =============================================================================
// Turns crawl results into text.
//
// stdout (or the --output file) only ever carries the results, so the output
// can be piped straight into other tools. Progress and the summary go to
// stderr.
// =============================================================================

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::crawl::CrawlReport;
use crate::listing::Classification;

// Shape of the --json crawl output
#[derive(Serialize)]
struct JsonReport<'a> {
    root_url: &'a str,
    total: usize,
    pages_fetched: usize,
    files: &'a [String],
}

// One row of the `links` command
#[derive(Serialize)]
pub struct LinkRow {
    pub href: String,
    pub classification: Classification,
}

/// Renders the file list: one path per line, or a JSON document.
pub fn render_report(report: &CrawlReport, json: bool) -> Result<String> {
    if json {
        let doc = JsonReport {
            root_url: report.root_url.as_str(),
            total: report.files.len(),
            pages_fetched: report.pages_fetched,
            files: &report.files,
        };
        let mut text = serde_json::to_string_pretty(&doc)?;
        text.push('\n');
        Ok(text)
    } else {
        let mut text = String::new();
        for file in &report.files {
            text.push_str(file);
            text.push('\n');
        }
        Ok(text)
    }
}

/// Writes rendered output to a file, or to stdout when no path is given.
pub fn write_output(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("cannot write output to {}", path.display()))?;
            log::info!("Wrote results to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Prints the end-of-crawl summary to stderr.
pub fn print_summary(report: &CrawlReport) {
    eprintln!();
    eprintln!("📊 Summary:");
    eprintln!("   🌐 Root: {}", report.root_url);
    eprintln!("   📄 Pages fetched: {}", report.pages_fetched);
    eprintln!("   📋 Found {} files.", report.files.len());
}

/// Renders the `links` command result as a table or JSON.
pub fn render_links(rows: &[LinkRow], json: bool) -> Result<String> {
    if json {
        let mut text = serde_json::to_string_pretty(rows)?;
        text.push('\n');
        return Ok(text);
    }

    let mut text = format!("{:<60} {:<10}\n{}\n", "HREF", "ACTION", "=".repeat(71));
    for row in rows {
        // Truncate long hrefs for display
        let href = if row.href.chars().count() > 57 {
            format!("{}...", row.href.chars().take(57).collect::<String>())
        } else {
            row.href.clone()
        };
        text.push_str(&format!("{:<60} {:<10}\n", href, format_classification(row.classification)));
    }
    Ok(text)
}

fn format_classification(class: Classification) -> &'static str {
    match class {
        Classification::Skip => "skip",
        Classification::Descend => "descend",
        Classification::Collect => "collect",
    }
}
