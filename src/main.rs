// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Load the config file and apply command-line overrides
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code:
//    0 = crawl finished (even if some pages failed to load)
//    1 = `links` could not fetch its page
//    2 = configuration or output error
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod listing;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use url::Url;

use cli::{Cli, Commands, CommonArgs, Overrides};
use config::{parse_root_url, CrawlConfig};
use crawl::Crawler;
use listing::{classify, HttpFetcher, PageFetcher};
use output::LinkRow;

#[tokio::main]
async fn main() {
    std::process::exit(exit_code(run().await));
}

// Ok carries the command's own code; any error is a configuration or
// output problem. Printed directly so it shows even with logging off.
fn exit_code(result: Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Crawl {
            root_url,
            common,
            output,
            delay_ms,
            concurrency,
            guard_cycles,
        } => {
            let overrides = Overrides {
                root_url,
                delay_ms,
                concurrency,
                guard_cycles,
            };
            handle_crawl(common, overrides, output).await
        }
        Commands::Links { url, common } => handle_links(&url, common).await,
    }
}

// Logs go to stderr; stdout is reserved for results
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn load_config(common: &CommonArgs, overrides: Overrides) -> Result<CrawlConfig> {
    let mut config = CrawlConfig::load_or_default(common.config.as_deref())?;
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn http_fetcher(config: &CrawlConfig) -> Result<HttpFetcher> {
    Ok(HttpFetcher::new(&config.user_agent, config.timeout())?)
}

// Handles the 'crawl' subcommand
async fn handle_crawl(common: CommonArgs, overrides: Overrides, output: Option<PathBuf>) -> Result<i32> {
    let config = load_config(&common, overrides)?;
    let root = config.root()?;

    let crawler = Crawler::new(
        root,
        Arc::new(http_fetcher(&config)?),
        Arc::new(config.skip_policy()),
    )
    .with_delay(config.delay())
    .with_concurrency(config.concurrency)
    .with_cycle_guard(config.guard_cycles);

    let report = crawler.crawl().await;

    let text = output::render_report(&report, common.json)?;
    output::write_output(&text, output.as_deref())?;
    output::print_summary(&report);

    log::info!("Finished crawling.");
    Ok(0)
}

// Handles the 'links' subcommand: the page is classified as a root page
async fn handle_links(url: &str, common: CommonArgs) -> Result<i32> {
    let config = load_config(&common, Overrides::default())?;
    let url: Url = parse_root_url(url)?;
    let policy = config.skip_policy();

    let links = match http_fetcher(&config)?.try_fetch(&url).await {
        Ok(links) => links,
        Err(e) => {
            log::error!("Error fetching {}: {}", url, e);
            return Ok(1);
        }
    };

    let rows: Vec<LinkRow> = links
        .into_iter()
        .map(|href| LinkRow {
            classification: classify(&policy, &href, true),
            href,
        })
        .collect();

    let text = output::render_links(&rows, common.json)?;
    output::write_output(&text, None)?;
    log::info!("{} link(s) on {}", rows.len(), url);
    Ok(0)
}
