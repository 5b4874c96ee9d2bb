// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every flag here is optional and overrides the matching key of the config
// file; anything left unset falls back to the config file, then to defaults.
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::CrawlConfig;

#[derive(Parser, Debug)]
#[command(
    name = "listing-crawler",
    version,
    about = "Enumerates every file reachable from an HTML directory listing",
    long_about = "listing-crawler walks an Apache/nginx style directory listing, follows \
                  every sub-directory link and prints the path of each file relative to \
                  the root URL."
)]
pub struct Cli {
    /// Show debug output (every skipped link). RUST_LOG overrides this.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a listing tree and print every file path
    ///
    /// Example: listing-crawler crawl https://gentoo.osuosl.org/distfiles/ -o files.txt
    Crawl {
        /// Root listing URL (falls back to root_url in the config file)
        root_url: Option<String>,

        #[command(flatten)]
        common: CommonArgs,

        /// Write the results to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pause before each sub-directory request, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Maximum listing pages fetched at once
        #[arg(long)]
        concurrency: Option<usize>,

        /// Do not descend into a directory that links back to one of its ancestors
        #[arg(long)]
        guard_cycles: bool,
    },

    /// Fetch one listing page and show how each link would be treated
    ///
    /// Example: listing-crawler links https://gentoo.osuosl.org/distfiles/
    Links {
        /// Listing page URL
        url: String,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

/// Crawl flags that override config file values.
#[derive(Debug, Default)]
pub struct Overrides {
    pub root_url: Option<String>,
    pub delay_ms: Option<u64>,
    pub concurrency: Option<usize>,
    pub guard_cycles: bool,
}

impl Overrides {
    pub fn apply(self, config: &mut CrawlConfig) {
        if let Some(root_url) = self.root_url {
            config.root_url = Some(root_url);
        }
        if let Some(delay_ms) = self.delay_ms {
            config.delay_ms = delay_ms;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        // A flag can only switch the guard on
        if self.guard_cycles {
            config.guard_cycles = true;
        }
    }
}
