// src/crawl/mod.rs
// =============================================================================
// This module walks a directory listing tree.
//
// Features:
// - Depth-first traversal starting from the root listing page
// - Relative paths for every file, computed against the root URL
// - Polite crawling with a delay before every sub-directory request
// - Optional bounded parallel fetching that keeps the same output order
// - Optional guard against directories that link back to an ancestor
//
// Submodules:
// - queue: the work stack and the crawl loop
// - path: relative path joins and root-prefix handling
// =============================================================================

mod path;
mod queue;

pub use queue::{CrawlReport, Crawler};
