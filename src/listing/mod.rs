// src/listing/mod.rs
// =============================================================================
// Everything about a single directory listing page:
//
// - fetch: downloads a page and returns the raw hrefs on it
// - classify: decides whether each href is a file, a directory, or noise
//
// The crawl module drives these two page by page.
// =============================================================================

mod classify;
mod fetch;

pub use classify::{
    classify, Classification, ListingSkipPolicy, SkipPolicy, DEFAULT_BASE_PREFIXES,
    DEFAULT_SKIP_NAMES,
};
pub use fetch::{HttpFetcher, PageFetcher};
