// src/crawl/queue.rs
// =============================================================================
// The traversal engine: walks a directory listing tree and collects every
// file path in it.
//
// How it works:
// 1. Start with the root page on a work stack
// 2. Fetch a page (at most `concurrency` pages in flight at once)
// 3. Classify every link on it: skip it, record a file, or record a
//    sub-directory and push it on the stack
// 4. Repeat until the stack is empty and nothing is in flight
// 5. Stitch the per-page results together in depth-first order
//
// Each page's result is a list of slots, either a file path or a pointer to
// the child directory's own list. Flattening the slots from the root gives
// exactly the order a recursive walk would produce, no matter in which order
// the pages actually came back.
//
// Politeness:
// - Every sub-directory fetch waits `delay` first (the root fetch does not)
// - With concurrency 1 that is one request per `delay`, depth first
//
// Failures:
// - A page that fails to fetch has no links (see PageFetcher::fetch_links),
//   so its branch is simply empty and its siblings carry on
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use url::Url;

use super::path::relative_path;
use crate::listing::{classify, Classification, PageFetcher, SkipPolicy};

// Index into the crawl's page table
type PageId = usize;

// Represents a listing page waiting to be fetched
#[derive(Debug, Clone)]
struct CrawlItem {
    id: PageId,
    url: Url,
    relative: String, // Empty for the root page
}

// One slot in a page's result list
#[derive(Debug)]
enum Entry {
    File(String),
    Dir(PageId),
}

// What we remember about every page we have scheduled
#[derive(Debug)]
struct Page {
    url: Url,
    parent: Option<PageId>,
    entries: Vec<Entry>,
}

/// Outcome of a finished crawl.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub root_url: Url,
    /// Relative file paths, depth-first, in page order. Duplicates are kept.
    pub files: Vec<String>,
    /// Pages requested, including ones that failed
    pub pages_fetched: usize,
}

/// Crawls one listing tree.
pub struct Crawler {
    root: Url,
    fetcher: Arc<dyn PageFetcher>,
    policy: Arc<dyn SkipPolicy>,
    delay: Duration,
    concurrency: usize,
    guard_cycles: bool,
}

impl Crawler {
    pub fn new(root: Url, fetcher: Arc<dyn PageFetcher>, policy: Arc<dyn SkipPolicy>) -> Self {
        Self {
            root,
            fetcher,
            policy,
            delay: Duration::from_secs(1),
            concurrency: 1,
            guard_cycles: false,
        }
    }

    /// Pause before every sub-directory fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Maximum pages in flight. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Skip directories that resolve to one of their own ancestors.
    pub fn with_cycle_guard(mut self, enabled: bool) -> Self {
        self.guard_cycles = enabled;
        self
    }

    /// Runs the crawl to completion.
    pub async fn crawl(&self) -> CrawlReport {
        log::info!("Starting crawl at {}", self.root);

        let mut pages = vec![Page {
            url: self.root.clone(),
            parent: None,
            entries: Vec::new(),
        }];
        let mut stack = vec![CrawlItem {
            id: 0,
            url: self.root.clone(),
            relative: String::new(),
        }];
        let mut in_flight = FuturesUnordered::new();
        let mut pages_fetched = 0;

        loop {
            // Top up to the concurrency limit
            while in_flight.len() < self.concurrency {
                let Some(item) = stack.pop() else { break };
                let delay = if item.id == 0 { Duration::ZERO } else { self.delay };
                in_flight.push(fetch_page(Arc::clone(&self.fetcher), item, delay));
            }

            let Some((item, links)) = in_flight.next().await else {
                break;
            };
            pages_fetched += 1;

            let children = self.expand(&item, links, &mut pages);

            // Reversed so the first sub-directory on the page is fetched next
            stack.extend(children.into_iter().rev());
        }

        let files = flatten(pages);

        CrawlReport {
            root_url: self.root.clone(),
            files,
            pages_fetched,
        }
    }

    // Classifies the links of one fetched page, fills in its entries and
    // returns the sub-directories still to visit, in page order.
    fn expand(&self, item: &CrawlItem, links: Vec<String>, pages: &mut Vec<Page>) -> Vec<CrawlItem> {
        let at_base = item.relative.is_empty();
        let mut entries = Vec::new();
        let mut children = Vec::new();

        for link in links {
            let class = classify(self.policy.as_ref(), &link, at_base);
            if class == Classification::Skip {
                log::debug!("Skipping {:?} on {}", link, item.url);
                continue;
            }

            let Some(relative) = relative_path(&self.root, &item.relative, &link) else {
                log::debug!("Skipping {:?}: outside {}", link, self.root);
                continue;
            };
            if relative.is_empty() {
                // An absolute link to the root itself
                log::debug!("Skipping {:?}: points back at the root", link);
                continue;
            }

            if class == Classification::Collect {
                entries.push(Entry::File(relative));
                continue;
            }

            let url = match item.url.join(&link) {
                Ok(url) => url,
                Err(e) => {
                    log::warn!("Cannot resolve {:?} against {}: {}", link, item.url, e);
                    continue;
                }
            };

            if self.guard_cycles && is_ancestor(pages, item.id, &url) {
                log::warn!("Not descending into {}: it is its own ancestor", url);
                continue;
            }

            let id = pages.len();
            pages.push(Page {
                url: url.clone(),
                parent: Some(item.id),
                entries: Vec::new(),
            });
            entries.push(Entry::Dir(id));
            children.push(CrawlItem { id, url, relative });
        }

        pages[item.id].entries = entries;
        children
    }
}

// Waits out the politeness delay, then lists the page
async fn fetch_page(
    fetcher: Arc<dyn PageFetcher>,
    item: CrawlItem,
    delay: Duration,
) -> (CrawlItem, Vec<String>) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    log::info!("Processing: {}", item.url);
    let links = fetcher.fetch_links(&item.url).await;
    (item, links)
}

// True when `url` is the page `id` or any page above it
fn is_ancestor(pages: &[Page], mut id: PageId, url: &Url) -> bool {
    loop {
        let page = &pages[id];
        if page.url == *url {
            return true;
        }
        match page.parent {
            Some(parent) => id = parent,
            None => return false,
        }
    }
}

// Depth-first walk over the page slots, starting at the root page
fn flatten(mut pages: Vec<Page>) -> Vec<String> {
    let mut files = Vec::new();
    let mut stack = vec![std::mem::take(&mut pages[0].entries).into_iter()];

    loop {
        let Some(top) = stack.last_mut() else { break };
        match top.next() {
            Some(Entry::File(path)) => files.push(path),
            Some(Entry::Dir(id)) => {
                let entries = std::mem::take(&mut pages[id].entries);
                stack.push(entries.into_iter());
            }
            None => {
                stack.pop();
            }
        }
    }

    files
}
