// src/listing/fetch.rs
// =============================================================================
// Downloads a listing page and pulls out its links.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Never fails on bad markup (html5ever recovers like a browser does)
// - Supports CSS selectors for finding elements
//
// Unlike a link checker we do NOT resolve the hrefs here. The crawler needs
// the raw text of every href, because the raw text is what gets classified
// and what becomes the relative path.
//
// Errors stop here. A page that cannot be fetched is logged and reported as
// having no links, so one dead directory never stops its siblings.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::error::FetchError;

/// Something that can list the links on a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Raw href values in document order, or why the page failed.
    async fn try_fetch(&self, url: &Url) -> Result<Vec<String>, FetchError>;

    /// Like `try_fetch`, but a failure is logged and becomes an empty page.
    async fn fetch_links(&self, url: &Url) -> Vec<String> {
        match self.try_fetch(url).await {
            Ok(links) => links,
            Err(e) => {
                log::warn!("Error fetching {}: {}", url, e);
                Vec::new()
            }
        }
    }
}

/// Fetches pages over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn try_fetch(&self, url: &Url) -> Result<Vec<String>, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let html = response.text().await?;
        Ok(extract_hrefs(&html))
    }
}

/// Every `<a href>` value in document order, exactly as written.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // Constant selector, known to be valid
    let selector = Selector::parse("a[href]").expect("static selector");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const APACHE_LISTING: &str = r#"
        <html><head><title>Index of /distfiles</title></head><body>
        <h1>Index of /distfiles</h1>
        <table>
          <tr><th><a href="?C=N;O=D">Name</a></th><th><a href="?C=M;O=A">Last modified</a></th></tr>
          <tr><td><a href="/">Parent Directory</a></td></tr>
          <tr><td><a href="libs/">libs/</a></td></tr>
          <tr><td><a href="readme.txt">readme.txt</a></td></tr>
          <tr><td><a name="no-href">anchor only</a></td></tr>
        </table>
        </body></html>
    "#;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new("listing-crawler-test", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_extract_keeps_document_order_and_raw_text() {
        let links = extract_hrefs(APACHE_LISTING);
        assert_eq!(
            links,
            vec!["?C=N;O=D", "?C=M;O=A", "/", "libs/", "readme.txt"]
        );
    }

    #[test]
    fn test_extract_tolerates_broken_html() {
        let links = extract_hrefs(r#"<p><a href="a.zip">a<a href="b/">b</p></div>"#);
        assert_eq!(links, vec!["a.zip", "b/"]);
    }

    #[test]
    fn test_extract_empty_page() {
        assert!(extract_hrefs("").is_empty());
    }

    #[tokio::test]
    async fn test_fetch_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/distfiles/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(APACHE_LISTING))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/distfiles/", server.uri())).unwrap();
        let links = fetcher().try_fetch(&url).await.unwrap();
        assert_eq!(links.len(), 5);
        assert_eq!(links[3], "libs/");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/gone/", server.uri())).unwrap();
        let result = fetcher().try_fetch(&url).await;
        assert!(matches!(result, Err(FetchError::Status(s)) if s.as_u16() == 404));

        // The lenient path swallows it
        assert!(fetcher().fetch_links(&url).await.is_empty());
    }

    #[tokio::test]
    async fn test_connection_failure_becomes_empty_page() {
        // Nothing listens on port 9 (discard) on a test machine
        let url = Url::parse("http://127.0.0.1:9/listing/").unwrap();
        let result = fetcher().try_fetch(&url).await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
        assert!(fetcher().fetch_links(&url).await.is_empty());
    }
}
