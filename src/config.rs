// src/config.rs
// =============================================================================
// Crawl settings.
//
// Settings come from three places, later ones winning:
// 1. built-in defaults (Default impls below)
// 2. an optional TOML file (--config path)
// 3. command-line flags (applied in main.rs)
//
// Example file:
//
//   root_url = "https://gentoo.osuosl.org/distfiles/"
//   delay_ms = 1000
//   concurrency = 1
//
//   [skip]
//   names = ["parent directory", "../", "/"]
//   base_prefixes = ["distfiles"]
// =============================================================================

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;
use crate::listing::{ListingSkipPolicy, DEFAULT_BASE_PREFIXES, DEFAULT_SKIP_NAMES};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlConfig {
    /// Listing page the crawl starts from
    pub root_url: Option<String>,
    /// Pause before every sub-directory fetch, in milliseconds
    pub delay_ms: u64,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Maximum number of listing pages fetched at once
    pub concurrency: usize,
    /// Refuse to descend into a directory that is one of its own ancestors
    pub guard_cycles: bool,
    pub skip: SkipConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkipConfig {
    /// Anchors skipped everywhere (compared trimmed and lower-cased)
    pub names: Vec<String>,
    /// Prefixes skipped on the root page only
    pub base_prefixes: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            root_url: None,
            delay_ms: 1000,
            timeout_secs: 30,
            user_agent: concat!("listing-crawler/", env!("CARGO_PKG_VERSION")).to_string(),
            concurrency: 1,
            guard_cycles: false,
            skip: SkipConfig::default(),
        }
    }
}

impl Default for SkipConfig {
    fn default() -> Self {
        Self {
            names: DEFAULT_SKIP_NAMES.iter().map(|s| s.to_string()).collect(),
            base_prefixes: DEFAULT_BASE_PREFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CrawlConfig {
    /// Loads a config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                log::debug!("Loading config from {}", path.display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("timeout_secs must be > 0"));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::invalid("concurrency must be > 0"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::invalid("user_agent is empty"));
        }
        if let Some(root) = &self.root_url {
            parse_root_url(root)?;
        }
        Ok(())
    }

    /// The parsed root URL, or an error when none was configured.
    pub fn root(&self) -> Result<Url, ConfigError> {
        let raw = self.root_url.as_deref().ok_or(ConfigError::MissingRootUrl)?;
        parse_root_url(raw)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn skip_policy(&self) -> ListingSkipPolicy {
        ListingSkipPolicy::new(&self.skip.names, &self.skip.base_prefixes)
    }
}

/// Parses and checks a root URL. Only http(s) listings can be crawled.
///
/// The path always ends with "/": the root is a directory, and relative
/// links only resolve beneath it when it is written as one.
pub fn parse_root_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingRootUrl);
    }

    let mut url = Url::parse(trimmed).map_err(|e| ConfigError::invalid_root(trimmed, e))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigError::invalid_root(
                trimmed,
                format!("unsupported scheme '{other}', only http and https are supported"),
            ))
        }
    }
    if url.host_str().is_none() {
        return Err(ConfigError::invalid_root(trimmed, "URL has no host"));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{classify, Classification};
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::default();
        assert_eq!(config.delay(), Duration::from_secs(1));
        assert_eq!(config.concurrency, 1);
        assert!(!config.guard_cycles);
        assert!(config.root_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CrawlConfig::from_toml(
            r#"
            root_url = "https://example.org/files/"
            delay_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.delay_ms, 250);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.skip.base_prefixes, vec!["distfiles".to_string()]);
        assert_eq!(config.root().unwrap().as_str(), "https://example.org/files/");
    }

    #[test]
    fn test_skip_table_builds_policy() {
        let config = CrawlConfig::from_toml(
            r#"
            [skip]
            names = ["Up"]
            base_prefixes = []
            "#,
        )
        .unwrap();
        let policy = config.skip_policy();
        assert_eq!(classify(&policy, "up", false), Classification::Skip);
        assert_eq!(classify(&policy, "distfiles/", true), Classification::Descend);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(CrawlConfig::from_toml("delay = 5").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CrawlConfig::default();
        config.concurrency = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = CrawlConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = CrawlConfig::default();
        config.user_agent = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = CrawlConfig::default();
        config.root_url = Some("not a url".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRootUrl { .. })
        ));
    }

    #[test]
    fn test_root_url_rules() {
        assert!(matches!(parse_root_url(""), Err(ConfigError::MissingRootUrl)));
        assert!(matches!(parse_root_url("   "), Err(ConfigError::MissingRootUrl)));
        assert!(parse_root_url("ftp://example.org/pub/").is_err());
        assert!(parse_root_url("example.org/files/").is_err());
        assert!(parse_root_url(" https://example.org/files/ ").is_ok());
        assert!(matches!(
            CrawlConfig::default().root(),
            Err(ConfigError::MissingRootUrl)
        ));
    }

    #[test]
    fn test_root_url_gets_trailing_slash() {
        let root = parse_root_url("https://gentoo.osuosl.org/distfiles").unwrap();
        assert_eq!(root.as_str(), "https://gentoo.osuosl.org/distfiles/");
        assert_eq!(
            root.join("libs/").unwrap().as_str(),
            "https://gentoo.osuosl.org/distfiles/libs/"
        );

        let bare_host = parse_root_url("https://example.org").unwrap();
        assert_eq!(bare_host.as_str(), "https://example.org/");

        let slashed = parse_root_url("https://example.org/files/").unwrap();
        assert_eq!(slashed.as_str(), "https://example.org/files/");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "concurrency = 4\nguard_cycles = true").unwrap();

        let config = CrawlConfig::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.concurrency, 4);
        assert!(config.guard_cycles);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            CrawlConfig::load(&missing),
            Err(ConfigError::Read { .. })
        ));
    }
}
