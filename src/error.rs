// src/error.rs
// =============================================================================
// Error types for the two places things can go wrong:
//
// - ConfigError: bad root URL, unreadable/invalid config file, bad values.
//   These are fatal and stop the program before any crawling starts.
// - FetchError: one listing page could not be downloaded. These never stop
//   the crawl; the fetcher logs them and reports the page as empty.
//
// We use `thiserror` to derive Display/Error instead of writing the
// boilerplate by hand.
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// Fatal startup errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No root URL on the command line or in the config file
    #[error("no root URL given (pass it as an argument or set root_url in the config file)")]
    MissingRootUrl,

    /// Root URL does not parse, or is not http(s)
    #[error("invalid root URL '{url}': {reason}")]
    InvalidRootUrl { url: String, reason: String },

    /// Config file could not be read
    #[error("cannot read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for our schema
    #[error("cannot parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value that parsed fine but makes no sense
    #[error("invalid config value: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid_root(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidRootUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Why a single listing page could not be fetched.
#[derive(Error, Debug)]
pub enum FetchError {
    /// DNS, connection, timeout, TLS or body read failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),
}
