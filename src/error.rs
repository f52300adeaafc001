use thiserror::Error;

/// Why a page could not be fetched. Extraction never runs on these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("timed out after {secs}s fetching {url}")]
    Timeout { url: String, secs: u64 },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Network { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Timeout { url, .. } => url,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: String, reason: String },
    #[error("invalid field pattern for {name}: {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}
