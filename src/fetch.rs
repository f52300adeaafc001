use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::FetchError;

/// Anything that can turn a URL into raw markup.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Plain GET with a client-wide timeout. No retries.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(HttpFetcher { client, timeout })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(Duration::from_secs(settings.timeout_secs), &settings.user_agent)
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            }
        } else if let Some(status) = err.status() {
            FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let start = Instant::now();
        let result = async {
            let response = self.client.get(url).send().await?.error_for_status()?;
            Ok::<_, reqwest::Error>(response.text().await?)
        }
        .await;

        match result {
            Ok(body) => {
                debug!(
                    "Fetched {} ({} bytes in {}ms)",
                    url,
                    body.len(),
                    start.elapsed().as_millis()
                );
                Ok(body)
            }
            Err(e) => {
                let err = self.classify(url, e);
                warn!("{}", err);
                Err(err)
            }
        }
    }
}
