use super::{PageFetcher, PageResponse, RedirectHop};
use crate::error::{ExtractError, Result};
use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;
use urlrisk_core::ContentConfig;

/// HTTP page fetcher that records every redirect hop.
///
/// Automatic redirects are disabled so the chain can be followed by hand;
/// the timeout applies to each request in the chain.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_redirects: usize,
}

impl HttpFetcher {
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout: Duration, max_redirects: usize, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            max_redirects,
        })
    }

    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &ContentConfig) -> Result<Self> {
        Self::new(
            Duration::from_secs(config.timeout_secs),
            config.max_redirects,
            &config.user_agent,
        )
    }
}

fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<PageResponse> {
        let mut current = Url::parse(url).map_err(|e| ExtractError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let mut history = Vec::new();

        loop {
            let response = self.client.get(current.clone()).send().await?;
            let status = response.status();

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            if let (true, Some(location)) = (is_followed_redirect(status), location) {
                if history.len() >= self.max_redirects {
                    return Err(ExtractError::TooManyRedirects {
                        url: url.to_string(),
                        max: self.max_redirects,
                    });
                }

                let next = current
                    .join(&location)
                    .map_err(|e| ExtractError::InvalidUrl {
                        url: location.clone(),
                        reason: e.to_string(),
                    })?;
                debug!("Redirect {} {current} -> {next}", status.as_u16());

                history.push(RedirectHop {
                    url: current.to_string(),
                    status: status.as_u16(),
                });
                current = next;
                continue;
            }

            let body = response.text().await?;
            return Ok(PageResponse {
                status: status.as_u16(),
                body,
                history,
            });
        }
    }
}
