//! Web traffic rank lookup.

use super::TrafficRank;
use crate::error::{ExtractError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use urlrisk_core::TrafficConfig;

static REACH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("reach").expect("valid reach selector"));

/// Rank client for services answering in the `<REACH RANK="n"/>` XML format.
#[derive(Debug, Clone)]
pub struct RankClient {
    client: Client,
    endpoint: String,
}

impl RankClient {
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &TrafficConfig) -> Result<Self> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl TrafficRank for RankClient {
    async fn rank(&self, url: &str) -> Result<u64> {
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[("cli", "10"), ("dat", "s"), ("url", url)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_rank(&body)
    }
}

/// Rank source used when traffic lookups are switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRank;

#[async_trait]
impl TrafficRank for DisabledRank {
    async fn rank(&self, _url: &str) -> Result<u64> {
        Err(ExtractError::RankUnavailable(
            "traffic lookup disabled".to_string(),
        ))
    }
}

/// Extract the `RANK` attribute of the first `REACH` element.
///
/// # Errors
/// Returns `RankUnavailable` when the element or a numeric rank is missing.
pub fn parse_rank(body: &str) -> Result<u64> {
    let document = Html::parse_document(body);
    let rank = document
        .select(&REACH_SELECTOR)
        .next()
        .and_then(|reach| reach.value().attr("rank"))
        .ok_or_else(|| ExtractError::RankUnavailable("no REACH rank in response".to_string()))?;

    rank.trim()
        .parse()
        .map_err(|e| ExtractError::RankUnavailable(format!("invalid rank {rank:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rank() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<ALEXA VER="0.9" URL="example.com/" HOME="0" AID="=">
<SD><POPULARITY URL="example.com/" TEXT="1234" SOURCE="panel"/><REACH RANK="1187"/></SD>
</ALEXA>"#;
        assert_eq!(parse_rank(body).expect("rank present"), 1187);
    }

    #[test]
    fn test_parse_rank_missing() {
        let body = r#"<?xml version="1.0"?><ALEXA VER="0.9"></ALEXA>"#;
        assert!(matches!(
            parse_rank(body),
            Err(ExtractError::RankUnavailable(_))
        ));
    }

    #[test]
    fn test_parse_rank_not_numeric() {
        let body = r#"<ALEXA><SD><REACH RANK="n/a"/></SD></ALEXA>"#;
        let err = parse_rank(body).expect_err("non-numeric rank");
        assert!(err.to_string().contains("n/a"));
    }

    #[tokio::test]
    async fn test_disabled_rank_always_fails() {
        assert!(DisabledRank.rank("https://example.com").await.is_err());
    }
}
