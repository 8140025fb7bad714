//! Page content inspection.
//!
//! Fetches the page once and derives four markup features. Two of them
//! (`has_iframe`, `right_click_disabled`) flag the *absence* of a pattern.
//! The classifier was fit on these inverted values.

mod fetch;

pub use fetch::HttpFetcher;

use crate::error::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use urlrisk_core::types::GROUP_WIDTH;
use urlrisk_core::GroupOutcome;

/// Redirect chains longer than this are flagged.
const MAX_QUIET_REDIRECTS: usize = 2;

static IFRAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<iframe>|<frameBorder>").expect("valid iframe regex"));

static MOUSEOVER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<script>.+onmouseover.+</script>").expect("valid mouseover regex")
});

static RIGHT_CLICK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"event.button ?== ?2").expect("valid right-click regex"));

/// One recorded redirect response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectHop {
    pub url: String,
    pub status: u16,
}

/// A fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
    pub history: Vec<RedirectHop>,
}

/// Page source.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`, following redirects.
    ///
    /// # Errors
    /// Returns error on timeout, connection failure or an unusable URL.
    /// HTTP error statuses are not errors.
    async fn fetch(&self, url: &str) -> Result<PageResponse>;
}

#[must_use]
pub fn has_iframe(body: &str) -> u32 {
    u32::from(!IFRAME_REGEX.is_match(body))
}

#[must_use]
pub fn has_mouseover_script(body: &str) -> u32 {
    u32::from(MOUSEOVER_REGEX.is_match(body))
}

#[must_use]
pub fn right_click_disabled(body: &str) -> u32 {
    u32::from(!RIGHT_CLICK_REGEX.is_match(body))
}

#[must_use]
pub fn excess_redirect_history(history: &[RedirectHop]) -> u32 {
    u32::from(history.len() > MAX_QUIET_REDIRECTS)
}

/// Content features for a fetched page, in layout order.
#[must_use]
pub fn content_features(page: &PageResponse) -> [u32; GROUP_WIDTH] {
    [
        has_iframe(&page.body),
        has_mouseover_script(&page.body),
        right_click_disabled(&page.body),
        excess_redirect_history(&page.history),
    ]
}

/// Fetches the page and computes the content group.
#[derive(Clone)]
pub struct ContentInspector {
    fetcher: Arc<dyn PageFetcher>,
}

impl ContentInspector {
    #[must_use]
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn inspect(&self, url: &str) -> GroupOutcome {
        match self.fetcher.fetch(url).await {
            Ok(page) => {
                let values = content_features(&page);
                debug!(
                    "Content features for {url} (HTTP {}, {} redirects): {values:?}",
                    page.status,
                    page.history.len()
                );
                GroupOutcome::computed(values)
            }
            Err(e) => {
                warn!("Fetching {url} failed, using content fallback: {e}");
                GroupOutcome::fallback(e.to_string())
            }
        }
    }
}
