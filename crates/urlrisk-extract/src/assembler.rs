//! Feature vector assembly.
//!
//! Runs the lexical, registry and content analyzers in that order and
//! concatenates their outputs into the 16-slot layout. Assembly never fails:
//! each network-backed group absorbs its own failures into a fallback.

use crate::content::{ContentInspector, HttpFetcher, PageFetcher};
use crate::error::Result;
use crate::lexical::lexical_features;
use crate::registry::{
    DisabledRank, RankClient, RegistryInspector, RegistryLookup, TrafficRank, WhoisClient,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use urlrisk_core::{AppConfig, FeatureVector, GroupOutcome};

/// Assembled vector plus the outcome of each network-backed group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// The URL as given
    pub url: String,
    /// Features in layout order
    pub vector: FeatureVector,
    /// Registry group outcome
    pub registry: GroupOutcome,
    /// Content group outcome
    pub content: GroupOutcome,
}

/// Orchestrates the three analyzers for one URL at a time.
#[derive(Clone)]
pub struct FeatureAssembler {
    registry: RegistryInspector,
    content: ContentInspector,
}

impl FeatureAssembler {
    /// Create an assembler over explicit collaborators.
    #[must_use]
    pub fn new(
        registry: Arc<dyn RegistryLookup>,
        traffic: Arc<dyn TrafficRank>,
        fetcher: Arc<dyn PageFetcher>,
        popular_rank_cutoff: u64,
    ) -> Self {
        Self {
            registry: RegistryInspector::new(registry, traffic, popular_rank_cutoff),
            content: ContentInspector::new(fetcher),
        }
    }

    /// Create an assembler backed by the network clients described in `config`.
    ///
    /// # Errors
    /// Returns error if an HTTP client cannot be created.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let traffic: Arc<dyn TrafficRank> = if config.traffic.enabled {
            Arc::new(RankClient::from_config(&config.traffic)?)
        } else {
            Arc::new(DisabledRank)
        };

        Ok(Self::new(
            Arc::new(WhoisClient::from_config(&config.registry)),
            traffic,
            Arc::new(HttpFetcher::from_config(&config.content)?),
            config.traffic.popular_rank_cutoff,
        ))
    }

    /// Extract features for `url` using the current time.
    pub async fn extract(&self, url: &str) -> Extraction {
        self.extract_at(url, Utc::now()).await
    }

    /// Extract features for `url` as of `now`.
    pub async fn extract_at(&self, url: &str, now: DateTime<Utc>) -> Extraction {
        let lexical = lexical_features(url);
        debug!("Lexical features for {url}: {lexical:?}");

        let registry = self.registry.inspect(url, now).await;
        let content = self.content.inspect(url).await;

        let vector = FeatureVector::from_groups(lexical, registry.values(), content.values());
        info!(
            "Assembled features for {url}: {vector} (registry fallback: {}, content fallback: {})",
            registry.is_fallback(),
            content.is_fallback()
        );

        Extraction {
            url: url.to_string(),
            vector,
            registry,
            content,
        }
    }

    /// Assemble just the feature vector for `url`.
    pub async fn assemble(&self, url: &str) -> FeatureVector {
        self.extract(url).await.vector
    }
}
