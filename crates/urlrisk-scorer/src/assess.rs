//! Caller-facing entry point: URL in, assessment out.

use crate::classifier::{Classifier, LinearClassifier};
use crate::error::Result;
use crate::scorer::{RiskScorer, Verdict};
use serde::Serialize;
use std::sync::Arc;
use urlrisk_core::{AppConfig, FeatureVector, GroupOutcome};
use urlrisk_extract::{Extraction, FeatureAssembler};

/// Everything known about one URL after scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub url: String,
    pub vector: FeatureVector,
    pub verdict: Verdict,
    /// Registry group outcome, including any fallback reason
    pub registry: GroupOutcome,
    /// Content group outcome, including any fallback reason
    pub content: GroupOutcome,
}

/// Runs extraction and scoring for one URL at a time.
#[derive(Clone)]
pub struct UrlAssessor {
    assembler: FeatureAssembler,
    scorer: RiskScorer,
}

impl UrlAssessor {
    #[must_use]
    pub fn new(assembler: FeatureAssembler, scorer: RiskScorer) -> Self {
        Self { assembler, scorer }
    }

    /// Build the network-backed assembler and the configured linear classifier.
    ///
    /// # Errors
    /// Returns `InvalidModel` when no usable `[classifier]` weights are
    /// configured, or an extraction error if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let classifier: Arc<dyn Classifier> =
            Arc::new(LinearClassifier::from_config(&config.classifier)?);
        Ok(Self::new(
            FeatureAssembler::from_config(config)?,
            RiskScorer::new(classifier, config.scoring.safe_threshold),
        ))
    }

    /// Assess `url`.
    ///
    /// Lookup and fetch failures are absorbed into fallbacks; only a
    /// classifier failure is returned.
    ///
    /// # Errors
    /// Returns `ScoreError::Classifier` if the classifier fails.
    pub async fn assess(&self, url: &str) -> Result<Assessment> {
        let extraction = self.assembler.extract(url).await;
        self.score_extraction(extraction)
    }

    /// Score an extraction produced elsewhere.
    ///
    /// # Errors
    /// Returns `ScoreError::Classifier` if the classifier fails.
    pub fn score_extraction(&self, extraction: Extraction) -> Result<Assessment> {
        let verdict = self.scorer.score(&extraction.vector)?;
        Ok(Assessment {
            url: extraction.url,
            vector: extraction.vector,
            verdict,
            registry: extraction.registry,
            content: extraction.content,
        })
    }
}
