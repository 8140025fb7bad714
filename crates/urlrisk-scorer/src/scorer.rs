//! Verdict production: classifier label plus the safe-point heuristic.

use crate::classifier::Classifier;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use urlrisk_core::{FeatureId, FeatureVector, Label, ScoringConfig, FEATURE_COUNT};

/// Secondary, human-readable verdict from the safe-point tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicVerdict {
    LikelySafe,
    LikelyMalicious,
}

impl fmt::Display for HeuristicVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LikelySafe => f.write_str("likely safe"),
            Self::LikelyMalicious => f.write_str("likely malicious"),
        }
    }
}

/// Status of a single feature in the explanation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    Safe,
    Suspicious,
}

impl fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => f.write_str("safe"),
            Self::Suspicious => f.write_str("suspicious"),
        }
    }
}

/// One row of the explanation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureReport {
    pub feature: FeatureId,
    pub label: String,
    pub value: u32,
    pub status: FeatureStatus,
}

/// Safe-point tally over a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafePointHeuristic {
    threshold: usize,
}

impl SafePointHeuristic {
    #[must_use]
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Returns the safe-point count and the verdict it implies.
    #[must_use]
    pub fn evaluate(&self, vector: &FeatureVector) -> (usize, HeuristicVerdict) {
        let safe_points = vector.safe_points();
        let verdict = if safe_points >= self.threshold {
            HeuristicVerdict::LikelySafe
        } else {
            HeuristicVerdict::LikelyMalicious
        };
        (safe_points, verdict)
    }

    /// Per-feature status in layout order.
    #[must_use]
    pub fn explain(vector: &FeatureVector) -> Vec<FeatureReport> {
        vector
            .iter()
            .map(|(feature, value)| FeatureReport {
                feature,
                label: feature.label().to_string(),
                value,
                status: if value == 0 {
                    FeatureStatus::Safe
                } else {
                    FeatureStatus::Suspicious
                },
            })
            .collect()
    }
}

impl Default for SafePointHeuristic {
    fn default() -> Self {
        Self::new(ScoringConfig::default().safe_threshold)
    }
}

/// Classifier label and the independent heuristic, side by side.
///
/// The heuristic never overrides `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Primary verdict from the classifier
    pub label: Label,
    /// Number of features with value 0, out of 16
    pub safe_points: usize,
    /// Verdict implied by `safe_points`
    pub heuristic: HeuristicVerdict,
    /// Per-feature explanation
    pub features: Vec<FeatureReport>,
}

impl Verdict {
    /// Whether the classifier and the heuristic disagree.
    #[must_use]
    pub fn is_contested(&self) -> bool {
        matches!(
            (self.label, self.heuristic),
            (Label::Safe, HeuristicVerdict::LikelyMalicious)
                | (Label::Malicious, HeuristicVerdict::LikelySafe)
        )
    }
}

/// Scores completed feature vectors.
#[derive(Clone)]
pub struct RiskScorer {
    classifier: Arc<dyn Classifier>,
    heuristic: SafePointHeuristic,
}

impl RiskScorer {
    #[must_use]
    pub fn new(classifier: Arc<dyn Classifier>, safe_threshold: usize) -> Self {
        Self {
            classifier,
            heuristic: SafePointHeuristic::new(safe_threshold),
        }
    }

    /// Produce a verdict for `vector`.
    ///
    /// # Errors
    /// Returns `ScoreError::Classifier` if the classifier fails.
    pub fn score(&self, vector: &FeatureVector) -> Result<Verdict> {
        let label = self.classifier.predict(vector)?;
        debug!("Classifier {} labelled {vector} as {label}", self.classifier.name());

        let (safe_points, heuristic) = self.heuristic.evaluate(vector);
        info!(
            "Verdict: {label} ({safe_points}/{FEATURE_COUNT} safe points, {heuristic})"
        );

        Ok(Verdict {
            label,
            safe_points,
            heuristic,
            features: SafePointHeuristic::explain(vector),
        })
    }
}
