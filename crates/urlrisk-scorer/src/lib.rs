//! URL Risk Scorer - Verdicts over assembled feature vectors.
//!
//! Scoring has two independent halves:
//!
//! - the [`Classifier`] produces the primary [`Label`](urlrisk_core::Label)
//! - the [`SafePointHeuristic`] counts benign slots and explains each feature
//!
//! [`UrlAssessor`] ties extraction and scoring together for callers.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod assess;
pub mod classifier;
pub mod error;
#[allow(missing_docs)]
pub mod scorer;

// Re-export commonly used types
pub use assess::{Assessment, UrlAssessor};
pub use classifier::{Classifier, FnClassifier, LinearClassifier};
pub use error::{Result, ScoreError};
pub use scorer::{
    FeatureReport, FeatureStatus, HeuristicVerdict, RiskScorer, SafePointHeuristic, Verdict,
};
