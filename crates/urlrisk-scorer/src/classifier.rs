//! Classifier seam.
//!
//! The trained model is opaque to this crate: anything that maps one
//! 16-slot vector to a [`Label`] can sit behind [`Classifier`].

use crate::error::{Result, ScoreError};
use urlrisk_core::{ClassifierConfig, FeatureVector, Label, FEATURE_COUNT};

/// Maps a feature vector to a discrete label.
pub trait Classifier: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str {
        "classifier"
    }

    /// Predict the label for exactly one vector.
    ///
    /// # Errors
    /// Returns `ScoreError::Classifier` when no label can be produced.
    fn predict(&self, vector: &FeatureVector) -> Result<Label>;
}

/// Adapts a closure returning a numeric class code.
pub struct FnClassifier<F> {
    name: String,
    predict: F,
}

impl<F> FnClassifier<F>
where
    F: Fn(&FeatureVector) -> i64 + Send + Sync,
{
    /// Wrap `predict`, which must return 0 (safe) or 1 (malicious).
    pub fn new(name: impl Into<String>, predict: F) -> Self {
        Self {
            name: name.into(),
            predict,
        }
    }
}

impl<F> Classifier for FnClassifier<F>
where
    F: Fn(&FeatureVector) -> i64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, vector: &FeatureVector) -> Result<Label> {
        let code = (self.predict)(vector);
        Label::from_code(code).ok_or_else(|| {
            ScoreError::Classifier(format!("{} returned unknown class {code}", self.name))
        })
    }
}

/// Logistic model over the raw feature values.
///
/// Predicts [`Label::Malicious`] when `sigmoid(w·x + b) >= 0.5`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearClassifier {
    weights: [f32; FEATURE_COUNT],
    bias: f32,
}

impl LinearClassifier {
    /// Create a model from weights in layout order.
    #[must_use]
    pub fn new(weights: [f32; FEATURE_COUNT], bias: f32) -> Self {
        Self { weights, bias }
    }

    /// Build from the `[classifier]` configuration section.
    ///
    /// # Errors
    /// Returns `InvalidModel` when weights are missing, the wrong length or
    /// not finite.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let weights = config
            .weights
            .as_deref()
            .ok_or_else(|| ScoreError::InvalidModel("no classifier weights configured".into()))?;

        let weights: [f32; FEATURE_COUNT] = weights.try_into().map_err(|_| {
            ScoreError::InvalidModel(format!(
                "expected {FEATURE_COUNT} weights, got {}",
                weights.len()
            ))
        })?;

        if !config.bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(ScoreError::InvalidModel(
                "weights and bias must be finite".into(),
            ));
        }

        Ok(Self::new(weights, config.bias))
    }

    /// Probability that the vector is malicious.
    #[must_use]
    pub fn probability(&self, vector: &FeatureVector) -> f32 {
        let z = self
            .weights
            .iter()
            .zip(vector.to_f32())
            .fold(self.bias, |acc, (w, x)| acc + w * x);
        1.0 / (1.0 + (-z).exp())
    }
}

impl Classifier for LinearClassifier {
    fn name(&self) -> &str {
        "linear"
    }

    fn predict(&self, vector: &FeatureVector) -> Result<Label> {
        let p = self.probability(vector);
        if p.is_nan() {
            return Err(ScoreError::Classifier("linear model produced NaN".into()));
        }
        Ok(if p >= 0.5 {
            Label::Malicious
        } else {
            Label::Safe
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(values: [u32; FEATURE_COUNT]) -> FeatureVector {
        FeatureVector::from_values(values)
    }

    #[test]
    fn test_fn_classifier_maps_codes() {
        let classifier = FnClassifier::new("sum", |v: &FeatureVector| {
            i64::from(v.binarized().iter().sum::<u32>() > 8)
        });

        assert_eq!(
            classifier.predict(&vector([0; FEATURE_COUNT])).expect("label"),
            Label::Safe
        );
        assert_eq!(
            classifier.predict(&vector([1; FEATURE_COUNT])).expect("label"),
            Label::Malicious
        );
        assert_eq!(classifier.name(), "sum");
    }

    #[test]
    fn test_fn_classifier_rejects_unknown_code() {
        let classifier = FnClassifier::new("broken", |_: &FeatureVector| 7);
        let err = classifier
            .predict(&vector([0; FEATURE_COUNT]))
            .expect_err("unknown class");
        assert!(matches!(err, ScoreError::Classifier(ref msg) if msg.contains('7')));
    }

    #[test]
    fn test_linear_classifier_decision() {
        let mut weights = [0.0; FEATURE_COUNT];
        weights[0] = 4.0;
        let classifier = LinearClassifier::new(weights, -2.0);

        let mut values = [0; FEATURE_COUNT];
        assert_eq!(
            classifier.predict(&vector(values)).expect("label"),
            Label::Safe
        );

        values[0] = 1;
        assert_eq!(
            classifier.predict(&vector(values)).expect("label"),
            Label::Malicious
        );
    }

    #[test]
    fn test_linear_classifier_boundary_is_malicious() {
        let classifier = LinearClassifier::new([0.0; FEATURE_COUNT], 0.0);
        let v = vector([0; FEATURE_COUNT]);
        assert!((classifier.probability(&v) - 0.5).abs() < f32::EPSILON);
        assert_eq!(classifier.predict(&v).expect("label"), Label::Malicious);
    }

    #[test]
    fn test_linear_classifier_from_config() {
        let config = ClassifierConfig {
            weights: Some(vec![0.5; FEATURE_COUNT]),
            bias: -1.0,
        };
        assert!(LinearClassifier::from_config(&config).is_ok());

        let missing = ClassifierConfig::default();
        assert!(matches!(
            LinearClassifier::from_config(&missing),
            Err(ScoreError::InvalidModel(_))
        ));

        let short = ClassifierConfig {
            weights: Some(vec![1.0; 3]),
            bias: 0.0,
        };
        let err = LinearClassifier::from_config(&short).expect_err("wrong length");
        assert!(err.to_string().contains("got 3"));

        let infinite = ClassifierConfig {
            weights: Some(vec![f32::INFINITY; FEATURE_COUNT]),
            bias: 0.0,
        };
        assert!(LinearClassifier::from_config(&infinite).is_err());
    }
}
