//! URL Risk Core - Foundation crate for the URL risk assessment pipeline.
//!
//! This crate provides the feature layout shared by every analyzer and the
//! classifier, the central error types, and TOML configuration management.
//!
//! # Modules
//!
//! - [`types`] - Feature layout (`FeatureId`), the 16-slot `FeatureVector`,
//!   per-group `GroupOutcome` and the classifier `Label`
//! - [`error`] - Configuration error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//!
//! # Example
//!
//! ```rust
//! use urlrisk_core::{FeatureId, FeatureVector};
//!
//! let vector = FeatureVector::from_values([0; 16]);
//! assert_eq!(vector.get(FeatureId::HasIp), 0);
//! assert_eq!(vector.safe_points(), 16);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, ClassifierConfig, ContentConfig, RegistryConfig, ScoringConfig, TrafficConfig,
};
pub use error::{ConfigError, ConfigResult};
pub use types::{FeatureGroup, FeatureId, FeatureVector, GroupOutcome, Label, FEATURE_COUNT};
