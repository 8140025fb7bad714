//! URL Risk Extract - Feature extraction for URL risk scoring.
//!
//! This crate turns a URL into the 16-slot feature vector the classifier
//! expects. Three analyzers contribute, each with its own failure mode:
//!
//! - [`lexical`] - URL syntax only; never fails
//! - [`registry`] - WHOIS registration data plus a traffic rank; falls back
//!   to `[1, 1, 1, 1]` when the lookup fails
//! - [`content`] - fetched page markup and redirect history; falls back to
//!   `[1, 1, 1, 1]` when the fetch fails
//!
//! The [`FeatureAssembler`] runs them in sequence and never fails as a whole.
//!
//! # Example
//!
//! ```rust,ignore
//! use urlrisk_core::AppConfig;
//! use urlrisk_extract::FeatureAssembler;
//!
//! let assembler = FeatureAssembler::from_config(&AppConfig::default())?;
//! let extraction = assembler.extract("http://192.168.0.1/login").await;
//! assert_eq!(extraction.vector.values()[0], 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod assembler;
#[allow(missing_docs)]
pub mod content;
#[allow(missing_docs)]
pub mod error;
#[allow(missing_docs)]
pub mod lexical;
#[allow(missing_docs)]
pub mod registry;

// Re-export commonly used types
pub use assembler::{Extraction, FeatureAssembler};
pub use content::{ContentInspector, HttpFetcher, PageFetcher, PageResponse, RedirectHop};
pub use error::{ExtractError, Result};
pub use lexical::{cleaned_domain, lexical_features, UrlParts};
pub use registry::{
    DisabledRank, DomainRecord, RankClient, RegistryDate, RegistryInspector, RegistryLookup,
    TrafficRank, WhoisClient,
};
