//! Command-line surface for the URL risk pipeline.

use crate::output::{print_json, render_assessment, render_features, FeaturesReport};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use urlrisk_core::AppConfig;
use urlrisk_extract::FeatureAssembler;
use urlrisk_scorer::{SafePointHeuristic, UrlAssessor};

/// Score URLs for signs of phishing and malware hosting.
#[derive(Debug, Parser)]
#[command(name = "urlrisk", version)]
#[command(about = "URL risk assessment from lexical, registration and page signals", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default location.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log pipeline details at debug level.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract the feature vector and safe-point tally without a classifier.
    Features {
        /// URL to inspect.
        url: String,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Run the full pipeline with the configured classifier.
    Assess {
        /// URL to assess.
        url: String,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn load_config(&self) -> Result<AppConfig> {
        let config = match &self.config {
            Some(path) => AppConfig::load_from(path)
                .with_context(|| format!("loading config from {}", path.display()))?
                .apply_env()?,
            None => AppConfig::load_with_env()?,
        };
        tracing::debug!("loaded config: {:?}", config);
        Ok(config)
    }

    pub async fn run(self) -> Result<()> {
        let config = self.load_config()?;

        match self.command {
            Command::Features { url, json } => {
                let assembler = FeatureAssembler::from_config(&config)?;
                let extraction = assembler.extract(&url).await;
                let report = FeaturesReport::new(
                    extraction,
                    SafePointHeuristic::new(config.scoring.safe_threshold),
                );

                if json {
                    print_json(&report)?;
                } else {
                    print!("{}", render_features(&report));
                }
            }
            Command::Assess { url, json } => {
                if config.classifier.weights.is_none() {
                    bail!(
                        "no classifier configured: set [classifier] weights (16 values) in {}",
                        config_location(self.config.as_ref())
                    );
                }
                let assessor = UrlAssessor::from_config(&config)?;
                let assessment = assessor.assess(&url).await?;

                if json {
                    print_json(&assessment)?;
                } else {
                    print!("{}", render_assessment(&assessment));
                }
            }
        }

        Ok(())
    }
}

fn config_location(explicit: Option<&PathBuf>) -> String {
    match explicit {
        Some(path) => path.display().to_string(),
        None => AppConfig::config_path().map_or_else(
            |_| "the configuration file".to_string(),
            |path| path.display().to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_features() {
        let cli = Cli::try_parse_from(["urlrisk", "features", "http://bit.ly/xyz"]).expect("parse");
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        assert!(matches!(
            cli.command,
            Command::Features { ref url, json: false } if url == "http://bit.ly/xyz"
        ));
    }

    #[test]
    fn test_parse_assess_with_global_flags() {
        let cli = Cli::try_parse_from([
            "urlrisk",
            "assess",
            "--json",
            "https://example.com",
            "--config",
            "/tmp/urlrisk.toml",
            "-v",
        ])
        .expect("parse");
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/urlrisk.toml")));
        assert!(matches!(cli.command, Command::Assess { json: true, .. }));
    }

    #[test]
    fn test_url_is_required() {
        assert!(Cli::try_parse_from(["urlrisk", "assess"]).is_err());
    }

    #[tokio::test]
    async fn test_assess_without_classifier_is_config_error() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scoring]\nsafe_threshold = 11\n").expect("write config");

        let cli = Cli::try_parse_from([
            "urlrisk",
            "assess",
            "https://example.com",
            "--config",
            path.to_str().expect("utf-8 path"),
        ])
        .expect("parse");

        let err = cli.run().await.expect_err("no classifier");
        assert!(err.to_string().contains("no classifier configured"));
    }
}
