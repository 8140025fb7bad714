//! Human and JSON rendering.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;
use urlrisk_core::{FeatureVector, GroupOutcome, FEATURE_COUNT};
use urlrisk_extract::Extraction;
use urlrisk_scorer::{Assessment, FeatureReport, HeuristicVerdict, SafePointHeuristic};

/// Output of the `features` command: extraction plus the heuristic only.
#[derive(Debug, Serialize)]
pub struct FeaturesReport {
    pub url: String,
    pub vector: FeatureVector,
    pub safe_points: usize,
    pub heuristic: HeuristicVerdict,
    pub features: Vec<FeatureReport>,
    pub registry: GroupOutcome,
    pub content: GroupOutcome,
}

impl FeaturesReport {
    pub fn new(extraction: Extraction, heuristic: SafePointHeuristic) -> Self {
        let (safe_points, verdict) = heuristic.evaluate(&extraction.vector);
        Self {
            features: SafePointHeuristic::explain(&extraction.vector),
            url: extraction.url,
            vector: extraction.vector,
            safe_points,
            heuristic: verdict,
            registry: extraction.registry,
            content: extraction.content,
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_table(out: &mut String, features: &[FeatureReport]) {
    let width = features
        .iter()
        .map(|row| row.label.chars().count())
        .max()
        .unwrap_or(0);

    for row in features {
        let pad = width - row.label.chars().count();
        let _ = writeln!(
            out,
            "  {}{}  {:>3}  {}",
            row.label,
            " ".repeat(pad),
            row.value,
            row.status
        );
    }
}

fn write_group(out: &mut String, name: &str, outcome: &GroupOutcome) {
    if let Some(reason) = outcome.fallback_reason() {
        let _ = writeln!(out, "  {name} lookup failed, using fallback: {reason}");
    }
}

fn write_header(out: &mut String, url: &str, vector: &FeatureVector) {
    let _ = writeln!(out, "URL:      {url}");
    let _ = writeln!(out, "Vector:   {vector}");
    let _ = writeln!(out);
}

pub fn render_features(report: &FeaturesReport) -> String {
    let mut out = String::new();
    write_header(&mut out, &report.url, &report.vector);
    write_table(&mut out, &report.features);
    write_group(&mut out, "registry", &report.registry);
    write_group(&mut out, "content", &report.content);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Safe points: {}/{FEATURE_COUNT} ({})",
        report.safe_points, report.heuristic
    );
    out
}

pub fn render_assessment(assessment: &Assessment) -> String {
    let verdict = &assessment.verdict;
    let mut out = String::new();
    write_header(&mut out, &assessment.url, &assessment.vector);
    write_table(&mut out, &verdict.features);
    write_group(&mut out, "registry", &assessment.registry);
    write_group(&mut out, "content", &assessment.content);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Safe points: {}/{FEATURE_COUNT} ({})",
        verdict.safe_points, verdict.heuristic
    );
    let _ = writeln!(out, "Classifier:  {}", verdict.label);
    if verdict.is_contested() {
        let _ = writeln!(out, "Note: classifier and safe-point heuristic disagree");
    }
    out
}
