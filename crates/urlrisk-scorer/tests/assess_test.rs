use async_trait::async_trait;
use std::sync::Arc;
use urlrisk_core::{FeatureId, FeatureVector, FEATURE_COUNT};
use urlrisk_extract::{
    DomainRecord, ExtractError, FeatureAssembler, PageFetcher, PageResponse, RegistryDate,
    RegistryLookup, Result, TrafficRank,
};
use urlrisk_scorer::{
    Classifier, FeatureStatus, FnClassifier, HeuristicVerdict, LinearClassifier, RiskScorer,
    ScoreError, UrlAssessor,
};

struct Unreachable;

#[async_trait]
impl RegistryLookup for Unreachable {
    async fn lookup(&self, domain: &str) -> Result<DomainRecord> {
        Err(ExtractError::NotRegistered {
            domain: domain.to_string(),
        })
    }
}

#[async_trait]
impl TrafficRank for Unreachable {
    async fn rank(&self, _url: &str) -> Result<u64> {
        Err(ExtractError::RankUnavailable("offline".to_string()))
    }
}

#[async_trait]
impl PageFetcher for Unreachable {
    async fn fetch(&self, url: &str) -> Result<PageResponse> {
        Err(ExtractError::InvalidUrl {
            url: url.to_string(),
            reason: "offline".to_string(),
        })
    }
}

struct Established;

#[async_trait]
impl RegistryLookup for Established {
    async fn lookup(&self, domain: &str) -> Result<DomainRecord> {
        Ok(DomainRecord {
            domain: domain.to_string(),
            creation_date: Some(RegistryDate::Text("2001-01-01".to_string())),
            expiration_date: Some(RegistryDate::Text("2099-01-01".to_string())),
        })
    }
}

#[async_trait]
impl TrafficRank for Established {
    async fn rank(&self, _url: &str) -> Result<u64> {
        Ok(250_000)
    }
}

#[async_trait]
impl PageFetcher for Established {
    async fn fetch(&self, _url: &str) -> Result<PageResponse> {
        Ok(PageResponse {
            status: 200,
            body: "<iframe></iframe><script>if(event.button==2){}</script>".to_string(),
            history: Vec::new(),
        })
    }
}

fn offline_assembler() -> FeatureAssembler {
    FeatureAssembler::new(
        Arc::new(Unreachable),
        Arc::new(Unreachable),
        Arc::new(Unreachable),
        100_000,
    )
}

fn online_assembler() -> FeatureAssembler {
    FeatureAssembler::new(
        Arc::new(Established),
        Arc::new(Established),
        Arc::new(Established),
        100_000,
    )
}

fn majority_vote() -> Arc<dyn Classifier> {
    Arc::new(FnClassifier::new("majority", |v: &FeatureVector| {
        i64::from(v.safe_points() < FEATURE_COUNT / 2)
    }))
}

#[tokio::test]
async fn test_clean_url_scores_safe() {
    let assessor = UrlAssessor::new(online_assembler(), RiskScorer::new(majority_vote(), 11));

    let assessment = assessor
        .assess("https://example.com/")
        .await
        .expect("assessment");

    assert_eq!(assessment.url, "https://example.com/");
    assert_eq!(assessment.vector.safe_points(), FEATURE_COUNT);
    assert_eq!(assessment.verdict.label.to_string(), "safe");
    assert_eq!(assessment.verdict.heuristic, HeuristicVerdict::LikelySafe);
    assert!(!assessment.registry.is_fallback());
    assert!(!assessment.content.is_fallback());
}

#[tokio::test]
async fn test_offline_assessment_still_scores() {
    let assessor = UrlAssessor::new(offline_assembler(), RiskScorer::new(majority_vote(), 11));

    let assessment = assessor
        .assess("http://192.168.0.1/login")
        .await
        .expect("lookup failures are absorbed");

    assert!(assessment.registry.is_fallback());
    assert!(assessment.content.is_fallback());
    // has_ip, path depth, eight fallback slots
    assert_eq!(assessment.verdict.safe_points, 6);
    assert_eq!(
        assessment.verdict.heuristic,
        HeuristicVerdict::LikelyMalicious
    );

    let ip = &assessment.verdict.features[FeatureId::HasIp.index()];
    assert_eq!(ip.label, "IP Address in URL");
    assert_eq!(ip.status, FeatureStatus::Suspicious);
}

#[tokio::test]
async fn test_classifier_failure_surfaces() {
    let broken: Arc<dyn Classifier> = Arc::new(FnClassifier::new("broken", |_: &FeatureVector| 3));
    let assessor = UrlAssessor::new(online_assembler(), RiskScorer::new(broken, 11));

    let err = assessor
        .assess("https://example.com/")
        .await
        .expect_err("classifier failure");

    assert!(matches!(err, ScoreError::Classifier(_)));
}

#[tokio::test]
async fn test_linear_classifier_end_to_end() {
    let mut weights = [0.0; FEATURE_COUNT];
    weights[FeatureId::IsShortened.index()] = 3.0;
    weights[FeatureId::DnsMissing.index()] = 1.0;
    let scorer = RiskScorer::new(Arc::new(LinearClassifier::new(weights, -2.0)), 11);
    let assessor = UrlAssessor::new(offline_assembler(), scorer);

    let assessment = assessor
        .assess("http://bit.ly/xyz")
        .await
        .expect("assessment");

    assert_eq!(assessment.verdict.label.code(), 1);
    assert_eq!(assessment.vector.get(FeatureId::IsShortened), 1);
}

#[tokio::test]
async fn test_assessment_serializes_for_callers() {
    let assessor = UrlAssessor::new(offline_assembler(), RiskScorer::new(majority_vote(), 11));
    let assessment = assessor
        .assess("http://bit.ly/xyz")
        .await
        .expect("assessment");

    let json = serde_json::to_value(&assessment).expect("serialize");
    assert_eq!(json["verdict"]["label"], "malicious");
    assert_eq!(json["verdict"]["heuristic"], "likely_malicious");
    assert_eq!(json["registry"]["outcome"], "fallback");
    assert_eq!(
        json["vector"].as_array().map(Vec::len),
        Some(FEATURE_COUNT)
    );
}
