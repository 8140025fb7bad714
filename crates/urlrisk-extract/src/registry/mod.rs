//! Domain registry inspection.
//!
//! Looks up registration metadata for the URL's host and derives the four
//! registry features. Any lookup failure yields the fixed fallback group;
//! callers never see a partial success.

mod traffic;
mod whois;

pub use traffic::{parse_rank, DisabledRank, RankClient};
pub use whois::{find_referral, parse_record, parse_whois_date, WhoisClient};

use crate::error::Result;
use crate::lexical::cleaned_domain;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use urlrisk_core::types::GROUP_WIDTH;
use urlrisk_core::GroupOutcome;

/// Spans shorter than six 30-day months are flagged.
const SIX_MONTHS_DAYS: i64 = 6 * 30;

/// Date as reported by a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryDate {
    /// Already-parsed instant
    Timestamp(DateTime<Utc>),
    /// Unparsed text, expected as `YYYY-MM-DD`
    Text(String),
    /// Several distinct values for the same field
    Multiple(Vec<RegistryDate>),
}

impl RegistryDate {
    /// Normalize to an instant, or `None` when the value is unusable.
    #[must_use]
    pub fn normalize(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(instant) => Some(*instant),
            Self::Text(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|midnight| midnight.and_utc()),
            Self::Multiple(_) => None,
        }
    }
}

/// Registration metadata for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainRecord {
    pub domain: String,
    pub creation_date: Option<RegistryDate>,
    pub expiration_date: Option<RegistryDate>,
}

/// Registration metadata source.
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    /// Look up a bare hostname (no scheme, no port).
    ///
    /// # Errors
    /// Returns error if the domain is unregistered, the registry is
    /// unreachable, or the record cannot be parsed.
    async fn lookup(&self, domain: &str) -> Result<DomainRecord>;
}

/// Web traffic popularity source.
#[async_trait]
pub trait TrafficRank: Send + Sync {
    /// Popularity rank for the original URL.
    ///
    /// # Errors
    /// Returns error if the rank service is unreachable or has no rank.
    async fn rank(&self, url: &str) -> Result<u64>;
}

fn normalized(date: Option<&RegistryDate>) -> Option<DateTime<Utc>> {
    date.and_then(RegistryDate::normalize)
}

/// 1 when the registered span is under six months or cannot be computed.
#[must_use]
pub fn young_domain_flag(record: &DomainRecord) -> u32 {
    match (
        normalized(record.creation_date.as_ref()),
        normalized(record.expiration_date.as_ref()),
    ) {
        (Some(created), Some(expires)) => {
            u32::from((expires - created).num_days() < SIX_MONTHS_DAYS)
        }
        _ => 1,
    }
}

/// 1 when the registration expires within six months or cannot be computed.
#[must_use]
pub fn expiring_domain_flag(record: &DomainRecord, now: DateTime<Utc>) -> u32 {
    match normalized(record.expiration_date.as_ref()) {
        Some(expires) => u32::from((expires - now).num_days() < SIX_MONTHS_DAYS),
        None => 1,
    }
}

/// Traffic flag from a rank lookup result; failures count as suspicious.
#[must_use]
pub fn traffic_flag(rank: &Result<u64>, popular_rank_cutoff: u64) -> u32 {
    match rank {
        Ok(rank) => u32::from(*rank < popular_rank_cutoff),
        Err(_) => 1,
    }
}

/// Registry features for a successfully retrieved record.
///
/// `dns_missing` is 0 here: a returned record is taken as proof the domain
/// resolves.
#[must_use]
pub fn registry_features(
    record: &DomainRecord,
    traffic_flag: u32,
    now: DateTime<Utc>,
) -> [u32; GROUP_WIDTH] {
    [
        0,
        traffic_flag,
        young_domain_flag(record),
        expiring_domain_flag(record, now),
    ]
}

/// Runs the registry lookup and, on success, the traffic lookup.
#[derive(Clone)]
pub struct RegistryInspector {
    registry: Arc<dyn RegistryLookup>,
    traffic: Arc<dyn TrafficRank>,
    popular_rank_cutoff: u64,
}

impl RegistryInspector {
    #[must_use]
    pub fn new(
        registry: Arc<dyn RegistryLookup>,
        traffic: Arc<dyn TrafficRank>,
        popular_rank_cutoff: u64,
    ) -> Self {
        Self {
            registry,
            traffic,
            popular_rank_cutoff,
        }
    }

    /// Inspect the URL's domain registration as of `now`.
    pub async fn inspect(&self, url: &str, now: DateTime<Utc>) -> GroupOutcome {
        let domain = cleaned_domain(url);
        if domain.is_empty() {
            warn!("No hostname in {url}, using registry fallback");
            return GroupOutcome::fallback("no hostname to look up");
        }

        let record = match self.registry.lookup(domain).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Registry lookup for {domain} failed, using fallback: {e}");
                return GroupOutcome::fallback(e.to_string());
            }
        };

        // Keyed on the original URL, independent of the registry fallback
        let rank = self.traffic.rank(url).await;
        if let Err(e) = &rank {
            debug!("Traffic rank unavailable for {url}: {e}");
        }

        let values = registry_features(
            &record,
            traffic_flag(&rank, self.popular_rank_cutoff),
            now,
        );
        debug!("Registry features for {domain}: {values:?}");
        GroupOutcome::computed(values)
    }
}
