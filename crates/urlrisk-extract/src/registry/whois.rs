//! Port-43 WHOIS client and record parser.

use super::{DomainRecord, RegistryDate, RegistryLookup};
use crate::error::{ExtractError, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;
use urlrisk_core::RegistryConfig;

/// Line prefixes registries use to say a domain has no record.
const NOT_FOUND_MARKERS: &[&str] = &[
    "no match for",
    "no match",
    "not found",
    "no data found",
    "no entries found",
    "no object found",
    "domain not found",
    "object does not exist",
    "status: free",
    "status: available",
];

const CREATION_KEYS: &[&str] = &[
    "creation date",
    "created",
    "created on",
    "created date",
    "registered on",
    "registered",
    "registration date",
    "registration time",
    "domain registration date",
];

const EXPIRATION_KEYS: &[&str] = &[
    "registry expiry date",
    "registrar registration expiration date",
    "expiration date",
    "expiry date",
    "expire date",
    "expires",
    "expires on",
    "expire",
    "paid-till",
    "domain expiration date",
];

const DOMAIN_KEYS: &[&str] = &["domain name", "domain"];

const REFERRAL_KEYS: &[&str] = &["refer", "whois", "registrar whois server"];

/// Offset-carrying formats RFC 3339 rejects, such as `+0000`.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// Naive formats tried after the offset ones. Bare `YYYY-MM-DD` is absent:
/// it stays text and is normalized by [`RegistryDate::normalize`].
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%d-%b-%Y", "%Y.%m.%d", "%d.%m.%Y", "%Y/%m/%d"];

/// WHOIS lookups over plain TCP, following registry referrals.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    server: String,
    port: u16,
    timeout: Duration,
    max_referrals: u32,
}

impl WhoisClient {
    #[must_use]
    pub fn new(server: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            server: server.into(),
            port,
            timeout,
            max_referrals: 2,
        }
    }

    #[must_use]
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(
            config.whois_server.clone(),
            config.port,
            Duration::from_secs(config.timeout_secs),
        )
        .with_max_referrals(config.max_referrals)
    }

    #[must_use]
    pub fn with_max_referrals(mut self, max: u32) -> Self {
        self.max_referrals = max;
        self
    }

    async fn query(&self, server: &str, domain: &str) -> Result<String> {
        let mut stream = TcpStream::connect((server, self.port)).await?;
        stream.write_all(format!("{domain}\r\n").as_bytes()).await?;

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    async fn lookup_with_referrals(&self, domain: &str) -> Result<DomainRecord> {
        let mut server = self.server.clone();
        let mut response = self.query(&server, domain).await?;
        let mut hops = 0;

        while let Some(next) = find_referral(&response) {
            if next.eq_ignore_ascii_case(&server) {
                break;
            }
            // A pending referral means `response` is not the domain's own record
            if hops == self.max_referrals {
                return Err(ExtractError::MalformedRecord {
                    domain: domain.to_string(),
                    reason: format!("unresolved referral to {next}"),
                });
            }

            debug!("WHOIS referral for {domain}: {server} -> {next}");
            response = self.query(&next, domain).await?;
            server = next;
            hops += 1;
        }

        parse_record(domain, &response)
    }
}

#[async_trait]
impl RegistryLookup for WhoisClient {
    async fn lookup(&self, domain: &str) -> Result<DomainRecord> {
        tokio::time::timeout(self.timeout, self.lookup_with_referrals(domain))
            .await
            .map_err(|_| ExtractError::Timeout {
                operation: "whois lookup",
                timeout: self.timeout,
            })?
    }
}

fn split_field(line: &str) -> Option<(String, &str)> {
    let (key, value) = line.split_once(':')?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some((key.trim().to_ascii_lowercase(), value))
}

/// Next WHOIS server named in a response, if any.
#[must_use]
pub fn find_referral(response: &str) -> Option<String> {
    response.lines().find_map(|line| {
        let (key, value) = split_field(line)?;
        if !REFERRAL_KEYS.contains(&key.as_str()) {
            return None;
        }
        let host = value
            .trim_start_matches("whois://")
            .trim_start_matches("rwhois://")
            .trim_end_matches('/');
        (!host.is_empty() && !host.contains(' ')).then(|| host.to_string())
    })
}

/// Parse one WHOIS date value.
#[must_use]
pub fn parse_whois_date(value: &str) -> RegistryDate {
    let value = value.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return RegistryDate::Timestamp(instant.with_timezone(&Utc));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(instant) = DateTime::parse_from_str(value, format) {
            return RegistryDate::Timestamp(instant.with_timezone(&Utc));
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return RegistryDate::Timestamp(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Some(midnight) = NaiveDate::parse_from_str(value, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return RegistryDate::Timestamp(midnight.and_utc());
        }
    }
    RegistryDate::Text(value.to_string())
}

fn collapse(values: Vec<RegistryDate>) -> Option<RegistryDate> {
    let mut distinct: Vec<RegistryDate> = Vec::new();
    for value in values {
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }
    match distinct.len() {
        0 => None,
        1 => distinct.pop(),
        _ => Some(RegistryDate::Multiple(distinct)),
    }
}

/// Parse a raw WHOIS response into a [`DomainRecord`].
///
/// # Errors
/// Returns `NotRegistered` when the registry reports no match and
/// `MalformedRecord` when the response carries no registration fields.
pub fn parse_record(domain: &str, response: &str) -> Result<DomainRecord> {
    if response.trim().is_empty() {
        return Err(ExtractError::MalformedRecord {
            domain: domain.to_string(),
            reason: "empty response".to_string(),
        });
    }

    let mut creation = Vec::new();
    let mut expiration = Vec::new();
    let mut names_domain = false;

    for line in response.lines() {
        let lowered = line.trim().to_ascii_lowercase();
        if NOT_FOUND_MARKERS
            .iter()
            .any(|marker| lowered.starts_with(marker))
        {
            return Err(ExtractError::NotRegistered {
                domain: domain.to_string(),
            });
        }

        let Some((key, value)) = split_field(line) else {
            continue;
        };
        if CREATION_KEYS.contains(&key.as_str()) {
            creation.push(parse_whois_date(value));
        } else if EXPIRATION_KEYS.contains(&key.as_str()) {
            expiration.push(parse_whois_date(value));
        } else if DOMAIN_KEYS.contains(&key.as_str()) {
            names_domain = true;
        }
    }

    if !names_domain && creation.is_empty() && expiration.is_empty() {
        return Err(ExtractError::MalformedRecord {
            domain: domain.to_string(),
            reason: "no registration fields".to_string(),
        });
    }

    Ok(DomainRecord {
        domain: domain.to_string(),
        creation_date: collapse(creation),
        expiration_date: collapse(expiration),
    })
}
