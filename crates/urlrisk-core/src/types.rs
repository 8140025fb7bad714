//! Feature layout and shared pipeline types.
//!
//! The classifier was fit against one exact positional layout, so the order
//! of [`FeatureId::ALL`] is the single source of truth for every vector the
//! pipeline produces. Changing it requires a re-fit classifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of features in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 16;

/// Number of features produced by the lexical analyzer.
pub const LEXICAL_WIDTH: usize = 8;

/// Number of features produced by each network-backed analyzer group.
pub const GROUP_WIDTH: usize = 4;

const REGISTRY_START: usize = LEXICAL_WIDTH;
const CONTENT_START: usize = REGISTRY_START + GROUP_WIDTH;

const _: () = assert!(CONTENT_START + GROUP_WIDTH == FEATURE_COUNT);

/// One named indicator in the feature vector.
///
/// Value 0 always denotes a benign signal and 1 a suspicious one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureId {
    /// Host position holds a literal IP address
    HasIp,
    /// `@` anywhere in the URL
    HasAtSign,
    /// URL is at least 54 characters long
    IsLong,
    /// Raw count of non-empty path segments
    PathDepthFlag,
    /// `//` appears after the scheme
    HasDoubleSlashRedirect,
    /// `https` appears inside the authority
    HttpsInHost,
    /// URL matches a known shortening service
    IsShortened,
    /// `-` appears inside the authority
    HasHyphenPrefixSuffix,
    /// No registration record could be obtained
    DnsMissing,
    /// Traffic rank flag
    HighTrafficRankFlag,
    /// Registration span is shorter than six months
    YoungDomainFlag,
    /// Registration expires within six months
    ExpiringDomainFlag,
    /// Body lacks iframe markup
    HasIframe,
    /// Script block with `onmouseover`
    HasMouseoverScript,
    /// Body lacks a right-click guard
    RightClickDisabled,
    /// More than two redirect hops
    ExcessRedirectHistory,
}

impl FeatureId {
    /// All features in vector order.
    pub const ALL: [FeatureId; FEATURE_COUNT] = [
        Self::HasIp,
        Self::HasAtSign,
        Self::IsLong,
        Self::PathDepthFlag,
        Self::HasDoubleSlashRedirect,
        Self::HttpsInHost,
        Self::IsShortened,
        Self::HasHyphenPrefixSuffix,
        Self::DnsMissing,
        Self::HighTrafficRankFlag,
        Self::YoungDomainFlag,
        Self::ExpiringDomainFlag,
        Self::HasIframe,
        Self::HasMouseoverScript,
        Self::RightClickDisabled,
        Self::ExcessRedirectHistory,
    ];

    /// Position of this feature in the vector.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable snake_case identifier.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::HasIp => "has_ip",
            Self::HasAtSign => "has_at_sign",
            Self::IsLong => "is_long",
            Self::PathDepthFlag => "path_depth_flag",
            Self::HasDoubleSlashRedirect => "has_double_slash_redirect",
            Self::HttpsInHost => "https_in_host",
            Self::IsShortened => "is_shortened",
            Self::HasHyphenPrefixSuffix => "has_hyphen_prefix_suffix",
            Self::DnsMissing => "dns_missing",
            Self::HighTrafficRankFlag => "high_traffic_rank_flag",
            Self::YoungDomainFlag => "young_domain_flag",
            Self::ExpiringDomainFlag => "expiring_domain_flag",
            Self::HasIframe => "has_iframe",
            Self::HasMouseoverScript => "has_mouseover_script",
            Self::RightClickDisabled => "right_click_disabled",
            Self::ExcessRedirectHistory => "excess_redirect_history",
        }
    }

    /// Human-readable label used in explanations.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::HasIp => "IP Address in URL",
            Self::HasAtSign => "'@' Symbol",
            Self::IsLong => "URL Length ≥ 54",
            Self::PathDepthFlag => "Path Depth",
            Self::HasDoubleSlashRedirect => "Redirection '//'",
            Self::HttpsInHost => "HTTPS in Domain",
            Self::IsShortened => "Shortened URL",
            Self::HasHyphenPrefixSuffix => "Prefix/Suffix (-)",
            Self::DnsMissing => "DNS Record Present",
            Self::HighTrafficRankFlag => "Web Traffic < 100k",
            Self::YoungDomainFlag => "Domain Age < 6 months",
            Self::ExpiringDomainFlag => "Domain Expiry < 6 months",
            Self::HasIframe => "IFrame Detected",
            Self::HasMouseoverScript => "Mouse Over Events",
            Self::RightClickDisabled => "Right Click Disabled",
            Self::ExcessRedirectHistory => "Redirect History > 2",
        }
    }

    /// Analyzer group that produces this feature.
    #[must_use]
    pub fn group(self) -> FeatureGroup {
        match self.index() {
            i if i < REGISTRY_START => FeatureGroup::Lexical,
            i if i < CONTENT_START => FeatureGroup::Registry,
            _ => FeatureGroup::Content,
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Analyzer group a feature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureGroup {
    /// URL syntax only
    Lexical,
    /// Domain registration metadata
    Registry,
    /// Fetched page content
    Content,
}

/// Ordered 16-slot feature vector.
///
/// `path_depth_flag` keeps its raw segment count; every other slot is 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector([u32; FEATURE_COUNT]);

impl FeatureVector {
    /// Wrap raw values already in layout order.
    #[must_use]
    pub fn from_values(values: [u32; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Concatenate the three analyzer groups in layout order.
    #[must_use]
    pub fn from_groups(
        lexical: [u32; LEXICAL_WIDTH],
        registry: [u32; GROUP_WIDTH],
        content: [u32; GROUP_WIDTH],
    ) -> Self {
        let mut values = [0u32; FEATURE_COUNT];
        values[..REGISTRY_START].copy_from_slice(&lexical);
        values[REGISTRY_START..CONTENT_START].copy_from_slice(&registry);
        values[CONTENT_START..].copy_from_slice(&content);
        Self(values)
    }

    /// Value of a single feature.
    #[must_use]
    pub fn get(&self, feature: FeatureId) -> u32 {
        self.0[feature.index()]
    }

    /// Raw values in layout order.
    #[must_use]
    pub fn values(&self) -> &[u32; FEATURE_COUNT] {
        &self.0
    }

    /// Iterate `(feature, value)` pairs in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, u32)> + '_ {
        FeatureId::ALL.iter().map(move |id| (*id, self.get(*id)))
    }

    /// Values with every nonzero slot collapsed to 1.
    #[must_use]
    pub fn binarized(&self) -> [u32; FEATURE_COUNT] {
        self.0.map(|v| u32::from(v != 0))
    }

    /// Values as `f32` for numeric models.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f32(&self) -> [f32; FEATURE_COUNT] {
        self.0.map(|v| v as f32)
    }

    /// Number of slots equal to 0.
    #[must_use]
    pub fn safe_points(&self) -> usize {
        self.0.iter().filter(|v| **v == 0).count()
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Result of a network-backed analyzer group.
///
/// A group either computes all of its features or falls back to the
/// predeclared all-suspicious values; callers never see a partial success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GroupOutcome {
    /// Features computed from a successful lookup
    Computed {
        /// Computed values in layout order
        values: [u32; GROUP_WIDTH],
    },
    /// Lookup failed; the fallback values apply
    Fallback {
        /// Why the group fell back
        reason: String,
    },
}

impl GroupOutcome {
    /// Values used when a group's lookup fails.
    pub const FALLBACK: [u32; GROUP_WIDTH] = [1; GROUP_WIDTH];

    /// Create a computed outcome.
    #[must_use]
    pub fn computed(values: [u32; GROUP_WIDTH]) -> Self {
        Self::Computed { values }
    }

    /// Create a fallback outcome.
    #[must_use]
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self::Fallback {
            reason: reason.into(),
        }
    }

    /// Values this outcome contributes to the vector.
    #[must_use]
    pub fn values(&self) -> [u32; GROUP_WIDTH] {
        match self {
            Self::Computed { values } => *values,
            Self::Fallback { .. } => Self::FALLBACK,
        }
    }

    /// Whether the fallback values were used.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Fallback reason, if any.
    #[must_use]
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Self::Computed { .. } => None,
            Self::Fallback { reason } => Some(reason),
        }
    }
}

/// Discrete classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// Classifier code 0
    Safe,
    /// Classifier code 1
    Malicious,
}

impl Label {
    /// Map a numeric classifier code (0 = safe, 1 = malicious).
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Safe),
            1 => Some(Self::Malicious),
            _ => None,
        }
    }

    /// Numeric classifier code.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Safe => 0,
            Self::Malicious => 1,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => f.write_str("safe"),
            Self::Malicious => f.write_str("malicious"),
        }
    }
}
