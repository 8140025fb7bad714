//! Lexical analysis of the raw URL string.
//!
//! Every check here works on syntax alone and never fails: malformed input
//! simply produces the benign default for the affected check.

use once_cell::sync::Lazy;
use regex::Regex;
use std::net::IpAddr;

pub use urlrisk_core::types::LEXICAL_WIDTH;

/// URLs at least this many characters long are flagged.
pub const LONG_URL_CHARS: usize = 54;

/// Known URL shortening services, matched anywhere in the raw URL.
pub const SHORTENING_SERVICES: &str =
    r"bit\.ly|goo\.gl|shorte\.st|tinyurl|t\.co|is\.gd|cli\.gs|tiny\.cc|url4\.eu|ow\.ly|j\.mp";

static SHORTENER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(SHORTENING_SERVICES).expect("valid shortener regex"));

/// Scheme, authority and path slices of a URL string.
///
/// Splitting is purely syntactic. A scheme is only recognized when it is
/// followed by `:` and looks like one, and an authority only when the
/// remainder starts with `//`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    pub scheme: &'a str,
    pub authority: &'a str,
    pub path: &'a str,
}

impl<'a> UrlParts<'a> {
    pub fn parse(url: &'a str) -> Self {
        let (scheme, rest) = match url.split_once(':') {
            Some((scheme, rest)) if is_scheme(scheme) => (scheme, rest),
            _ => ("", url),
        };

        let (authority, rest) = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after
                    .find(|c| matches!(c, '/' | '?' | '#'))
                    .unwrap_or(after.len());
                after.split_at(end)
            }
            None => ("", rest),
        };

        let path_end = rest.find(|c| matches!(c, '?' | '#')).unwrap_or(rest.len());

        Self {
            scheme,
            authority,
            path: &rest[..path_end],
        }
    }

    /// The string sitting where a host would be.
    ///
    /// Falls back to the first path segment for scheme-less input such as
    /// `192.168.0.1/login`.
    pub fn host_position(&self) -> &'a str {
        if !self.authority.is_empty() {
            strip_host(self.authority)
        } else if self.scheme.is_empty() {
            strip_host(self.path.split('/').next().unwrap_or(""))
        } else {
            ""
        }
    }

    /// Authority with any port removed, as handed to the registry lookup.
    pub fn cleaned_domain(&self) -> &'a str {
        self.authority.split(':').next().unwrap_or("")
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Drop userinfo, port and IPv6 brackets from an authority-like string.
fn strip_host(authority: &str) -> &str {
    let host = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);

    if let Some(bracketed) = host.strip_prefix('[') {
        return bracketed.split_once(']').map_or(bracketed, |(inner, _)| inner);
    }
    // Unbracketed IPv6 literals contain several colons and no port
    if host.matches(':').count() > 1 {
        return host;
    }
    host.split_once(':').map_or(host, |(name, _)| name)
}

/// Cleaned hostname for the registry lookup.
pub fn cleaned_domain(url: &str) -> &str {
    UrlParts::parse(url).cleaned_domain()
}

pub fn has_ip(url: &str) -> u32 {
    let host = UrlParts::parse(url).host_position();
    u32::from(host.parse::<IpAddr>().is_ok())
}

pub fn has_at_sign(url: &str) -> u32 {
    u32::from(url.contains('@'))
}

pub fn is_long(url: &str) -> u32 {
    u32::from(url.chars().count() >= LONG_URL_CHARS)
}

/// Raw count of non-empty path segments.
pub fn path_depth(url: &str) -> u32 {
    let segments = UrlParts::parse(url)
        .path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .count();
    u32::try_from(segments).unwrap_or(u32::MAX)
}

pub fn has_double_slash_redirect(url: &str) -> u32 {
    match url.rfind("//") {
        Some(pos) => u32::from(url[..pos].chars().count() > 6),
        None => 0,
    }
}

pub fn https_in_host(url: &str) -> u32 {
    u32::from(UrlParts::parse(url).authority.contains("https"))
}

pub fn is_shortened(url: &str) -> u32 {
    u32::from(SHORTENER_REGEX.is_match(url))
}

pub fn has_hyphen_prefix_suffix(url: &str) -> u32 {
    u32::from(UrlParts::parse(url).authority.contains('-'))
}

/// All eight lexical features in layout order.
pub fn lexical_features(url: &str) -> [u32; LEXICAL_WIDTH] {
    [
        has_ip(url),
        has_at_sign(url),
        is_long(url),
        path_depth(url),
        has_double_slash_redirect(url),
        https_in_host(url),
        is_shortened(url),
        has_hyphen_prefix_suffix(url),
    ]
}
