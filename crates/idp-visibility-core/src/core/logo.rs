// crates/idp-visibility-core/src/core/logo.rs
// ============================================================================
// Module: Logo URL Validation
// Description: Sanitized, validated logo URLs for login page decoration.
// Purpose: Guarantee that a decorated auth source never carries an invalid URL.
// Dependencies: serde, url
// ============================================================================

//! ## Overview
//! Raw logo URLs come straight from IDP metadata and are untrusted. A
//! [`LogoUrl`] can only be built by stripping characters that may not appear
//! in a URL and then parsing the remainder as an absolute `http`/`https` URL
//! with a host. The sanitized text itself must already be in
//! `scheme://authority` form, since the parser repairs inputs such as
//! `http:host/path` and `https:\\host\path` that are not valid URLs. Anything
//! else yields `None`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted logo URL length after sanitization.
pub const MAX_LOGO_URL_LENGTH: usize = 2048;

/// Punctuation that survives sanitization alongside ASCII alphanumerics.
const URL_SAFE_PUNCTUATION: &str = "$-_.+!*'(),{}|\\^~[]`<>#%\";/?:@&=";

/// Schemes accepted for logo images.
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

// ============================================================================
// SECTION: Logo URL
// ============================================================================

/// Validated logo URL.
///
/// # Invariants
/// - Non-empty, at most [`MAX_LOGO_URL_LENGTH`] bytes.
/// - Parses as an absolute URL with a host.
/// - The scheme is `http` or `https`; other absolute schemes such as `ftp`
///   are rejected even when well formed.
/// - Written as `scheme://authority...` and free of backslashes, so the stored
///   text is exactly what was validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogoUrl(String);

impl LogoUrl {
    /// Sanitizes and validates a raw logo URL.
    ///
    /// Returns `None` when the sanitized value is empty or not a valid URL.
    #[must_use]
    pub fn sanitize(raw: &str) -> Option<Self> {
        let sanitized = sanitize_url(raw);
        if sanitized.is_empty() || sanitized.len() > MAX_LOGO_URL_LENGTH {
            return None;
        }
        if !has_authority_form(&sanitized) {
            return None;
        }
        let parsed = Url::parse(&sanitized).ok()?;
        if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
            return None;
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return None;
        }
        Some(Self(sanitized))
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for LogoUrl {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match Self::sanitize(&value) {
            Some(url) if url.0 == value => Ok(url),
            _ => Err(format!("invalid logo url: {value}")),
        }
    }
}

impl From<LogoUrl> for String {
    fn from(value: LogoUrl) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Removes every character that is not permitted in a URL.
#[must_use]
pub fn sanitize_url(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || URL_SAFE_PUNCTUATION.contains(*ch))
        .collect()
}

/// Checks that the text spells out `scheme://` and contains no backslash.
fn has_authority_form(text: &str) -> bool {
    if text.contains('\\') {
        return false;
    }
    text.split_once(':').is_some_and(|(_, rest)| rest.starts_with("//"))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
