// crates/idp-visibility-core/src/core/identifiers.rs
// ============================================================================
// Module: IdP Visibility Identifiers
// Description: Canonical opaque identifiers for federation entities.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Entity identifiers are opaque strings that serialize transparently. An SP
//! entity id and an IDP entity id are distinct types so allow-lists cannot be
//! mixed up. Validation of shape happens at the config boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Identity provider entity identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdpEntityId(String);

impl IdpEntityId {
    /// Creates a new IDP entity identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdpEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for IdpEntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for IdpEntityId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Service provider entity identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpEntityId(String);

impl SpEntityId {
    /// Creates a new SP entity identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for SpEntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SpEntityId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Label of a configured authentication source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthSourceLabel(String);

impl AuthSourceLabel {
    /// Creates a new auth source label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthSourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for AuthSourceLabel {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AuthSourceLabel {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Opaque host-issued authentication state token.
///
/// The token is never parsed; hosts map it to the SP that started the login.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthStateToken(String);

impl AuthStateToken {
    /// Creates a new auth state token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AuthStateToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AuthStateToken {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
