// crates/idp-visibility-core/src/core/records.rs
// ============================================================================
// Module: Federation Metadata Records
// Description: Typed IDP, SP, and auth source records consumed by the filters.
// Purpose: Provide read-only snapshots of entity metadata for one request.
// Dependencies: crate::core::{identifiers, logo}, serde
// ============================================================================

//! ## Overview
//! Records are immutable snapshots produced by the config loader. Filters
//! borrow them and never mutate them; decoration returns copies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::AuthSourceLabel;
use crate::core::identifiers::IdpEntityId;
use crate::core::identifiers::SpEntityId;
use crate::core::logo::LogoUrl;

// ============================================================================
// SECTION: Identity Provider
// ============================================================================

/// Identity provider metadata relevant to visibility filtering.
///
/// # Invariants
/// - `for_sps`, when present, is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdpRecord {
    /// IDP entity identifier.
    pub entity_id: IdpEntityId,
    /// Human-readable display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Raw, unvalidated logo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Hide this IDP from SPs that do not list it explicitly.
    #[serde(default)]
    pub exclude_by_default: bool,
    /// Exclusive SP allow-list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_sps: Option<BTreeSet<SpEntityId>>,
}

impl IdpRecord {
    /// Creates a bare IDP record with no visibility restrictions.
    #[must_use]
    pub fn new(entity_id: impl Into<IdpEntityId>) -> Self {
        Self {
            entity_id: entity_id.into(),
            display_name: None,
            logo_url: None,
            exclude_by_default: false,
            for_sps: None,
        }
    }

    /// Marks the IDP as excluded by default.
    #[must_use]
    pub const fn excluded_by_default(mut self) -> Self {
        self.exclude_by_default = true;
        self
    }

    /// Restricts the IDP to the given SPs.
    ///
    /// An empty iterator leaves the record unrestricted.
    #[must_use]
    pub fn for_sps<I, S>(mut self, sps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SpEntityId>,
    {
        let set: BTreeSet<SpEntityId> = sps.into_iter().map(Into::into).collect();
        self.for_sps = if set.is_empty() { None } else { Some(set) };
        self
    }

    /// Sets the raw logo URL.
    #[must_use]
    pub fn with_logo_url(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = Some(logo_url.into());
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

// ============================================================================
// SECTION: Service Provider
// ============================================================================

/// Service provider metadata relevant to visibility filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpRecord {
    /// SP entity identifier.
    pub entity_id: SpEntityId,
    /// Explicit IDP allow-list. Absent and empty behave the same.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idp_list: Option<BTreeSet<IdpEntityId>>,
}

impl SpRecord {
    /// Creates an SP record with no IDP preferences.
    #[must_use]
    pub fn new(entity_id: impl Into<SpEntityId>) -> Self {
        Self {
            entity_id: entity_id.into(),
            idp_list: None,
        }
    }

    /// Sets the explicit IDP allow-list.
    #[must_use]
    pub fn with_idp_list<I, S>(mut self, idps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<IdpEntityId>,
    {
        self.idp_list = Some(idps.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the allow-list when it is present and non-empty.
    #[must_use]
    pub fn effective_idp_list(&self) -> Option<&BTreeSet<IdpEntityId>> {
        self.idp_list.as_ref().filter(|list| !list.is_empty())
    }
}

// ============================================================================
// SECTION: Auth Sources
// ============================================================================

/// How a configured auth source label is bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "idp", rename_all = "snake_case")]
pub enum AuthSourceBinding {
    /// Source backed by a remote IDP.
    Idp(IdpEntityId),
    /// Source with no IDP, such as local password auth.
    Local,
}

impl AuthSourceBinding {
    /// Returns the bound IDP entity id, if any.
    #[must_use]
    pub const fn idp(&self) -> Option<&IdpEntityId> {
        match self {
            Self::Idp(id) => Some(id),
            Self::Local => None,
        }
    }
}

/// One surviving auth source, as presented on a login page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSourceEntry {
    /// Auth source label.
    pub label: AuthSourceLabel,
    /// Bound IDP for IDP-backed sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idp_entity_id: Option<IdpEntityId>,
    /// Validated logo URL, set only by decoration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<LogoUrl>,
}

/// Configured auth sources for a deployment.
///
/// # Invariants
/// - `sources` order is the login button order.
/// - Labels in `sources` without an entry in `bindings` are unconfigured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredAuthSources {
    /// Labels in configured order.
    pub sources: Vec<AuthSourceLabel>,
    /// Binding for each configured label.
    pub bindings: BTreeMap<AuthSourceLabel, AuthSourceBinding>,
}

impl ConfiguredAuthSources {
    /// Returns the IDP bound to a label, if any.
    #[must_use]
    pub fn idp_for(&self, label: &AuthSourceLabel) -> Option<&IdpEntityId> {
        self.bindings.get(label).and_then(AuthSourceBinding::idp)
    }
}
