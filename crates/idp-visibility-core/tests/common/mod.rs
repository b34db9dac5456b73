// crates/idp-visibility-core/tests/common/mod.rs
// =============================================================================
// Module: Visibility Test Fixtures
// Description: Shared federation metadata fixtures for core tests.
// Purpose: Reduce duplication across integration tests for idp-visibility-core.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]
#![allow(clippy::expect_used, reason = "Fixture ids are unique by construction.")]

use std::sync::Mutex;

use idp_visibility_core::AuthSourceBinding;
use idp_visibility_core::AuthSourceLabel;
use idp_visibility_core::ConfiguredAuthSources;
use idp_visibility_core::FilterAuditEvent;
use idp_visibility_core::IdpCatalog;
use idp_visibility_core::IdpRecord;
use idp_visibility_core::LoadAuditEvent;
use idp_visibility_core::ResolutionAuditEvent;
use idp_visibility_core::SpCatalog;
use idp_visibility_core::SpRecord;
use idp_visibility_core::VisibilityAuditSink;

/// Unrestricted IDP.
pub const IDP_BARE: &str = "idp-bare";
/// Excluded-by-default IDP.
pub const IDP_EXCLUDE: &str = "idp-exclude";
/// IDP with an SP allow-list.
pub const IDP_FOR_SPS: &str = "idp-forSps";
/// IDP with an SP allow-list that is also excluded by default.
pub const IDP_FOR_SPS_EXCLUDE: &str = "idp-forSpsExclude";

/// SP without an IDP list.
pub const SP_BARE: &str = "sp-bare";
/// SP named in IDP allow-lists, without an IDP list.
pub const SP_ON_FOR_SPS: &str = "sp-onForSps";
/// SP named in IDP allow-lists, with an IDP list.
pub const SP_ON_FOR_SPS_WITH_IDP_LIST: &str = "sp-onForSpsWithIdpList";

/// IDP with no visibility restrictions.
pub fn idp_bare() -> IdpRecord {
    IdpRecord::new(IDP_BARE).with_logo_url("https://idp-bare.example.org/logo.png")
}

/// IDP hidden from SPs without an allow-list.
pub fn idp_exclude() -> IdpRecord {
    IdpRecord::new(IDP_EXCLUDE).excluded_by_default()
}

/// IDP restricted to two SPs.
pub fn idp_for_sps() -> IdpRecord {
    IdpRecord::new(IDP_FOR_SPS)
        .for_sps([SP_ON_FOR_SPS, SP_ON_FOR_SPS_WITH_IDP_LIST])
        .with_logo_url("not a url")
}

/// IDP restricted to two SPs and excluded by default.
pub fn idp_for_sps_exclude() -> IdpRecord {
    IdpRecord::new(IDP_FOR_SPS_EXCLUDE)
        .excluded_by_default()
        .for_sps([SP_ON_FOR_SPS, SP_ON_FOR_SPS_WITH_IDP_LIST])
}

/// Full fixture IDP catalog in metadata order.
pub fn idp_catalog() -> IdpCatalog {
    IdpCatalog::from_records([idp_bare(), idp_exclude(), idp_for_sps(), idp_for_sps_exclude()])
        .expect("fixture idp catalog")
}

/// SP with no IDP preferences.
pub fn sp_bare() -> SpRecord {
    SpRecord::new(SP_BARE)
}

/// SP named in IDP allow-lists but without its own list.
pub fn sp_on_for_sps() -> SpRecord {
    SpRecord::new(SP_ON_FOR_SPS)
}

/// SP named in IDP allow-lists that enumerates its IDPs.
pub fn sp_on_for_sps_with_idp_list() -> SpRecord {
    SpRecord::new(SP_ON_FOR_SPS_WITH_IDP_LIST).with_idp_list([IDP_FOR_SPS_EXCLUDE, IDP_BARE])
}

/// Full fixture SP catalog in metadata order.
pub fn sp_catalog() -> SpCatalog {
    SpCatalog::from_records([sp_bare(), sp_on_for_sps(), sp_on_for_sps_with_idp_list()])
        .expect("fixture sp catalog")
}

/// Auth sources: a local source, one per fixture IDP, and two broken labels.
pub fn configured_auth_sources() -> ConfiguredAuthSources {
    let mut config = ConfiguredAuthSources::default();
    let entries = [
        ("local", None),
        ("bare", Some(IDP_BARE)),
        ("exclude", Some(IDP_EXCLUDE)),
        ("dangling", Some("idp-missing")),
        ("for-sps", Some(IDP_FOR_SPS)),
        ("for-sps-exclude", Some(IDP_FOR_SPS_EXCLUDE)),
    ];
    for (label, idp) in entries {
        let label = AuthSourceLabel::new(label);
        let binding = idp.map_or(AuthSourceBinding::Local, |id| AuthSourceBinding::Idp(id.into()));
        config.sources.push(label.clone());
        config.bindings.insert(label, binding);
    }
    config.sources.insert(2, AuthSourceLabel::new("unconfigured"));
    config
}

/// Returns the labels of the given entries as strings.
pub fn labels(entries: &[idp_visibility_core::AuthSourceEntry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.label.as_str()).collect()
}

/// Returns the entity ids of a catalog as strings.
pub fn ids(catalog: &IdpCatalog) -> Vec<&str> {
    catalog.entity_ids().map(idp_visibility_core::IdpEntityId::as_str).collect()
}

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    /// Recorded filter events.
    pub filters: Mutex<Vec<FilterAuditEvent>>,
    /// Recorded load events.
    pub loads: Mutex<Vec<LoadAuditEvent>>,
    /// Recorded resolution failures.
    pub resolutions: Mutex<Vec<ResolutionAuditEvent>>,
}

impl VisibilityAuditSink for RecordingAuditSink {
    fn record_filter(&self, event: &FilterAuditEvent) {
        if let Ok(mut events) = self.filters.lock() {
            events.push(event.clone());
        }
    }

    fn record_load(&self, event: &LoadAuditEvent) {
        if let Ok(mut events) = self.loads.lock() {
            events.push(event.clone());
        }
    }

    fn record_resolution(&self, event: &ResolutionAuditEvent) {
        if let Ok(mut events) = self.resolutions.lock() {
            events.push(event.clone());
        }
    }
}
