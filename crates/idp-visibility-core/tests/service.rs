// crates/idp-visibility-core/tests/service.rs
// ============================================================================
// Module: Visibility Service Tests
// Description: Tests for SP resolution, hard failures, and audit events.
// ============================================================================
//! ## Overview
//! Validates that unknown or malformed current SPs fail hard, that reducers
//! behind the service emit one audit event per call, and that auth state
//! tokens never reach the audit log.

#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]
#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

mod common;

use std::fs;
use std::sync::Arc;

use idp_visibility_core::AuthStateToken;
use idp_visibility_core::EntityKind;
use idp_visibility_core::FileAuditSink;
use idp_visibility_core::FilterOperation;
use idp_visibility_core::RejectReason;
use idp_visibility_core::SpEntityId;
use idp_visibility_core::StaticSpResolver;
use idp_visibility_core::VisibilityDecision;
use idp_visibility_core::VisibilityError;
use idp_visibility_core::VisibilityService;

use crate::common::*;

/// Builds a service over the fixtures with a recording audit sink.
fn service_with_sink() -> (VisibilityService, Arc<RecordingAuditSink>) {
    let sink = Arc::new(RecordingAuditSink::default());
    let mut sps = sp_catalog();
    sps.insert_malformed(SpEntityId::new("sp-broken"), "idpList must be an array of strings")
        .expect("unique");
    let service = VisibilityService::new(idp_catalog(), sps)
        .with_auth_sources(configured_auth_sources())
        .with_audit_sink(sink.clone());
    (service, sink)
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

#[test]
fn unknown_sp_is_a_hard_failure() {
    let (service, sink) = service_with_sink();
    let err = service.visible_idps(&"sp-ghost".into()).unwrap_err();
    assert_eq!(
        err,
        VisibilityError::UnknownEntity {
            kind: EntityKind::Sp,
            entity_id: "sp-ghost".to_string(),
        }
    );
    assert_eq!(sink.resolutions.lock().unwrap().len(), 1);
    assert!(sink.filters.lock().unwrap().is_empty());
}

#[test]
fn malformed_sp_is_a_hard_failure() {
    let (service, _sink) = service_with_sink();
    let err = service.visible_auth_sources(&"sp-broken".into(), false).unwrap_err();
    assert!(matches!(
        err,
        VisibilityError::MalformedConfig { ref entity_id, .. } if entity_id == "sp-broken"
    ));
}

#[test]
fn malformed_sp_is_left_out_of_graph() {
    let (service, _sink) = service_with_sink();
    let graph = service.visibility_graph();
    assert!(graph.idps_for(&"sp-broken".into()).is_none());
    assert_eq!(graph.sp_to_idps.len(), 3);
}

#[test]
fn token_resolution_drives_filtering() {
    let (service, _sink) = service_with_sink();
    let mut resolver = StaticSpResolver::new();
    resolver.bind("state-123", SP_ON_FOR_SPS);
    let visible =
        service.visible_idps_for_state(&resolver, &AuthStateToken::new("state-123")).unwrap();
    assert_eq!(ids(&visible), vec![IDP_BARE, IDP_FOR_SPS]);
    let sources = service
        .visible_auth_sources_for_state(&resolver, &AuthStateToken::new("state-123"), true)
        .unwrap();
    assert_eq!(labels(&sources), vec!["local", "bare", "for-sps"]);
}

#[test]
fn unknown_token_fails_without_leaking_it() {
    let (service, sink) = service_with_sink();
    let resolver = StaticSpResolver::new();
    let err = service
        .visible_idps_for_state(&resolver, &AuthStateToken::new("secret-token"))
        .unwrap_err();
    assert!(matches!(err, VisibilityError::UnknownEntity { kind: EntityKind::AuthState, .. }));
    let events = sink.resolutions.lock().unwrap();
    assert_eq!(events.len(), 1);
    let payload = serde_json::to_string(&events[0]).expect("serialize");
    assert!(!payload.contains("secret-token"));
}

// ============================================================================
// SECTION: Explain
// ============================================================================

#[test]
fn explain_reports_deciding_rule() {
    let (service, _sink) = service_with_sink();
    assert_eq!(
        service.explain(&SP_BARE.into(), &IDP_EXCLUDE.into()).unwrap(),
        VisibilityDecision::Reject(RejectReason::ExcludedByDefault)
    );
    assert_eq!(
        service.explain(&SP_ON_FOR_SPS_WITH_IDP_LIST.into(), &IDP_FOR_SPS_EXCLUDE.into()).unwrap(),
        VisibilityDecision::Accept
    );
}

#[test]
fn explain_unknown_idp_fails() {
    let (service, _sink) = service_with_sink();
    let err = service.explain(&SP_BARE.into(), &"idp-ghost".into()).unwrap_err();
    assert!(matches!(err, VisibilityError::UnknownEntity { kind: EntityKind::Idp, .. }));
}

// ============================================================================
// SECTION: Audit
// ============================================================================

#[test]
fn filter_calls_emit_one_event_each() {
    let (service, sink) = service_with_sink();
    service.visible_idps(&SP_BARE.into()).unwrap();
    service.visible_auth_sources(&SP_BARE.into(), true).unwrap();
    let events = sink.filters.lock().unwrap();
    assert_eq!(events.len(), 2);

    let idp_event = &events[0];
    assert_eq!(idp_event.operation, FilterOperation::IdpCatalog);
    assert_eq!((idp_event.considered, idp_event.accepted), (4, 1));
    assert_eq!(idp_event.rejected.len(), 3);

    let source_event = &events[1];
    assert_eq!(source_event.operation, FilterOperation::AuthSources);
    assert_eq!((source_event.considered, source_event.accepted), (7, 2));
    let rejected: Vec<&str> =
        source_event.rejected.iter().map(|item| item.idp_entity_id.as_str()).collect();
    assert_eq!(rejected, vec![IDP_EXCLUDE, IDP_FOR_SPS, IDP_FOR_SPS_EXCLUDE]);
}

#[test]
fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("audit.jsonl");
    let sink = Arc::new(FileAuditSink::new(&path).expect("open audit log"));
    let service = VisibilityService::new(idp_catalog(), sp_catalog()).with_audit_sink(sink);
    service.visible_idps(&SP_BARE.into()).unwrap();
    service.visible_idps(&SP_ON_FOR_SPS.into()).unwrap();

    let contents = fs::read_to_string(&path).expect("read audit log");
    let lines: Vec<serde_json::Value> =
        contents.lines().map(|line| serde_json::from_str(line).expect("json line")).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "visibility_filter");
    assert_eq!(lines[0]["sp_entity_id"], SP_BARE);
    assert_eq!(lines[1]["accepted"], 2);
}

#[test]
fn service_clones_share_snapshots() {
    let (service, _sink) = service_with_sink();
    let clone = service.clone();
    let handle = std::thread::spawn(move || clone.visible_idps(&SP_ON_FOR_SPS.into()).unwrap());
    let from_thread = handle.join().expect("thread");
    assert_eq!(from_thread, service.visible_idps(&SP_ON_FOR_SPS.into()).unwrap());
}
