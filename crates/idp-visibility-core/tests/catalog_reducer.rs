// crates/idp-visibility-core/tests/catalog_reducer.rs
// ============================================================================
// Module: Catalog Reducer Tests
// Description: Tests for per-SP IDP catalog reduction.
// ============================================================================
//! ## Overview
//! Validates the discovery-page IDP lists for the fixture SPs, catalog order
//! preservation, idempotence, and the rejection trace.

#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

mod common;

use idp_visibility_core::IdpCatalog;
use idp_visibility_core::IdpRecord;
use idp_visibility_core::RejectReason;
use idp_visibility_core::SpRecord;
use idp_visibility_core::reduce_idp_catalog;
use idp_visibility_core::reduce_idp_catalog_with_trace;

use crate::common::*;

// ============================================================================
// SECTION: Fixture SPs
// ============================================================================

#[test]
fn bare_sp_only_gets_unrestricted_idp() {
    let reduced = reduce_idp_catalog(&idp_catalog(), &sp_bare());
    assert_eq!(ids(&reduced), vec![IDP_BARE]);
    assert_eq!(reduced.get(&IDP_BARE.into()), Some(&idp_bare()));
}

#[test]
fn sp_on_for_sps_gets_bare_and_restricted_idp() {
    let reduced = reduce_idp_catalog(&idp_catalog(), &sp_on_for_sps());
    assert_eq!(ids(&reduced), vec![IDP_BARE, IDP_FOR_SPS]);
}

#[test]
fn sp_with_list_gets_only_listed_idps_in_catalog_order() {
    let reduced = reduce_idp_catalog(&idp_catalog(), &sp_on_for_sps_with_idp_list());
    assert_eq!(ids(&reduced), vec![IDP_BARE, IDP_FOR_SPS_EXCLUDE]);
}

// ============================================================================
// SECTION: Scenarios
// ============================================================================

#[test]
fn exclude_by_default_scenario() {
    let catalog = IdpCatalog::from_records([IdpRecord::new("idp-x").excluded_by_default()])
        .expect("catalog");
    assert!(reduce_idp_catalog(&catalog, &SpRecord::new("sp-y")).is_empty());
    let with_list = SpRecord::new("sp-y").with_idp_list(["idp-x"]);
    assert_eq!(ids(&reduce_idp_catalog(&catalog, &with_list)), vec!["idp-x"]);
}

#[test]
fn for_sps_scenario() {
    let catalog =
        IdpCatalog::from_records([IdpRecord::new("idp-x").for_sps(["sp-A"])]).expect("catalog");
    assert!(reduce_idp_catalog(&catalog, &SpRecord::new("sp-B")).is_empty());
    assert_eq!(ids(&reduce_idp_catalog(&catalog, &SpRecord::new("sp-A"))), vec!["idp-x"]);
}

#[test]
fn override_scenario() {
    let catalog = IdpCatalog::from_records([IdpRecord::new("that-idp")
        .for_sps(["sp-A"])
        .excluded_by_default()])
    .expect("catalog");
    let sp = SpRecord::new("sp-A").with_idp_list(["that-idp"]);
    assert_eq!(ids(&reduce_idp_catalog(&catalog, &sp)), vec!["that-idp"]);
}

// ============================================================================
// SECTION: Invariants
// ============================================================================

#[test]
fn reduction_is_idempotent() {
    let catalog = idp_catalog();
    for sp in [sp_bare(), sp_on_for_sps(), sp_on_for_sps_with_idp_list()] {
        let once = reduce_idp_catalog(&catalog, &sp);
        let twice = reduce_idp_catalog(&once, &sp);
        assert_eq!(once, twice);
    }
}

#[test]
fn reduction_of_empty_catalog_is_empty() {
    assert!(reduce_idp_catalog(&IdpCatalog::new(), &sp_bare()).is_empty());
}

#[test]
fn listed_idps_missing_from_catalog_are_not_invented() {
    let sp = SpRecord::new("sp-a").with_idp_list(["idp-ghost", IDP_BARE]);
    let reduced = reduce_idp_catalog(&idp_catalog(), &sp);
    assert_eq!(ids(&reduced), vec![IDP_BARE]);
}

#[test]
fn trace_reports_every_rejection_in_catalog_order() {
    let reduction = reduce_idp_catalog_with_trace(&idp_catalog(), &sp_bare());
    let rejected: Vec<(&str, RejectReason)> = reduction
        .rejected
        .iter()
        .map(|(idp, reason)| (idp.entity_id.as_str(), *reason))
        .collect();
    assert_eq!(
        rejected,
        vec![
            (IDP_EXCLUDE, RejectReason::ExcludedByDefault),
            (IDP_FOR_SPS, RejectReason::NotInForSps),
            (IDP_FOR_SPS_EXCLUDE, RejectReason::NotInForSps),
        ]
    );
    assert_eq!(reduction.visible.len() + reduction.rejected.len(), idp_catalog().len());
}

#[test]
fn catalog_rejects_duplicate_ids() {
    let result = IdpCatalog::from_records([IdpRecord::new("idp-a"), IdpRecord::new("idp-a")]);
    let message = result.map(|_| ()).map_err(|err| err.to_string());
    assert_eq!(message, Err("duplicate idp entity: idp-a".to_string()));
}

#[test]
fn reduced_catalog_serializes_as_ordered_array() {
    let reduced = reduce_idp_catalog(&idp_catalog(), &sp_on_for_sps());
    let value = serde_json::to_value(&reduced).expect("serialize");
    let entity_ids: Vec<&str> = value
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|entry| entry.get("entity_id").and_then(serde_json::Value::as_str))
        .collect();
    assert_eq!(entity_ids, vec![IDP_BARE, IDP_FOR_SPS]);
}
