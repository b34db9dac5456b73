// crates/idp-visibility-core/src/runtime/reducer.rs
// ============================================================================
// Module: IDP Catalog Reducer
// Description: Filters an IDP catalog down to what one SP may present.
// Purpose: Produce the discovery-page IDP list for a resolved SP.
// Dependencies: crate::core, crate::runtime::policy
// ============================================================================

//! ## Overview
//! The reducer applies the visibility policy to every catalog entry and keeps
//! the accepted ones in catalog order. Feeding the result back in yields the
//! same catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::IdpCatalog;
use crate::core::IdpRecord;
use crate::core::SpRecord;
use crate::runtime::policy::RejectReason;
use crate::runtime::policy::VisibilityDecision;
use crate::runtime::policy::evaluate_for_sp;

// ============================================================================
// SECTION: Reduction
// ============================================================================

/// Returns the IDPs the SP may present, in catalog order.
#[must_use]
pub fn reduce_idp_catalog(all_idps: &IdpCatalog, sp: &SpRecord) -> IdpCatalog {
    reduce_idp_catalog_with_trace(all_idps, sp).visible
}

/// Reduction result plus the rejected entries and their reasons.
#[derive(Debug, Clone, Default)]
pub struct CatalogReduction {
    /// Accepted IDPs in catalog order.
    pub visible: IdpCatalog,
    /// Rejected IDPs in catalog order.
    pub rejected: Vec<(IdpRecord, RejectReason)>,
}

/// Reduces the catalog and keeps a trace of every rejection.
#[must_use]
pub fn reduce_idp_catalog_with_trace(all_idps: &IdpCatalog, sp: &SpRecord) -> CatalogReduction {
    let mut visible = Vec::new();
    let mut rejected = Vec::new();
    for idp in all_idps {
        match evaluate_for_sp(idp, sp) {
            VisibilityDecision::Accept => visible.push(idp.clone()),
            VisibilityDecision::Reject(reason) => rejected.push((idp.clone(), reason)),
        }
    }
    CatalogReduction {
        visible: IdpCatalog::from_unique_records(visible),
        rejected,
    }
}
