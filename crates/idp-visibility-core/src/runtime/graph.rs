// crates/idp-visibility-core/src/runtime/graph.rs
// ============================================================================
// Module: Visibility Link Graph
// Description: Bipartite SP<->IDP visibility graph for reporting.
// Purpose: Show which SP and IDP pairs are linked across a deployment.
// Dependencies: crate::core, crate::runtime::policy, serde
// ============================================================================

//! ## Overview
//! The graph is derived purely by applying the visibility policy to every
//! (SP, IDP) pair. Every SP and every IDP appears, with an empty list when it
//! has no links.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::IdpCatalog;
use crate::core::IdpEntityId;
use crate::core::SpCatalog;
use crate::core::SpEntityId;
use crate::runtime::policy::evaluate_for_sp;

// ============================================================================
// SECTION: Graph Types
// ============================================================================

/// IDPs visible to one SP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpLinks {
    /// SP entity identifier.
    pub sp_entity_id: SpEntityId,
    /// Visible IDPs in IDP catalog order.
    pub idps: Vec<IdpEntityId>,
}

/// SPs that can see one IDP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdpLinks {
    /// IDP entity identifier.
    pub idp_entity_id: IdpEntityId,
    /// SPs in SP catalog order.
    pub sps: Vec<SpEntityId>,
}

/// Full SP<->IDP visibility graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisibilityGraph {
    /// SP to IDPs, in SP catalog order.
    pub sp_to_idps: Vec<SpLinks>,
    /// IDP to SPs, in IDP catalog order.
    pub idp_to_sps: Vec<IdpLinks>,
}

impl VisibilityGraph {
    /// Returns the IDPs visible to an SP.
    #[must_use]
    pub fn idps_for(&self, sp_entity_id: &SpEntityId) -> Option<&[IdpEntityId]> {
        self.sp_to_idps
            .iter()
            .find(|links| &links.sp_entity_id == sp_entity_id)
            .map(|links| links.idps.as_slice())
    }

    /// Returns the SPs that can see an IDP.
    #[must_use]
    pub fn sps_for(&self, idp_entity_id: &IdpEntityId) -> Option<&[SpEntityId]> {
        self.idp_to_sps
            .iter()
            .find(|links| &links.idp_entity_id == idp_entity_id)
            .map(|links| links.sps.as_slice())
    }

    /// Returns the total number of SP<->IDP links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.sp_to_idps.iter().map(|links| links.idps.len()).sum()
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builds the visibility graph across all SPs and IDPs.
#[must_use]
pub fn build_visibility_graph(all_sps: &SpCatalog, all_idps: &IdpCatalog) -> VisibilityGraph {
    let mut idp_to_sps: Vec<IdpLinks> = all_idps
        .entity_ids()
        .map(|id| IdpLinks {
            idp_entity_id: id.clone(),
            sps: Vec::new(),
        })
        .collect();
    let mut sp_to_idps = Vec::with_capacity(all_sps.len());
    for sp in all_sps.iter() {
        let mut idps = Vec::new();
        for (idp, links) in all_idps.iter().zip(idp_to_sps.iter_mut()) {
            if evaluate_for_sp(idp, sp).is_accepted() {
                idps.push(idp.entity_id.clone());
                links.sps.push(sp.entity_id.clone());
            }
        }
        sp_to_idps.push(SpLinks {
            sp_entity_id: sp.entity_id.clone(),
            idps,
        });
    }
    VisibilityGraph {
        sp_to_idps,
        idp_to_sps,
    }
}
