// crates/idp-visibility-core/src/runtime/policy.rs
// ============================================================================
// Module: IDP Visibility Policy
// Description: Ordered visibility rules for one (IDP, SP) pair.
// Purpose: Decide whether an SP may present an IDP to its users.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! The visibility policy is a fixed, ordered rule list; the first rule that
//! rejects decides. An IDP's exclusive `for_sps` allow-list is checked first
//! and independently of the SP. The exclude-by-default flag only applies to
//! SPs without an allow-list, and an SP allow-list only applies when present,
//! so explicit inclusion overrides default exclusion.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::IdpEntityId;
use crate::core::IdpRecord;
use crate::core::SpEntityId;
use crate::core::SpRecord;

// ============================================================================
// SECTION: Decision Types
// ============================================================================

/// Rule that rejected an IDP for an SP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The IDP is restricted to other SPs.
    NotInForSps,
    /// The IDP hides itself from SPs without an allow-list.
    ExcludedByDefault,
    /// The SP enumerates its IDPs and this one is not listed.
    NotInSpIdpList,
}

impl RejectReason {
    /// Returns a stable label for the reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotInForSps => "not_in_for_sps",
            Self::ExcludedByDefault => "excluded_by_default",
            Self::NotInSpIdpList => "not_in_sp_idp_list",
        }
    }
}

/// Outcome of evaluating the visibility policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum VisibilityDecision {
    /// The SP may present the IDP.
    Accept,
    /// The SP may not present the IDP.
    Reject(RejectReason),
}

impl VisibilityDecision {
    /// Returns true when the decision accepts the IDP.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accept)
    }

    /// Returns the rejecting rule, if any.
    #[must_use]
    pub const fn reject_reason(self) -> Option<RejectReason> {
        match self {
            Self::Accept => None,
            Self::Reject(reason) => Some(reason),
        }
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates the visibility rules and reports which rule decided.
#[must_use]
pub fn evaluate_visibility(
    idp: &IdpRecord,
    sp_entity_id: &SpEntityId,
    idp_list: Option<&BTreeSet<IdpEntityId>>,
) -> VisibilityDecision {
    if let Some(for_sps) = idp.for_sps.as_ref().filter(|set| !set.is_empty())
        && !for_sps.contains(sp_entity_id)
    {
        return VisibilityDecision::Reject(RejectReason::NotInForSps);
    }
    match idp_list.filter(|list| !list.is_empty()) {
        None if idp.exclude_by_default => {
            VisibilityDecision::Reject(RejectReason::ExcludedByDefault)
        }
        Some(list) if !list.contains(&idp.entity_id) => {
            VisibilityDecision::Reject(RejectReason::NotInSpIdpList)
        }
        _ => VisibilityDecision::Accept,
    }
}

/// Returns true when the SP may present the IDP to its users.
#[must_use]
pub fn is_idp_valid_for_sp(
    idp: &IdpRecord,
    sp_entity_id: &SpEntityId,
    idp_list: Option<&BTreeSet<IdpEntityId>>,
) -> bool {
    evaluate_visibility(idp, sp_entity_id, idp_list).is_accepted()
}

/// Evaluates the visibility rules for a resolved SP record.
#[must_use]
pub fn evaluate_for_sp(idp: &IdpRecord, sp: &SpRecord) -> VisibilityDecision {
    evaluate_visibility(idp, &sp.entity_id, sp.idp_list.as_ref())
}
