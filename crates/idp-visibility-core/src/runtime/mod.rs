// crates/idp-visibility-core/src/runtime/mod.rs
// ============================================================================
// Module: IdP Visibility Runtime
// Description: Policy evaluation, reducers, link graph, and service facade.
// Purpose: Compute which IDPs and auth sources an SP may present.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime functions are synchronous and pure over their inputs. Every
//! reducer calls the policy evaluator once per candidate pair.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod graph;
pub mod policy;
pub mod reducer;
pub mod service;
pub mod sources;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use graph::IdpLinks;
pub use graph::SpLinks;
pub use graph::VisibilityGraph;
pub use graph::build_visibility_graph;
pub use policy::RejectReason;
pub use policy::VisibilityDecision;
pub use policy::evaluate_for_sp;
pub use policy::evaluate_visibility;
pub use policy::is_idp_valid_for_sp;
pub use reducer::CatalogReduction;
pub use reducer::reduce_idp_catalog;
pub use reducer::reduce_idp_catalog_with_trace;
pub use service::VisibilityService;
pub use sources::attach_logo_urls;
pub use sources::reduce_auth_sources;
