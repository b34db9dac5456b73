// crates/idp-visibility-core/src/lib.rs
// ============================================================================
// Module: IdP Visibility Core Library
// Description: Public API surface for the IdP visibility core.
// Purpose: Expose core types, interfaces, audit sinks, and runtime helpers.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! IdP visibility core decides which identity providers a SAML service
//! provider may offer on its login pages. It filters an IDP catalog, reduces
//! configured auth sources with optional logo decoration, and builds the
//! deployment-wide SP<->IDP link graph. All inputs are in-memory snapshots
//! supplied by a config loader; the core performs no metadata I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use audit::FileAuditSink;
pub use audit::FilterAuditEvent;
pub use audit::FilterOperation;
pub use audit::LoadAuditEvent;
pub use audit::LoadAuditEventParams;
pub use audit::LoadSeverity;
pub use audit::NoopAuditSink;
pub use audit::RejectedIdp;
pub use audit::ResolutionAuditEvent;
pub use audit::StderrAuditSink;
pub use audit::VisibilityAuditSink;
pub use interfaces::CurrentSpResolver;
pub use interfaces::StaticSpResolver;
pub use runtime::CatalogReduction;
pub use runtime::IdpLinks;
pub use runtime::RejectReason;
pub use runtime::SpLinks;
pub use runtime::VisibilityDecision;
pub use runtime::VisibilityGraph;
pub use runtime::VisibilityService;
pub use runtime::attach_logo_urls;
pub use runtime::build_visibility_graph;
pub use runtime::evaluate_for_sp;
pub use runtime::evaluate_visibility;
pub use runtime::is_idp_valid_for_sp;
pub use runtime::reduce_auth_sources;
pub use runtime::reduce_idp_catalog;
pub use runtime::reduce_idp_catalog_with_trace;
