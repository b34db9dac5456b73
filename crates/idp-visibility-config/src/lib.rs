// crates/idp-visibility-config/src/lib.rs
// ============================================================================
// Module: IdP Visibility Config Library
// Description: Settings model, metadata loading, and authsources loading.
// Purpose: Single source of truth for on-disk visibility configuration.
// Dependencies: idp-visibility-core, serde, toml
// ============================================================================

//! ## Overview
//! `idp-visibility-config` turns the on-disk deployment (settings file,
//! metadata directory, authsources file) into the typed records consumed by
//! `idp-visibility-core`. Validation is strict and fails closed.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth_sources;
pub mod config;
pub mod deployment;
pub mod metadata;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth_sources::load_auth_sources;
pub use auth_sources::parse_auth_sources;
pub use config::*;
pub use deployment::Deployment;
pub use metadata::LoadDiagnostic;
pub use metadata::MetadataCatalogs;
pub use metadata::MetadataKind;
pub use metadata::load_metadata_dir;
