// crates/idp-visibility-core/src/core/mod.rs
// ============================================================================
// Module: IdP Visibility Core Types
// Description: Identifiers, metadata records, catalogs, and errors.
// Purpose: Provide stable, serializable types for visibility filtering.
// Dependencies: serde, thiserror, url
// ============================================================================

//! ## Overview
//! Core types describe what the config loader hands to the filters: ordered
//! catalogs of IDP and SP metadata, auth source bindings, and the validated
//! logo URL type used when decorating login choices.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod catalog;
pub mod error;
pub mod identifiers;
pub mod logo;
pub mod records;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::IdpCatalog;
pub use catalog::SpCatalog;
pub use error::EntityKind;
pub use error::VisibilityError;
pub use identifiers::AuthSourceLabel;
pub use identifiers::AuthStateToken;
pub use identifiers::IdpEntityId;
pub use identifiers::SpEntityId;
pub use logo::LogoUrl;
pub use logo::MAX_LOGO_URL_LENGTH;
pub use logo::sanitize_url;
pub use records::AuthSourceBinding;
pub use records::AuthSourceEntry;
pub use records::ConfiguredAuthSources;
pub use records::IdpRecord;
pub use records::SpRecord;
