// crates/idp-visibility-core/src/core/error.rs
// ============================================================================
// Module: Visibility Errors
// Description: Error taxonomy for catalog construction and SP resolution.
// Purpose: Separate hard failures from the soft skips done inside reducers.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Reducers never return errors: dangling bindings and malformed IDPs are
//! skipped. Errors surface only when the request target itself (the current
//! SP) cannot be resolved, or when a catalog is built with duplicate keys.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Entity Kind
// ============================================================================

/// Kind of federation entity referenced by an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Identity provider.
    Idp,
    /// Service provider.
    Sp,
    /// Authentication state token.
    AuthState,
}

impl EntityKind {
    /// Returns a stable label for the entity kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idp => "idp",
            Self::Sp => "sp",
            Self::AuthState => "auth state",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Visibility filtering errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisibilityError {
    /// Referenced entity does not exist in its catalog.
    #[error("unknown {} entity: {entity_id}", kind.as_str())]
    UnknownEntity {
        /// Kind of the missing entity.
        kind: EntityKind,
        /// Entity identifier that failed to resolve.
        entity_id: String,
    },
    /// Entity exists but its metadata was malformed.
    #[error("malformed config for {entity_id}: {reason}")]
    MalformedConfig {
        /// Entity identifier with malformed metadata.
        entity_id: String,
        /// Description of the malformation.
        reason: String,
    },
    /// Catalog received the same entity id twice.
    #[error("duplicate {} entity: {entity_id}", kind.as_str())]
    DuplicateEntity {
        /// Kind of the duplicated entity.
        kind: EntityKind,
        /// Duplicated entity identifier.
        entity_id: String,
    },
}
