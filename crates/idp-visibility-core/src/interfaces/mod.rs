// crates/idp-visibility-core/src/interfaces/mod.rs
// ============================================================================
// Module: IdP Visibility Interfaces
// Description: Host-facing seams for resolving the current SP.
// Purpose: Keep session handling outside the visibility core.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Hosts own authentication state. They hand the core an opaque token and a
//! resolver that maps it to the SP that started the login. Resolution
//! failures are hard failures: no filtering decision can be made without a
//! known SP.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::AuthStateToken;
use crate::core::EntityKind;
use crate::core::SpEntityId;
use crate::core::VisibilityError;

// ============================================================================
// SECTION: Current SP Resolution
// ============================================================================

/// Resolves the SP behind an opaque authentication state token.
pub trait CurrentSpResolver {
    /// Returns the SP entity id bound to the token.
    ///
    /// # Errors
    ///
    /// Returns [`VisibilityError::UnknownEntity`] when the token is not bound.
    fn resolve_sp(&self, token: &AuthStateToken) -> Result<SpEntityId, VisibilityError>;
}

/// In-memory token to SP resolver.
#[derive(Debug, Clone, Default)]
pub struct StaticSpResolver {
    /// Token bindings.
    bindings: BTreeMap<AuthStateToken, SpEntityId>,
}

impl StaticSpResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a token to an SP, replacing any previous binding.
    pub fn bind(&mut self, token: impl Into<AuthStateToken>, sp: impl Into<SpEntityId>) {
        self.bindings.insert(token.into(), sp.into());
    }
}

impl CurrentSpResolver for StaticSpResolver {
    fn resolve_sp(&self, token: &AuthStateToken) -> Result<SpEntityId, VisibilityError> {
        self.bindings.get(token).cloned().ok_or_else(|| VisibilityError::UnknownEntity {
            kind: EntityKind::AuthState,
            entity_id: "<redacted>".to_string(),
        })
    }
}
