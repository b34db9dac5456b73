// crates/idp-visibility-core/src/runtime/sources.rs
// ============================================================================
// Module: Auth Source Reducer
// Description: Filters configured auth sources and decorates them with logos.
// Purpose: Produce the ordered login choices one SP may offer.
// Dependencies: crate::core, crate::runtime::policy
// ============================================================================

//! ## Overview
//! Configured source order drives login button order and is preserved. Local
//! sources pass through; unconfigured labels and bindings to IDPs missing
//! from the catalog are dropped without error. Logo decoration works on
//! copies and only ever attaches a validated [`LogoUrl`].
//!
//! Local sources (a configured table with no `idp` key) are always kept, even
//! though a label lacking an IDP binding could be read as droppable. Only
//! IDP-backed sources go through the visibility rules.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::AuthSourceBinding;
use crate::core::AuthSourceEntry;
use crate::core::AuthSourceLabel;
use crate::core::IdpCatalog;
use crate::core::LogoUrl;
use crate::core::SpRecord;
use crate::runtime::policy::is_idp_valid_for_sp;

// ============================================================================
// SECTION: Reduction
// ============================================================================

/// Returns the configured sources the SP may use, in configured order.
#[must_use]
pub fn reduce_auth_sources(
    configured_sources: &[AuthSourceLabel],
    bindings: &BTreeMap<AuthSourceLabel, AuthSourceBinding>,
    sp: &SpRecord,
    idp_catalog: &IdpCatalog,
) -> Vec<AuthSourceEntry> {
    configured_sources
        .iter()
        .filter_map(|label| {
            let binding = bindings.get(label)?;
            match binding {
                AuthSourceBinding::Local => Some(AuthSourceEntry {
                    label: label.clone(),
                    idp_entity_id: None,
                    logo_url: None,
                }),
                AuthSourceBinding::Idp(idp_entity_id) => {
                    let idp = idp_catalog.get(idp_entity_id)?;
                    is_idp_valid_for_sp(idp, &sp.entity_id, sp.idp_list.as_ref()).then(|| {
                        AuthSourceEntry {
                            label: label.clone(),
                            idp_entity_id: Some(idp_entity_id.clone()),
                            logo_url: None,
                        }
                    })
                }
            }
        })
        .collect()
}

// ============================================================================
// SECTION: Decoration
// ============================================================================

/// Returns copies of the sources with validated logo URLs attached.
///
/// A source keeps no logo when its IDP is missing, has no logo, or the logo
/// fails sanitization or validation.
#[must_use]
pub fn attach_logo_urls(
    sources: &[AuthSourceEntry],
    idp_catalog: &IdpCatalog,
) -> Vec<AuthSourceEntry> {
    sources
        .iter()
        .map(|source| {
            let logo_url = source
                .idp_entity_id
                .as_ref()
                .and_then(|id| idp_catalog.get(id))
                .and_then(|idp| idp.logo_url.as_deref())
                .and_then(LogoUrl::sanitize);
            AuthSourceEntry {
                logo_url,
                ..source.clone()
            }
        })
        .collect()
}
