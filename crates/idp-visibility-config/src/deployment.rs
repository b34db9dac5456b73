// crates/idp-visibility-config/src/deployment.rs
// ============================================================================
// Module: Deployment Loader
// Description: Loads every input named by the settings file in one pass.
// Purpose: Hand hosts a ready visibility service backed by validated inputs.
// Dependencies: idp-visibility-core, crate::{auth_sources, config, metadata}
// ============================================================================

//! ## Overview
//! A deployment is the settings file plus the metadata catalogs and the
//! optional authsources configuration it points at. Loading is all or
//! nothing: any hard error aborts, while recoverable metadata findings are
//! kept as diagnostics and replayed into the audit sink when the service is
//! built.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use idp_visibility_core::ConfiguredAuthSources;
use idp_visibility_core::VisibilityAuditSink;
use idp_visibility_core::VisibilityService;

use crate::auth_sources::load_auth_sources;
use crate::config::ConfigError;
use crate::config::VisibilitySettings;
use crate::metadata::MetadataCatalogs;
use crate::metadata::load_metadata_dir;

// ============================================================================
// SECTION: Deployment
// ============================================================================

/// Validated inputs for one IdP visibility deployment.
#[derive(Debug, Clone)]
pub struct Deployment {
    /// Settings the deployment was loaded from.
    pub settings: VisibilitySettings,
    /// Metadata catalogs and load findings.
    pub metadata: MetadataCatalogs,
    /// Authsources configuration, when configured.
    pub auth_sources: Option<ConfiguredAuthSources>,
}

impl Deployment {
    /// Loads settings from `path` (or the default location) and every input
    /// they reference.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any input fails to load or validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = VisibilitySettings::load(path)?;
        Self::from_settings(settings)
    }

    /// Loads the inputs referenced by already-validated settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when metadata or authsources fail to load.
    pub fn from_settings(settings: VisibilitySettings) -> Result<Self, ConfigError> {
        let metadata = load_metadata_dir(&settings.metadata_dir())?;
        let auth_sources =
            settings.auth_sources_path().as_deref().map(load_auth_sources).transpose()?;
        Ok(Self {
            settings,
            metadata,
            auth_sources,
        })
    }

    /// Builds a visibility service, replaying load findings into `audit`.
    #[must_use]
    pub fn into_service(self, audit: Arc<dyn VisibilityAuditSink>) -> VisibilityService {
        for diagnostic in &self.metadata.diagnostics {
            audit.record_load(&diagnostic.to_audit_event());
        }
        let mut service =
            VisibilityService::new(self.metadata.idps, self.metadata.sps).with_audit_sink(audit);
        if let Some(auth_sources) = self.auth_sources {
            service = service.with_auth_sources(auth_sources);
        }
        service
    }
}
