// crates/idp-visibility-core/src/runtime/service.rs
// ============================================================================
// Module: Visibility Service
// Description: Stateless facade over shared metadata snapshots.
// Purpose: Resolve the current SP and run the filters with audit logging.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`VisibilityService`] bundles immutable catalog snapshots with an audit
//! sink. It adds the hard-failure policy for the request target: an unknown
//! or malformed current SP is an error, while everything the reducers skip
//! stays a soft skip. The service is cheap to clone and safe to share.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::audit::FilterAuditEvent;
use crate::audit::FilterAuditEventParams;
use crate::audit::FilterOperation;
use crate::audit::NoopAuditSink;
use crate::audit::RejectedIdp;
use crate::audit::ResolutionAuditEvent;
use crate::audit::VisibilityAuditSink;
use crate::core::AuthSourceEntry;
use crate::core::AuthStateToken;
use crate::core::ConfiguredAuthSources;
use crate::core::EntityKind;
use crate::core::IdpCatalog;
use crate::core::IdpEntityId;
use crate::core::SpCatalog;
use crate::core::SpEntityId;
use crate::core::SpRecord;
use crate::core::VisibilityError;
use crate::interfaces::CurrentSpResolver;
use crate::runtime::graph::VisibilityGraph;
use crate::runtime::graph::build_visibility_graph;
use crate::runtime::policy::VisibilityDecision;
use crate::runtime::policy::evaluate_for_sp;
use crate::runtime::reducer::reduce_idp_catalog_with_trace;
use crate::runtime::sources::attach_logo_urls;
use crate::runtime::sources::reduce_auth_sources;

// ============================================================================
// SECTION: Service
// ============================================================================

/// Visibility facade for host controllers.
#[derive(Clone)]
pub struct VisibilityService {
    /// IDP metadata snapshot.
    idps: Arc<IdpCatalog>,
    /// SP metadata snapshot.
    sps: Arc<SpCatalog>,
    /// Configured auth sources snapshot.
    auth_sources: Arc<ConfiguredAuthSources>,
    /// Audit sink for filter and resolution events.
    audit: Arc<dyn VisibilityAuditSink>,
}

impl VisibilityService {
    /// Creates a service with no auth sources and a no-op audit sink.
    #[must_use]
    pub fn new(idps: IdpCatalog, sps: SpCatalog) -> Self {
        Self {
            idps: Arc::new(idps),
            sps: Arc::new(sps),
            auth_sources: Arc::new(ConfiguredAuthSources::default()),
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Sets the configured auth sources.
    #[must_use]
    pub fn with_auth_sources(mut self, auth_sources: ConfiguredAuthSources) -> Self {
        self.auth_sources = Arc::new(auth_sources);
        self
    }

    /// Sets the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn VisibilityAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the IDP catalog snapshot.
    #[must_use]
    pub fn idp_catalog(&self) -> &IdpCatalog {
        &self.idps
    }

    /// Returns the SP catalog snapshot.
    #[must_use]
    pub fn sp_catalog(&self) -> &SpCatalog {
        &self.sps
    }

    /// Returns the configured auth sources snapshot.
    #[must_use]
    pub fn auth_sources(&self) -> &ConfiguredAuthSources {
        &self.auth_sources
    }

    /// Resolves the SP record for a filtering request.
    ///
    /// # Errors
    ///
    /// Returns [`VisibilityError`] when the SP is unknown or malformed.
    pub fn sp_record(&self, sp_entity_id: &SpEntityId) -> Result<&SpRecord, VisibilityError> {
        self.sps.resolve(sp_entity_id).inspect_err(|err| {
            self.audit.record_resolution(&ResolutionAuditEvent::new(
                Some(sp_entity_id.clone()),
                err.to_string(),
            ));
        })
    }

    /// Returns the IDPs the SP may present, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`VisibilityError`] when the SP is unknown or malformed.
    pub fn visible_idps(&self, sp_entity_id: &SpEntityId) -> Result<IdpCatalog, VisibilityError> {
        let sp = self.sp_record(sp_entity_id)?;
        let reduction = reduce_idp_catalog_with_trace(&self.idps, sp);
        self.audit.record_filter(&FilterAuditEvent::new(FilterAuditEventParams {
            operation: FilterOperation::IdpCatalog,
            sp_entity_id: sp.entity_id.clone(),
            considered: self.idps.len(),
            accepted: reduction.visible.len(),
            rejected: reduction
                .rejected
                .iter()
                .map(|(idp, reason)| RejectedIdp {
                    idp_entity_id: idp.entity_id.clone(),
                    reason: *reason,
                })
                .collect(),
        }));
        Ok(reduction.visible)
    }

    /// Returns the IDPs visible to the SP behind an auth state token.
    ///
    /// # Errors
    ///
    /// Returns [`VisibilityError`] when the token or the SP cannot be resolved.
    pub fn visible_idps_for_state<R>(
        &self,
        resolver: &R,
        token: &AuthStateToken,
    ) -> Result<IdpCatalog, VisibilityError>
    where
        R: CurrentSpResolver + ?Sized,
    {
        let sp_entity_id = self.resolve_current_sp(resolver, token)?;
        self.visible_idps(&sp_entity_id)
    }

    /// Returns the auth sources the SP may use, in configured order.
    ///
    /// # Errors
    ///
    /// Returns [`VisibilityError`] when the SP is unknown or malformed.
    pub fn visible_auth_sources(
        &self,
        sp_entity_id: &SpEntityId,
        with_logos: bool,
    ) -> Result<Vec<AuthSourceEntry>, VisibilityError> {
        let sp = self.sp_record(sp_entity_id)?;
        let reduced = reduce_auth_sources(
            &self.auth_sources.sources,
            &self.auth_sources.bindings,
            sp,
            &self.idps,
        );
        self.audit.record_filter(&FilterAuditEvent::new(FilterAuditEventParams {
            operation: FilterOperation::AuthSources,
            sp_entity_id: sp.entity_id.clone(),
            considered: self.auth_sources.sources.len(),
            accepted: reduced.len(),
            rejected: self.rejected_source_idps(sp),
        }));
        if with_logos {
            return Ok(attach_logo_urls(&reduced, &self.idps));
        }
        Ok(reduced)
    }

    /// Returns the auth sources usable by the SP behind an auth state token.
    ///
    /// # Errors
    ///
    /// Returns [`VisibilityError`] when the token or the SP cannot be resolved.
    pub fn visible_auth_sources_for_state<R>(
        &self,
        resolver: &R,
        token: &AuthStateToken,
        with_logos: bool,
    ) -> Result<Vec<AuthSourceEntry>, VisibilityError>
    where
        R: CurrentSpResolver + ?Sized,
    {
        let sp_entity_id = self.resolve_current_sp(resolver, token)?;
        self.visible_auth_sources(&sp_entity_id, with_logos)
    }

    /// Explains the decision for a single (SP, IDP) pair.
    ///
    /// # Errors
    ///
    /// Returns [`VisibilityError`] when either entity cannot be resolved.
    pub fn explain(
        &self,
        sp_entity_id: &SpEntityId,
        idp_entity_id: &IdpEntityId,
    ) -> Result<VisibilityDecision, VisibilityError> {
        let sp = self.sp_record(sp_entity_id)?;
        let idp = self.idps.get(idp_entity_id).ok_or_else(|| VisibilityError::UnknownEntity {
            kind: EntityKind::Idp,
            entity_id: idp_entity_id.to_string(),
        })?;
        Ok(evaluate_for_sp(idp, sp))
    }

    /// Builds the deployment-wide visibility graph.
    #[must_use]
    pub fn visibility_graph(&self) -> VisibilityGraph {
        build_visibility_graph(&self.sps, &self.idps)
    }

    /// Resolves a token to an SP id, auditing failures without the token.
    fn resolve_current_sp<R>(
        &self,
        resolver: &R,
        token: &AuthStateToken,
    ) -> Result<SpEntityId, VisibilityError>
    where
        R: CurrentSpResolver + ?Sized,
    {
        resolver.resolve_sp(token).inspect_err(|err| {
            self.audit.record_resolution(&ResolutionAuditEvent::new(None, err.to_string()));
        })
    }

    /// Lists policy rejections among the IDP-backed configured sources.
    fn rejected_source_idps(&self, sp: &SpRecord) -> Vec<RejectedIdp> {
        self.auth_sources
            .sources
            .iter()
            .filter_map(|label| self.auth_sources.idp_for(label))
            .filter_map(|id| self.idps.get(id))
            .filter_map(|idp| {
                evaluate_for_sp(idp, sp).reject_reason().map(|reason| RejectedIdp {
                    idp_entity_id: idp.entity_id.clone(),
                    reason,
                })
            })
            .collect()
    }
}
