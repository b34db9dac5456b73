// crates/idp-visibility-core/src/audit.rs
// ============================================================================
// Module: Visibility Audit Logging
// Description: Structured audit events for filtering and metadata loading.
// Purpose: Emit JSON-line audit logs without hard dependencies.
// Dependencies: crate::core, crate::runtime::policy, serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks. Filter events record
//! which IDPs were hidden from an SP and why; load events record metadata
//! entries that were skipped or degraded while building catalogs. Auth state
//! tokens are never written to audit logs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::IdpEntityId;
use crate::core::SpEntityId;
use crate::runtime::policy::RejectReason;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Filtering operation that produced an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperation {
    /// IDP catalog reduction for a discovery page.
    IdpCatalog,
    /// Auth source reduction for a multi-auth page.
    AuthSources,
}

/// IDP hidden from an SP, with the deciding rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedIdp {
    /// Rejected IDP.
    pub idp_entity_id: IdpEntityId,
    /// Rule that rejected it.
    pub reason: RejectReason,
}

/// Filter audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct FilterAuditEvent {
    /// Event discriminator.
    pub event: &'static str,
    /// Event timestamp (ms since epoch).
    pub timestamp_ms: u128,
    /// Filtering operation.
    pub operation: FilterOperation,
    /// SP the filter ran for.
    pub sp_entity_id: SpEntityId,
    /// Number of candidates considered.
    pub considered: usize,
    /// Number of candidates kept.
    pub accepted: usize,
    /// Candidates rejected by policy.
    pub rejected: Vec<RejectedIdp>,
}

/// Inputs required to construct a filter audit event.
pub struct FilterAuditEventParams {
    /// Filtering operation.
    pub operation: FilterOperation,
    /// SP the filter ran for.
    pub sp_entity_id: SpEntityId,
    /// Number of candidates considered.
    pub considered: usize,
    /// Number of candidates kept.
    pub accepted: usize,
    /// Candidates rejected by policy.
    pub rejected: Vec<RejectedIdp>,
}

/// Severity of a metadata load finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSeverity {
    /// The entry was excluded from its catalog.
    Skipped,
    /// The entry was kept but a field was dropped.
    Degraded,
}

/// Metadata load audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoadAuditEvent {
    /// Event discriminator.
    pub event: &'static str,
    /// Event timestamp (ms since epoch).
    pub timestamp_ms: u128,
    /// File the entry was read from.
    pub source: String,
    /// Entity identifier when known.
    pub entity_id: Option<String>,
    /// Finding severity.
    pub severity: LoadSeverity,
    /// Finding description.
    pub message: String,
}

/// Inputs required to construct a load audit event.
pub struct LoadAuditEventParams {
    /// File the entry was read from.
    pub source: String,
    /// Entity identifier when known.
    pub entity_id: Option<String>,
    /// Finding severity.
    pub severity: LoadSeverity,
    /// Finding description.
    pub message: String,
}

/// SP resolution failure audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionAuditEvent {
    /// Event discriminator.
    pub event: &'static str,
    /// Event timestamp (ms since epoch).
    pub timestamp_ms: u128,
    /// SP entity id when resolution got that far.
    pub sp_entity_id: Option<SpEntityId>,
    /// Error description.
    pub error: String,
}

impl FilterAuditEvent {
    /// Creates a new filter audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: FilterAuditEventParams) -> Self {
        Self {
            event: "visibility_filter",
            timestamp_ms: now_ms(),
            operation: params.operation,
            sp_entity_id: params.sp_entity_id,
            considered: params.considered,
            accepted: params.accepted,
            rejected: params.rejected,
        }
    }
}

impl LoadAuditEvent {
    /// Creates a new load audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: LoadAuditEventParams) -> Self {
        Self {
            event: "metadata_load",
            timestamp_ms: now_ms(),
            source: params.source,
            entity_id: params.entity_id,
            severity: params.severity,
            message: params.message,
        }
    }
}

impl ResolutionAuditEvent {
    /// Creates a new resolution failure event with a consistent timestamp.
    #[must_use]
    pub fn new(sp_entity_id: Option<SpEntityId>, error: impl Into<String>) -> Self {
        Self {
            event: "sp_resolution_failed",
            timestamp_ms: now_ms(),
            sp_entity_id,
            error: error.into(),
        }
    }
}

/// Returns the current time in milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for visibility events.
pub trait VisibilityAuditSink: Send + Sync {
    /// Record a filter event.
    fn record_filter(&self, event: &FilterAuditEvent);

    /// Record a metadata load finding.
    fn record_load(&self, _event: &LoadAuditEvent) {}

    /// Record an SP resolution failure.
    fn record_resolution(&self, _event: &ResolutionAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl VisibilityAuditSink for StderrAuditSink {
    fn record_filter(&self, event: &FilterAuditEvent) {
        write_stderr_json(event);
    }

    fn record_load(&self, event: &LoadAuditEvent) {
        write_stderr_json(event);
    }

    fn record_resolution(&self, event: &ResolutionAuditEvent) {
        write_stderr_json(event);
    }
}

/// Writes one serialized event to stderr, ignoring output failures.
fn write_stderr_json<T: Serialize>(event: &T) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(std::io::stderr(), "{payload}");
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event, ignoring output failures.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl VisibilityAuditSink for FileAuditSink {
    fn record_filter(&self, event: &FilterAuditEvent) {
        self.append(event);
    }

    fn record_load(&self, event: &LoadAuditEvent) {
        self.append(event);
    }

    fn record_resolution(&self, event: &ResolutionAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl VisibilityAuditSink for NoopAuditSink {
    fn record_filter(&self, _event: &FilterAuditEvent) {}
}
