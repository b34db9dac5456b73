// crates/idp-visibility-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Fixture paths and temp-dir writers for loader tests.
// Purpose: Reduce duplication across idp-visibility-config integration tests.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use idp_visibility_config::ConfigError;
use idp_visibility_core::FilterAuditEvent;
use idp_visibility_core::LoadAuditEvent;
use idp_visibility_core::VisibilityAuditSink;

pub type TestResult = Result<(), String>;

/// Directory holding the checked-in fixtures.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Checked-in metadata directory.
pub fn fixture_metadata_dir() -> PathBuf {
    fixtures_dir().join("metadata")
}

/// Writes `content` to `dir/name`.
pub fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf, String> {
    let path = dir.join(name);
    fs::write(&path, content).map_err(|err| err.to_string())?;
    Ok(path)
}

/// Asserts that a load failed with a message containing `needle`.
pub fn assert_error<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err(format!("expected failure containing {needle}")),
    }
}

/// Audit sink that keeps load events in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    /// Recorded load events.
    pub loads: Mutex<Vec<LoadAuditEvent>>,
}

impl RecordingAuditSink {
    /// Returns the recorded load events.
    pub fn loads(&self) -> Vec<LoadAuditEvent> {
        self.loads.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl VisibilityAuditSink for RecordingAuditSink {
    fn record_filter(&self, _event: &FilterAuditEvent) {}

    fn record_load(&self, event: &LoadAuditEvent) {
        if let Ok(mut events) = self.loads.lock() {
            events.push(event.clone());
        }
    }
}
