// crates/idp-visibility-config/src/config.rs
// ============================================================================
// Module: IdP Visibility Settings
// Description: Settings loading and validation for the visibility layer.
// Purpose: Provide strict, fail-closed settings parsing with hard limits.
// Dependencies: idp-visibility-core, serde, toml
// ============================================================================

//! ## Overview
//! Settings are loaded from a TOML file with strict size and path limits.
//! Relative paths inside the settings file resolve against the directory that
//! holds it, so a deployment can be relocated as one tree.
//! Security posture: settings and metadata inputs are untrusted and fail
//! closed when invalid.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use idp_visibility_core::FileAuditSink;
use idp_visibility_core::NoopAuditSink;
use idp_visibility_core::StderrAuditSink;
use idp_visibility_core::VisibilityAuditSink;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default settings filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "idp-visibility.toml";
/// Environment variable used to override the settings path.
pub const CONFIG_ENV_VAR: &str = "IDP_VISIBILITY_CONFIG";
/// Default metadata directory, relative to the settings file.
const DEFAULT_METADATA_DIR: &str = "metadata";
/// Maximum size in bytes of any file read by this crate.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Settings Model
// ============================================================================

/// Top-level settings for an IdP visibility deployment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisibilitySettings {
    /// Metadata directory settings.
    #[serde(default)]
    pub metadata: MetadataSettings,
    /// Authsources file settings.
    #[serde(default)]
    pub auth_sources: AuthSourcesSettings,
    /// Audit sink settings.
    #[serde(default)]
    pub audit: AuditSettings,
    /// Directory relative paths resolve against (not serialized).
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Metadata directory settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataSettings {
    /// Directory holding IDP and SP metadata files.
    #[serde(default = "default_metadata_dir")]
    pub dir: String,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            dir: default_metadata_dir(),
        }
    }
}

/// Authsources file settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSourcesSettings {
    /// Authsources file; `None` disables auth source reduction.
    #[serde(default)]
    pub path: Option<String>,
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    None,
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
}

/// Audit sink settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditSettings {
    /// Sink selection.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path, required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditSettings {
    /// Validates audit sink constraints.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => Err(ConfigError::Invalid(
                "audit.path is required when audit.sink = \"file\"".to_string(),
            )),
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid when audit.sink = \"file\"".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

impl VisibilitySettings {
    /// Loads settings from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let content = read_config_file(&resolved)?;
        let mut settings: Self =
            toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        settings.base_dir = resolved.parent().map(Path::to_path_buf).unwrap_or_default();
        settings.validate()?;
        Ok(settings)
    }

    /// Validates the settings for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when settings are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("metadata.dir", &self.metadata.dir)?;
        if let Some(path) = &self.auth_sources.path {
            validate_path_string("auth_sources.path", path)?;
        }
        self.audit.validate()
    }

    /// Returns the metadata directory resolved against the settings file.
    #[must_use]
    pub fn metadata_dir(&self) -> PathBuf {
        self.resolve(&self.metadata.dir)
    }

    /// Returns the authsources file resolved against the settings file.
    #[must_use]
    pub fn auth_sources_path(&self) -> Option<PathBuf> {
        self.auth_sources.path.as_deref().map(|path| self.resolve(path))
    }

    /// Returns the audit log path resolved against the settings file.
    #[must_use]
    pub fn audit_path(&self) -> Option<PathBuf> {
        self.audit.path.as_deref().map(|path| self.resolve(path))
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit log cannot be opened.
    pub fn audit_sink(&self) -> Result<Arc<dyn VisibilityAuditSink>, ConfigError> {
        match self.audit.sink {
            AuditSinkKind::None => Ok(Arc::new(NoopAuditSink)),
            AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
            AuditSinkKind::File => {
                let path = self.audit_path().ok_or_else(|| {
                    ConfigError::Invalid("audit.path is required for file sink".to_string())
                })?;
                let sink = FileAuditSink::new(&path)
                    .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
                Ok(Arc::new(sink))
            }
        }
    }

    /// Resolves a settings path against the settings file directory.
    fn resolve(&self, value: &str) -> PathBuf {
        let path = Path::new(value.trim());
        if path.is_absolute() { path.to_path_buf() } else { self.base_dir.join(path) }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default metadata directory value.
fn default_metadata_dir() -> String {
    DEFAULT_METADATA_DIR.to_string()
}

/// Resolves the settings path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates a resolved path against security limits.
pub(crate) fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Reads a size-limited UTF-8 file after validating its path.
pub(crate) fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    validate_path(path)?;
    let bytes =
        fs::read(path).map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid(format!(
            "{} exceeds size limit",
            path.display()
        )));
    }
    String::from_utf8(bytes)
        .map_err(|_| ConfigError::Invalid(format!("{} must be utf-8", path.display())))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
