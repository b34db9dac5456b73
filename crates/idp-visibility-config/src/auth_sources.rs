// crates/idp-visibility-config/src/auth_sources.rs
// ============================================================================
// Module: Authsources Loader
// Description: Reads configured auth source labels and their IDP bindings.
// Purpose: Supply the ordered label list and bindings to the source reducer.
// Dependencies: idp-visibility-core, toml
// ============================================================================

//! ## Overview
//! The authsources file lists login choices under `auth-choices.sources`, in
//! button order, and describes each choice in a table named after its label.
//! A table with an `idp` string is backed by that IDP; a table without one is
//! a local source. A listed label with no table stays unconfigured and is
//! skipped by the reducer.
//!
//! ```toml
//! [auth-choices]
//! sources = ["campus", "admin"]
//!
//! [campus]
//! idp = "https://idp.example.org/saml"
//!
//! [admin]
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use idp_visibility_core::AuthSourceBinding;
use idp_visibility_core::AuthSourceLabel;
use idp_visibility_core::ConfiguredAuthSources;
use idp_visibility_core::IdpEntityId;
use toml::Table;
use toml::Value;

use crate::config::ConfigError;
use crate::config::read_config_file;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Table holding the ordered source list.
const CHOICES_TABLE: &str = "auth-choices";
/// Key of the ordered source list.
const SOURCES_KEY: &str = "sources";
/// Key binding a source to an IDP.
const IDP_KEY: &str = "idp";
/// Maximum number of configured auth sources.
pub const MAX_AUTH_SOURCES: usize = 256;
/// Maximum auth source label length in bytes.
pub const MAX_AUTH_SOURCE_LABEL_LENGTH: usize = 128;

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads configured auth sources from an authsources file.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file is missing, unreadable, empty, or
/// does not declare a valid `auth-choices.sources` list.
pub fn load_auth_sources(path: &Path) -> Result<ConfiguredAuthSources, ConfigError> {
    let content = read_config_file(path)?;
    parse_auth_sources(&content)
        .map_err(|err| prefix_error(&path.display().to_string(), err))
}

/// Parses an authsources document.
///
/// # Errors
///
/// Returns [`ConfigError`] when the document is empty, is not valid TOML, or
/// holds an invalid label or binding.
pub fn parse_auth_sources(content: &str) -> Result<ConfiguredAuthSources, ConfigError> {
    let document: Table =
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
    if document.is_empty() {
        return Err(ConfigError::Invalid("authsources document is empty".to_string()));
    }
    let sources = source_labels(&document)?;
    let mut configured = ConfiguredAuthSources::default();
    for label in sources {
        if configured.sources.contains(&label) {
            return Err(ConfigError::Invalid(format!("duplicate auth source label {label}")));
        }
        if let Some(value) = document.get(label.as_str()) {
            let binding = parse_binding(&label, value)?;
            configured.bindings.insert(label.clone(), binding);
        }
        configured.sources.push(label);
    }
    Ok(configured)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads and validates the ordered label list.
fn source_labels(document: &Table) -> Result<Vec<AuthSourceLabel>, ConfigError> {
    let missing = || {
        ConfigError::Invalid(format!("{CHOICES_TABLE}.{SOURCES_KEY} must be an array of labels"))
    };
    let items = document
        .get(CHOICES_TABLE)
        .and_then(Value::as_table)
        .and_then(|choices| choices.get(SOURCES_KEY))
        .and_then(Value::as_array)
        .ok_or_else(missing)?;
    if items.len() > MAX_AUTH_SOURCES {
        return Err(ConfigError::Invalid(format!(
            "{CHOICES_TABLE}.{SOURCES_KEY} exceeds {MAX_AUTH_SOURCES} entries"
        )));
    }
    items
        .iter()
        .map(|item| {
            let label = item.as_str().ok_or_else(missing)?;
            validate_label(label)?;
            Ok(AuthSourceLabel::new(label))
        })
        .collect()
}

/// Parses the table describing one label.
fn parse_binding(
    label: &AuthSourceLabel,
    value: &Value,
) -> Result<AuthSourceBinding, ConfigError> {
    let table = value
        .as_table()
        .ok_or_else(|| ConfigError::Invalid(format!("auth source {label} must be a table")))?;
    match table.get(IDP_KEY) {
        None => Ok(AuthSourceBinding::Local),
        Some(Value::String(idp)) if !idp.trim().is_empty() => {
            Ok(AuthSourceBinding::Idp(IdpEntityId::new(idp.as_str())))
        }
        Some(_) => Err(ConfigError::Invalid(format!(
            "auth source {label}.{IDP_KEY} must be a non-empty string"
        ))),
    }
}

/// Validates the shape of a label.
fn validate_label(label: &str) -> Result<(), ConfigError> {
    if label.trim().is_empty() {
        return Err(ConfigError::Invalid("auth source label must be non-empty".to_string()));
    }
    if label.len() > MAX_AUTH_SOURCE_LABEL_LENGTH {
        return Err(ConfigError::Invalid(format!("auth source label {label} exceeds max length")));
    }
    Ok(())
}

/// Prefixes an error message with the file it came from.
fn prefix_error(source: &str, err: ConfigError) -> ConfigError {
    match err {
        ConfigError::Io(message) => ConfigError::Io(format!("{source}: {message}")),
        ConfigError::Parse(message) => ConfigError::Parse(format!("{source}: {message}")),
        ConfigError::Invalid(message) => ConfigError::Invalid(format!("{source}: {message}")),
    }
}
