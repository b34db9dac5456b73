// crates/idp-visibility-config/src/metadata.rs
// ============================================================================
// Module: Metadata Directory Loader
// Description: Builds IDP and SP catalogs from a directory of TOML files.
// Purpose: Turn untrusted metadata into validated core records.
// Dependencies: idp-visibility-core, toml
// ============================================================================

//! ## Overview
//! A metadata directory holds TOML files whose top-level tables are keyed by
//! entity id. Files whose stem starts with `idp-` or `saml20-idp-remote` hold
//! IDP entries; `sp-` or `saml20-sp-remote` files hold SP entries. Files are
//! read in file-name order and entries in document order, which fixes the
//! catalog order.
//!
//! Malformed IDP entries are left out of the catalog and reported. Malformed
//! SP entries are kept in the SP catalog's malformed set so that resolving
//! them fails hard. A field that can be dropped without widening visibility
//! (`name`, `logoURL`) degrades instead of excluding the entry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use idp_visibility_core::IdpCatalog;
use idp_visibility_core::IdpEntityId;
use idp_visibility_core::IdpRecord;
use idp_visibility_core::LoadAuditEvent;
use idp_visibility_core::LoadAuditEventParams;
use idp_visibility_core::LoadSeverity;
use idp_visibility_core::SpCatalog;
use idp_visibility_core::SpEntityId;
use idp_visibility_core::SpRecord;
use toml::Table;
use toml::Value;

use crate::config::ConfigError;
use crate::config::read_config_file;
use crate::config::validate_path;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of metadata files read from one directory.
pub const MAX_METADATA_FILES: usize = 1024;
/// Maximum entity id length in bytes.
pub const MAX_ENTITY_ID_LENGTH: usize = 1024;
/// File stem prefixes holding IDP entries.
const IDP_FILE_PREFIXES: [&str; 2] = ["idp-", "saml20-idp-remote"];
/// File stem prefixes holding SP entries.
const SP_FILE_PREFIXES: [&str; 2] = ["sp-", "saml20-sp-remote"];
/// IDP display name key.
const KEY_NAME: &str = "name";
/// IDP logo URL key.
const KEY_LOGO_URL: &str = "logoURL";
/// IDP default exclusion key.
const KEY_EXCLUDE_BY_DEFAULT: &str = "excludeByDefault";
/// IDP SP allow-list key.
const KEY_FOR_SPS: &str = "forSps";
/// SP IDP allow-list key.
const KEY_IDP_LIST: &str = "idpList";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Entity kind held by a metadata file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    /// Remote IDP metadata.
    Idp,
    /// Remote SP metadata.
    Sp,
}

impl MetadataKind {
    /// Classifies a metadata file by name; `None` means the file is ignored.
    #[must_use]
    pub fn classify(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(".toml")?;
        if IDP_FILE_PREFIXES.iter().any(|prefix| stem.starts_with(prefix)) {
            Some(Self::Idp)
        } else if SP_FILE_PREFIXES.iter().any(|prefix| stem.starts_with(prefix)) {
            Some(Self::Sp)
        } else {
            None
        }
    }
}

/// Recoverable finding produced while loading metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadDiagnostic {
    /// File the entry was read from.
    pub source: PathBuf,
    /// Entity id when the entry had one.
    pub entity_id: Option<String>,
    /// Whether the entry was skipped or degraded.
    pub severity: LoadSeverity,
    /// Finding description.
    pub message: String,
}

impl LoadDiagnostic {
    /// Converts the finding into an audit event.
    #[must_use]
    pub fn to_audit_event(&self) -> LoadAuditEvent {
        LoadAuditEvent::new(LoadAuditEventParams {
            source: self.source.display().to_string(),
            entity_id: self.entity_id.clone(),
            severity: self.severity,
            message: self.message.clone(),
        })
    }
}

/// Catalogs loaded from a metadata directory.
#[derive(Debug, Clone, Default)]
pub struct MetadataCatalogs {
    /// IDP catalog in load order.
    pub idps: IdpCatalog,
    /// SP catalog in load order, including malformed entries.
    pub sps: SpCatalog,
    /// Findings for skipped or degraded entries.
    pub diagnostics: Vec<LoadDiagnostic>,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads IDP and SP catalogs from a metadata directory.
///
/// # Errors
///
/// Returns [`ConfigError`] when the directory or a file cannot be read, a
/// file is not valid TOML, limits are exceeded, or an entity id appears twice.
pub fn load_metadata_dir(dir: &Path) -> Result<MetadataCatalogs, ConfigError> {
    validate_path(dir)?;
    let mut catalogs = MetadataCatalogs::default();
    let mut seen_idps = BTreeSet::new();
    for (kind, path) in list_metadata_files(dir)? {
        let content = read_config_file(&path)?;
        let document: Table = toml::from_str(&content)
            .map_err(|err| ConfigError::Parse(format!("{}: {err}", path.display())))?;
        match kind {
            MetadataKind::Idp => {
                load_idp_document(&path, &document, &mut seen_idps, &mut catalogs)?;
            }
            MetadataKind::Sp => load_sp_document(&path, &document, &mut catalogs)?,
        }
    }
    Ok(catalogs)
}

/// Lists classified metadata files in file-name order.
fn list_metadata_files(dir: &Path) -> Result<Vec<(MetadataKind, PathBuf)>, ConfigError> {
    let entries = fs::read_dir(dir)
        .map_err(|err| ConfigError::Io(format!("{}: {err}", dir.display())))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| ConfigError::Io(format!("{}: {err}", dir.display())))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let file_name = path.file_name().and_then(|name| name.to_str());
        let Some(kind) = file_name.and_then(MetadataKind::classify) else {
            continue;
        };
        files.push((kind, path));
    }
    if files.len() > MAX_METADATA_FILES {
        return Err(ConfigError::Invalid(format!(
            "{} holds more than {MAX_METADATA_FILES} metadata files",
            dir.display()
        )));
    }
    files.sort_by(|left, right| left.1.file_name().cmp(&right.1.file_name()));
    Ok(files)
}

/// Adds the IDP entries of one document to the catalog.
fn load_idp_document(
    source: &Path,
    document: &Table,
    seen: &mut BTreeSet<String>,
    catalogs: &mut MetadataCatalogs,
) -> Result<(), ConfigError> {
    for (entity_id, value) in document {
        if let Err(reason) = validate_entity_id(entity_id) {
            catalogs.diagnostics.push(skipped(source, None, reason));
            continue;
        }
        if !seen.insert(entity_id.clone()) {
            return Err(duplicate(source, "idp", entity_id));
        }
        match parse_idp_entry(entity_id, value) {
            Ok((record, dropped)) => {
                for message in dropped {
                    catalogs.diagnostics.push(LoadDiagnostic {
                        source: source.to_path_buf(),
                        entity_id: Some(entity_id.clone()),
                        severity: LoadSeverity::Degraded,
                        message,
                    });
                }
                catalogs
                    .idps
                    .insert(record)
                    .map_err(|_| duplicate(source, "idp", entity_id))?;
            }
            Err(reason) => {
                catalogs.diagnostics.push(skipped(source, Some(entity_id), reason));
            }
        }
    }
    Ok(())
}

/// Adds the SP entries of one document to the catalog.
fn load_sp_document(
    source: &Path,
    document: &Table,
    catalogs: &mut MetadataCatalogs,
) -> Result<(), ConfigError> {
    for (entity_id, value) in document {
        let parsed = validate_entity_id(entity_id).and_then(|()| parse_sp_entry(entity_id, value));
        let inserted = match parsed {
            Ok(record) => catalogs.sps.insert(record),
            Err(reason) => {
                catalogs.diagnostics.push(skipped(source, Some(entity_id), reason.clone()));
                catalogs.sps.insert_malformed(SpEntityId::new(entity_id.as_str()), reason)
            }
        };
        inserted.map_err(|_| duplicate(source, "sp", entity_id))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Entry Parsing
// ============================================================================

/// Parses one IDP entry, returning the record and any dropped-field notes.
fn parse_idp_entry(entity_id: &str, value: &Value) -> Result<(IdpRecord, Vec<String>), String> {
    let table = value.as_table().ok_or_else(|| "entry must be a table".to_string())?;
    let mut dropped = Vec::new();
    let display_name = optional_string(table, KEY_NAME, &mut dropped);
    let logo_url = optional_string(table, KEY_LOGO_URL, &mut dropped);
    let exclude_by_default = match table.get(KEY_EXCLUDE_BY_DEFAULT) {
        None => false,
        Some(Value::Boolean(flag)) => *flag,
        Some(_) => return Err(format!("{KEY_EXCLUDE_BY_DEFAULT} must be a boolean")),
    };
    let for_sps = match table.get(KEY_FOR_SPS) {
        None => None,
        Some(value) => {
            let sps = string_list(value, KEY_FOR_SPS)?;
            if sps.is_empty() {
                return Err(format!("{KEY_FOR_SPS} must be a non-empty array"));
            }
            Some(sps.into_iter().map(SpEntityId::new).collect())
        }
    };
    let record = IdpRecord {
        entity_id: IdpEntityId::new(entity_id),
        display_name,
        logo_url,
        exclude_by_default,
        for_sps,
    };
    Ok((record, dropped))
}

/// Parses one SP entry.
fn parse_sp_entry(entity_id: &str, value: &Value) -> Result<SpRecord, String> {
    let table = value.as_table().ok_or_else(|| "entry must be a table".to_string())?;
    let record = SpRecord::new(entity_id);
    match table.get(KEY_IDP_LIST) {
        None => Ok(record),
        Some(value) => Ok(record.with_idp_list(string_list(value, KEY_IDP_LIST)?)),
    }
}

/// Reads an optional string field, noting non-string values as dropped.
fn optional_string(table: &Table, key: &str, dropped: &mut Vec<String>) -> Option<String> {
    match table.get(key) {
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            dropped.push(format!("{key} must be a string; field dropped"));
            None
        }
        None => None,
    }
}

/// Reads an array of entity id strings.
fn string_list(value: &Value, key: &str) -> Result<Vec<String>, String> {
    let items = value.as_array().ok_or_else(|| format!("{key} must be an array of strings"))?;
    items
        .iter()
        .map(|item| {
            let text = item.as_str().ok_or_else(|| format!("{key} entries must be strings"))?;
            validate_entity_id(text).map_err(|reason| format!("{key}: {reason}"))?;
            Ok(text.to_string())
        })
        .collect()
}

/// Validates the shape of an entity id.
fn validate_entity_id(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("entity id must be non-empty".to_string());
    }
    if value.trim() != value {
        return Err("entity id must not have surrounding whitespace".to_string());
    }
    if value.len() > MAX_ENTITY_ID_LENGTH {
        return Err("entity id exceeds max length".to_string());
    }
    if value.chars().any(char::is_control) {
        return Err("entity id must not contain control characters".to_string());
    }
    Ok(())
}

/// Builds a skipped-entry diagnostic.
fn skipped(source: &Path, entity_id: Option<&String>, message: String) -> LoadDiagnostic {
    LoadDiagnostic {
        source: source.to_path_buf(),
        entity_id: entity_id.cloned(),
        severity: LoadSeverity::Skipped,
        message,
    }
}

/// Builds the hard error for a repeated entity id.
fn duplicate(source: &Path, kind: &str, entity_id: &str) -> ConfigError {
    ConfigError::Invalid(format!("{}: duplicate {kind} entity id {entity_id}", source.display()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
