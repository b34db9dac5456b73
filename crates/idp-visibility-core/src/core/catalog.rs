// crates/idp-visibility-core/src/core/catalog.rs
// ============================================================================
// Module: Metadata Catalogs
// Description: Insertion-ordered IDP and SP catalogs with keyed lookup.
// Purpose: Preserve metadata order while guaranteeing unique entity ids.
// Dependencies: crate::core::{error, identifiers, records}, serde
// ============================================================================

//! ## Overview
//! Catalog order is significant: reduced IDP lists and the link graph are
//! reported in catalog order. Catalogs keep records in a vector and index
//! them by entity id, rejecting duplicates at insertion time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::error::EntityKind;
use crate::core::error::VisibilityError;
use crate::core::identifiers::IdpEntityId;
use crate::core::identifiers::SpEntityId;
use crate::core::records::IdpRecord;
use crate::core::records::SpRecord;

// ============================================================================
// SECTION: IDP Catalog
// ============================================================================

/// Ordered IDP metadata catalog.
///
/// # Invariants
/// - Entity ids are unique.
/// - Iteration yields records in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IdpCatalog {
    /// Records in insertion order.
    records: Vec<IdpRecord>,
    /// Position of each record in `records`.
    #[serde(skip)]
    index: BTreeMap<IdpEntityId, usize>,
}

impl IdpCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from records in order.
    ///
    /// # Errors
    ///
    /// Returns [`VisibilityError::DuplicateEntity`] when an entity id repeats.
    pub fn from_records<I>(records: I) -> Result<Self, VisibilityError>
    where
        I: IntoIterator<Item = IdpRecord>,
    {
        let mut catalog = Self::new();
        for record in records {
            catalog.insert(record)?;
        }
        Ok(catalog)
    }

    /// Builds a catalog from records taken out of another catalog.
    ///
    /// Ids are unique by construction; a repeated id keeps its first position.
    pub(crate) fn from_unique_records(records: Vec<IdpRecord>) -> Self {
        let mut index = BTreeMap::new();
        for (position, record) in records.iter().enumerate() {
            index.entry(record.entity_id.clone()).or_insert(position);
        }
        Self {
            records,
            index,
        }
    }

    /// Appends a record.
    ///
    /// # Errors
    ///
    /// Returns [`VisibilityError::DuplicateEntity`] when the id is already present.
    pub fn insert(&mut self, record: IdpRecord) -> Result<(), VisibilityError> {
        if self.index.contains_key(&record.entity_id) {
            return Err(VisibilityError::DuplicateEntity {
                kind: EntityKind::Idp,
                entity_id: record.entity_id.to_string(),
            });
        }
        self.index.insert(record.entity_id.clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Returns the record for an entity id.
    #[must_use]
    pub fn get(&self, entity_id: &IdpEntityId) -> Option<&IdpRecord> {
        self.index.get(entity_id).and_then(|position| self.records.get(*position))
    }

    /// Returns true when the catalog holds the entity id.
    #[must_use]
    pub fn contains(&self, entity_id: &IdpEntityId) -> bool {
        self.index.contains_key(entity_id)
    }

    /// Iterates records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &IdpRecord> {
        self.records.iter()
    }

    /// Iterates entity ids in catalog order.
    pub fn entity_ids(&self) -> impl Iterator<Item = &IdpEntityId> {
        self.records.iter().map(|record| &record.entity_id)
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a IdpCatalog {
    type Item = &'a IdpRecord;
    type IntoIter = std::slice::Iter<'a, IdpRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ============================================================================
// SECTION: SP Catalog
// ============================================================================

/// Ordered SP metadata catalog.
///
/// # Invariants
/// - Entity ids are unique across well-formed and malformed entries.
/// - Iteration yields well-formed records in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpCatalog {
    /// Well-formed records in insertion order.
    records: Vec<SpRecord>,
    /// Position of each record in `records`.
    index: BTreeMap<SpEntityId, usize>,
    /// SPs whose metadata could not be used, with the reason.
    malformed: BTreeMap<SpEntityId, String>,
}

impl SpCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from well-formed records in order.
    ///
    /// # Errors
    ///
    /// Returns [`VisibilityError::DuplicateEntity`] when an entity id repeats.
    pub fn from_records<I>(records: I) -> Result<Self, VisibilityError>
    where
        I: IntoIterator<Item = SpRecord>,
    {
        let mut catalog = Self::new();
        for record in records {
            catalog.insert(record)?;
        }
        Ok(catalog)
    }

    /// Appends a well-formed record.
    ///
    /// # Errors
    ///
    /// Returns [`VisibilityError::DuplicateEntity`] when the id is already present.
    pub fn insert(&mut self, record: SpRecord) -> Result<(), VisibilityError> {
        self.ensure_unique(&record.entity_id)?;
        self.index.insert(record.entity_id.clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Records an SP whose metadata was malformed.
    ///
    /// # Errors
    ///
    /// Returns [`VisibilityError::DuplicateEntity`] when the id is already present.
    pub fn insert_malformed(
        &mut self,
        entity_id: SpEntityId,
        reason: impl Into<String>,
    ) -> Result<(), VisibilityError> {
        self.ensure_unique(&entity_id)?;
        self.malformed.insert(entity_id, reason.into());
        Ok(())
    }

    /// Resolves an SP record, failing hard when it is unknown or malformed.
    ///
    /// # Errors
    ///
    /// Returns [`VisibilityError::MalformedConfig`] for malformed entries and
    /// [`VisibilityError::UnknownEntity`] when the SP is absent.
    pub fn resolve(&self, entity_id: &SpEntityId) -> Result<&SpRecord, VisibilityError> {
        if let Some(record) = self.get(entity_id) {
            return Ok(record);
        }
        if let Some(reason) = self.malformed.get(entity_id) {
            return Err(VisibilityError::MalformedConfig {
                entity_id: entity_id.to_string(),
                reason: reason.clone(),
            });
        }
        Err(VisibilityError::UnknownEntity {
            kind: EntityKind::Sp,
            entity_id: entity_id.to_string(),
        })
    }

    /// Returns the well-formed record for an entity id.
    #[must_use]
    pub fn get(&self, entity_id: &SpEntityId) -> Option<&SpRecord> {
        self.index.get(entity_id).and_then(|position| self.records.get(*position))
    }

    /// Iterates well-formed records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &SpRecord> {
        self.records.iter()
    }

    /// Iterates malformed entries with their reasons.
    pub fn malformed(&self) -> impl Iterator<Item = (&SpEntityId, &str)> {
        self.malformed.iter().map(|(id, reason)| (id, reason.as_str()))
    }

    /// Returns the number of well-formed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when there are no well-formed records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rejects ids already present as well-formed or malformed entries.
    fn ensure_unique(&self, entity_id: &SpEntityId) -> Result<(), VisibilityError> {
        if self.index.contains_key(entity_id) || self.malformed.contains_key(entity_id) {
            return Err(VisibilityError::DuplicateEntity {
                kind: EntityKind::Sp,
                entity_id: entity_id.to_string(),
            });
        }
        Ok(())
    }
}
