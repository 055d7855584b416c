//! Annotation store: reference id → classification record.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::Reference;
use crate::error::StorageError;
use crate::export::{ExportEntry, UploadedRecord};
use crate::record::ClassificationRecord;
use crate::storage::{partition_key, Storage};
use crate::vocabulary::ClassificationField;

/// Persisted annotation map for one group partition.
///
/// Plain mutators only change memory. `update` and `merge` persist and roll
/// back their change when the write fails.
pub struct AnnotationStore {
    records: BTreeMap<String, ClassificationRecord>,
    key: String,
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for AnnotationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationStore")
            .field("key", &self.key)
            .field("records", &self.records.len())
            .finish()
    }
}

impl AnnotationStore {
    /// Empty store bound to a group's partition (nothing is read).
    pub fn new(storage: Arc<dyn Storage>, group: Option<&str>) -> Self {
        Self {
            records: BTreeMap::new(),
            key: partition_key(group),
            storage,
        }
    }

    /// Load a group's partition; an absent partition yields an empty store.
    pub fn restore(storage: Arc<dyn Storage>, group: Option<&str>) -> Result<Self, StorageError> {
        let mut store = Self::new(storage, group);
        if let Some(json) = store.storage.get(&store.key)? {
            store.records =
                serde_json::from_str(&json).map_err(|e| StorageError::Corrupt {
                    key: store.key.clone(),
                    message: e.to_string(),
                })?;
            tracing::debug!("Restored {} records from {}", store.records.len(), store.key);
        }
        Ok(store)
    }

    /// Write the whole map to the partition.
    pub fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.records)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set(&self.key, &json)?;
        tracing::trace!("Persisted {} records to {}", self.records.len(), self.key);
        Ok(())
    }

    /// Partition key this store reads from and writes to.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self, ref_id: &str) -> Option<&ClassificationRecord> {
        self.records.get(ref_id)
    }

    pub fn records(&self) -> &BTreeMap<String, ClassificationRecord> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Select `value` for an option field, or clear it if already selected.
    ///
    /// Returns the field's new value.
    pub fn set_field(
        &mut self,
        ref_id: &str,
        field: ClassificationField,
        value: &str,
    ) -> Option<String> {
        let slot = self
            .records
            .entry(ref_id.to_string())
            .or_default()
            .field_mut(field);
        if slot.as_deref() == Some(value) {
            *slot = None;
        } else {
            *slot = Some(value.to_string());
        }
        slot.clone()
    }

    /// Overwrite the motivation text.
    pub fn set_motivation(&mut self, ref_id: &str, text: &str) {
        self.records
            .entry(ref_id.to_string())
            .or_default()
            .motivation = Some(text.to_string());
    }

    /// Apply `edit` to the record for `ref_id`, then persist.
    ///
    /// If the write fails the record is put back as it was, so memory never
    /// holds an edit that storage rejected.
    pub fn update<T>(
        &mut self,
        ref_id: &str,
        edit: impl FnOnce(&mut Self) -> T,
    ) -> Result<T, StorageError> {
        let previous = self.records.get(ref_id).cloned();
        let out = edit(self);
        if let Err(e) = self.persist() {
            match previous {
                Some(record) => {
                    self.records.insert(ref_id.to_string(), record);
                }
                None => {
                    self.records.remove(ref_id);
                }
            }
            tracing::warn!("Discarded edit to {} in {}: {}", ref_id, self.key, e);
            return Err(e);
        }
        Ok(out)
    }

    /// Replace stored records with uploaded ones, per id, then persist.
    ///
    /// Records without an id are skipped. Returns how many were applied.
    /// Nothing is kept if the write fails.
    pub fn merge(&mut self, uploaded: Vec<UploadedRecord>) -> Result<usize, StorageError> {
        let previous = self.records.clone();
        let mut applied = 0;
        for UploadedRecord { id, record } in uploaded {
            if let Some(id) = id {
                self.records.insert(id, record);
                applied += 1;
            }
        }
        if let Err(e) = self.persist() {
            self.records = previous;
            tracing::warn!("Discarded upload into {}: {}", self.key, e);
            return Err(e);
        }
        tracing::info!("Merged {} uploaded records into {}", applied, self.key);
        Ok(applied)
    }

    /// Flat export records for the filtered view, in view order.
    ///
    /// Records with no classification at all are left out.
    pub fn export_snapshot(&self, filtered: &[Reference], group: Option<&str>) -> Vec<ExportEntry> {
        filtered
            .iter()
            .map(|r| {
                ExportEntry::new(
                    r,
                    self.records.get(&r.key()),
                    Some(group.unwrap_or("").to_string()),
                )
            })
            .filter(|e| !e.is_unclassified())
            .collect()
    }
}
