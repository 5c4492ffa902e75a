// Record Store - canonical ordered records plus the load-time baseline.
//
// Created once per session from the Load collaborator. Records are never
// added or removed afterwards; only `code` is patched. Modified status is
// always derived against the baseline, never stored.

use crate::error::SyncError;
use crate::record::{Record, RecordId};

#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    /// `code` per record at load time. Never mutated.
    baseline: Vec<String>,
    /// Set by `patch_code`, cleared when a persistence pass picks the
    /// store up.
    dirty: bool,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        let baseline = records.iter().map(|r| r.code.clone()).collect();
        Self {
            records,
            baseline,
            dirty: false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Full canonical set, stable order.
    pub fn get_all(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.index())
    }

    /// All identities in canonical order.
    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        (0..self.records.len()).map(RecordId)
    }

    /// Baseline `code` for one record.
    pub fn baseline(&self, id: RecordId) -> Option<&str> {
        self.baseline.get(id.index()).map(String::as_str)
    }

    /// Set `code` for one record and mark the store dirty for persistence.
    pub fn patch_code(&mut self, id: RecordId, value: impl Into<String>) -> Result<(), SyncError> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(id.index())
            .ok_or(SyncError::UnknownIdentity {
                index: id.index(),
                len,
            })?;
        record.code = value.into();
        self.dirty = true;
        Ok(())
    }

    /// Current `code` differs from the load-time baseline.
    ///
    /// Pure comparison; an unknown identity is simply not modified.
    pub fn is_modified(&self, id: RecordId) -> bool {
        match (self.records.get(id.index()), self.baseline.get(id.index())) {
            (Some(record), Some(original)) => record.code != *original,
            _ => false,
        }
    }

    /// Modified flags aligned to canonical order.
    pub fn modified_flags(&self) -> Vec<bool> {
        self.records
            .iter()
            .zip(&self.baseline)
            .map(|(record, original)| record.code != *original)
            .collect()
    }

    /// Records whose `code` differs from baseline, in canonical order.
    pub fn modified_records(&self) -> Vec<(RecordId, &Record)> {
        self.ids()
            .filter(|&id| self.is_modified(id))
            .filter_map(|id| self.get(id).map(|r| (id, r)))
            .collect()
    }

    /// True when a patch has been applied since the last persist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
