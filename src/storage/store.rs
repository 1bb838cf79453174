//! One slot file and one sorted index per entity type.

use std::path::PathBuf;

use log::debug;

use super::{error::StorageError, index::SortedIndex, record::Record, slot::SlotFile};

/// Typed storage for one record type: index lookups resolve a key to a slot
/// number, the slot file holds the fixed-width records.
pub struct EntityStore<R: Record> {
    index: SortedIndex<R::Key>,
    slots: SlotFile,
}

impl<R: Record> EntityStore<R> {
    pub fn open(data_path: PathBuf, index_path: PathBuf) -> Result<Self, StorageError> {
        Ok(Self {
            index: SortedIndex::open(index_path)?,
            slots: SlotFile::open(data_path)?,
        })
    }

    /// Appends a new record and indexes its key. The append and the index
    /// insert are two separate writes; a failure between them leaves an
    /// orphan slot with no index entry.
    pub fn create(&mut self, record: &R) -> Result<(), StorageError> {
        let key = record.key();
        if self.index.lookup(&key).is_some() {
            return Err(StorageError::DuplicateKey {
                key: key.to_string(),
            });
        }

        let payload = record.encode()?;
        let slot = self.slots.append(&payload)?;
        self.index.insert(key, slot)?;

        debug!("created record at slot {slot}");
        Ok(())
    }

    /// Point lookup by primary key.
    pub fn get(&mut self, key: &R::Key) -> Result<Option<R>, StorageError> {
        let Some(slot) = self.index.lookup(key) else {
            return Ok(None);
        };
        let payload = self.slots.read(slot)?;
        Ok(Some(R::decode(&payload)?))
    }

    /// Rewrites the record under an unchanged primary key.
    pub fn update(&mut self, key: &R::Key, record: &R) -> Result<(), StorageError> {
        let slot = self
            .index
            .lookup(key)
            .ok_or_else(|| StorageError::KeyNotFound {
                key: key.to_string(),
            })?;
        let payload = record.encode()?;
        self.slots.overwrite(slot, &payload)
    }

    /// Rewrites a record whose primary key changed and relocates its index
    /// entry. `record` already carries the new key; both failure checks run
    /// before anything is written, so a failed rename mutates nothing.
    pub fn rename_key(&mut self, old: &R::Key, record: &R) -> Result<(), StorageError> {
        let new = record.key();
        let slot = self
            .index
            .lookup(old)
            .ok_or_else(|| StorageError::KeyNotFound {
                key: old.to_string(),
            })?;
        if self.index.lookup(&new).is_some() {
            return Err(StorageError::DuplicateKey {
                key: new.to_string(),
            });
        }

        let payload = record.encode()?;
        self.slots.overwrite(slot, &payload)?;
        self.index.rename(old, new)?;
        Ok(())
    }

    /// Decodes every slot in slot order.
    pub fn scan(&mut self) -> Result<Vec<R>, StorageError> {
        let mut records = Vec::with_capacity(self.slots.slot_count() as usize);
        for slot in 0..self.slots.slot_count() {
            let payload = self.slots.read(slot)?;
            records.push(R::decode(&payload)?);
        }
        Ok(records)
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
