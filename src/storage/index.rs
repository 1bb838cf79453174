//! Persisted sorted key-to-slot mapping.
//!
//! One index file per entity type, holding `key|slot` pairs sorted by key
//! ascending. The whole sequence is loaded into memory at open and rewritten
//! on every mutation; index files stay small relative to the data files.
//! Lookups binary-search the in-memory sequence.

use std::{
    fmt::Display,
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
    str::FromStr,
};

use log::trace;

use super::{error::StorageError, header::FIELD_DELIMITER};

#[derive(Debug)]
pub struct SortedIndex<K> {
    entries: Vec<(K, u64)>,
    path: PathBuf,
}

impl<K> SortedIndex<K>
where
    K: Ord + Display + FromStr,
{
    /// Loads an index file, creating it empty if missing.
    pub fn open(path: PathBuf) -> Result<Self, StorageError> {
        let f = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)?;

        let mut entries: Vec<(K, u64)> = Vec::new();
        for line in BufReader::new(f).lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let (key, slot) = line.split_once(FIELD_DELIMITER).ok_or_else(|| {
                StorageError::CorruptRecord {
                    reason: format!("index entry '{line}' has no delimiter"),
                }
            })?;
            let key = key.parse().map_err(|_| StorageError::CorruptRecord {
                reason: format!("invalid index key '{key}'"),
            })?;
            let slot = slot.parse().map_err(|_| StorageError::CorruptRecord {
                reason: format!("invalid slot number '{slot}'"),
            })?;
            entries.push((key, slot));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(Self { entries, path })
    }

    /// Binary search for a key; `None` if absent.
    pub fn lookup(&self, key: &K) -> Option<u64> {
        self.entries
            .binary_search_by(|(k, _)| k.cmp(key))
            .ok()
            .map(|pos| self.entries[pos].1)
    }

    /// Inserts a new entry at the position that preserves sort order, then
    /// persists the full sequence.
    pub fn insert(&mut self, key: K, slot: u64) -> Result<(), StorageError> {
        match self.entries.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(_) => Err(StorageError::DuplicateKey {
                key: key.to_string(),
            }),
            Err(pos) => {
                self.entries.insert(pos, (key, slot));
                self.persist()
            }
        }
    }

    /// Moves an entry to a new key, keeping its slot number and sort order.
    pub fn rename(&mut self, old: &K, new: K) -> Result<u64, StorageError> {
        let pos = self
            .entries
            .binary_search_by(|(k, _)| k.cmp(old))
            .map_err(|_| StorageError::KeyNotFound {
                key: old.to_string(),
            })?;
        if self.entries.binary_search_by(|(k, _)| k.cmp(&new)).is_ok() {
            return Err(StorageError::DuplicateKey {
                key: new.to_string(),
            });
        }

        let (_, slot) = self.entries.remove(pos);
        let pos = self
            .entries
            .binary_search_by(|(k, _)| k.cmp(&new))
            .unwrap_or_else(|pos| pos);
        self.entries.insert(pos, (new, slot));
        self.persist()?;
        Ok(slot)
    }

    /// Number of indexed keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<(), StorageError> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        for (key, slot) in &self.entries {
            writeln!(writer, "{key}{FIELD_DELIMITER}{slot}")?;
        }
        writer.flush()?;

        trace!("persisted {} index entries", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    fn open(temp: &TempDir) -> SortedIndex<String> {
        SortedIndex::open(temp.path().join("cars_index.txt")).unwrap()
    }

    #[test]
    fn lookup_hits_and_misses() {
        let temp = TempDir::new("index").unwrap();
        let mut index = open(&temp);

        index.insert("VIN002".into(), 0).unwrap();
        index.insert("VIN001".into(), 1).unwrap();

        assert_eq!(index.lookup(&"VIN001".into()), Some(1));
        assert_eq!(index.lookup(&"VIN002".into()), Some(0));
        assert_eq!(index.lookup(&"VIN003".into()), None);
    }

    #[test]
    fn insert_rejects_duplicates() {
        let temp = TempDir::new("index").unwrap();
        let mut index = open(&temp);

        index.insert("VIN001".into(), 0).unwrap();
        let err = index.insert("VIN001".into(), 1).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey { .. }));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn persisted_file_is_sorted() {
        let temp = TempDir::new("index").unwrap();
        let path = temp.path().join("cars_index.txt");
        let mut index: SortedIndex<String> = SortedIndex::open(path.clone()).unwrap();

        index.insert("VIN003".into(), 0).unwrap();
        index.insert("VIN001".into(), 1).unwrap();
        index.insert("VIN002".into(), 2).unwrap();

        let persisted = std::fs::read_to_string(path).unwrap();
        assert_eq!(persisted, "VIN001|1\nVIN002|2\nVIN003|0\n");
    }

    #[test]
    fn numeric_keys_sort_numerically() {
        let temp = TempDir::new("index").unwrap();
        let path = temp.path().join("models_index.txt");
        let mut index: SortedIndex<u64> = SortedIndex::open(path.clone()).unwrap();

        index.insert(10, 0).unwrap();
        index.insert(9, 1).unwrap();

        let persisted = std::fs::read_to_string(path).unwrap();
        assert_eq!(persisted, "9|1\n10|0\n");
    }

    #[test]
    fn entries_survive_reopen() {
        let temp = TempDir::new("index").unwrap();
        let mut index = open(&temp);
        index.insert("VIN001".into(), 7).unwrap();
        drop(index);

        let index = open(&temp);
        assert_eq!(index.lookup(&"VIN001".into()), Some(7));
    }

    #[test]
    fn rename_moves_entry() {
        let temp = TempDir::new("index").unwrap();
        let mut index = open(&temp);

        index.insert("VIN001".into(), 0).unwrap();
        index.insert("VIN005".into(), 1).unwrap();

        let slot = index.rename(&"VIN005".into(), "VIN000".into()).unwrap();
        assert_eq!(slot, 1);
        assert_eq!(index.lookup(&"VIN005".into()), None);
        assert_eq!(index.lookup(&"VIN000".into()), Some(1));

        let persisted = std::fs::read_to_string(temp.path().join("cars_index.txt")).unwrap();
        assert_eq!(persisted, "VIN000|1\nVIN001|0\n");
    }

    #[test]
    fn rename_missing_key() {
        let temp = TempDir::new("index").unwrap();
        let mut index = open(&temp);

        let err = index.rename(&"VIN001".into(), "VIN002".into()).unwrap_err();
        assert!(matches!(err, StorageError::KeyNotFound { .. }));
    }

    #[test]
    fn rename_to_existing_key() {
        let temp = TempDir::new("index").unwrap();
        let mut index = open(&temp);

        index.insert("VIN001".into(), 0).unwrap();
        index.insert("VIN002".into(), 1).unwrap();

        let err = index.rename(&"VIN001".into(), "VIN002".into()).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey { .. }));
        assert_eq!(index.lookup(&"VIN001".into()), Some(0));
    }
}
