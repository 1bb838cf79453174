//! Append-only fixed-width slot storage.
//!
//! The `slot` module defines the [`SlotFile`] struct, which stores one
//! entity type as a sequence of fixed-width slots and addresses them by a
//! zero-based sequential slot number.
//!
//! It abstracts the low-level mechanics of file I/O, allowing the stores to
//! interact with logical slot numbers rather than raw byte offsets.
//!
//! # Responsibilities
//!
//! - Appending new slots and assigning sequential slot numbers.
//! - Reading and overwriting fixed-width payloads in place.
//!
//! # Slot Addressing
//!
//! Each slot is referenced by a `u64` slot number that maps to the byte
//! offset `slot * SLOT_WIDTH` in the underlying file. A slot is never
//! physically freed; deletion is expressed as a flag inside the record.
//!
//! # See Also
//! - [`Record`](super::record::Record): The fixed-width payload codec.

use std::{
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write},
    path::PathBuf,
};

use log::trace;

use super::{
    error::StorageError,
    header::{RECORD_WIDTH, SLOT_WIDTH, TERMINATOR},
};

const STRIDE: u64 = SLOT_WIDTH as u64;

#[derive(Debug)]
pub struct SlotFile {
    reader: BufReader<File>,
    writer: BufWriter<File>,
    slots: u64,
}

impl SlotFile {
    /// Opens a slot file, creating it empty if missing.
    pub fn open(path: PathBuf) -> Result<Self, StorageError> {
        let f = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)?;

        let len = f.metadata()?.len();
        let reader = BufReader::new(f.try_clone()?);
        let writer = BufWriter::new(f);

        Ok(Self {
            reader,
            writer,
            slots: len / STRIDE,
        })
    }

    /// Current number of complete slots.
    pub fn slot_count(&self) -> u64 {
        self.slots
    }

    /// Writes a payload at the end of the file and returns its slot number.
    /// The file grows by exactly `SLOT_WIDTH` bytes.
    pub fn append(&mut self, payload: &[u8]) -> Result<u64, StorageError> {
        debug_assert_eq!(payload.len(), RECORD_WIDTH);

        let slot = self.slots;
        self.writer.seek(SeekFrom::Start(slot * STRIDE))?;
        self.writer.write_all(payload)?;
        self.writer.write_all(&[TERMINATOR])?;
        self.writer.flush()?;
        self.slots += 1;

        trace!("appended slot {slot}");
        Ok(slot)
    }

    /// Reads the payload of one slot.
    pub fn read(&mut self, slot: u64) -> Result<Vec<u8>, StorageError> {
        self.check_bounds(slot)?;

        self.reader.seek(SeekFrom::Start(slot * STRIDE))?;
        let mut payload = vec![0; RECORD_WIDTH];
        self.reader.read_exact(&mut payload)?;
        Ok(payload)
    }

    /// Overwrites the payload of one slot in place. The terminator and the
    /// file length are untouched; no other slot shifts.
    pub fn overwrite(&mut self, slot: u64, payload: &[u8]) -> Result<(), StorageError> {
        debug_assert_eq!(payload.len(), RECORD_WIDTH);
        self.check_bounds(slot)?;

        self.writer.seek(SeekFrom::Start(slot * STRIDE))?;
        self.writer.write_all(payload)?;
        self.writer.flush()?;

        trace!("overwrote slot {slot}");
        Ok(())
    }

    fn check_bounds(&self, slot: u64) -> Result<(), StorageError> {
        if slot >= self.slots {
            return Err(StorageError::SlotOutOfRange {
                slot,
                count: self.slots,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    fn payload(fill: u8) -> Vec<u8> {
        vec![fill; RECORD_WIDTH]
    }

    #[test]
    fn append_assigns_sequential_slots() {
        let temp = TempDir::new("slots").unwrap();
        let path = temp.path().join("cars.txt");
        let mut slots = SlotFile::open(path.clone()).unwrap();

        assert_eq!(slots.append(&payload(b'a')).unwrap(), 0);
        assert_eq!(slots.append(&payload(b'b')).unwrap(), 1);
        assert_eq!(slots.slot_count(), 2);
        assert_eq!(
            std::fs::metadata(path).unwrap().len(),
            2 * SLOT_WIDTH as u64
        );
    }

    #[test]
    fn read_returns_written_payload() {
        let temp = TempDir::new("slots").unwrap();
        let mut slots = SlotFile::open(temp.path().join("cars.txt")).unwrap();

        slots.append(&payload(b'a')).unwrap();
        let slot = slots.append(&payload(b'b')).unwrap();

        assert_eq!(slots.read(slot).unwrap(), payload(b'b'));
    }

    #[test]
    fn overwrite_preserves_file_length() {
        let temp = TempDir::new("slots").unwrap();
        let path = temp.path().join("cars.txt");
        let mut slots = SlotFile::open(path.clone()).unwrap();

        let slot = slots.append(&payload(b'a')).unwrap();
        slots.append(&payload(b'b')).unwrap();
        slots.overwrite(slot, &payload(b'c')).unwrap();

        assert_eq!(slots.read(slot).unwrap(), payload(b'c'));
        assert_eq!(slots.read(1).unwrap(), payload(b'b'));
        assert_eq!(
            std::fs::metadata(path).unwrap().len(),
            2 * SLOT_WIDTH as u64
        );
    }

    #[test]
    fn read_out_of_range() {
        let temp = TempDir::new("slots").unwrap();
        let mut slots = SlotFile::open(temp.path().join("cars.txt")).unwrap();

        slots.append(&payload(b'a')).unwrap();
        let err = slots.read(1).unwrap_err();
        assert!(matches!(
            err,
            StorageError::SlotOutOfRange { slot: 1, count: 1 }
        ));
    }

    #[test]
    fn overwrite_out_of_range() {
        let temp = TempDir::new("slots").unwrap();
        let mut slots = SlotFile::open(temp.path().join("cars.txt")).unwrap();

        let err = slots.overwrite(0, &payload(b'a')).unwrap_err();
        assert!(matches!(err, StorageError::SlotOutOfRange { .. }));
    }

    #[test]
    fn slot_count_survives_reopen() {
        let temp = TempDir::new("slots").unwrap();
        let path = temp.path().join("cars.txt");

        let mut slots = SlotFile::open(path.clone()).unwrap();
        slots.append(&payload(b'a')).unwrap();
        slots.append(&payload(b'b')).unwrap();
        drop(slots);

        let slots = SlotFile::open(path).unwrap();
        assert_eq!(slots.slot_count(), 2);
    }
}
