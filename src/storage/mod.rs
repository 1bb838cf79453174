pub mod index;
pub mod record;
pub mod slot;
pub mod store;

pub mod header {
    /// Payload bytes per slot, before the line terminator.
    pub const RECORD_WIDTH: usize = 500;
    /// Full slot width on disk, terminator included.
    pub const SLOT_WIDTH: usize = RECORD_WIDTH + 1;
    /// Field delimiter inside a record payload; not permitted in field values.
    pub const FIELD_DELIMITER: char = '|';
    /// Fill character used to right-pad a payload to `RECORD_WIDTH`.
    pub const PAD: u8 = b' ';
    /// Slot line terminator.
    pub const TERMINATOR: u8 = b'\n';
}

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum StorageError {
        #[error("duplicate key '{key}'")]
        DuplicateKey { key: String },

        #[error("key '{key}' not found")]
        KeyNotFound { key: String },

        #[error("slot {slot} out of range; file holds {count} slots")]
        SlotOutOfRange { slot: u64, count: u64 },

        #[error("corrupt record: {reason}")]
        CorruptRecord { reason: String },

        #[error("record too large: {len} bytes exceed the payload width")]
        RecordTooLarge { len: usize },

        #[error("model {id} not found")]
        ModelNotFound { id: u64 },

        #[error("car '{vin}' is not sold")]
        InvalidState { vin: String },

        #[error("sale '{sales_number}' already reverted")]
        AlreadyReverted { sales_number: String },

        #[error("io error: {0}")]
        Io(#[from] std::io::Error),
    }
}
