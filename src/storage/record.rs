//! Fixed-width text encoding for persisted records.
//!
//! Every record type serializes its fields in a stable order, joined by
//! [`FIELD_DELIMITER`] and right-padded with [`PAD`] to exactly
//! [`RECORD_WIDTH`] bytes, so that one slot on disk always holds one record.
//! Decoding reverses the process: strip the padding, split on the delimiter
//! and parse each field back into its typed form.
//!
//! The delimiter is not permitted inside field values.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::StorageError;
use super::header::{FIELD_DELIMITER, PAD, RECORD_WIDTH};
use crate::domain::{Car, CarStatus, Model, Sale};

/// A record that can live in one fixed-width slot.
pub trait Record: Sized {
    /// Primary key type; ordering of keys is the index ordering.
    type Key: Clone + Ord + Display + FromStr;

    /// Number of delimited fields in the encoded form.
    const FIELDS: usize;

    /// The record's primary key value.
    fn key(&self) -> Self::Key;

    /// Field values in persisted order.
    fn fields(&self) -> Vec<String>;

    /// Rebuild the record from its split field values. `fields` holds
    /// exactly [`Record::FIELDS`] entries.
    fn from_fields(fields: &[&str]) -> Result<Self, StorageError>;

    /// Encode into exactly [`RECORD_WIDTH`] payload bytes.
    fn encode(&self) -> Result<Vec<u8>, StorageError> {
        let joined = self.fields().join("|");
        let mut payload = joined.into_bytes();
        if payload.len() > RECORD_WIDTH {
            return Err(StorageError::RecordTooLarge { len: payload.len() });
        }
        payload.resize(RECORD_WIDTH, PAD);
        Ok(payload)
    }

    /// Decode from the payload bytes of one slot.
    fn decode(payload: &[u8]) -> Result<Self, StorageError> {
        let line = std::str::from_utf8(payload)
            .map_err(|_| corrupt("payload is not valid UTF-8"))?;
        let line = line.trim_end_matches(PAD as char);
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if fields.len() != Self::FIELDS {
            return Err(corrupt(format!(
                "expected {} fields, found {}",
                Self::FIELDS,
                fields.len()
            )));
        }
        Self::from_fields(&fields)
    }
}

fn corrupt(reason: impl Into<String>) -> StorageError {
    StorageError::CorruptRecord {
        reason: reason.into(),
    }
}

fn parse<T: FromStr>(value: &str, what: &str) -> Result<T, StorageError> {
    value
        .parse()
        .map_err(|_| corrupt(format!("invalid {what} '{value}'")))
}

impl Record for Model {
    type Key = u64;

    const FIELDS: usize = 3;

    fn key(&self) -> u64 {
        self.id
    }

    fn fields(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), self.brand.clone()]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, StorageError> {
        Ok(Model {
            id: parse(fields[0], "model id")?,
            name: fields[1].to_string(),
            brand: fields[2].to_string(),
        })
    }
}

impl Record for Car {
    type Key = String;

    const FIELDS: usize = 5;

    fn key(&self) -> String {
        self.vin.clone()
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.vin.clone(),
            self.model.to_string(),
            self.price.to_string(),
            self.date_start.to_string(),
            self.status.to_string(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, StorageError> {
        Ok(Car {
            vin: fields[0].to_string(),
            model: parse(fields[1], "model id")?,
            price: parse::<Decimal>(fields[2], "price")?,
            date_start: parse::<NaiveDate>(fields[3], "start date")?,
            status: parse::<CarStatus>(fields[4], "car status")?,
        })
    }
}

impl Record for Sale {
    type Key = String;

    const FIELDS: usize = 5;

    fn key(&self) -> String {
        self.sales_number.clone()
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.sales_number.clone(),
            self.car_vin.clone(),
            self.cost.to_string(),
            self.sales_date.to_string(),
            if self.deleted { "1" } else { "0" }.to_string(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, StorageError> {
        let deleted = match fields[4] {
            "0" => false,
            "1" => true,
            other => return Err(corrupt(format!("invalid deleted flag '{other}'"))),
        };
        Ok(Sale {
            sales_number: fields[0].to_string(),
            car_vin: fields[1].to_string(),
            cost: parse::<Decimal>(fields[2], "cost")?,
            sales_date: parse::<NaiveDate>(fields[3], "sales date")?,
            deleted,
        })
    }
}
