//! Plain records for the dealership domain.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A vehicle model. Registered once, never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub id: u64,
    pub name: String,
    pub brand: String,
}

/// Lifecycle state of a car on the lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarStatus {
    Available,
    Reserve,
    Sold,
    Delivery,
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CarStatus::Available => "available",
            CarStatus::Reserve => "reserve",
            CarStatus::Sold => "sold",
            CarStatus::Delivery => "delivery",
        };
        write!(f, "{s}")
    }
}

impl FromStr for CarStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(CarStatus::Available),
            "reserve" => Ok(CarStatus::Reserve),
            "sold" => Ok(CarStatus::Sold),
            "delivery" => Ok(CarStatus::Delivery),
            other => Err(format!("unknown car status '{other}'")),
        }
    }
}

/// An individual car. The VIN is the primary key and the only key in the
/// system that may be renamed; `status` is mutated by sell/revert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    pub vin: String,
    pub model: u64,
    pub price: Decimal,
    pub date_start: NaiveDate,
    pub status: CarStatus,
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} model={} price={} since={} status={}",
            self.vin, self.model, self.price, self.date_start, self.status
        )
    }
}

/// A sales transaction. Never physically removed; reverting a sale flips
/// `deleted` so slot numbers stay stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    pub sales_number: String,
    pub car_vin: String,
    pub cost: Decimal,
    pub sales_date: NaiveDate,
    pub deleted: bool,
}

/// Read-only join of a car, its model and its active sale (if sold).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarFullInfo {
    pub vin: String,
    pub car_model_name: String,
    pub car_model_brand: String,
    pub price: Decimal,
    pub date_start: NaiveDate,
    pub status: CarStatus,
    pub sales_date: Option<NaiveDate>,
    pub sales_cost: Option<Decimal>,
}

impl fmt::Display for CarFullInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} price={} since={} status={}",
            self.vin,
            self.car_model_brand,
            self.car_model_name,
            self.price,
            self.date_start,
            self.status
        )?;
        if let (Some(date), Some(cost)) = (self.sales_date, self.sales_cost) {
            write!(f, " sold={date} cost={cost}")?;
        }
        Ok(())
    }
}

/// Read-only aggregate: sales volume for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSaleStats {
    pub car_model_name: String,
    pub brand: String,
    pub sales_count: u64,
}

impl fmt::Display for ModelSaleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} sales",
            self.brand, self.car_model_name, self.sales_count
        )
    }
}
