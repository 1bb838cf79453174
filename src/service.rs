//! Cross-entity operations over the three stores.
//!
//! [`CarService`] owns one [`EntityStore`] per record type, all rooted at a
//! single data directory, and implements the operations that read or join
//! across them: selling, listing, full car info, VIN renames, sale reverts
//! and the top-selling-models aggregate.

use std::{collections::BTreeMap, fs, path::PathBuf};

use log::{debug, info};
use rust_decimal::Decimal;

use crate::domain::{Car, CarFullInfo, CarStatus, Model, ModelSaleStats, Sale};
use crate::storage::{error::StorageError, store::EntityStore};

const MODELS_DATA: &str = "models.txt";
const MODELS_INDEX: &str = "models_index.txt";
const CARS_DATA: &str = "cars.txt";
const CARS_INDEX: &str = "cars_index.txt";
const SALES_DATA: &str = "sales.txt";
const SALES_INDEX: &str = "sales_index.txt";

/// How many models the sales aggregate reports.
const TOP_MODELS: usize = 3;

pub struct CarService {
    models: EntityStore<Model>,
    cars: EntityStore<Car>,
    sales: EntityStore<Sale>,
}

impl CarService {
    /// Opens a service rooted at `root`, creating the directory and the six
    /// data/index files if missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        let service = Self {
            models: EntityStore::open(root.join(MODELS_DATA), root.join(MODELS_INDEX))?,
            cars: EntityStore::open(root.join(CARS_DATA), root.join(CARS_INDEX))?,
            sales: EntityStore::open(root.join(SALES_DATA), root.join(SALES_INDEX))?,
        };
        info!("opened car service at {}", root.display());
        Ok(service)
    }

    /// Registers a new model under its id.
    pub fn register_model(&mut self, model: Model) -> Result<Model, StorageError> {
        self.models.create(&model)?;
        info!("registered model {}", model.id);
        Ok(model)
    }

    /// Registers a new car under its VIN. The referenced model must already
    /// exist.
    pub fn register_car(&mut self, car: Car) -> Result<Car, StorageError> {
        if self.models.get(&car.model)?.is_none() {
            return Err(StorageError::ModelNotFound { id: car.model });
        }
        self.cars.create(&car)?;
        info!("registered car {}", car.vin);
        Ok(car)
    }

    /// Records a sale and marks the car sold. The VIN is resolved before
    /// anything is written, so a failed sale leaves no record behind; the
    /// sale append and the car update remain two separate writes.
    pub fn sell_car(&mut self, sale: Sale) -> Result<Car, StorageError> {
        let mut car =
            self.cars
                .get(&sale.car_vin)?
                .ok_or_else(|| StorageError::KeyNotFound {
                    key: sale.car_vin.clone(),
                })?;

        let sale = Sale {
            deleted: false,
            ..sale
        };
        self.sales.create(&sale)?;

        car.status = CarStatus::Sold;
        self.cars.update(&car.vin.clone(), &car)?;

        info!("car {} sold under sale {}", car.vin, sale.sales_number);
        Ok(car)
    }

    /// All cars currently in `status`, VIN-ascending regardless of slot
    /// order.
    pub fn cars_by_status(&mut self, status: CarStatus) -> Result<Vec<Car>, StorageError> {
        let mut cars: Vec<Car> = self
            .cars
            .scan()?
            .into_iter()
            .filter(|car| car.status == status)
            .collect();
        cars.sort_by(|a, b| a.vin.cmp(&b.vin));
        Ok(cars)
    }

    /// Full info for one car: its model's name and brand, plus the date and
    /// cost of its first non-deleted sale when the car is sold. Sold status
    /// comes from the car record itself; after a VIN rename the historical
    /// sale lines keep the old VIN and no sale fields are found.
    pub fn car_info(&mut self, vin: &str) -> Result<Option<CarFullInfo>, StorageError> {
        let Some(car) = self.cars.get(&vin.to_string())? else {
            return Ok(None);
        };

        let model = self
            .models
            .get(&car.model)?
            .ok_or(StorageError::ModelNotFound { id: car.model })?;

        let mut sales_date = None;
        let mut sales_cost = None;
        if car.status == CarStatus::Sold {
            if let Some(sale) = self
                .sales
                .scan()?
                .into_iter()
                .find(|sale| !sale.deleted && sale.car_vin == car.vin)
            {
                sales_date = Some(sale.sales_date);
                sales_cost = Some(sale.cost);
            }
        }

        Ok(Some(CarFullInfo {
            vin: car.vin,
            car_model_name: model.name,
            car_model_brand: model.brand,
            price: car.price,
            date_start: car.date_start,
            status: car.status,
            sales_date,
            sales_cost,
        }))
    }

    /// Renames a car's VIN. Both failure cases are checked before any write,
    /// so a failed rename leaves record and index untouched. Sales made
    /// under the old VIN keep it.
    pub fn rename_vin(&mut self, vin: &str, new_vin: &str) -> Result<Car, StorageError> {
        let old = vin.to_string();
        let mut car = self
            .cars
            .get(&old)?
            .ok_or_else(|| StorageError::KeyNotFound { key: old.clone() })?;

        car.vin = new_vin.to_string();
        self.cars.rename_key(&old, &car)?;

        info!("renamed car {old} to {new_vin}");
        Ok(car)
    }

    /// Reverts a sale: flips its deleted flag, then moves the car back to
    /// available. The car must currently be sold; the flag is flipped before
    /// that check, matching the write order of the rest of the engine.
    pub fn revert_sale(&mut self, sales_number: &str) -> Result<Car, StorageError> {
        let key = sales_number.to_string();
        let mut sale = self
            .sales
            .get(&key)?
            .ok_or_else(|| StorageError::KeyNotFound { key: key.clone() })?;

        if sale.deleted {
            return Err(StorageError::AlreadyReverted { sales_number: key });
        }
        sale.deleted = true;
        self.sales.update(&sale.sales_number.clone(), &sale)?;

        let mut car =
            self.cars
                .get(&sale.car_vin)?
                .ok_or_else(|| StorageError::KeyNotFound {
                    key: sale.car_vin.clone(),
                })?;
        if car.status != CarStatus::Sold {
            return Err(StorageError::InvalidState { vin: car.vin });
        }
        car.status = CarStatus::Available;
        self.cars.update(&car.vin.clone(), &car)?;

        info!("reverted sale {sales_number}");
        Ok(car)
    }

    /// The three best-selling models by non-deleted sale count. Each sale is
    /// joined through the car store to reach its model id; ties break on the
    /// average price of all the model's cars, descending.
    pub fn top_models(&mut self) -> Result<Vec<ModelSaleStats>, StorageError> {
        let mut counts: BTreeMap<u64, u64> = BTreeMap::new();
        for sale in self.sales.scan()? {
            if sale.deleted {
                continue;
            }
            let Some(car) = self.cars.get(&sale.car_vin)? else {
                // Possible only after a VIN rename; the sale keeps the
                // pre-rename VIN text.
                debug!(
                    "sale {} references unknown vin {}",
                    sale.sales_number, sale.car_vin
                );
                continue;
            };
            *counts.entry(car.model).or_insert(0) += 1;
        }

        let mut ranked = Vec::with_capacity(counts.len());
        for (model, count) in counts {
            ranked.push((model, count, self.average_price(model)?));
        }
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.2.cmp(&a.2)));

        let mut top = Vec::with_capacity(TOP_MODELS);
        for (id, sales_count, _) in ranked.into_iter().take(TOP_MODELS) {
            let model = self
                .models
                .get(&id)?
                .ok_or(StorageError::ModelNotFound { id })?;
            top.push(ModelSaleStats {
                car_model_name: model.name,
                brand: model.brand,
                sales_count,
            });
        }
        Ok(top)
    }

    /// Average price across every car of one model, any status; zero when
    /// the model has no cars.
    fn average_price(&mut self, model: u64) -> Result<Decimal, StorageError> {
        let prices: Vec<Decimal> = self
            .cars
            .scan()?
            .into_iter()
            .filter(|car| car.model == model)
            .map(|car| car.price)
            .collect();
        if prices.is_empty() {
            return Ok(Decimal::ZERO);
        }
        let total: Decimal = prices.iter().copied().sum();
        Ok(total / Decimal::from(prices.len() as u64))
    }
}
