pub mod cli;
pub mod command;
pub mod domain;
pub mod service;
pub mod storage;

pub use cli::prompt;
pub use command::{Command, CommandError};
pub use domain::{Car, CarFullInfo, CarStatus, Model, ModelSaleStats, Sale};
pub use service::CarService;
pub use storage::error::StorageError;
