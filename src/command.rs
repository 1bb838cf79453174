//! High-level command module for the interactive front end.
//!
//! This module defines the [`Command`] enum, which encapsulates user
//! commands and their parsed arguments. These commands are executed against
//! a [`CarService`](crate::service::CarService).
//!
//! # Overview
//! The `Command` enum represents supported operations such as:
//!
//! - `Exit`: Close the current session.
//! - `AddModel` / `AddCar`: Register new records.
//! - `Sell` / `Revert`: Record or revert a sale.
//! - `Cars` / `Info` / `Top`: Query operations.
//! - `Rename`: Move a car to a new VIN.
//!
//! Commands are parsed from user-inputted strings via `TryInto`.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{Car, CarStatus, Model, Sale};

/// List of possible errors that command parsing can throw.
#[derive(Debug, Error, Clone)]
pub enum CommandError {
    #[error("unrecognized command '{0}'")]
    UnrecognizedCommand(String),

    #[error("invalid '{command}' command, {reason}")]
    InvalidCommandArguments { command: String, reason: String },

    #[error("no command provided")]
    Empty,
}

/// User supplied commands to execute on a `CarService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Requests the session to terminate.
    Exit,
    /// Registers a new model.
    AddModel(Model),
    /// Registers a new car, initially available.
    AddCar(Car),
    /// Records a sale for an existing car.
    Sell(Sale),
    /// Lists cars currently in the given status.
    Cars(CarStatus),
    /// Full info for one car by VIN.
    Info(String),
    /// Moves a car to a new VIN.
    Rename { vin: String, new_vin: String },
    /// Reverts a recorded sale by sales number.
    Revert(String),
    /// The top-selling models.
    Top,
}

fn argument<T: FromStr>(command: &str, value: &str, what: &str) -> Result<T, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::InvalidCommandArguments {
            command: command.to_string(),
            reason: format!("invalid {what} '{value}'"),
        })
}

fn arity(command: &str, parts: &[&str], expected: usize, usage: &str) -> Result<(), CommandError> {
    if parts.len() != expected {
        return Err(CommandError::InvalidCommandArguments {
            command: command.to_string(),
            reason: format!("expected {} arguments. Example: {usage}", expected - 1),
        });
    }
    Ok(())
}

impl TryInto<Command> for &str {
    type Error = CommandError;

    fn try_into(self) -> Result<Command, Self::Error> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return Err(CommandError::Empty);
        }

        let parts = trimmed.split_whitespace().collect::<Vec<&str>>();
        match parts[0] {
            ".exit" => Ok(Command::Exit),
            "top" => Ok(Command::Top),
            cmd @ "add-model" => {
                arity(cmd, &parts, 4, "add-model 1 Model3 Tesla")?;
                Ok(Command::AddModel(Model {
                    id: argument(cmd, parts[1], "model id")?,
                    name: parts[2].to_string(),
                    brand: parts[3].to_string(),
                }))
            }
            cmd @ "add-car" => {
                arity(cmd, &parts, 5, "add-car VIN001 1 40000 2024-01-01")?;
                Ok(Command::AddCar(Car {
                    vin: parts[1].to_string(),
                    model: argument(cmd, parts[2], "model id")?,
                    price: argument::<Decimal>(cmd, parts[3], "price")?,
                    date_start: argument::<NaiveDate>(cmd, parts[4], "start date")?,
                    status: CarStatus::Available,
                }))
            }
            cmd @ "sell" => {
                arity(cmd, &parts, 5, "sell S1 VIN001 39000 2024-02-01")?;
                Ok(Command::Sell(Sale {
                    sales_number: parts[1].to_string(),
                    car_vin: parts[2].to_string(),
                    cost: argument::<Decimal>(cmd, parts[3], "cost")?,
                    sales_date: argument::<NaiveDate>(cmd, parts[4], "sales date")?,
                    deleted: false,
                }))
            }
            cmd @ "cars" => {
                arity(cmd, &parts, 2, "cars available")?;
                Ok(Command::Cars(argument::<CarStatus>(
                    cmd, parts[1], "car status",
                )?))
            }
            cmd @ "info" => {
                arity(cmd, &parts, 2, "info VIN001")?;
                Ok(Command::Info(parts[1].to_string()))
            }
            cmd @ "rename" => {
                arity(cmd, &parts, 3, "rename VIN001 VIN002")?;
                Ok(Command::Rename {
                    vin: parts[1].to_string(),
                    new_vin: parts[2].to_string(),
                })
            }
            cmd @ "revert" => {
                arity(cmd, &parts, 2, "revert S1")?;
                Ok(Command::Revert(parts[1].to_string()))
            }
            s => Err(CommandError::UnrecognizedCommand(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn command_from_string() {
        let inputs = vec![
            (".exit", Command::Exit),
            ("top", Command::Top),
            (
                "add-model 1 Model3 Tesla",
                Command::AddModel(Model {
                    id: 1,
                    name: "Model3".into(),
                    brand: "Tesla".into(),
                }),
            ),
            (
                "add-car VIN001 1 40000 2024-01-01",
                Command::AddCar(Car {
                    vin: "VIN001".into(),
                    model: 1,
                    price: Decimal::from(40000),
                    date_start: date(2024, 1, 1),
                    status: CarStatus::Available,
                }),
            ),
            (
                "sell S1 VIN001 39000 2024-02-01",
                Command::Sell(Sale {
                    sales_number: "S1".into(),
                    car_vin: "VIN001".into(),
                    cost: Decimal::from(39000),
                    sales_date: date(2024, 2, 1),
                    deleted: false,
                }),
            ),
            ("cars available", Command::Cars(CarStatus::Available)),
            ("info VIN001", Command::Info("VIN001".into())),
            (
                "rename VIN001 VIN002",
                Command::Rename {
                    vin: "VIN001".into(),
                    new_vin: "VIN002".into(),
                },
            ),
            ("revert S1", Command::Revert("S1".into())),
        ];

        for (input, expected) in inputs {
            let command: Command = input.try_into().unwrap();
            assert_eq!(command, expected);
        }
    }

    #[test]
    #[should_panic(expected = "UnrecognizedCommand")]
    fn unknown_command() {
        let _: Command = "upsert VIN001".try_into().unwrap();
    }

    #[test]
    #[should_panic(expected = "Empty")]
    fn empty_command() {
        let _: Command = "   ".try_into().unwrap();
    }

    #[test]
    #[should_panic(expected = "InvalidCommandArguments")]
    fn bad_argument() {
        let _: Command = "add-car VIN001 one 40000 2024-01-01".try_into().unwrap();
    }

    #[test]
    #[should_panic(expected = "InvalidCommandArguments")]
    fn missing_arguments() {
        let _: Command = "sell S1".try_into().unwrap();
    }
}
