use clap::Parser;
use std::{
    error::Error,
    io,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use carlot::{CarService, Command, StorageError, prompt};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the data directory
    path: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize env_logger; For logging to STDOUT/STDERR
    env_logger::init();

    let cli = Cli::parse();
    let mut service = CarService::open(cli.path)?;

    let running = Arc::new(AtomicBool::new(true));
    let handle = Arc::clone(&running);
    ctrlc::set_handler(move || handle.store(false, Ordering::SeqCst))?;

    let stdin = io::stdin();
    let stdout = io::stdout();

    while running.load(Ordering::SeqCst) {
        let line = match prompt(stdin.lock(), stdout.lock()) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            // Interrupted reads surface as errors once the handler has
            // cleared the running flag.
            Err(_) if !running.load(Ordering::SeqCst) => break,
            Err(e) => return Err(e.into()),
        };

        match <&str as TryInto<Command>>::try_into(line.as_str()) {
            Ok(Command::Exit) => break,
            Ok(cmd) => {
                if let Err(e) = execute(&mut service, cmd) {
                    eprintln!("error: {e}");
                }
            }
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}

fn execute(service: &mut CarService, cmd: Command) -> Result<(), StorageError> {
    match cmd {
        Command::AddModel(model) => {
            let model = service.register_model(model)?;
            println!("model {} registered", model.id);
        }
        Command::AddCar(car) => {
            let car = service.register_car(car)?;
            println!("car {} registered", car.vin);
        }
        Command::Sell(sale) => {
            let car = service.sell_car(sale)?;
            println!("{car}");
        }
        Command::Cars(status) => {
            for car in service.cars_by_status(status)? {
                println!("{car}");
            }
        }
        Command::Info(vin) => match service.car_info(&vin)? {
            Some(info) => println!("{info}"),
            None => println!("no car with vin {vin}"),
        },
        Command::Rename { vin, new_vin } => {
            let car = service.rename_vin(&vin, &new_vin)?;
            println!("{car}");
        }
        Command::Revert(sales_number) => {
            let car = service.revert_sale(&sales_number)?;
            println!("{car}");
        }
        Command::Top => {
            for stats in service.top_models()? {
                println!("{stats}");
            }
        }
        Command::Exit => {}
    }
    Ok(())
}
