// Console menu for keeping the department table: register, modify, delete and list departments
// until the user picks Exit.
use std::io::{self, BufReader};
use std::process;

use tracing::error;
use tracing_subscriber::EnvFilter;

use depart_mental::config::Config;
use depart_mental::data_handling::DeptDatabase;
use depart_mental::menu::Menu;
use depart_mental::textinterface::{DeptConsole, TextIO};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("depart_mental=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration failed: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let data = match DeptDatabase::open(&config.database) {
        Ok(data) => data,
        Err(e) => {
            error!("Initialization failed: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut menu = Menu::new(DeptConsole::new(data));
    let mut io = TextIO::new(BufReader::new(io::stdin()), io::stdout());

    if let Err(e) = menu.run(&mut io) {
        error!("Menu stopped: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
