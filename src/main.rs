use ADM1_coAD::cli::cli_main::{run_interactive_menu, run_task_file};
use log::error;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;

const LOG_FILE: &str = "adm1_simulation.log";

/// Info and above to the terminal, everything down to debug into the log file.
fn init_logging() {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    match File::create(LOG_FILE) {
        Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file)),
        Err(e) => eprintln!("cannot create {}: {}", LOG_FILE, e),
    }
    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("logger already initialized: {}", e);
    }
}

pub fn main() {
    init_logging();
    match std::env::args().nth(1) {
        Some(path) => {
            if let Err(e) = run_task_file(&path) {
                error!("{}", e);
                std::process::exit(1);
            }
        }
        None => run_interactive_menu(),
    }
}
