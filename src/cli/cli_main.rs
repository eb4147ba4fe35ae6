use crate::ADM1::error::Adm1Error;
use crate::ADM1::report::{comparison_table, export_histories, print_result};
use crate::ADM1::simulation::{SimulationConfig, compare_mixing_ratios, run_simulation};
use crate::Utils::load_from_file::LoadData;
use log::{error, info};
use std::io::{self, Write};
use std::path::Path;

pub const RESULTS_DIR: &str = "adm1_results";
const COMPARISON_RATIOS: [f64; 5] = [0.1, 0.3, 0.5, 0.7, 0.9];

pub fn run_interactive_menu() {
    loop {
        show_main_menu();
        let choice = get_user_input();

        let outcome = match choice.trim() {
            "1" => run_and_report(&SimulationConfig::default()),
            "2" => {
                prompt("Path to the JSON task file: ");
                run_task_file(get_user_input().trim())
            }
            "3" => run_comparison(),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => {
                println!("Invalid choice. Please try again.");
                Ok(())
            }
        };
        if let Err(e) = outcome {
            error!("{}", e);
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n ADM1 co-digestion simulator: two feedstock lines, effluent recycle,\n
    pH and dissolved hydrogen from the algebraic stage \n \x1b[0m"
    );
    println!("\x1b[33m1. Run the default scenario (10 days)\x1b[0m");
    println!("\x1b[33m2. Run a JSON task file\x1b[0m");
    println!("\x1b[33m3. Compare mixing ratios\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    prompt("Enter your choice: ");
}

fn prompt(text: &str) {
    print!("\x1b[36m{}\x1b[0m", text);
    let _ = io::stdout().flush();
}

fn get_user_input() -> String {
    let mut input = String::new();
    if let Err(e) = io::stdin().read_line(&mut input) {
        error!("failed to read input: {}", e);
    }
    input
}

fn run_and_report(config: &SimulationConfig) -> Result<(), Adm1Error> {
    let result = run_simulation(config)?;
    print_result(&result);
    let paths = export_histories(&result, Path::new(RESULTS_DIR))?;
    info!("{} history tables exported", paths.len());
    Ok(())
}

/// Loads a task file and runs it; used by the menu and by the binary's path argument.
pub fn run_task_file(path: &str) -> Result<(), Adm1Error> {
    let config = LoadData::new(path.to_string()).load_config()?;
    run_and_report(&config)
}

fn run_comparison() -> Result<(), Adm1Error> {
    let rows = compare_mixing_ratios(&SimulationConfig::default(), &COMPARISON_RATIOS)?;
    comparison_table(&rows).printstd();
    Ok(())
}
