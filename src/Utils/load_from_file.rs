//! Reading simulation tasks from disk.
//!
//! A task file is either a bare JSON object with the fields of [`SimulationConfig`], or a text
//! document with sections: a `SIMULATION` header followed by that JSON object and an optional
//! `PARAMETERS` header followed by a flat JSON map of parameter overrides, e.g.
//! ```text
//! ADM1 task, co-digestion of sludge and food waste
//! SIMULATION
//! { "days": 30, "mixing_ratio": 0.6, "recycle_ratio": 0.2 }
//! PARAMETERS
//! { "k_dis1": 0.45, "k_m_ac": 7.5 }
//! ```
use crate::ADM1::error::Adm1Error;
use crate::ADM1::simulation::SimulationConfig;
use log::{info, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub const SIMULATION_HEADER: &str = "SIMULATION";
pub const PARAMETERS_HEADER: &str = "PARAMETERS";

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }

    pub fn load_config(&self) -> Result<SimulationConfig, Adm1Error> {
        load_config_from_file(&self.file_name)
    }

    pub fn load_parameter_overrides(&self) -> Result<HashMap<String, f64>, Adm1Error> {
        load_parameter_overrides_from_file(&self.file_name)
    }
}

fn read_lines(file_name: &str) -> Result<Vec<String>, Adm1Error> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(Adm1Error::Configuration(format!(
            "File '{}' does not exist",
            file_name
        )));
    }
    let reader = BufReader::new(File::open(path)?);
    let lines = reader.lines().collect::<Result<Vec<String>, _>>()?;
    Ok(lines)
}

/// An all-caps line such as "SIMULATION" or "PARAMETERS" opens a section.
fn is_header(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_uppercase() || c == '_' || c.is_ascii_digit())
}

/// Text between `header` and the next header line, or None if the header is absent.
fn section(lines: &[String], header: &str) -> Option<String> {
    let start = lines
        .iter()
        .position(|line| line.trim().to_uppercase() == header)?;
    let body: Vec<&str> = lines[start + 1..]
        .iter()
        .take_while(|line| !is_header(line))
        .map(|line| line.as_str())
        .collect();
    Some(body.join("\n"))
}

fn parse_overrides(text: &str, file_name: &str) -> Result<HashMap<String, f64>, Adm1Error> {
    let map: HashMap<String, Value> = serde_json::from_str(text)?;
    let mut overrides = HashMap::new();
    for (key, value) in map {
        let number = value.as_f64().ok_or_else(|| {
            Adm1Error::Configuration(format!(
                "parameter '{}' in '{}' is not a number: {}",
                key, file_name, value
            ))
        })?;
        overrides.insert(key, number);
    }
    Ok(overrides)
}

/// Reads a task file. Overrides from a `PARAMETERS` section are merged into
/// `param_overrides` and win over the ones given inside the `SIMULATION` object.
pub fn load_config_from_file(file_name: &str) -> Result<SimulationConfig, Adm1Error> {
    let lines = read_lines(file_name)?;
    let mut config: SimulationConfig = match section(&lines, SIMULATION_HEADER) {
        Some(text) => serde_json::from_str(&text)?,
        None => serde_json::from_str(&lines.join("\n"))?,
    };
    if let Some(text) = section(&lines, PARAMETERS_HEADER) {
        let overrides = parse_overrides(&text, file_name)?;
        info!(
            "{} parameter overrides read from the PARAMETERS section of '{}'",
            overrides.len(),
            file_name
        );
        config.param_overrides.extend(overrides);
    }
    info!(
        "task '{}' loaded: {} days ({}), mixing ratio {}, recycle ratio {}",
        file_name, config.days, config.time_unit, config.mixing_ratio, config.recycle_ratio
    );
    Ok(config)
}

/// Reads a flat JSON map of parameter values, either the whole file or its
/// `PARAMETERS` section.
pub fn load_parameter_overrides_from_file(
    file_name: &str,
) -> Result<HashMap<String, f64>, Adm1Error> {
    let lines = read_lines(file_name)?;
    let text = section(&lines, PARAMETERS_HEADER).unwrap_or_else(|| lines.join("\n"));
    let overrides = parse_overrides(&text, file_name)?;
    if overrides.is_empty() {
        warn!("no parameter overrides found in '{}'", file_name);
    } else {
        info!("{} parameter overrides loaded from '{}'", overrides.len(), file_name);
    }
    Ok(overrides)
}
