//! Console tables and CSV export of simulation results.
use crate::ADM1::error::Adm1Error;
use crate::ADM1::reactor_setup::{ReactorSetup, cn_ratio};
use crate::ADM1::simulation::{
    FinalSummary, GasFlowRecord, InhibitionRecord, IonRecord, MixedInfluentRecord,
    MixingComparison, Record, SimulationResult, StateRow,
};
use log::info;
use prettytable::{Table, row};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

fn units(name: &str) -> &'static str {
    match name {
        "q_in" | "q_in1" | "q_in2" | "q_ad" | "q_out" | "q_r" | "q_recycle" | "q_gas" | "q_ch4" => {
            "m3/d"
        }
        "V_liq" | "V_gas" | "V_ad" | "total_ch4" => "m3",
        "HRT" => "d",
        "VS_in" | "VS_out" | "TS" | "VSS" => "t/d",
        "OLR" => "kg VS/(m3 d)",
        "density" => "t/m3",
        "p_gas_h2" | "p_gas_ch4" | "p_gas_co2" | "p_gas" => "bar",
        "biomethane_yield" | "cumulative_methane_yield" => "m3/t VS",
        "biomethane_yield2" => "m3/(m3 d)",
        "VS_reduction" => "%",
        _ => "",
    }
}

pub fn reactor_table(setup: &ReactorSetup) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Parameter", "Value", "Units"]);
    for (name, value) in setup.entries() {
        table.add_row(row![name, format!("{:.4}", value), units(name)]);
    }
    table
}

pub fn summary_table(summary: &FinalSummary) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Quantity", "Value", "Units"]);
    for (name, value) in summary.entries() {
        table.add_row(row![name, format!("{:.4}", value), units(name)]);
    }
    table
}

pub fn comparison_table(rows: &[MixingComparison]) -> Table {
    let mut table = Table::new();
    table.add_row(row![
        "mixing ratio",
        "pH",
        "q_ch4 [m3/d]",
        "cum. CH4 yield [m3/t VS]",
        "VS reduction [%]"
    ]);
    for r in rows {
        table.add_row(row![
            format!("{:.2}", r.mixing_ratio),
            format!("{:.3}", r.pH),
            format!("{:.2}", r.q_ch4),
            format!("{:.2}", r.cumulative_methane_yield),
            format!("{:.1}", r.VS_reduction)
        ]);
    }
    table
}

pub fn print_result(result: &SimulationResult) {
    println!("\n Reactor setup ({} parameter set)", result.regime.name());
    reactor_table(&result.reactor).printstd();
    let cn = cn_ratio(&result.influent);
    println!(
        " feed C/N ratio {:.2} (C {:.4}, N {:.4} per m3 of feed)",
        cn.ratio, cn.total_c, cn.total_n
    );
    println!("\n Final state");
    summary_table(&result.summary).printstd();
}

/// Header line plus one line per record, comma separated.
pub fn to_csv<R: Record>(rows: &[R]) -> String {
    let mut out = R::columns().join(",");
    out.push('\n');
    for r in rows {
        let line: Vec<String> = r.values().iter().map(|v| format!("{:e}", v)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

pub fn write_csv<R: Record>(path: &Path, rows: &[R]) -> Result<(), Adm1Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(to_csv(rows).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Writes every history table into `dir` (created if needed) and returns the file paths.
pub fn export_histories(result: &SimulationResult, dir: &Path) -> Result<Vec<PathBuf>, Adm1Error> {
    fs::create_dir_all(dir)?;
    let paths = [
        "states.csv",
        "gas_flow.csv",
        "inhibition.csv",
        "ions.csv",
        "mixed_influent.csv",
    ]
    .map(|name| dir.join(name));
    write_csv::<StateRow>(&paths[0], &result.states)?;
    write_csv::<GasFlowRecord>(&paths[1], &result.gas)?;
    write_csv::<InhibitionRecord>(&paths[2], &result.inhibition)?;
    write_csv::<IonRecord>(&paths[3], &result.ions)?;
    write_csv::<MixedInfluentRecord>(&paths[4], &result.mixed_influent)?;
    info!("histories written to {}", dir.display());
    Ok(paths.to_vec())
}
