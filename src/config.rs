use std::path::PathBuf;

use clap::{Parser, ValueHint};

pub const DEFAULT_DATA_FILE: &str = "exportacoes_franca.csv";

/// Dashboard of exports to France, filtered by city.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// CSV file with City, SH2/SH4 Description, US$ FOB and Net Weight columns
    #[arg(default_value = DEFAULT_DATA_FILE, value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    /// City checked at start-up (repeatable)
    #[arg(long = "city", value_name = "NAME")]
    pub cities: Vec<String>,

    /// Write the dashboard as JSON to PATH (`-` for stdout) and exit
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub export: Option<PathBuf>,
}
