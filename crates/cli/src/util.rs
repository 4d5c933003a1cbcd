//! Shared command plumbing: settings, dataset paths, report scope flags.

use std::path::{Path, PathBuf};

use chrono::Datelike;
use clap::Args;

use roilens_config::settings::Settings;
use roilens_core::{Dataset, Filter};
use roilens_io::dataset as dataset_file;

use crate::exit_codes::{dataset_exit_code, EXIT_CONFIG};
use crate::CliError;

/// Flags shared by every command that touches the working copy.
#[derive(Args)]
pub struct DataArgs {
    /// Dataset file (default: settings data_file, else the platform data dir)
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Settings override file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl DataArgs {
    pub fn settings(&self) -> Result<Settings, CliError> {
        load_settings(self.config.as_deref())
    }

    /// Resolution order: --data flag, settings data_file, platform default.
    pub fn data_path(&self, settings: &Settings) -> PathBuf {
        self.data
            .clone()
            .or_else(|| settings.data_file.clone())
            .unwrap_or_else(dataset_file::default_data_path)
    }

    pub fn load_dataset(&self, settings: &Settings) -> Result<Dataset, CliError> {
        let path = self.data_path(settings);
        dataset_file::load(&path)
            .map_err(|e| CliError { code: dataset_exit_code(&e), message: e.to_string(), hint: None })
    }

    pub fn save_dataset(&self, settings: &Settings, data: &Dataset) -> Result<(), CliError> {
        let path = self.data_path(settings);
        dataset_file::save(data, &path)
            .map_err(|e| CliError { code: dataset_exit_code(&e), message: e.to_string(), hint: None })
    }
}

/// The (year, month|all, channel|all) selection for report commands.
#[derive(Args)]
pub struct ScopeArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Reporting year (default: settings default_year, else the current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Month 1-12, or "all"
    #[arg(long, default_value = "all")]
    pub month: String,

    /// Channel name, or "all"
    #[arg(long, default_value = "all")]
    pub channel: String,
}

impl ScopeArgs {
    pub fn filter(&self, settings: &Settings) -> Result<Filter, CliError> {
        let year = self
            .year
            .or(settings.default_year)
            .unwrap_or_else(current_year);
        let month = self.month.parse().map_err(CliError::args)?;
        let channel = self.channel.parse().map_err(CliError::args)?;
        Ok(Filter { year, month, channel })
    }
}

pub fn load_settings(config: Option<&Path>) -> Result<Settings, CliError> {
    match config {
        Some(path) => {
            let contents = std::fs::read_to_string(path).map_err(|e| CliError {
                code: EXIT_CONFIG,
                message: format!("cannot read {}: {}", path.display(), e),
                hint: None,
            })?;
            Settings::from_toml_str(&contents).map_err(|e| CliError {
                code: EXIT_CONFIG,
                message: e,
                hint: None,
            })
        }
        None => Ok(Settings::load()),
    }
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub fn current_month() -> u32 {
    chrono::Local::now().month()
}

/// Pretty JSON to stdout; the machine half of every `--json` flag.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("JSON serialization error: {}", e)))?;
    println!("{json}");
    Ok(())
}

/// Two-decimal money/metric cell for the human tables.
pub fn cell(n: f64) -> String {
    format!("{:.2}", n)
}
