// RoiLens CLI - marketing-performance reports from the command line
//
// Weekly ledger and CRM movements live in a local dataset file (refreshed
// from the row store with `pull`); every report recomputes from that file.

mod admin;
mod compare;
mod crm;
mod entries;
mod exit_codes;
mod imports;
mod report;
mod sync;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;
pub use exit_codes::{EXIT_ERROR, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "roilens")]
#[command(about = "Marketing-performance reports: weekly ledger vs. CRM movements")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch weekly rows and CRM movements from the store into the dataset file
    #[command(after_help = "\
Examples:
  roilens pull
  roilens pull --data ./dataset.json")]
    Pull {
        #[command(flatten)]
        data: util::DataArgs,
    },

    /// Weekly-ledger reports: KPIs, week series, channel tables
    Report {
        #[command(subcommand)]
        command: report::ReportCommands,
    },

    /// Compare two months of the same year, metric by metric
    #[command(after_help = "\
Examples:
  roilens compare --year 2025 --month1 7 --month2 8
  roilens compare --month1 7 --month2 8 --json")]
    Compare {
        #[command(flatten)]
        data: util::DataArgs,

        /// Year both months belong to (default: settings, else current year)
        #[arg(long)]
        year: Option<i32>,

        /// First month (1-12); differences are month1 minus month2
        #[arg(long)]
        month1: u32,

        /// Second month (1-12)
        #[arg(long)]
        month2: u32,

        /// Output JSON to stdout instead of the table
        #[arg(long)]
        json: bool,
    },

    /// CRM-movement reports: totals, channel table, time series, customers
    Crm {
        #[command(subcommand)]
        command: crm::CrmCommands,
    },

    /// Validate every active entry; non-zero exit if any record is invalid
    #[command(after_help = "\
Examples:
  roilens validate
  roilens validate --json")]
    Validate {
        #[command(flatten)]
        data: util::DataArgs,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Export active entries as the twelve-column interchange CSV
    #[command(after_help = "\
Examples:
  roilens export --output semanas.csv
  roilens export > semanas.csv")]
    Export {
        #[command(flatten)]
        data: util::DataArgs,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Merge an interchange CSV into the weekly ledger (preview by default)
    #[command(after_help = "\
Without --commit the merge is a preview: counts, changed rows and validation
errors are reported, nothing is written.

Examples:
  roilens import semanas.csv
  roilens import semanas.csv --year 2025 --month 3
  roilens import semanas.csv --commit")]
    Import {
        /// CSV file (UTF-8, or Windows-1252 from spreadsheet exports)
        file: PathBuf,

        #[command(flatten)]
        scope: util::ScopeArgs,

        /// Batch-upsert the changed rows to the store and save the dataset
        #[arg(long)]
        commit: bool,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Create, edit and manage weekly entries
    Entry {
        #[command(subcommand)]
        command: entries::EntryCommands,
    },

    /// List trashed entries
    Trash {
        #[command(flatten)]
        data: util::DataArgs,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Record CRM movements
    Movement {
        #[command(subcommand)]
        command: entries::MovementCommands,
    },

    /// Admin surface: invitations and the user listing
    Admin {
        #[command(subcommand)]
        command: admin::AdminCommands,
    },

    /// Save the bearer credential for the row store
    #[command(after_help = "\
Examples:
  roilens login --token sk-... --api-base https://rows.example.app
  ROILENS_TOKEN=sk-... roilens login")]
    Login {
        /// Bearer token
        #[arg(long, env = "ROILENS_TOKEN")]
        token: String,

        /// Store base URL (default: settings api_base)
        #[arg(long)]
        api_base: Option<String>,

        /// Account email, kept for display
        #[arg(long)]
        email: Option<String>,

        #[command(flatten)]
        data: util::DataArgs,
    },

    /// Delete the saved bearer credential
    Logout,
}

fn long_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_HASH"), ")")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pull { data } => sync::cmd_pull(data),
        Commands::Report { command } => report::cmd_report(command),
        Commands::Compare { data, year, month1, month2, json } => {
            compare::cmd_compare(data, year, month1, month2, json)
        }
        Commands::Crm { command } => crm::cmd_crm(command),
        Commands::Validate { data, json } => entries::cmd_validate(data, json),
        Commands::Export { data, output } => imports::cmd_export(data, output),
        Commands::Import { file, scope, commit, json } => {
            imports::cmd_import(file, scope, commit, json)
        }
        Commands::Entry { command } => entries::cmd_entry(command),
        Commands::Trash { data, json } => entries::cmd_trash_list(data, json),
        Commands::Movement { command } => entries::cmd_movement(command),
        Commands::Admin { command } => admin::cmd_admin(command),
        Commands::Login { token, api_base, email, data } => {
            sync::cmd_login(token, api_base, email, data)
        }
        Commands::Logout => sync::cmd_logout(),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn store(err: roilens_store::StoreError) -> Self {
        let hint = match &err {
            roilens_store::StoreError::NotAuthenticated => {
                Some("run `roilens login --token ... --api-base ...`".to_string())
            }
            _ => None,
        };
        Self { code: exit_codes::store_exit_code(&err), message: err.to_string(), hint }
    }

    pub fn admin(err: roilens_store::AdminError) -> Self {
        Self { code: exit_codes::admin_exit_code(&err), message: err.to_string(), hint: None }
    }

    pub fn command(err: roilens_store::CommandError) -> Self {
        Self { code: exit_codes::command_exit_code(&err), message: err.to_string(), hint: None }
    }

    pub fn import(err: roilens_recon::ImportError) -> Self {
        Self { code: exit_codes::import_exit_code(&err), message: err.to_string(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
