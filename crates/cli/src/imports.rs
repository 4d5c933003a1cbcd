//! `roilens export` / `roilens import` — the twelve-column CSV interchange.

use std::path::PathBuf;

use serde::Serialize;

use roilens_engine::validate::FieldErrors;
use roilens_core::{EntryId, WeeklyEntry};
use roilens_io::csv::read_file_as_utf8;
use roilens_recon::{export_csv, import_csv};
use roilens_store::StoreClient;

use crate::exit_codes::{EXIT_IMPORT_INVALID, EXIT_IMPORT_PARSE};
use crate::util::{print_json, DataArgs, ScopeArgs};
use crate::CliError;

pub fn cmd_export(data_args: DataArgs, output: Option<PathBuf>) -> Result<(), CliError> {
    let settings = data_args.settings()?;
    let data = data_args.load_dataset(&settings)?;

    let csv = export_csv(&data.entries).map_err(CliError::import)?;
    let rows = data.entries.iter().filter(|e| e.is_active()).count();

    match output {
        Some(path) => {
            std::fs::write(&path, &csv)
                .map_err(|e| CliError::general(format!("cannot write {}: {}", path.display(), e)))?;
            eprintln!("wrote {} rows to {}", rows, path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportReport {
    added: usize,
    updated: usize,
    committed: bool,
    changed: Vec<WeeklyEntry>,
    invalid: Vec<InvalidRow>,
}

#[derive(Serialize)]
struct InvalidRow {
    id: EntryId,
    errors: FieldErrors,
}

pub fn cmd_import(
    file: PathBuf,
    scope: ScopeArgs,
    commit: bool,
    json: bool,
) -> Result<(), CliError> {
    let settings = scope.data.settings()?;
    let mut data = scope.data.load_dataset(&settings)?;
    let filter = scope.filter(&settings)?;

    let csv_text = read_file_as_utf8(&file)
        .map_err(|e| CliError { code: EXIT_IMPORT_PARSE, message: e, hint: None })?;

    let outcome = import_csv(&csv_text, &data.entries, &filter).map_err(CliError::import)?;

    for (id, errors) in &outcome.invalid {
        eprintln!("invalid row {}:", id);
        for (field, message) in errors {
            eprintln!("  {}: {}", field, message);
        }
    }

    if commit {
        if !outcome.invalid.is_empty() {
            return Err(CliError {
                code: EXIT_IMPORT_INVALID,
                message: format!(
                    "{} merged row(s) carry validation errors; nothing was committed",
                    outcome.invalid.len()
                ),
                hint: Some("fix the CSV, or run without --commit to inspect the merge".to_string()),
            });
        }
        let client = StoreClient::from_saved_auth().map_err(CliError::store)?;
        client
            .batch_upsert_entries(&outcome.changed)
            .map_err(CliError::store)?;
        data.entries = outcome.rows.clone();
        scope.data.save_dataset(&settings, &data)?;
    }

    eprintln!(
        "{}: {} added, {} updated",
        if commit { "committed" } else { "preview" },
        outcome.added,
        outcome.updated,
    );

    if json {
        let invalid = outcome
            .invalid
            .into_iter()
            .map(|(id, errors)| InvalidRow { id, errors })
            .collect();
        return print_json(&ImportReport {
            added: outcome.added,
            updated: outcome.updated,
            committed: commit,
            changed: outcome.changed,
            invalid,
        });
    }
    Ok(())
}
