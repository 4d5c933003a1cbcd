//! `pull`, `login`, `logout` — the store side of the workflow.

use roilens_core::{sort_entries, Dataset};
use roilens_store::{delete_auth, save_auth, AuthCredentials, StoreClient};

use crate::exit_codes::EXIT_CONFIG;
use crate::util::DataArgs;
use crate::CliError;

/// Replace the local dataset with the store's current rows and movements.
pub fn cmd_pull(data: DataArgs) -> Result<(), CliError> {
    let settings = data.settings()?;
    let client = StoreClient::from_saved_auth().map_err(CliError::store)?;

    let mut entries = client.list_entries().map_err(CliError::store)?;
    let movements = client.list_movements().map_err(CliError::store)?;
    sort_entries(&mut entries);

    let dataset = Dataset { entries, movements };
    data.save_dataset(&settings, &dataset)?;

    eprintln!(
        "pulled {} entries, {} movements into {}",
        dataset.entries.len(),
        dataset.movements.len(),
        data.data_path(&settings).display()
    );
    Ok(())
}

pub fn cmd_login(
    token: String,
    api_base: Option<String>,
    email: Option<String>,
    data: DataArgs,
) -> Result<(), CliError> {
    let settings = data.settings()?;
    let api_base = match api_base {
        Some(base) => base,
        None if !settings.api_base.is_empty() => settings.api_base.clone(),
        None => {
            return Err(CliError {
                code: EXIT_CONFIG,
                message: "no store base URL".to_string(),
                hint: Some("pass --api-base or set api_base in settings".to_string()),
            });
        }
    };

    let mut creds = AuthCredentials::new(token, api_base);
    creds.email = email;
    save_auth(&creds).map_err(CliError::general)?;
    eprintln!("credential saved for {}", creds.api_base);
    Ok(())
}

pub fn cmd_logout() -> Result<(), CliError> {
    delete_auth().map_err(CliError::general)?;
    eprintln!("credential deleted");
    Ok(())
}
