//! `roilens admin` — invitations and the account listing.

use clap::Subcommand;

use roilens_store::AdminClient;

use crate::util::print_json;
use crate::CliError;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Invite an account by email
    #[command(after_help = "\
Examples:
  roilens admin invite ana@example.com")]
    Invite {
        /// Email address; lowercased before sending
        email: String,
    },

    /// List accounts, one page at a time
    #[command(after_help = "\
Examples:
  roilens admin users
  roilens admin users --page 2 --per-page 100 --json")]
    Users {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 50)]
        per_page: u32,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

pub fn cmd_admin(command: AdminCommands) -> Result<(), CliError> {
    let client = AdminClient::from_saved_auth().map_err(CliError::admin)?;

    match command {
        AdminCommands::Invite { email } => {
            let warning = client.invite(&email).map_err(CliError::admin)?;
            eprintln!("invited {}", email.trim().to_lowercase());
            if let Some(warning) = warning {
                eprintln!("warning: {}", warning);
            }
            Ok(())
        }

        AdminCommands::Users { page, per_page, json } => {
            let users = client.list_users(page, per_page).map_err(CliError::admin)?;
            if json {
                return print_json(&users);
            }

            println!("{:<38} {:<30} {:<8} {}", "id", "email", "state", "last sign-in");
            for user in &users {
                println!(
                    "{:<38} {:<30} {:<8} {}",
                    user.id,
                    user.email.as_deref().unwrap_or("-"),
                    if user.is_active() { "active" } else { "invited" },
                    user.last_sign_in_at.as_deref().unwrap_or("-")
                );
            }
            eprintln!("{} account(s), page {}", users.len(), page);
            Ok(())
        }
    }
}
