//! Editing commands for the weekly ledger and the movement log, plus
//! `validate` and the trash listing.
//!
//! Every edit follows the same shape: mutate the working copy, push the
//! write to the store, save the dataset file. Lifecycle commands go through
//! the rollback helpers so a store failure never leaves the file ahead of
//! the store.

use std::time::{Duration, Instant};

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use serde::Serialize;

use roilens_core::{
    sort_entries, Channel, ChannelTag, CrmMovement, CustomerId, EntryId, EntryPatch,
    MovementKind, MovementStatus, WeeklyEntry,
};
use roilens_engine::validate::{validate_entry, FieldErrors};
use roilens_engine::filter;
use roilens_store::{purge_entry, restore_entry, trash_entry, StoreClient, WriteScheduler};

use crate::exit_codes::{EXIT_INVALID_RECORDS, EXIT_UNKNOWN_ENTRY};
use crate::util::{current_month, current_year, print_json, DataArgs};
use crate::CliError;

#[derive(Subcommand)]
pub enum EntryCommands {
    /// Create a weekly entry for a (year, month, week, channel) slot
    #[command(after_help = "\
Examples:
  roilens entry add --year 2025 --month 3 --week 2 --channel WHATSAPP --spend 1200 --revenue 5400
  roilens entry add --month 7 --channel \"EMAIL-MKT\"")]
    Add {
        #[command(flatten)]
        data: DataArgs,

        /// Year (default: settings default_year, else the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month 1-12 (default: the current month)
        #[arg(long)]
        month: Option<u32>,

        /// Week of month 1-6
        #[arg(long, default_value_t = 1)]
        week: u32,

        /// Channel name (default: the first enumerated channel)
        #[arg(long)]
        channel: Option<String>,

        /// Week start date, YYYY-MM-DD
        #[arg(long)]
        week_start: Option<String>,

        /// Week end date, YYYY-MM-DD
        #[arg(long)]
        week_end: Option<String>,

        #[arg(long)]
        spend: Option<f64>,

        #[arg(long)]
        leads: Option<f64>,

        #[arg(long)]
        new_customers: Option<f64>,

        #[arg(long)]
        sales: Option<f64>,

        #[arg(long)]
        revenue: Option<f64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Edit fields of an existing entry, as field=value pairs
    #[command(after_help = "\
Fields: year, month, week, weekStart, weekEnd, channel, spend, leads,
newCustomers, numberOfSales, revenue, notes. `leads=` clears the field.

Examples:
  roilens entry set 3f2a... spend=1500 revenue=6200
  roilens entry set 3f2a... leads=")]
    Set {
        #[command(flatten)]
        data: DataArgs,

        /// Entry id
        id: String,

        /// field=value pairs
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Move an entry to the trash
    Trash {
        #[command(flatten)]
        data: DataArgs,

        /// Entry id
        id: String,
    },

    /// Bring a trashed entry back
    Restore {
        #[command(flatten)]
        data: DataArgs,

        /// Entry id
        id: String,
    },

    /// Permanently delete a trashed entry
    Purge {
        #[command(flatten)]
        data: DataArgs,

        /// Entry id
        id: String,
    },
}

pub fn cmd_entry(command: EntryCommands) -> Result<(), CliError> {
    match command {
        EntryCommands::Add {
            data,
            year,
            month,
            week,
            channel,
            week_start,
            week_end,
            spend,
            leads,
            new_customers,
            sales,
            revenue,
            notes,
        } => {
            let settings = data.settings()?;
            let mut dataset = data.load_dataset(&settings)?;

            let channel = match channel {
                Some(name) => match Channel::parse(&name) {
                    Some(c) => c,
                    None => {
                        let names: Vec<&str> = Channel::ALL.iter().map(|c| c.as_str()).collect();
                        return Err(CliError::args(format!("unknown channel: '{}'", name))
                            .with_hint(format!("one of: {}", names.join(", "))));
                    }
                },
                None => Channel::ALL[0],
            };
            let year = year.or(settings.default_year).unwrap_or_else(current_year);
            let month = month.unwrap_or_else(current_month);

            let mut entry = WeeklyEntry::new(year, month, week, ChannelTag::from(channel));
            entry.week_start = week_start.unwrap_or_default();
            entry.week_end = week_end.unwrap_or_default();
            entry.spend = spend.unwrap_or(0.0);
            entry.leads = leads;
            entry.new_customers = new_customers.unwrap_or(0.0);
            entry.number_of_sales = sales.unwrap_or(0.0);
            entry.revenue = revenue.unwrap_or(0.0);
            entry.notes = notes.unwrap_or_default();

            reject_invalid(&entry)?;

            let client = StoreClient::from_saved_auth().map_err(CliError::store)?;
            client.upsert_entry(&entry).map_err(CliError::store)?;

            let id = entry.id.clone();
            dataset.entries.push(entry);
            sort_entries(&mut dataset.entries);
            data.save_dataset(&settings, &dataset)?;

            println!("{}", id);
            Ok(())
        }

        EntryCommands::Set { data, id, fields } => {
            let settings = data.settings()?;
            let mut dataset = data.load_dataset(&settings)?;

            let mut patch = EntryPatch::default();
            for pair in &fields {
                let Some((key, value)) = pair.split_once('=') else {
                    return Err(CliError::args(format!(
                        "expected field=value, got '{}'",
                        pair
                    )));
                };
                patch.set_field(key, value).map_err(CliError::args)?;
            }
            if patch.is_empty() {
                return Err(CliError::args("no fields to change"));
            }

            let entry_id = EntryId::from(id.as_str());
            let Some(entry) = dataset.entry(&entry_id) else {
                return Err(CliError {
                    code: EXIT_UNKNOWN_ENTRY,
                    message: format!("no entry with id {}", id),
                    hint: None,
                });
            };
            let updated = entry.with_patch(&patch);
            reject_invalid(&updated)?;

            // Edits go through the scheduler so a burst of `set` calls from a
            // script coalesces per id before hitting the store.
            let client = StoreClient::from_saved_auth().map_err(CliError::store)?;
            let mut scheduler = WriteScheduler::new(Duration::from_millis(settings.debounce_ms));
            scheduler.schedule(updated.clone(), Instant::now());
            for pending in scheduler.drain_all() {
                client.upsert_entry(&pending).map_err(CliError::store)?;
            }

            if let Some(entry) = dataset.entry_mut(&entry_id) {
                *entry = updated;
            }
            sort_entries(&mut dataset.entries);
            data.save_dataset(&settings, &dataset)?;
            Ok(())
        }

        EntryCommands::Trash { data, id } => {
            let settings = data.settings()?;
            let mut dataset = data.load_dataset(&settings)?;
            let client = StoreClient::from_saved_auth().map_err(CliError::store)?;

            trash_entry(&mut dataset, &client, &EntryId::from(id.as_str()), Utc::now())
                .map_err(CliError::command)?;
            data.save_dataset(&settings, &dataset)?;
            eprintln!("trashed {}", id);
            Ok(())
        }

        EntryCommands::Restore { data, id } => {
            let settings = data.settings()?;
            let mut dataset = data.load_dataset(&settings)?;
            let client = StoreClient::from_saved_auth().map_err(CliError::store)?;

            restore_entry(&mut dataset, &client, &EntryId::from(id.as_str()))
                .map_err(CliError::command)?;
            data.save_dataset(&settings, &dataset)?;
            eprintln!("restored {}", id);
            Ok(())
        }

        EntryCommands::Purge { data, id } => {
            let settings = data.settings()?;
            let mut dataset = data.load_dataset(&settings)?;
            let client = StoreClient::from_saved_auth().map_err(CliError::store)?;

            purge_entry(&mut dataset, &client, &EntryId::from(id.as_str()))
                .map_err(CliError::command)?;
            data.save_dataset(&settings, &dataset)?;
            eprintln!("purged {}", id);
            Ok(())
        }
    }
}

fn reject_invalid(entry: &WeeklyEntry) -> Result<(), CliError> {
    let errors = validate_entry(entry);
    if errors.is_empty() {
        return Ok(());
    }
    let details: Vec<String> = errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect();
    Err(CliError {
        code: EXIT_INVALID_RECORDS,
        message: format!("invalid entry: {}", details.join("; ")),
        hint: None,
    })
}

#[derive(Serialize)]
struct InvalidRecord {
    id: EntryId,
    year: i32,
    month: u32,
    week: u32,
    channel: String,
    errors: FieldErrors,
}

pub fn cmd_validate(data: DataArgs, json: bool) -> Result<(), CliError> {
    let settings = data.settings()?;
    let dataset = data.load_dataset(&settings)?;

    let active = filter::active(&dataset.entries);
    let checked = active.len();
    let invalid: Vec<InvalidRecord> = active
        .into_iter()
        .filter_map(|entry| {
            let errors = validate_entry(entry);
            if errors.is_empty() {
                return None;
            }
            Some(InvalidRecord {
                id: entry.id.clone(),
                year: entry.year,
                month: entry.month,
                week: entry.week_of_month,
                channel: entry.channel.as_str().to_string(),
                errors,
            })
        })
        .collect();

    if json {
        print_json(&invalid)?;
    } else {
        for record in &invalid {
            eprintln!(
                "{}  {}-{:02} w{} {}",
                record.id, record.year, record.month, record.week, record.channel
            );
            for (field, message) in &record.errors {
                eprintln!("  {}: {}", field, message);
            }
        }
    }

    if invalid.is_empty() {
        eprintln!("all {} active entries valid", checked);
        Ok(())
    } else {
        Err(CliError {
            code: EXIT_INVALID_RECORDS,
            message: format!("{} of {} active entries invalid", invalid.len(), checked),
            hint: None,
        })
    }
}

pub fn cmd_trash_list(data: DataArgs, json: bool) -> Result<(), CliError> {
    let settings = data.settings()?;
    let dataset = data.load_dataset(&settings)?;

    let trashed = filter::trashed(&dataset.entries);
    if json {
        return print_json(&trashed);
    }

    if trashed.is_empty() {
        eprintln!("trash is empty");
        return Ok(());
    }
    println!(
        "{:<38} {:<10} {:<30} {}",
        "id", "period", "channel", "trashed"
    );
    for entry in trashed {
        let when = entry
            .lifecycle
            .trashed_at()
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{:<38} {:<10} {:<30} {}",
            entry.id,
            format!("{}-{:02} w{}", entry.year, entry.month, entry.week_of_month),
            entry.channel.as_str(),
            when
        );
    }
    Ok(())
}

#[derive(Subcommand)]
pub enum MovementCommands {
    /// Record a CRM movement (sale or refund)
    #[command(after_help = "\
Examples:
  roilens movement add --customer C-104 --date 2025-03-18 --kind venta \\
      --status confirmado --amount 890 --channel WHATSAPP
  roilens movement add --customer C-104 --date 2025-04-02 --kind reembolso \\
      --status confirmado --amount 200 --channel WHATSAPP --reference R-77")]
    Add {
        #[command(flatten)]
        data: DataArgs,

        /// Customer id, as known to the CRM
        #[arg(long)]
        customer: String,

        /// Business date, YYYY-MM-DD
        #[arg(long)]
        date: String,

        /// "venta" or "reembolso"
        #[arg(long)]
        kind: String,

        /// "confirmado", "pendiente" or "cancelado"
        #[arg(long)]
        status: String,

        /// Amount, always positive; refunds are subtracted by the reports
        #[arg(long)]
        amount: f64,

        /// Attribution channel name
        #[arg(long)]
        channel: String,

        #[arg(long)]
        sale_type: Option<String>,

        #[arg(long)]
        product: Option<String>,

        #[arg(long)]
        payment_method: Option<String>,

        #[arg(long)]
        reference: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
}

pub fn cmd_movement(command: MovementCommands) -> Result<(), CliError> {
    match command {
        MovementCommands::Add {
            data,
            customer,
            date,
            kind,
            status,
            amount,
            channel,
            sale_type,
            product,
            payment_method,
            reference,
            notes,
        } => {
            let settings = data.settings()?;
            let mut dataset = data.load_dataset(&settings)?;

            let date: NaiveDate = date
                .parse()
                .map_err(|_| CliError::args(format!("invalid date: '{}' (want YYYY-MM-DD)", date)))?;
            let kind = MovementKind::parse(&kind)
                .ok_or_else(|| CliError::args(format!("invalid kind: '{}'", kind)))?;
            let status = MovementStatus::parse(&status)
                .ok_or_else(|| CliError::args(format!("invalid status: '{}'", status)))?;
            if amount < 0.0 {
                return Err(CliError::args("amount must not be negative"));
            }

            let mut movement = CrmMovement::new(
                CustomerId::from(customer.as_str()),
                date,
                kind,
                status,
                amount,
                ChannelTag::from(channel.as_str()),
            );
            movement.sale_type = sale_type;
            movement.product = product;
            movement.payment_method = payment_method;
            movement.reference = reference;
            movement.notes = notes;

            let client = StoreClient::from_saved_auth().map_err(CliError::store)?;
            client.upsert_movement(&movement).map_err(CliError::store)?;

            let id = movement.id.clone();
            dataset.movements.push(movement);
            data.save_dataset(&settings, &dataset)?;

            println!("{}", id);
            Ok(())
        }
    }
}
