//! `roilens crm` — reports over the transactional CRM ledger.

use clap::Subcommand;

use roilens_core::CustomerId;
use roilens_recon::{crm_by_channel, crm_series, crm_totals, customer_summary, CrmTotals};

use crate::util::{cell, print_json, DataArgs, ScopeArgs};
use crate::CliError;

#[derive(Subcommand)]
pub enum CrmCommands {
    /// Period totals: gross, refunds, net, sales, new customers, ticket
    #[command(after_help = "\
Only confirmed movements count. New-customer credit goes to the period of
each customer's earliest confirmed sale, never a repeat purchase.

Examples:
  roilens crm summary --year 2025 --month 3
  roilens crm summary --month all --json")]
    Summary {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Per-channel table over the period, zero-filled
    Channels {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Time series: daily buckets for a month, monthly buckets for --month all
    Series {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Lifetime summary for one customer
    #[command(after_help = "\
Examples:
  roilens crm customer cliente-42
  roilens crm customer cliente-42 --json")]
    Customer {
        /// Customer id as the CRM stores it
        id: String,

        #[command(flatten)]
        data: DataArgs,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

pub fn cmd_crm(cmd: CrmCommands) -> Result<(), CliError> {
    match cmd {
        CrmCommands::Summary { scope, json } => cmd_summary(scope, json),
        CrmCommands::Channels { scope, json } => cmd_channels(scope, json),
        CrmCommands::Series { scope, json } => cmd_series(scope, json),
        CrmCommands::Customer { id, data, json } => cmd_customer(id, data, json),
    }
}

fn print_totals(totals: &CrmTotals) {
    println!("Gross revenue   {:>12}", cell(totals.revenue_gross));
    println!("Refunds         {:>12}", cell(totals.refunds));
    println!("Net revenue     {:>12}", cell(totals.revenue_net));
    println!("Sales           {:>12}", totals.number_of_sales);
    println!("New customers   {:>12}", totals.new_customers);
    println!("Avg ticket      {:>12}", cell(totals.avg_ticket));
}

fn cmd_summary(scope: ScopeArgs, json: bool) -> Result<(), CliError> {
    let settings = scope.data.settings()?;
    let data = scope.data.load_dataset(&settings)?;
    let filter = scope.filter(&settings)?;

    let totals = crm_totals(&data.movements, &filter);

    if json {
        return print_json(&totals);
    }
    print_totals(&totals);
    Ok(())
}

fn cmd_channels(scope: ScopeArgs, json: bool) -> Result<(), CliError> {
    let settings = scope.data.settings()?;
    let data = scope.data.load_dataset(&settings)?;
    let filter = scope.filter(&settings)?;

    let rows = crm_by_channel(&data.movements, &filter);

    if json {
        return print_json(&rows);
    }

    println!(
        "{:<50} {:>10} {:>9} {:>10} {:>6} {:>5} {:>10}",
        "Channel", "Gross", "Refunds", "Net", "Sales", "New", "Ticket"
    );
    for row in &rows {
        println!(
            "{:<50} {:>10} {:>9} {:>10} {:>6} {:>5} {:>10}",
            row.channel.as_str(),
            cell(row.totals.revenue_gross),
            cell(row.totals.refunds),
            cell(row.totals.revenue_net),
            row.totals.number_of_sales,
            row.totals.new_customers,
            cell(row.totals.avg_ticket),
        );
    }
    Ok(())
}

fn cmd_series(scope: ScopeArgs, json: bool) -> Result<(), CliError> {
    let settings = scope.data.settings()?;
    let data = scope.data.load_dataset(&settings)?;
    let filter = scope.filter(&settings)?;

    let buckets = crm_series(&data.movements, &filter);

    if json {
        return print_json(&buckets);
    }

    println!("{:<12} {:>10} {:>9} {:>10} {:>6} {:>5}", "Bucket", "Gross", "Refunds", "Net", "Sales", "New");
    for bucket in &buckets {
        println!(
            "{:<12} {:>10} {:>9} {:>10} {:>6} {:>5}",
            bucket.label,
            cell(bucket.totals.revenue_gross),
            cell(bucket.totals.refunds),
            cell(bucket.totals.revenue_net),
            bucket.totals.number_of_sales,
            bucket.totals.new_customers,
        );
    }
    Ok(())
}

fn cmd_customer(id: String, data_args: DataArgs, json: bool) -> Result<(), CliError> {
    let settings = data_args.settings()?;
    let data = data_args.load_dataset(&settings)?;

    let summary = customer_summary(&data.movements, &CustomerId::from(id.as_str()));

    if json {
        return print_json(&summary);
    }

    println!("Customer        {}", summary.customer);
    println!("Gross revenue   {:>12}", cell(summary.revenue_gross));
    println!("Refunds         {:>12}", cell(summary.refunds));
    println!("Net revenue     {:>12}", cell(summary.revenue_net));
    println!("Sales           {:>12}", summary.number_of_sales);
    println!("Avg ticket      {:>12}", cell(summary.avg_ticket));
    match (summary.first_sale, summary.last_sale) {
        (Some(first), Some(last)) => {
            println!("First sale      {:>12}", first);
            println!("Last sale       {:>12}", last);
        }
        _ => eprintln!("no confirmed sales for this customer"),
    }
    Ok(())
}
