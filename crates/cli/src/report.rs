//! `roilens report` — weekly-ledger views over the local dataset.

use clap::Subcommand;
use serde::Serialize;

use roilens_core::{ChannelFilter, Filter, MonthFilter, ProfitabilityBasis};
use roilens_engine::filter::in_scope;
use roilens_engine::{
    aggregate, by_channel, group_weekly, pct_change, previous_period, rank_channels,
    spend_distribution, month_name, WeeklyTotals,
};

use crate::util::{cell, print_json, ScopeArgs};
use crate::CliError;

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Period totals with previous-period comparison
    #[command(after_help = "\
The previous period is the prior month, or the prior year when --month all.

Examples:
  roilens report kpis --year 2025 --month 3
  roilens report kpis --month all --channel WHATSAPP
  roilens report kpis --json")]
    Kpis {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Week-by-week spend/revenue series
    #[command(after_help = "\
Examples:
  roilens report weekly --year 2025 --month 3
  roilens report weekly --json")]
    Weekly {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Per-channel table: totals, ROI/ROAS and primary profitability
    #[command(after_help = "\
Every enumerated channel appears, zero-filled when nothing matched.

Examples:
  roilens report channels --year 2025 --month 3
  roilens report channels --rank
  roilens report channels --distribution")]
    Channels {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Sort by primary profitability, best first
        #[arg(long)]
        rank: bool,

        /// Print each channel's share of total spend instead
        #[arg(long)]
        distribution: bool,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

pub fn cmd_report(cmd: ReportCommands) -> Result<(), CliError> {
    match cmd {
        ReportCommands::Kpis { scope, json } => cmd_kpis(scope, json),
        ReportCommands::Weekly { scope, json } => cmd_weekly(scope, json),
        ReportCommands::Channels { scope, rank, distribution, json } => {
            cmd_channels(scope, rank, distribution, json)
        }
    }
}

fn month_label(month: MonthFilter) -> String {
    match month {
        MonthFilter::All => "whole year".to_string(),
        MonthFilter::Month(m) => month_name(m),
    }
}

fn scope_label(filter: &Filter) -> String {
    let channel = match filter.channel {
        ChannelFilter::All => "all channels".to_string(),
        ChannelFilter::One(c) => c.as_str().to_string(),
    };
    format!("{} · {} · {}", filter.year, month_label(filter.month), channel)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KpiReport {
    year: i32,
    month: String,
    channel: String,
    previous_year: i32,
    previous_month: String,
    current: WeeklyTotals,
    previous: WeeklyTotals,
    change_pct: KpiChanges,
}

/// Percent change per metric, current vs. previous period.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KpiChanges {
    spend: f64,
    revenue: f64,
    leads: f64,
    new_customers: f64,
    number_of_sales: f64,
    roi: f64,
    cac: f64,
    avg_ticket: f64,
}

fn changes(current: &WeeklyTotals, previous: &WeeklyTotals) -> KpiChanges {
    KpiChanges {
        spend: pct_change(current.spend, previous.spend),
        revenue: pct_change(current.revenue, previous.revenue),
        leads: pct_change(current.leads, previous.leads),
        new_customers: pct_change(current.new_customers, previous.new_customers),
        number_of_sales: pct_change(current.number_of_sales, previous.number_of_sales),
        roi: pct_change(current.roi, previous.roi),
        cac: pct_change(current.cac, previous.cac),
        avg_ticket: pct_change(current.avg_ticket, previous.avg_ticket),
    }
}

fn cmd_kpis(scope: ScopeArgs, json: bool) -> Result<(), CliError> {
    let settings = scope.data.settings()?;
    let data = scope.data.load_dataset(&settings)?;
    let filter = scope.filter(&settings)?;

    let (prev_year, prev_month) = previous_period(filter.year, filter.month);
    let prev_filter = Filter { year: prev_year, month: prev_month, channel: filter.channel };

    let current = aggregate(in_scope(&data.entries, &filter));
    let previous = aggregate(in_scope(&data.entries, &prev_filter));
    let change_pct = changes(&current, &previous);

    if json {
        return print_json(&KpiReport {
            year: filter.year,
            month: filter.month.to_string(),
            channel: filter.channel.to_string(),
            previous_year: prev_year,
            previous_month: prev_month.to_string(),
            current,
            previous,
            change_pct,
        });
    }

    println!("{}", scope_label(&filter));
    println!("vs {} · {}", prev_year, month_label(prev_month));
    println!();
    println!("{:<18} {:>12} {:>12} {:>9}", "Metric", "Current", "Previous", "Change");
    let rows: [(&str, f64, f64, f64); 8] = [
        ("Spend", current.spend, previous.spend, change_pct.spend),
        ("Revenue", current.revenue, previous.revenue, change_pct.revenue),
        ("Leads", current.leads, previous.leads, change_pct.leads),
        ("New customers", current.new_customers, previous.new_customers, change_pct.new_customers),
        ("Sales", current.number_of_sales, previous.number_of_sales, change_pct.number_of_sales),
        ("ROI %", current.roi, previous.roi, change_pct.roi),
        ("CAC", current.cac, previous.cac, change_pct.cac),
        ("Avg ticket", current.avg_ticket, previous.avg_ticket, change_pct.avg_ticket),
    ];
    for (label, cur, prev, pct) in rows {
        println!("{:<18} {:>12} {:>12} {:>+8.1}%", label, cell(cur), cell(prev), pct);
    }
    Ok(())
}

fn cmd_weekly(scope: ScopeArgs, json: bool) -> Result<(), CliError> {
    let settings = scope.data.settings()?;
    let data = scope.data.load_dataset(&settings)?;
    let filter = scope.filter(&settings)?;

    let buckets = group_weekly(in_scope(&data.entries, &filter));

    if json {
        return print_json(&buckets);
    }

    println!("{}", scope_label(&filter));
    println!();
    println!("{:<10} {:>12} {:>12}", "Week", "Spend", "Revenue");
    for bucket in &buckets {
        println!("{:<10} {:>12} {:>12}", bucket.label, cell(bucket.spend), cell(bucket.revenue));
    }
    if buckets.is_empty() {
        eprintln!("no entries in scope");
    }
    Ok(())
}

fn cmd_channels(
    scope: ScopeArgs,
    rank: bool,
    distribution: bool,
    json: bool,
) -> Result<(), CliError> {
    let settings = scope.data.settings()?;
    let data = scope.data.load_dataset(&settings)?;
    let filter = scope.filter(&settings)?;
    let entries = in_scope(&data.entries, &filter);

    if distribution {
        let shares = spend_distribution(entries);
        if json {
            return print_json(&shares);
        }
        println!("{}", scope_label(&filter));
        println!();
        println!("{:<50} {:>12} {:>8}", "Channel", "Spend", "Share");
        for share in &shares {
            println!(
                "{:<50} {:>12} {:>7.1}%",
                share.channel.as_str(),
                cell(share.spend),
                share.share
            );
        }
        if shares.is_empty() {
            eprintln!("no spend in scope");
        }
        return Ok(());
    }

    let rows = if rank { rank_channels(entries) } else { by_channel(entries) };

    if json {
        return print_json(&rows);
    }

    println!("{}", scope_label(&filter));
    println!();
    println!(
        "{:<50} {:>10} {:>10} {:>9} {:>7} {:>14}",
        "Channel", "Spend", "Revenue", "ROI %", "ROAS", "Profitability"
    );
    for row in &rows {
        let basis = match row.basis {
            ProfitabilityBasis::Roas => "ROAS",
            ProfitabilityBasis::Roi => "ROI",
        };
        println!(
            "{:<50} {:>10} {:>10} {:>9} {:>7} {:>8} ({})",
            row.channel.as_str(),
            cell(row.totals.spend),
            cell(row.totals.revenue),
            cell(row.totals.roi),
            cell(row.roas),
            cell(row.profitability),
            basis,
        );
    }
    Ok(())
}
