//! `roilens compare` — month-vs-month deltas with a narrative line.

use roilens_engine::{compare_months, month_name};

use crate::util::{cell, current_year, print_json, DataArgs};
use crate::CliError;

pub fn cmd_compare(
    data_args: DataArgs,
    year: Option<i32>,
    month1: u32,
    month2: u32,
    json: bool,
) -> Result<(), CliError> {
    if !(1..=12).contains(&month1) || !(1..=12).contains(&month2) {
        return Err(CliError::args(format!(
            "months must be between 1 and 12, got {} and {}",
            month1, month2
        )));
    }

    let settings = data_args.settings()?;
    let data = data_args.load_dataset(&settings)?;
    let year = year.or(settings.default_year).unwrap_or_else(current_year);

    let comparison = compare_months(&data.entries, year, month1, month2);

    if json {
        return print_json(&comparison);
    }

    println!("{} vs {} ({})", month_name(month1), month_name(month2), year);
    println!();
    println!(
        "{:<16} {:>12} {:>12} {:>12} {:>9}",
        "Metric",
        month_name(month1),
        month_name(month2),
        "Diff",
        "Change"
    );
    for row in &comparison.rows {
        println!(
            "{:<16} {:>12} {:>12} {:>12} {:>+8.1}%",
            row.label,
            cell(row.period1),
            cell(row.period2),
            cell(row.diff),
            row.pct_change,
        );
    }
    println!();
    println!("{}", comparison.narrative);
    Ok(())
}
