//! Period math: the comparable previous period and calendar date spans.

use chrono::NaiveDate;

use roilens_core::MonthFilter;

/// The comparable prior period for a (year, month|all) selection.
///
/// Whole-year views compare year-over-year; a month compares to the month
/// before it, wrapping January back to the previous December. Pure integer
/// lookup — no calendar arithmetic, so no timezone or leap-year concerns.
pub fn previous_period(year: i32, month: MonthFilter) -> (i32, MonthFilter) {
    match month {
        MonthFilter::All => (year - 1, MonthFilter::All),
        MonthFilter::Month(m) if m > 1 => (year, MonthFilter::Month(m - 1)),
        MonthFilter::Month(_) => (year - 1, MonthFilter::Month(12)),
    }
}

/// Inclusive calendar span for a (year, month|all) selection: the full year,
/// or the month's first through last day (leap years included). Degenerate
/// input falls back to the full-year span rather than failing.
pub fn period_range(year: i32, month: MonthFilter) -> (NaiveDate, NaiveDate) {
    let year_start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
    match month {
        MonthFilter::All => (year_start, year_end),
        MonthFilter::Month(m) => {
            let first = NaiveDate::from_ymd_opt(year, m, 1);
            let last = last_day_of_month(year, m);
            match (first, last) {
                (Some(first), Some(last)) => (first, last),
                _ => (year_start, year_end),
            }
        }
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    // 31 down to 28 covers every month, February in leap years included.
    (28..=31)
        .rev()
        .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
}

/// English month name for display; out-of-range input prints as the number.
pub fn month_name(month: u32) -> String {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        other => return format!("Month {}", other),
    }
    .to_string()
}
