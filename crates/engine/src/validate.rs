//! Weekly-entry validation.
//!
//! Returns a field → message map; an empty map means the record is clean.
//! Validation gates persistence from editing commands and import commit, but
//! never hides a record: already-stored invalid rows stay visible and
//! editable so they can be fixed.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use roilens_core::WeeklyEntry;

use crate::metrics::{safe_number, safe_opt};

/// Field name (wire spelling) → error message. BTreeMap so display order is
/// deterministic.
pub type FieldErrors = BTreeMap<&'static str, String>;

pub fn validate_entry(entry: &WeeklyEntry) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if entry.year < 2000 {
        errors.insert("year", "Year must be 2000 or later.".to_string());
    }
    if !(1..=12).contains(&entry.month) {
        errors.insert("month", "Month must be between 1 and 12.".to_string());
    }
    if !(1..=5).contains(&entry.week_of_month) {
        errors.insert("weekOfMonth", "Week must be between 1 and 5.".to_string());
    }
    if entry.channel.known().is_none() {
        errors.insert("channel", "Channel must be one of the listed channels.".to_string());
    }

    if safe_number(entry.spend) < 0.0 {
        errors.insert("spend", "Spend cannot be negative.".to_string());
    }
    if safe_number(entry.revenue) < 0.0 {
        errors.insert("revenue", "Revenue cannot be negative.".to_string());
    }
    if safe_opt(entry.leads) < 0.0 {
        errors.insert("leads", "Leads cannot be negative.".to_string());
    }
    if safe_number(entry.new_customers) < 0.0 {
        errors.insert("newCustomers", "New customers cannot be negative.".to_string());
    }
    if safe_number(entry.number_of_sales) < 0.0 {
        errors.insert("numberOfSales", "Number of sales cannot be negative.".to_string());
    }

    let start = parse_optional_date(&entry.week_start);
    let end = parse_optional_date(&entry.week_end);
    if let Some(Err(())) = start {
        errors.insert("weekStartDate", "Invalid start date.".to_string());
    }
    if let Some(Err(())) = end {
        errors.insert("weekEndDate", "Invalid end date.".to_string());
    }
    if let (Some(Ok(start)), Some(Ok(end))) = (start, end) {
        if start > end {
            errors.insert(
                "weekEndDate",
                "End date must be on or after the start date.".to_string(),
            );
        }
    }

    errors
}

pub fn is_valid(entry: &WeeklyEntry) -> bool {
    validate_entry(entry).is_empty()
}

/// None for blank, Some(Ok) for a parseable ISO date, Some(Err) otherwise.
fn parse_optional_date(raw: &str) -> Option<Result<NaiveDate, ()>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use roilens_core::ChannelTag;

    fn clean_entry() -> WeeklyEntry {
        let mut e = WeeklyEntry::new(2025, 3, 2, ChannelTag::from("WHATSAPP"));
        e.week_start = "2025-03-10".to_string();
        e.week_end = "2025-03-16".to_string();
        e.spend = 100.0;
        e.revenue = 250.0;
        e
    }

    #[test]
    fn clean_record_has_no_errors() {
        assert!(validate_entry(&clean_entry()).is_empty());
        assert!(is_valid(&clean_entry()));
    }

    #[test]
    fn range_rules() {
        let mut e = clean_entry();
        e.year = 1999;
        e.month = 0;
        e.week_of_month = 6;
        let errors = validate_entry(&e);
        assert!(errors.contains_key("year"));
        assert!(errors.contains_key("month"));
        assert!(errors.contains_key("weekOfMonth"));
    }

    #[test]
    fn unknown_channel_is_flagged() {
        let mut e = clean_entry();
        e.channel = ChannelTag::from("Telegram");
        assert!(validate_entry(&e).contains_key("channel"));
    }

    #[test]
    fn negative_numbers_are_flagged_per_field() {
        let mut e = clean_entry();
        e.spend = -1.0;
        e.leads = Some(-3.0);
        let errors = validate_entry(&e);
        assert!(errors.contains_key("spend"));
        assert!(errors.contains_key("leads"));
        assert!(!errors.contains_key("revenue"));
    }

    #[test]
    fn blank_dates_are_fine_bad_dates_are_not() {
        let mut e = clean_entry();
        e.week_start = String::new();
        e.week_end = String::new();
        assert!(validate_entry(&e).is_empty());

        e.week_start = "not-a-date".to_string();
        assert!(validate_entry(&e).contains_key("weekStartDate"));
    }

    #[test]
    fn end_before_start_is_flagged_on_the_end_field() {
        let mut e = clean_entry();
        e.week_start = "2025-03-16".to_string();
        e.week_end = "2025-03-10".to_string();
        let errors = validate_entry(&e);
        assert!(errors.contains_key("weekEndDate"));

        // Equal dates are allowed.
        e.week_end = "2025-03-16".to_string();
        assert!(validate_entry(&e).is_empty());
    }

    #[test]
    fn nan_fields_do_not_trip_the_negative_check() {
        let mut e = clean_entry();
        e.spend = f64::NAN;
        assert!(validate_entry(&e).is_empty());
    }
}
