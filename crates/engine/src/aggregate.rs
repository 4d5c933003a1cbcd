//! Portfolio-level aggregation.
//!
//! Additive fields are summed, then the ratio metrics are derived from the
//! totals. Ratio-of-sums, never mean-of-ratios: averaging per-row ROIs would
//! let a tiny $10 week swing the portfolio number as hard as a $10,000 week.

use serde::Serialize;

use roilens_core::WeeklyEntry;

use crate::metrics::{safe_number, safe_opt};

/// Totals plus totals-derived ratios for a set of weekly entries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTotals {
    pub spend: f64,
    pub revenue: f64,
    pub leads: f64,
    pub new_customers: f64,
    pub number_of_sales: f64,
    pub roi: f64,
    pub cac: f64,
    pub avg_ticket: f64,
}

/// Fold a record set into totals. Callers pass records already scoped to the
/// view they want; empty input yields the all-zero aggregate.
pub fn aggregate<'a, I>(entries: I) -> WeeklyTotals
where
    I: IntoIterator<Item = &'a WeeklyEntry>,
{
    let mut t = WeeklyTotals::default();
    for e in entries {
        t.spend += safe_number(e.spend);
        t.revenue += safe_number(e.revenue);
        t.leads += safe_opt(e.leads);
        t.new_customers += safe_number(e.new_customers);
        t.number_of_sales += safe_number(e.number_of_sales);
    }
    t.roi = if t.spend > 0.0 {
        (t.revenue - t.spend) / t.spend * 100.0
    } else {
        0.0
    };
    t.cac = if t.new_customers > 0.0 {
        t.spend / t.new_customers
    } else {
        0.0
    };
    t.avg_ticket = if t.number_of_sales > 0.0 {
        t.revenue / t.number_of_sales
    } else {
        0.0
    };
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use roilens_core::ChannelTag;

    fn entry(spend: f64, revenue: f64, new_customers: f64, sales: f64, leads: f64) -> WeeklyEntry {
        let mut e = WeeklyEntry::new(2025, 7, 1, ChannelTag::from("WHATSAPP"));
        e.spend = spend;
        e.revenue = revenue;
        e.new_customers = new_customers;
        e.number_of_sales = sales;
        e.leads = Some(leads);
        e
    }

    #[test]
    fn empty_input_is_all_zero() {
        let rows: Vec<WeeklyEntry> = vec![];
        let t = aggregate(&rows);
        assert_eq!(t, WeeklyTotals::default());
    }

    #[test]
    fn ratios_come_from_totals_not_row_averages() {
        // Row ROIs are 50% and -20%; the mean would be 15%, the portfolio
        // number must be 26.67%.
        let rows = vec![
            entry(1000.0, 1500.0, 5.0, 10.0, 50.0),
            entry(500.0, 400.0, 2.0, 4.0, 20.0),
        ];
        let t = aggregate(&rows);
        assert_eq!(t.spend, 1500.0);
        assert_eq!(t.revenue, 1900.0);
        assert!((t.roi - 26.666_666).abs() < 1e-3);
        assert!((t.cac - 214.285_714).abs() < 1e-3);
        assert!((t.avg_ticket - 135.714_285).abs() < 1e-3);
    }

    #[test]
    fn blank_leads_count_as_zero() {
        let mut a = entry(100.0, 0.0, 0.0, 0.0, 0.0);
        a.leads = None;
        let b = entry(100.0, 0.0, 0.0, 0.0, 30.0);
        let t = aggregate([&a, &b]);
        assert_eq!(t.leads, 30.0);
    }

    proptest! {
        // Splitting a record set anywhere and summing the parts' additive
        // totals matches aggregating the whole set.
        #[test]
        fn additive_fields_are_associative(
            values in proptest::collection::vec((0.0f64..1e6, 0.0f64..1e6, 0.0f64..1e3), 0..20),
            split in 0usize..20,
        ) {
            let rows: Vec<WeeklyEntry> = values
                .iter()
                .map(|&(s, r, n)| entry(s, r, n, n, n))
                .collect();
            let cut = split.min(rows.len());
            let whole = aggregate(&rows);
            let left = aggregate(&rows[..cut]);
            let right = aggregate(&rows[cut..]);

            prop_assert!((whole.spend - (left.spend + right.spend)).abs() < 1e-6);
            prop_assert!((whole.revenue - (left.revenue + right.revenue)).abs() < 1e-6);
            prop_assert!((whole.leads - (left.leads + right.leads)).abs() < 1e-6);
            prop_assert!(
                (whole.new_customers - (left.new_customers + right.new_customers)).abs() < 1e-6
            );
            prop_assert!(
                (whole.number_of_sales - (left.number_of_sales + right.number_of_sales)).abs()
                    < 1e-6
            );
        }
    }
}
