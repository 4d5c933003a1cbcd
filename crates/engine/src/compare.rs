//! Month-vs-month comparison.
//!
//! Both sides are aggregated with the same fold as every other view, over
//! active entries of (year, month) — the channel filter deliberately does not
//! apply, a comparison is always across the whole portfolio. The difference
//! direction is fixed: first month minus second month, never reversed to
//! "taste better".

use serde::Serialize;

use roilens_core::WeeklyEntry;

use crate::aggregate::{aggregate, WeeklyTotals};
use crate::metrics::pct_change;
use crate::period::month_name;

/// The fixed comparison metric list, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CompareMetric {
    NewCustomers,
    Revenue,
    Spend,
    Cac,
    Roi,
}

impl CompareMetric {
    pub const ALL: [CompareMetric; 5] = [
        CompareMetric::NewCustomers,
        CompareMetric::Revenue,
        CompareMetric::Spend,
        CompareMetric::Cac,
        CompareMetric::Roi,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CompareMetric::NewCustomers => "New customers",
            CompareMetric::Revenue => "Revenue",
            CompareMetric::Spend => "Spend",
            CompareMetric::Cac => "CAC",
            CompareMetric::Roi => "ROI",
        }
    }

    fn pick(self, totals: &WeeklyTotals) -> f64 {
        match self {
            CompareMetric::NewCustomers => totals.new_customers,
            CompareMetric::Revenue => totals.revenue,
            CompareMetric::Spend => totals.spend,
            CompareMetric::Cac => totals.cac,
            CompareMetric::Roi => totals.roi,
        }
    }
}

/// One metric's two values and deltas. `diff` is `period1 - period2`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDelta {
    pub metric: CompareMetric,
    pub label: &'static str,
    pub period1: f64,
    pub period2: f64,
    pub diff: f64,
    pub pct_change: f64,
}

/// The full month-vs-month comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthComparison {
    pub year: i32,
    pub month1: u32,
    pub month2: u32,
    pub totals1: WeeklyTotals,
    pub totals2: WeeklyTotals,
    pub rows: Vec<MetricDelta>,
    /// One plain-language sentence about the new-customer delta.
    pub narrative: String,
}

/// Compare two months of the same year over the active entries.
pub fn compare_months(
    entries: &[WeeklyEntry],
    year: i32,
    month1: u32,
    month2: u32,
) -> MonthComparison {
    let side = |month: u32| {
        aggregate(
            entries
                .iter()
                .filter(|e| e.is_active() && e.year == year && e.month == month),
        )
    };
    let totals1 = side(month1);
    let totals2 = side(month2);

    let rows = CompareMetric::ALL
        .iter()
        .map(|&metric| {
            let period1 = metric.pick(&totals1);
            let period2 = metric.pick(&totals2);
            MetricDelta {
                metric,
                label: metric.label(),
                period1,
                period2,
                diff: period1 - period2,
                pct_change: pct_change(period1, period2),
            }
        })
        .collect();

    let narrative = customer_narrative(
        &month_name(month1),
        &month_name(month2),
        pct_change(totals1.new_customers, totals2.new_customers),
    );

    MonthComparison { year, month1, month2, totals1, totals2, rows, narrative }
}

/// Below a 0.1% absolute difference the months read as equal; otherwise say
/// which month won and by how much, to one decimal.
fn customer_narrative(month1: &str, month2: &str, delta_pct: f64) -> String {
    let abs = delta_pct.abs();
    if abs < 0.1 {
        return format!(
            "{} and {} were practically equal in new customers.",
            month1, month2
        );
    }
    let direction = if delta_pct > 0.0 { "more" } else { "fewer" };
    format!(
        "{} had {:.1}% {} new customers than {}.",
        month1, abs, direction, month2
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use roilens_core::{ChannelTag, Lifecycle};
    use chrono::Utc;

    fn entry(month: u32, spend: f64, revenue: f64, customers: f64) -> WeeklyEntry {
        let mut e = WeeklyEntry::new(2025, month, 1, ChannelTag::from("WHATSAPP"));
        e.spend = spend;
        e.revenue = revenue;
        e.new_customers = customers;
        e
    }

    #[test]
    fn diff_direction_is_month1_minus_month2() {
        let rows = vec![entry(7, 1000.0, 1500.0, 10.0), entry(8, 400.0, 900.0, 4.0)];
        let cmp = compare_months(&rows, 2025, 7, 8);

        let revenue = cmp
            .rows
            .iter()
            .find(|r| r.metric == CompareMetric::Revenue)
            .unwrap();
        assert_eq!(revenue.period1, 1500.0);
        assert_eq!(revenue.period2, 900.0);
        assert!((revenue.diff - 600.0).abs() < 1e-9);

        // Swapping the months flips the sign.
        let swapped = compare_months(&rows, 2025, 8, 7);
        let revenue = swapped
            .rows
            .iter()
            .find(|r| r.metric == CompareMetric::Revenue)
            .unwrap();
        assert!((revenue.diff + 600.0).abs() < 1e-9);
    }

    #[test]
    fn metric_list_and_order_are_fixed() {
        let cmp = compare_months(&[], 2025, 7, 8);
        let labels: Vec<&str> = cmp.rows.iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            vec!["New customers", "Revenue", "Spend", "CAC", "ROI"]
        );
    }

    #[test]
    fn narrative_names_the_winning_month() {
        let rows = vec![entry(7, 0.0, 0.0, 10.0), entry(8, 0.0, 0.0, 8.0)];
        let cmp = compare_months(&rows, 2025, 7, 8);
        assert_eq!(cmp.narrative, "July had 25.0% more new customers than August.");

        let cmp = compare_months(&rows, 2025, 8, 7);
        assert_eq!(cmp.narrative, "August had 20.0% fewer new customers than July.");
    }

    #[test]
    fn near_identical_months_read_as_equal() {
        let rows = vec![entry(7, 0.0, 0.0, 10.0), entry(8, 0.0, 0.0, 10.0)];
        let cmp = compare_months(&rows, 2025, 7, 8);
        assert_eq!(
            cmp.narrative,
            "July and August were practically equal in new customers."
        );
    }

    #[test]
    fn trashed_rows_are_excluded_from_both_sides() {
        let mut trashed = entry(7, 9999.0, 9999.0, 99.0);
        trashed.lifecycle = Lifecycle::Trashed { at: Utc::now() };
        let rows = vec![trashed, entry(7, 100.0, 200.0, 1.0)];
        let cmp = compare_months(&rows, 2025, 7, 8);
        assert_eq!(cmp.totals1.spend, 100.0);
    }
}
