//! Grouped views: week buckets, per-channel tables, rankings, spend shares.

use std::collections::BTreeMap;

use serde::Serialize;

use roilens_core::{Channel, ProfitabilityBasis, WeeklyEntry};

use crate::aggregate::{aggregate, WeeklyTotals};
use crate::metrics::safe_number;

/// Composite week identity. Ordering is the derived tuple order
/// (year, month, week) — chronological by construction, with no dependence
/// on how the key happens to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WeekKey {
    pub year: i32,
    pub month: u32,
    pub week: u32,
}

impl WeekKey {
    /// Chart label, e.g. `M7 · S2`.
    pub fn label(&self) -> String {
        format!("M{} · S{}", self.month, self.week)
    }
}

/// One point of the weekly spend/revenue series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucket {
    #[serde(flatten)]
    pub key: WeekKey,
    pub label: String,
    pub spend: f64,
    pub revenue: f64,
}

/// Partition entries into week buckets, summing spend and revenue, in
/// chronological order.
pub fn group_weekly<'a, I>(entries: I) -> Vec<WeekBucket>
where
    I: IntoIterator<Item = &'a WeeklyEntry>,
{
    let mut buckets: BTreeMap<WeekKey, (f64, f64)> = BTreeMap::new();
    for e in entries {
        let key = WeekKey { year: e.year, month: e.month, week: e.week_of_month };
        let slot = buckets.entry(key).or_insert((0.0, 0.0));
        slot.0 += safe_number(e.spend);
        slot.1 += safe_number(e.revenue);
    }
    buckets
        .into_iter()
        .map(|(key, (spend, revenue))| WeekBucket { key, label: key.label(), spend, revenue })
        .collect()
}

/// One channel's slice of the period: totals plus both profitability numbers
/// and the policy pick between them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRow {
    pub channel: Channel,
    #[serde(flatten)]
    pub totals: WeeklyTotals,
    pub roas: f64,
    pub basis: ProfitabilityBasis,
    pub profitability: f64,
}

/// Partition entries by channel. Every enumerated channel gets a row, zero
/// filled when nothing matched, so the comparison set is stable for charts.
/// Rows with unrecognized channel text contribute to no enumerated row.
pub fn by_channel<'a, I>(entries: I) -> Vec<ChannelRow>
where
    I: IntoIterator<Item = &'a WeeklyEntry>,
{
    let mut per_channel: BTreeMap<Channel, Vec<&WeeklyEntry>> = BTreeMap::new();
    for e in entries {
        if let Some(c) = e.channel.known() {
            per_channel.entry(c).or_default().push(e);
        }
    }

    Channel::ALL
        .iter()
        .map(|&channel| {
            let rows = per_channel.remove(&channel).unwrap_or_default();
            let totals = aggregate(rows);
            let roas = if totals.spend > 0.0 {
                totals.revenue / totals.spend
            } else {
                0.0
            };
            let basis = channel.profitability_basis();
            let profitability = match basis {
                ProfitabilityBasis::Roas => roas,
                ProfitabilityBasis::Roi => totals.roi,
            };
            ChannelRow { channel, totals, roas, basis, profitability }
        })
        .collect()
}

/// Channel rows sorted by primary profitability, best first. Ties keep the
/// canonical channel order (the sort is stable).
pub fn rank_channels<'a, I>(entries: I) -> Vec<ChannelRow>
where
    I: IntoIterator<Item = &'a WeeklyEntry>,
{
    let mut rows = by_channel(entries);
    rows.sort_by(|a, b| b.profitability.total_cmp(&a.profitability));
    rows
}

/// One channel's share of total spend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendShare {
    pub channel: Channel,
    pub spend: f64,
    /// Percent of the period's total spend.
    pub share: f64,
}

/// Spend distribution across channels: zero-spend channels are omitted,
/// heaviest spender first. Empty when nothing was spent at all.
pub fn spend_distribution<'a, I>(entries: I) -> Vec<SpendShare>
where
    I: IntoIterator<Item = &'a WeeklyEntry>,
{
    let rows = by_channel(entries);
    let total: f64 = rows.iter().map(|r| r.totals.spend).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut shares: Vec<SpendShare> = rows
        .into_iter()
        .filter(|r| r.totals.spend > 0.0)
        .map(|r| SpendShare {
            channel: r.channel,
            spend: r.totals.spend,
            share: r.totals.spend / total * 100.0,
        })
        .collect();
    shares.sort_by(|a, b| b.spend.total_cmp(&a.spend));
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use roilens_core::ChannelTag;

    fn entry(year: i32, month: u32, week: u32, channel: &str, spend: f64, revenue: f64) -> WeeklyEntry {
        let mut e = WeeklyEntry::new(year, month, week, ChannelTag::from(channel));
        e.spend = spend;
        e.revenue = revenue;
        e
    }

    #[test]
    fn weekly_buckets_merge_rows_of_the_same_week() {
        let rows = vec![
            entry(2025, 7, 2, "WHATSAPP", 100.0, 300.0),
            entry(2025, 7, 2, "EMAIL-MKT", 50.0, 80.0),
            entry(2025, 7, 1, "WHATSAPP", 10.0, 20.0),
        ];
        let buckets = group_weekly(&rows);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].key, WeekKey { year: 2025, month: 7, week: 1 });
        assert_eq!(buckets[1].spend, 150.0);
        assert_eq!(buckets[1].revenue, 380.0);
        assert_eq!(buckets[1].label, "M7 · S2");
    }

    #[test]
    fn weekly_order_is_chronological_across_single_and_double_digit_months() {
        // String-keyed grouping would put month 10 before month 9.
        let rows = vec![
            entry(2025, 10, 1, "WHATSAPP", 1.0, 1.0),
            entry(2025, 9, 1, "WHATSAPP", 1.0, 1.0),
            entry(2024, 12, 5, "WHATSAPP", 1.0, 1.0),
        ];
        let keys: Vec<WeekKey> = group_weekly(&rows).into_iter().map(|b| b.key).collect();
        assert_eq!(
            keys,
            vec![
                WeekKey { year: 2024, month: 12, week: 5 },
                WeekKey { year: 2025, month: 9, week: 1 },
                WeekKey { year: 2025, month: 10, week: 1 },
            ]
        );
    }

    #[test]
    fn every_channel_is_present_even_for_empty_input() {
        let rows: Vec<WeeklyEntry> = vec![];
        let table = by_channel(&rows);
        assert_eq!(table.len(), Channel::ALL.len());
        assert!(table.iter().all(|r| r.totals == WeeklyTotals::default()));
    }

    #[test]
    fn unknown_channel_rows_join_no_bucket() {
        let rows = vec![entry(2025, 7, 1, "Telegram", 999.0, 999.0)];
        let table = by_channel(&rows);
        assert_eq!(table.len(), Channel::ALL.len());
        assert!(table.iter().all(|r| r.totals.spend == 0.0));
    }

    #[test]
    fn profitability_uses_roas_only_for_paid_social() {
        let rows = vec![
            entry(2025, 7, 1, "REDES SOCIALES (META ADS)", 1000.0, 3000.0),
            entry(2025, 7, 1, "WHATSAPP", 1000.0, 3000.0),
        ];
        let table = by_channel(&rows);
        let meta = table.iter().find(|r| r.channel == Channel::MetaAds).unwrap();
        let wa = table.iter().find(|r| r.channel == Channel::Whatsapp).unwrap();
        assert!((meta.profitability - 3.0).abs() < 1e-9); // ROAS
        assert!((wa.profitability - 200.0).abs() < 1e-9); // ROI %
    }

    #[test]
    fn ranking_sorts_best_first() {
        let rows = vec![
            entry(2025, 7, 1, "WHATSAPP", 1000.0, 1500.0), // ROI 50
            entry(2025, 7, 1, "EMAIL-MKT", 1000.0, 4000.0), // ROI 300
        ];
        let ranked = rank_channels(&rows);
        assert_eq!(ranked[0].channel, Channel::EmailMkt);
        assert_eq!(ranked[1].channel, Channel::Whatsapp);
    }

    #[test]
    fn spend_shares_skip_idle_channels_and_sum_to_100() {
        let rows = vec![
            entry(2025, 7, 1, "WHATSAPP", 750.0, 0.0),
            entry(2025, 7, 1, "EMAIL-MKT", 250.0, 0.0),
        ];
        let shares = spend_distribution(&rows);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].channel, Channel::Whatsapp);
        assert!((shares[0].share - 75.0).abs() < 1e-9);
        let total: f64 = shares.iter().map(|s| s.share).sum();
        assert!((total - 100.0).abs() < 1e-9);

        let nothing: Vec<WeeklyEntry> = vec![];
        assert!(spend_distribution(&nothing).is_empty());
    }
}
