//! CRM movement reconciliation.
//!
//! Turns the transactional ledger (per-customer sales and refunds) into the
//! same family of aggregates the weekly entries produce, so the two
//! independently-maintained sources can be compared side by side. Only
//! active, confirmed movements count. New-customer credit goes to the period
//! and channel of each customer's globally-earliest sale, never to a repeat
//! purchase that happens to fall inside the queried range.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use roilens_core::{
    Channel, ChannelFilter, CrmMovement, CustomerId, Filter, MonthFilter, MovementKind,
    MovementStatus,
};
use roilens_engine::metrics::safe_number;
use roilens_engine::period::{month_name, period_range};

/// CRM-side analog of the weekly totals. Ticket average uses gross revenue,
/// not net: a refund shrinks what was kept, not what was sold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmTotals {
    pub revenue_gross: f64,
    pub refunds: f64,
    pub revenue_net: f64,
    pub number_of_sales: usize,
    pub new_customers: usize,
    pub avg_ticket: f64,
}

/// Confirmed movements split once per reconciliation run.
///
/// The first-sale map is computed over the entire sales set, never a
/// filtered subset; filtering first would let a later purchase inside the
/// queried period masquerade as acquisition.
pub struct Prepared<'a> {
    sales: Vec<&'a CrmMovement>,
    refunds: Vec<&'a CrmMovement>,
    first_sale: HashMap<&'a CustomerId, &'a CrmMovement>,
}

pub fn prepare(movements: &[CrmMovement]) -> Prepared<'_> {
    let mut sales = Vec::new();
    let mut refunds = Vec::new();
    for movement in movements {
        if !movement.is_active() || movement.status != MovementStatus::Confirmed {
            continue;
        }
        match movement.kind {
            MovementKind::Sale => sales.push(movement),
            MovementKind::Refund => refunds.push(movement),
        }
    }

    let mut first_sale: HashMap<&CustomerId, &CrmMovement> = HashMap::new();
    for &sale in &sales {
        first_sale
            .entry(&sale.customer_id)
            .and_modify(|earliest| {
                if sale.chronology() < earliest.chronology() {
                    *earliest = sale;
                }
            })
            .or_insert(sale);
    }

    Prepared { sales, refunds, first_sale }
}

fn in_range(movement: &CrmMovement, start: NaiveDate, end: NaiveDate) -> bool {
    movement.date >= start && movement.date <= end
}

fn channel_matches(movement: &CrmMovement, channel: ChannelFilter) -> bool {
    match channel {
        ChannelFilter::All => true,
        ChannelFilter::One(c) => movement.channel.known() == Some(c),
    }
}

/// Totals for one date span and channel scope over a prepared split.
pub fn totals_between(
    prep: &Prepared<'_>,
    channel: ChannelFilter,
    start: NaiveDate,
    end: NaiveDate,
) -> CrmTotals {
    let mut totals = CrmTotals::default();

    for sale in &prep.sales {
        if in_range(sale, start, end) && channel_matches(sale, channel) {
            totals.revenue_gross += safe_number(sale.amount);
            totals.number_of_sales += 1;
        }
    }
    for refund in &prep.refunds {
        if in_range(refund, start, end) && channel_matches(refund, channel) {
            totals.refunds += safe_number(refund.amount);
        }
    }

    totals.revenue_net = totals.revenue_gross - totals.refunds;
    totals.new_customers = prep
        .first_sale
        .values()
        .filter(|first| in_range(first, start, end) && channel_matches(first, channel))
        .count();
    totals.avg_ticket = if totals.number_of_sales > 0 {
        totals.revenue_gross / totals.number_of_sales as f64
    } else {
        0.0
    };
    totals
}

/// Period totals for the filter's (year, month, channel) selection.
pub fn crm_totals(movements: &[CrmMovement], filter: &Filter) -> CrmTotals {
    let prep = prepare(movements);
    let (start, end) = period_range(filter.year, filter.month);
    totals_between(&prep, filter.channel, start, end)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmChannelRow {
    pub channel: Channel,
    #[serde(flatten)]
    pub totals: CrmTotals,
}

/// One row per enumerated channel over the filter's period, zero-filled.
/// The filter's channel selection does not narrow this table; the complete
/// set keeps the rows comparable across periods.
pub fn crm_by_channel(movements: &[CrmMovement], filter: &Filter) -> Vec<CrmChannelRow> {
    let prep = prepare(movements);
    let (start, end) = period_range(filter.year, filter.month);
    Channel::ALL
        .iter()
        .map(|&channel| CrmChannelRow {
            channel,
            totals: totals_between(&prep, ChannelFilter::One(channel), start, end),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmBucket {
    pub year: i32,
    pub month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    pub label: String,
    #[serde(flatten)]
    pub totals: CrmTotals,
}

/// Time series over the filter's period: one bucket per calendar day when a
/// month is selected, one per month when the whole year is. Every bucket is
/// present even when empty, and the channel filter applies to each.
pub fn crm_series(movements: &[CrmMovement], filter: &Filter) -> Vec<CrmBucket> {
    let prep = prepare(movements);
    match filter.month {
        MonthFilter::Month(month) => {
            let (start, end) = period_range(filter.year, filter.month);
            start
                .iter_days()
                .take_while(|day| *day <= end)
                .map(|day| CrmBucket {
                    year: filter.year,
                    month,
                    day: Some(day.day()),
                    label: day.format("%Y-%m-%d").to_string(),
                    totals: totals_between(&prep, filter.channel, day, day),
                })
                .collect()
        }
        MonthFilter::All => (1..=12)
            .map(|month| {
                let (start, end) = period_range(filter.year, MonthFilter::Month(month));
                CrmBucket {
                    year: filter.year,
                    month,
                    day: None,
                    label: month_name(month),
                    totals: totals_between(&prep, filter.channel, start, end),
                }
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub customer: CustomerId,
    pub revenue_gross: f64,
    pub refunds: f64,
    pub revenue_net: f64,
    pub number_of_sales: usize,
    pub avg_ticket: f64,
    pub first_sale: Option<NaiveDate>,
    pub last_sale: Option<NaiveDate>,
}

/// Lifetime view of one customer over their active, confirmed movements.
/// First and last sale use the same (date, created_at) chronology as
/// new-customer attribution.
pub fn customer_summary(movements: &[CrmMovement], customer: &CustomerId) -> CustomerSummary {
    let mut revenue_gross = 0.0;
    let mut refunds = 0.0;
    let mut number_of_sales = 0usize;
    let mut first: Option<&CrmMovement> = None;
    let mut last: Option<&CrmMovement> = None;

    for movement in movements {
        if &movement.customer_id != customer
            || !movement.is_active()
            || movement.status != MovementStatus::Confirmed
        {
            continue;
        }
        match movement.kind {
            MovementKind::Sale => {
                revenue_gross += safe_number(movement.amount);
                number_of_sales += 1;
                if first.map_or(true, |f| movement.chronology() < f.chronology()) {
                    first = Some(movement);
                }
                if last.map_or(true, |l| movement.chronology() >= l.chronology()) {
                    last = Some(movement);
                }
            }
            MovementKind::Refund => refunds += safe_number(movement.amount),
        }
    }

    let avg_ticket = if number_of_sales > 0 {
        revenue_gross / number_of_sales as f64
    } else {
        0.0
    };

    CustomerSummary {
        customer: customer.clone(),
        revenue_gross,
        refunds,
        revenue_net: revenue_gross - refunds,
        number_of_sales,
        avg_ticket,
        first_sale: first.map(|m| m.date),
        last_sale: last.map(|m| m.date),
    }
}
