//! Per-record derived metrics.
//!
//! Every formula here is guarded so the worst case for bad input is a zero,
//! never a fault: zero spend yields ROI/ROAS of 0, zero customers yields a
//! CAC of 0, and non-finite inputs are coerced to 0 before any arithmetic.
//! This is display safety, not validation — the validator flags bad rows
//! separately and nothing here blocks them from being shown.

use serde::Serialize;

use roilens_core::{ProfitabilityBasis, WeeklyEntry};

/// Coerce a raw numeric field for display math: non-finite becomes 0.
pub fn safe_number(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Optional fields (blank leads) aggregate as zero.
pub fn safe_opt(n: Option<f64>) -> f64 {
    n.map(safe_number).unwrap_or(0.0)
}

/// Percentage change from `previous` to `current`. A zero baseline reports
/// 0% when nothing changed and 100% when something appeared from nothing.
pub fn pct_change(current: f64, previous: f64) -> f64 {
    let current = safe_number(current);
    let previous = safe_number(previous);
    if previous == 0.0 {
        if current == 0.0 {
            0.0
        } else {
            100.0
        }
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Derived metrics for one weekly entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetrics {
    /// (revenue - spend) / spend, as a percentage.
    pub roi: f64,
    /// revenue / spend, a unitless multiplier.
    pub roas: f64,
    /// spend / new customers.
    pub cac: f64,
    /// revenue / number of sales.
    pub avg_ticket: f64,
    /// new customers / leads, as a percentage.
    pub conversion_rate: f64,
    /// Which convention `primary_profitability` follows for this channel.
    pub basis: ProfitabilityBasis,
    /// ROAS for the paid-social channel, ROI for everything else. The one
    /// number rankings, bars and tables all show — the same switch must be
    /// used everywhere.
    pub primary_profitability: f64,
}

/// Compute the derived metrics for a single entry. Total over any input;
/// malformed numbers degrade to zero.
pub fn entry_metrics(entry: &WeeklyEntry) -> RecordMetrics {
    let spend = safe_number(entry.spend);
    let revenue = safe_number(entry.revenue);
    let leads = safe_opt(entry.leads);
    let new_customers = safe_number(entry.new_customers);
    let number_of_sales = safe_number(entry.number_of_sales);

    let roi = if spend > 0.0 {
        (revenue - spend) / spend * 100.0
    } else {
        0.0
    };
    let roas = if spend > 0.0 { revenue / spend } else { 0.0 };
    let cac = if new_customers > 0.0 {
        spend / new_customers
    } else {
        0.0
    };
    let avg_ticket = if number_of_sales > 0.0 {
        revenue / number_of_sales
    } else {
        0.0
    };
    let conversion_rate = if leads > 0.0 {
        new_customers / leads * 100.0
    } else {
        0.0
    };

    // Unknown channel text is by definition not the paid-social channel, so
    // it reports under the ROI convention.
    let basis = entry
        .channel
        .known()
        .map(|c| c.profitability_basis())
        .unwrap_or(ProfitabilityBasis::Roi);
    let primary_profitability = match basis {
        ProfitabilityBasis::Roas => roas,
        ProfitabilityBasis::Roi => roi,
    };

    RecordMetrics {
        roi,
        roas,
        cac,
        avg_ticket,
        conversion_rate,
        basis,
        primary_profitability,
    }
}
