//! `roilens-engine` — The aggregation engine.
//!
//! Pure computation over weekly entries: per-record metrics, portfolio
//! aggregation, week/channel grouping, period math, month comparison and
//! record validation. No I/O, no network, no global state.

pub mod aggregate;
pub mod compare;
pub mod filter;
pub mod groups;
pub mod metrics;
pub mod period;
pub mod validate;

pub use aggregate::{aggregate, WeeklyTotals};
pub use compare::{compare_months, CompareMetric, MetricDelta, MonthComparison};
pub use groups::{
    by_channel, group_weekly, rank_channels, spend_distribution, ChannelRow, SpendShare,
    WeekBucket, WeekKey,
};
pub use metrics::{entry_metrics, pct_change, safe_number, RecordMetrics};
pub use period::{month_name, period_range, previous_period};
pub use validate::{is_valid, validate_entry, FieldErrors};
