use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::channel::ChannelTag;
use crate::lifecycle::{self, Lifecycle};

/// Opaque, client-generated entry identity. Survives import merges: a merge
/// may overwrite every other field but never replaces the id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new() -> Self {
        EntryId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        EntryId::new()
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        EntryId(s)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        EntryId(s.to_string())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One manually captured week-of-channel row.
///
/// `week_start`/`week_end` stay raw text: hand-edited values must survive
/// round-trips and be flagged by the validator, not rejected at parse time.
/// Numeric fields hold whatever the store delivered; range checks are the
/// validator's job and display math applies its own safe coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyEntry {
    pub id: EntryId,
    pub year: i32,
    pub month: u32,
    pub week_of_month: u32,
    #[serde(rename = "weekStartDate", default)]
    pub week_start: String,
    #[serde(rename = "weekEndDate", default)]
    pub week_end: String,
    pub channel: ChannelTag,
    #[serde(default)]
    pub spend: f64,
    /// Optional: blank means "not tracked", which aggregates as zero.
    #[serde(default)]
    pub leads: Option<f64>,
    #[serde(default)]
    pub new_customers: f64,
    #[serde(default)]
    pub number_of_sales: f64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "deletedAt", default, with = "lifecycle::as_deleted_at")]
    pub lifecycle: Lifecycle,
}

impl WeeklyEntry {
    /// A fresh all-zero row for the given slot, ready for editing.
    pub fn new(year: i32, month: u32, week_of_month: u32, channel: ChannelTag) -> Self {
        WeeklyEntry {
            id: EntryId::new(),
            year,
            month,
            week_of_month,
            week_start: String::new(),
            week_end: String::new(),
            channel,
            spend: 0.0,
            leads: None,
            new_customers: 0.0,
            number_of_sales: 0.0,
            revenue: 0.0,
            notes: String::new(),
            lifecycle: Lifecycle::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    /// The import-merge identity: two rows with the same key describe the
    /// same week of the same channel, regardless of their ids.
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            year: self.year,
            month: self.month,
            week: self.week_of_month,
            channel: self.channel.as_str().to_string(),
        }
    }

    /// Returns a copy with every `Some` field of the patch applied. The
    /// original is never mutated and the id is never touched.
    pub fn with_patch(&self, patch: &EntryPatch) -> WeeklyEntry {
        let mut next = self.clone();
        if let Some(year) = patch.year {
            next.year = year;
        }
        if let Some(month) = patch.month {
            next.month = month;
        }
        if let Some(week) = patch.week_of_month {
            next.week_of_month = week;
        }
        if let Some(ref week_start) = patch.week_start {
            next.week_start = week_start.clone();
        }
        if let Some(ref week_end) = patch.week_end {
            next.week_end = week_end.clone();
        }
        if let Some(ref channel) = patch.channel {
            next.channel = channel.clone();
        }
        if let Some(spend) = patch.spend {
            next.spend = spend;
        }
        if let Some(leads) = patch.leads {
            next.leads = leads;
        }
        if let Some(new_customers) = patch.new_customers {
            next.new_customers = new_customers;
        }
        if let Some(number_of_sales) = patch.number_of_sales {
            next.number_of_sales = number_of_sales;
        }
        if let Some(revenue) = patch.revenue {
            next.revenue = revenue;
        }
        if let Some(ref notes) = patch.notes {
            next.notes = notes.clone();
        }
        next
    }
}

/// The (year, month, week-of-month, channel) de-duplication key used by the
/// import merge. Not enforced as unique on manual edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    pub year: i32,
    pub month: u32,
    pub week: u32,
    pub channel: String,
}

/// Canonical listing order: year, month, week, then week-start text.
pub fn sort_entries(entries: &mut [WeeklyEntry]) {
    entries.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then(a.month.cmp(&b.month))
            .then(a.week_of_month.cmp(&b.week_of_month))
            .then(a.week_start.cmp(&b.week_start))
    });
}

/// Partial update for a weekly entry: every field optional, applied
/// field-by-field. `leads` is doubly optional so a patch can distinguish
/// "leave alone" from "clear to blank".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub week_of_month: Option<u32>,
    pub week_start: Option<String>,
    pub week_end: Option<String>,
    pub channel: Option<ChannelTag>,
    pub spend: Option<f64>,
    pub leads: Option<Option<f64>>,
    pub new_customers: Option<f64>,
    pub number_of_sales: Option<f64>,
    pub revenue: Option<f64>,
    pub notes: Option<String>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        *self == EntryPatch::default()
    }

    /// Sets one field from its wire name and a raw string value, as accepted
    /// on the command line (`spend=1200`, `leads=`, `channel=WHATSAPP`).
    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), String> {
        fn num(key: &str, raw: &str) -> Result<f64, String> {
            raw.trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid number for {}: '{}'", key, raw))
        }

        match key {
            "year" => {
                self.year = Some(
                    raw.trim()
                        .parse::<i32>()
                        .map_err(|_| format!("invalid year: '{}'", raw))?,
                );
            }
            "month" => {
                self.month = Some(
                    raw.trim()
                        .parse::<u32>()
                        .map_err(|_| format!("invalid month: '{}'", raw))?,
                );
            }
            "week" | "weekOfMonth" => {
                self.week_of_month = Some(
                    raw.trim()
                        .parse::<u32>()
                        .map_err(|_| format!("invalid week: '{}'", raw))?,
                );
            }
            "weekStart" | "weekStartDate" => self.week_start = Some(raw.to_string()),
            "weekEnd" | "weekEndDate" => self.week_end = Some(raw.to_string()),
            "channel" => self.channel = Some(ChannelTag::from(raw)),
            "spend" => self.spend = Some(num(key, raw)?),
            "leads" => {
                self.leads = if raw.trim().is_empty() {
                    Some(None)
                } else {
                    Some(Some(num(key, raw)?))
                };
            }
            "newCustomers" => self.new_customers = Some(num(key, raw)?),
            "numberOfSales" => self.number_of_sales = Some(num(key, raw)?),
            "revenue" => self.revenue = Some(num(key, raw)?),
            "notes" => self.notes = Some(raw.to_string()),
            other => return Err(format!("unknown field: '{}'", other)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;

    fn entry(year: i32, month: u32, week: u32, channel: &str) -> WeeklyEntry {
        WeeklyEntry::new(year, month, week, ChannelTag::from(channel))
    }

    #[test]
    fn patch_overwrites_only_set_fields() {
        let base = entry(2025, 3, 2, "WHATSAPP");
        let mut patch = EntryPatch::default();
        patch.set_field("spend", "1200.5").unwrap();
        patch.set_field("notes", "promo week").unwrap();

        let next = base.with_patch(&patch);
        assert_eq!(next.id, base.id);
        assert_eq!(next.spend, 1200.5);
        assert_eq!(next.notes, "promo week");
        assert_eq!(next.year, 2025);
        assert_eq!(next.channel, base.channel);
        // original untouched
        assert_eq!(base.spend, 0.0);
    }

    #[test]
    fn patch_can_clear_leads_to_blank() {
        let mut base = entry(2025, 3, 2, "WHATSAPP");
        base.leads = Some(40.0);

        let mut patch = EntryPatch::default();
        patch.set_field("leads", "").unwrap();
        assert_eq!(base.with_patch(&patch).leads, None);

        patch.set_field("leads", "12").unwrap();
        assert_eq!(base.with_patch(&patch).leads, Some(12.0));
    }

    #[test]
    fn patch_rejects_unknown_fields_and_bad_numbers() {
        let mut patch = EntryPatch::default();
        assert!(patch.set_field("color", "red").is_err());
        assert!(patch.set_field("spend", "12oo").is_err());
        assert!(patch.is_empty());
    }

    #[test]
    fn natural_key_uses_canonical_channel_text() {
        let a = entry(2025, 3, 2, "whatsapp");
        let b = entry(2025, 3, 2, "WHATSAPP");
        assert_eq!(a.natural_key(), b.natural_key());
        assert_ne!(a.natural_key(), entry(2025, 3, 3, "WHATSAPP").natural_key());
    }

    #[test]
    fn sort_is_by_year_month_week_then_start_date() {
        let mut rows = vec![
            entry(2025, 10, 1, "WHATSAPP"),
            entry(2025, 9, 2, "WHATSAPP"),
            entry(2024, 12, 5, "EMAIL-MKT"),
            entry(2025, 9, 1, "EMAIL-MKT"),
        ];
        sort_entries(&mut rows);
        let order: Vec<(i32, u32, u32)> = rows
            .iter()
            .map(|r| (r.year, r.month, r.week_of_month))
            .collect();
        assert_eq!(
            order,
            vec![(2024, 12, 5), (2025, 9, 1), (2025, 9, 2), (2025, 10, 1)]
        );
    }

    #[test]
    fn entry_wire_format_uses_store_field_names() {
        let mut row = entry(2025, 3, 2, "WHATSAPP");
        row.week_start = "2025-03-10".to_string();
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("weekOfMonth").is_some());
        assert!(json.get("weekStartDate").is_some());
        assert!(json.get("newCustomers").is_some());
        assert!(json.get("numberOfSales").is_some());
        assert!(json.get("deletedAt").is_some());
        assert_eq!(json["channel"], "WHATSAPP");
    }

    #[test]
    fn entry_deserializes_with_missing_optionals() {
        let json = r#"{
            "id": "abc",
            "year": 2025,
            "month": 3,
            "weekOfMonth": 2,
            "channel": "WHATSAPP"
        }"#;
        let row: WeeklyEntry = serde_json::from_str(json).unwrap();
        assert_eq!(row.spend, 0.0);
        assert_eq!(row.leads, None);
        assert!(row.is_active());
        assert_eq!(row.week_start, "");
    }
}
