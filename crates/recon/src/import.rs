//! CSV interchange: import parse-and-merge, and the matching export.
//!
//! The import path is deliberately lenient because these files come from
//! hand-edited spreadsheets. Cells map to fields by header name, missing
//! columns fall back to defaults implied by the active filter, and malformed
//! values degrade instead of failing the row. Whatever survives
//! normalization still passes through the validator so problems surface
//! before commit, not during parse.

use std::collections::HashMap;

use chrono::NaiveDate;

use roilens_core::{
    sort_entries, Channel, ChannelFilter, ChannelTag, EntryId, Filter, Lifecycle, MonthFilter,
    NaturalKey, WeeklyEntry,
};
use roilens_engine::validate::{validate_entry, FieldErrors};

use crate::error::ImportError;

/// The twelve interchange columns, in export order. Import matches cells to
/// fields by these names; export writes them verbatim.
pub const CSV_HEADERS: [&str; 12] = [
    "Año",
    "Mes",
    "Semana del mes",
    "Fecha inicio semana",
    "Fecha fin semana",
    "Canal",
    "Inversión ($)",
    "Leads",
    "Clientes nuevos",
    "Número de ventas",
    "Ingresos ($)",
    "Notas",
];

/// `$ 1,500.00` → 1500.0; blank or unparsable → 0.
fn norm_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let cleaned = trimmed.replace('$', "").replace(' ', "").replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Like `norm_number`, but blank stays blank: "not tracked" is not zero.
fn norm_opt_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned = trimmed.replace('$', "").replace(' ', "").replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => None,
    }
}

/// Whole-number cells (year, month, week). No currency cleanup here: these
/// are never money, so a stray `$` means the cell is wrong, not formatted.
/// Blank and garbage both take the fallback.
fn norm_int(raw: &str, fallback: i64) -> i64 {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n.trunc() as i64,
        _ => fallback,
    }
}

fn norm_u32(raw: &str, fallback: u32) -> u32 {
    u32::try_from(norm_int(raw, i64::from(fallback))).unwrap_or(0)
}

fn norm_year(raw: &str, fallback: i32) -> i32 {
    i32::try_from(norm_int(raw, i64::from(fallback))).unwrap_or(0)
}

/// Accepts `YYYY-MM-DD` with or without a trailing time part; anything else
/// passes through verbatim for the validator to flag.
fn norm_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(prefix) = trimmed.get(..10) {
        if NaiveDate::parse_from_str(prefix, "%Y-%m-%d").is_ok() {
            return prefix.to_string();
        }
    }
    trimmed.to_string()
}

/// Canonical channel on a case-insensitive match, verbatim text otherwise.
/// A blank cell takes the filter's channel, or the first enumerated channel
/// when no single channel is selected.
fn norm_channel(raw: &str, filter: &Filter) -> ChannelTag {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return match filter.channel {
            ChannelFilter::One(c) => ChannelTag::from(c),
            ChannelFilter::All => ChannelTag::from(Channel::ALL[0]),
        };
    }
    ChannelTag::from(trimmed)
}

/// Parses interchange CSV text into entry drafts.
///
/// Cells are matched to columns by header name; a column missing from the
/// header row leaves its field at the default implied by the filter (the
/// filter's year, its month when one is selected, week 1). Every draft gets
/// a fresh id; the merge decides which ids survive.
pub fn parse_rows(csv_text: &str, filter: &Filter) -> Result<Vec<WeeklyEntry>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let idx = |name: &str| headers.iter().position(|h| h == name);

    let col_year = idx("Año");
    let col_month = idx("Mes");
    let col_week = idx("Semana del mes");
    let col_start = idx("Fecha inicio semana");
    let col_end = idx("Fecha fin semana");
    let col_channel = idx("Canal");
    let col_spend = idx("Inversión ($)");
    let col_leads = idx("Leads");
    let col_new = idx("Clientes nuevos");
    let col_sales = idx("Número de ventas");
    let col_revenue = idx("Ingresos ($)");
    let col_notes = idx("Notas");

    let default_month = match filter.month {
        MonthFilter::Month(m) => m,
        MonthFilter::All => 1,
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportError::Csv(e.to_string()))?;
        let cell = |col: Option<usize>| -> &str { col.and_then(|i| record.get(i)).unwrap_or("") };

        rows.push(WeeklyEntry {
            id: EntryId::new(),
            year: norm_year(cell(col_year), filter.year),
            month: norm_u32(cell(col_month), default_month),
            week_of_month: norm_u32(cell(col_week), 1),
            week_start: norm_date(cell(col_start)),
            week_end: norm_date(cell(col_end)),
            channel: norm_channel(cell(col_channel), filter),
            spend: norm_number(cell(col_spend)),
            leads: norm_opt_number(cell(col_leads)),
            new_customers: norm_number(cell(col_new)),
            number_of_sales: norm_number(cell(col_sales)),
            revenue: norm_number(cell(col_revenue)),
            notes: cell(col_notes).trim().to_string(),
            lifecycle: Lifecycle::Active,
        });
    }

    if rows.is_empty() {
        return Err(ImportError::EmptyTable);
    }
    Ok(rows)
}

/// What an import did: the merged collection plus exactly what changed.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Full collection after the merge, canonically sorted.
    pub rows: Vec<WeeklyEntry>,
    /// Rows this import created or overwrote, in final state. This is the
    /// commit set for the batch upsert — never the full collection.
    pub changed: Vec<WeeklyEntry>,
    pub added: usize,
    pub updated: usize,
    /// Validation errors among the changed rows, keyed by entry id.
    pub invalid: Vec<(EntryId, FieldErrors)>,
}

/// Merges imported drafts into the current collection by natural key.
///
/// A key match keeps the matched row's id and overwrites everything else —
/// the import is authoritative. Anything unmatched appends under its fresh
/// id. Trashed rows never match; the import only sees the live table. A
/// later draft with the same key as an earlier one updates the earlier
/// one's merged result.
pub fn merge_rows(current: &[WeeklyEntry], imported: Vec<WeeklyEntry>) -> ImportOutcome {
    let mut rows: Vec<WeeklyEntry> = current.to_vec();
    let mut by_key: HashMap<NaturalKey, EntryId> = rows
        .iter()
        .filter(|row| row.is_active())
        .map(|row| (row.natural_key(), row.id.clone()))
        .collect();

    let mut added = 0usize;
    let mut updated = 0usize;
    let mut changed_ids: Vec<EntryId> = Vec::new();

    for draft in imported {
        let key = draft.natural_key();
        if let Some(existing_id) = by_key.get(&key).cloned() {
            let mut next = draft;
            next.id = existing_id.clone();
            if let Some(slot) = rows.iter_mut().find(|row| row.id == existing_id) {
                *slot = next;
            }
            updated += 1;
            if !changed_ids.contains(&existing_id) {
                changed_ids.push(existing_id);
            }
        } else {
            by_key.insert(key, draft.id.clone());
            changed_ids.push(draft.id.clone());
            added += 1;
            rows.push(draft);
        }
    }

    sort_entries(&mut rows);

    let changed: Vec<WeeklyEntry> = changed_ids
        .iter()
        .filter_map(|id| rows.iter().find(|row| &row.id == id).cloned())
        .collect();

    let invalid: Vec<(EntryId, FieldErrors)> = changed
        .iter()
        .filter_map(|row| {
            let errors = validate_entry(row);
            if errors.is_empty() {
                None
            } else {
                Some((row.id.clone(), errors))
            }
        })
        .collect();

    ImportOutcome { rows, changed, added, updated, invalid }
}

/// Parse-and-merge in one step: the preview the import command shows.
pub fn import_csv(
    csv_text: &str,
    current: &[WeeklyEntry],
    filter: &Filter,
) -> Result<ImportOutcome, ImportError> {
    let imported = parse_rows(csv_text, filter)?;
    Ok(merge_rows(current, imported))
}

fn number_cell(n: f64) -> String {
    format!("{}", n)
}

/// Renders active entries as the twelve-column interchange CSV in canonical
/// order. Optional blanks stay blank so a round-trip preserves them.
pub fn export_csv(entries: &[WeeklyEntry]) -> Result<String, ImportError> {
    let mut sorted: Vec<WeeklyEntry> =
        entries.iter().filter(|e| e.is_active()).cloned().collect();
    sort_entries(&mut sorted);

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(CSV_HEADERS)
        .map_err(|e| ImportError::Csv(e.to_string()))?;
    for entry in &sorted {
        writer
            .write_record([
                entry.year.to_string(),
                entry.month.to_string(),
                entry.week_of_month.to_string(),
                entry.week_start.clone(),
                entry.week_end.clone(),
                entry.channel.as_str().to_string(),
                number_cell(entry.spend),
                entry.leads.map(number_cell).unwrap_or_default(),
                number_cell(entry.new_customers),
                number_cell(entry.number_of_sales),
                number_cell(entry.revenue),
                entry.notes.clone(),
            ])
            .map_err(|e| ImportError::Csv(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ImportError::Csv(e.to_string()))
}
