//! Record-set scoping.
//!
//! Every derived view reads active records only; trashed rows exist solely
//! for the trash listing until restored or purged.

use roilens_core::{Filter, WeeklyEntry};

/// Active records matching the view selection, in input order.
pub fn in_scope<'a>(entries: &'a [WeeklyEntry], filter: &Filter) -> Vec<&'a WeeklyEntry> {
    entries
        .iter()
        .filter(|e| e.is_active() && filter.matches_entry(e))
        .collect()
}

/// All active records regardless of selection.
pub fn active(entries: &[WeeklyEntry]) -> Vec<&WeeklyEntry> {
    entries.iter().filter(|e| e.is_active()).collect()
}

/// The trash view.
pub fn trashed(entries: &[WeeklyEntry]) -> Vec<&WeeklyEntry> {
    entries.iter().filter(|e| !e.is_active()).collect()
}
