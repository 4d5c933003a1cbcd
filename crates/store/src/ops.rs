//! Lifecycle commands with explicit rollback.
//!
//! Trash, restore and purge update the working copy first, then persist.
//! If the store rejects the write the local change is reverted before the
//! error is reported, so the dataset file never claims a state the store
//! does not hold.

use std::fmt;

use chrono::{DateTime, Utc};

use roilens_core::{Dataset, EntryId, Lifecycle, WeeklyEntry};

use crate::client::{StoreClient, StoreError};

/// The slice of the store surface the lifecycle commands touch. The HTTP
/// client implements it; tests substitute an in-memory stand-in.
pub trait EntryStore {
    fn upsert_entry(&self, entry: &WeeklyEntry) -> Result<(), StoreError>;
    fn delete_entry(&self, id: &EntryId) -> Result<(), StoreError>;
}

impl EntryStore for StoreClient {
    fn upsert_entry(&self, entry: &WeeklyEntry) -> Result<(), StoreError> {
        StoreClient::upsert_entry(self, entry)
    }

    fn delete_entry(&self, id: &EntryId) -> Result<(), StoreError> {
        StoreClient::delete_entry(self, id)
    }
}

/// Error type for lifecycle commands.
#[derive(Debug)]
pub enum CommandError {
    /// The id names no record in the working copy.
    UnknownEntry(EntryId),
    /// Trash needs an active record.
    AlreadyTrashed(EntryId),
    /// Restore and purge need a trashed record.
    NotTrashed(EntryId),
    /// The store rejected the write; the local change was rolled back.
    Store(StoreError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownEntry(id) => write!(f, "no entry with id {}", id),
            CommandError::AlreadyTrashed(id) => {
                write!(f, "entry {} is already in the trash", id)
            }
            CommandError::NotTrashed(id) => write!(f, "entry {} is not in the trash", id),
            CommandError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CommandError {}

/// Move an active entry to the trash.
pub fn trash_entry(
    data: &mut Dataset,
    store: &dyn EntryStore,
    id: &EntryId,
    at: DateTime<Utc>,
) -> Result<(), CommandError> {
    let Some(entry) = data.entry_mut(id) else {
        return Err(CommandError::UnknownEntry(id.clone()));
    };
    if entry.lifecycle.is_trashed() {
        return Err(CommandError::AlreadyTrashed(id.clone()));
    }

    let before = entry.lifecycle;
    entry.lifecycle = Lifecycle::Trashed { at };
    let snapshot = entry.clone();

    if let Err(e) = store.upsert_entry(&snapshot) {
        if let Some(entry) = data.entry_mut(id) {
            entry.lifecycle = before;
        }
        return Err(CommandError::Store(e));
    }
    Ok(())
}

/// Bring a trashed entry back into the active set.
pub fn restore_entry(
    data: &mut Dataset,
    store: &dyn EntryStore,
    id: &EntryId,
) -> Result<(), CommandError> {
    let Some(entry) = data.entry_mut(id) else {
        return Err(CommandError::UnknownEntry(id.clone()));
    };
    if entry.lifecycle.is_active() {
        return Err(CommandError::NotTrashed(id.clone()));
    }

    let before = entry.lifecycle;
    entry.lifecycle = Lifecycle::Active;
    let snapshot = entry.clone();

    if let Err(e) = store.upsert_entry(&snapshot) {
        if let Some(entry) = data.entry_mut(id) {
            entry.lifecycle = before;
        }
        return Err(CommandError::Store(e));
    }
    Ok(())
}

/// Permanently delete a trashed entry. Purge never touches active rows.
pub fn purge_entry(
    data: &mut Dataset,
    store: &dyn EntryStore,
    id: &EntryId,
) -> Result<WeeklyEntry, CommandError> {
    let Some(pos) = data.entries.iter().position(|e| &e.id == id) else {
        return Err(CommandError::UnknownEntry(id.clone()));
    };
    if data.entries[pos].lifecycle.is_active() {
        return Err(CommandError::NotTrashed(id.clone()));
    }

    let removed = data.entries.remove(pos);
    if let Err(e) = store.delete_entry(id) {
        data.entries.insert(pos, removed);
        return Err(CommandError::Store(e));
    }
    Ok(removed)
}
