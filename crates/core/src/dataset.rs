use serde::{Deserialize, Serialize};

use crate::entry::{EntryId, WeeklyEntry};
use crate::movement::{CrmMovement, MovementId};

/// The local working copy: everything the reporting commands operate on.
/// Persisted as a JSON file by the io crate; refreshed from the row store by
/// `pull`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub entries: Vec<WeeklyEntry>,
    #[serde(default)]
    pub movements: Vec<CrmMovement>,
}

impl Dataset {
    pub fn entry(&self, id: &EntryId) -> Option<&WeeklyEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn entry_mut(&mut self, id: &EntryId) -> Option<&mut WeeklyEntry> {
        self.entries.iter_mut().find(|e| &e.id == id)
    }

    pub fn movement(&self, id: &MovementId) -> Option<&CrmMovement> {
        self.movements.iter().find(|m| &m.id == id)
    }
}
