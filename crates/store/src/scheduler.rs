//! Write scheduler: coalesces rapid edits into one store write per record.
//!
//! A burst of `entry set` changes to one row should reach the store as a
//! single upsert carrying the final state. One pending slot per id;
//! scheduling again cancels and replaces the slot and restarts its window.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use roilens_core::{EntryId, WeeklyEntry};

/// Quiescence window before a scheduled write becomes due.
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(250);

struct Slot {
    entry: WeeklyEntry,
    due: Instant,
    seq: u64,
}

/// Map from record id to its single pending write.
///
/// Time is passed in, never read, so coalescing is testable without
/// sleeping.
pub struct WriteScheduler {
    window: Duration,
    slots: HashMap<EntryId, Slot>,
    next_seq: u64,
}

impl WriteScheduler {
    pub fn new(window: Duration) -> Self {
        WriteScheduler {
            window,
            slots: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Queue an upsert for the row, cancelling any pending write for the
    /// same id. The replacement counts as a fresh schedule: its window and
    /// its place in the flush order both restart.
    pub fn schedule(&mut self, entry: WeeklyEntry, now: Instant) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots.insert(
            entry.id.clone(),
            Slot {
                entry,
                due: now + self.window,
                seq,
            },
        );
    }

    /// Remove and return every row whose window has elapsed, oldest
    /// schedule first.
    pub fn drain_due(&mut self, now: Instant) -> Vec<WeeklyEntry> {
        let due_ids: Vec<EntryId> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.due <= now)
            .map(|(id, _)| id.clone())
            .collect();
        self.take_sorted(due_ids)
    }

    /// Remove and return every pending row regardless of its window,
    /// oldest schedule first. Called on command exit so nothing is lost.
    pub fn drain_all(&mut self) -> Vec<WeeklyEntry> {
        let ids: Vec<EntryId> = self.slots.keys().cloned().collect();
        self.take_sorted(ids)
    }

    pub fn pending(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn take_sorted(&mut self, ids: Vec<EntryId>) -> Vec<WeeklyEntry> {
        let mut taken: Vec<Slot> = ids
            .into_iter()
            .filter_map(|id| self.slots.remove(&id))
            .collect();
        taken.sort_by_key(|slot| slot.seq);
        taken.into_iter().map(|slot| slot.entry).collect()
    }
}

impl Default for WriteScheduler {
    fn default() -> Self {
        WriteScheduler::new(DEFAULT_QUIET_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roilens_core::ChannelTag;

    fn row(spend: f64) -> WeeklyEntry {
        let mut entry = WeeklyEntry::new(2025, 3, 1, ChannelTag::from("WHATSAPP"));
        entry.spend = spend;
        entry
    }

    #[test]
    fn same_id_collapses_to_the_latest_value() {
        let mut sched = WriteScheduler::default();
        let t0 = Instant::now();

        let first = row(100.0);
        let mut second = first.clone();
        second.spend = 200.0;

        sched.schedule(first, t0);
        sched.schedule(second, t0 + Duration::from_millis(10));

        assert_eq!(sched.pending(), 1);
        let flushed = sched.drain_all();
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].spend, 200.0);
        assert!(sched.is_empty());
    }

    #[test]
    fn distinct_ids_flush_in_insertion_order() {
        let mut sched = WriteScheduler::default();
        let t0 = Instant::now();

        let a = row(1.0);
        let b = row(2.0);
        let c = row(3.0);
        let order = vec![a.id.clone(), b.id.clone(), c.id.clone()];

        sched.schedule(a, t0);
        sched.schedule(b, t0 + Duration::from_millis(5));
        sched.schedule(c, t0 + Duration::from_millis(9));

        let flushed: Vec<EntryId> = sched.drain_all().into_iter().map(|e| e.id).collect();
        assert_eq!(flushed, order);
    }

    #[test]
    fn drain_due_respects_the_window() {
        let mut sched = WriteScheduler::new(Duration::from_millis(250));
        let t0 = Instant::now();

        sched.schedule(row(1.0), t0);

        assert!(sched.drain_due(t0 + Duration::from_millis(249)).is_empty());
        assert_eq!(sched.pending(), 1);

        let flushed = sched.drain_due(t0 + Duration::from_millis(250));
        assert_eq!(flushed.len(), 1);
        assert!(sched.is_empty());
    }

    #[test]
    fn rescheduling_restarts_the_window() {
        let mut sched = WriteScheduler::new(Duration::from_millis(250));
        let t0 = Instant::now();

        let first = row(1.0);
        let mut second = first.clone();
        second.spend = 2.0;

        sched.schedule(first, t0);
        sched.schedule(second, t0 + Duration::from_millis(200));

        // The original window would have elapsed here; the replacement's has not.
        assert!(sched.drain_due(t0 + Duration::from_millis(260)).is_empty());

        let flushed = sched.drain_due(t0 + Duration::from_millis(450));
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].spend, 2.0);
    }

    #[test]
    fn replacement_moves_behind_later_schedules() {
        let mut sched = WriteScheduler::default();
        let t0 = Instant::now();

        let a = row(1.0);
        let b = row(2.0);
        let mut a_again = a.clone();
        a_again.spend = 3.0;

        sched.schedule(a, t0);
        sched.schedule(b.clone(), t0 + Duration::from_millis(5));
        sched.schedule(a_again, t0 + Duration::from_millis(10));

        let flushed: Vec<(EntryId, f64)> = sched
            .drain_all()
            .into_iter()
            .map(|e| (e.id, e.spend))
            .collect();
        assert_eq!(flushed[0].0, b.id);
        assert_eq!(flushed[1].1, 3.0);
    }
}
