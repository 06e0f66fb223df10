//! In-session re-exposure of missed items.
//!
//! A missed item comes back after `gaps[0]` questions, then after each
//! following gap, and leaves the queue after its last exposure. Ticks are
//! question counts, not wall-clock time.

use crate::catalog::Item;
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryEntry {
    pub item: Item,
    /// Index into the gap schedule of the exposure that is pending
    pub step: usize,
    /// First tick at which the entry may be popped
    pub next_at: u64,
}

#[derive(Debug, Clone)]
pub struct RetryQueue {
    gaps: Vec<u64>,
    /// Kept in insertion order; ties on `next_at` resolve to the oldest entry
    entries: Vec<RetryEntry>,
}

impl RetryQueue {
    pub fn new(gaps: Vec<u64>) -> Self {
        Self {
            gaps,
            entries: Vec::new(),
        }
    }

    pub fn gaps(&self) -> &[u64] {
        &self.gaps
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, code: &str) -> Option<&RetryEntry> {
        self.entries.iter().find(|e| e.item.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entry(code).is_some()
    }

    /// Starts (or restarts) the reinforcement cycle for `item`
    pub fn schedule(&mut self, item: &Item, current_tick: u64) {
        let Some(&first_gap) = self.gaps.first() else {
            return;
        };
        let next_at = current_tick + first_gap;

        if let Some(entry) = self.entries.iter_mut().find(|e| e.item.code == item.code) {
            entry.step = 0;
            entry.next_at = next_at;
            debug!("Retry for {} restarted, next at tick {}", item.code, next_at);
        } else {
            self.entries.push(RetryEntry {
                item: item.clone(),
                step: 0,
                next_at,
            });
            debug!("Retry for {} scheduled at tick {}", item.code, next_at);
        }
    }

    /// Earliest entry eligible at `current_tick`, advanced or retired
    pub fn pop_due(&mut self, current_tick: u64) -> Option<Item> {
        let index = self.earliest(|entry| entry.next_at <= current_tick)?;
        Some(self.take_exposure(index, current_tick))
    }

    /// Makes the earliest entry eligible now and pops it
    ///
    /// Used when a finite session runs out of main-queue items while
    /// retries are still pending.
    pub fn force_pop(&mut self, current_tick: u64) -> Option<Item> {
        let index = self.earliest(|_| true)?;
        self.entries[index].next_at = current_tick;
        Some(self.take_exposure(index, current_tick))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn earliest(&self, eligible: impl Fn(&RetryEntry) -> bool) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            if !eligible(entry) {
                continue;
            }
            match best {
                Some(current) if self.entries[current].next_at <= entry.next_at => {}
                _ => best = Some(index),
            }
        }
        best
    }

    fn take_exposure(&mut self, index: usize, current_tick: u64) -> Item {
        let last_step = self.gaps.len().saturating_sub(1);
        if self.entries[index].step >= last_step {
            let entry = self.entries.remove(index);
            debug!("Retry for {} retired at tick {}", entry.item.code, current_tick);
            return entry.item;
        }

        let entry = &mut self.entries[index];
        entry.step += 1;
        entry.next_at = current_tick + self.gaps[entry.step];
        debug!(
            "Retry for {} shown at tick {}, next at tick {}",
            entry.item.code, current_tick, entry.next_at
        );
        entry.item.clone()
    }
}
