//! Countdown queues for construction, crafting, and research.
//!
//! Each entry counts down one per turn. When it reaches zero the payload is
//! handed back to the caller, which applies the completion effect.

use colony_types::ItemId;
use serde::{Deserialize, Serialize};

/// One pending entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry<T> {
    /// What completes when the countdown ends.
    pub payload: T,
    /// Turns left before completion.
    pub turns_remaining: u32,
}

/// A list of payloads that complete after a number of turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownQueue<T> {
    entries: Vec<QueueEntry<T>>,
}

impl<T> Default for CountdownQueue<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> CountdownQueue<T> {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a payload. A duration of 0 completes on the next advance.
    pub fn push(&mut self, payload: T, turns: u32) {
        self.entries.push(QueueEntry {
            payload,
            turns_remaining: turns,
        });
    }

    /// Decrement every entry and return the payloads that completed, in
    /// insertion order.
    pub fn advance(&mut self) -> Vec<T> {
        let mut completed = Vec::new();
        let mut pending = Vec::with_capacity(self.entries.len());
        for mut entry in self.entries.drain(..) {
            entry.turns_remaining = entry.turns_remaining.saturating_sub(1);
            if entry.turns_remaining == 0 {
                completed.push(entry.payload);
            } else {
                pending.push(entry);
            }
        }
        self.entries = pending;
        completed
    }

    /// Pending entries in insertion order.
    pub fn entries(&self) -> &[QueueEntry<T>] {
        &self.entries
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A crafting job: `quantity` units of `item` land in the stockpile on
/// completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftOrder {
    /// Item produced.
    pub item: ItemId,
    /// Units produced.
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_complete_in_order() {
        let mut queue = CountdownQueue::new();
        queue.push("slow", 3);
        queue.push("fast", 1);
        queue.push("medium", 2);

        assert_eq!(queue.advance(), vec!["fast"]);
        assert_eq!(queue.advance(), vec!["medium"]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.entries().first().map(|e| e.turns_remaining), Some(1));
        assert_eq!(queue.advance(), vec!["slow"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_duration_completes_next_advance() {
        let mut queue = CountdownQueue::new();
        queue.push(7_u32, 0);
        assert_eq!(queue.advance(), vec![7]);
    }

    #[test]
    fn simultaneous_completions_keep_insertion_order() {
        let mut queue = CountdownQueue::new();
        queue.push('a', 2);
        queue.push('b', 2);
        assert!(queue.advance().is_empty());
        assert_eq!(queue.advance(), vec!['a', 'b']);
    }
}
