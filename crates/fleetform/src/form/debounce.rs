// File: src/form/debounce.rs
// Purpose: Per-field cancellable single-shot timers for live validation

use std::collections::HashMap;
use tokio::time::{Duration, Instant};

/// One pending deadline per field
///
/// Scheduling a field again moves its deadline; fields never share a timer,
/// so typing in one field does not delay another.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadlines: HashMap<String, Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadlines: HashMap::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)start the field's timer from `now`
    pub fn schedule(&mut self, field: &str, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.deadlines.insert(field.to_string(), deadline);
        deadline
    }

    /// Drop the field's timer; returns whether one was pending
    pub fn cancel(&mut self, field: &str) -> bool {
        self.deadlines.remove(field).is_some()
    }

    pub fn is_pending(&self, field: &str) -> bool {
        self.deadlines.contains_key(field)
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Remove and return every field whose deadline is at or before `now`,
    /// earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<String> {
        let mut due: Vec<(String, Instant)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(field, deadline)| (field.clone(), *deadline))
            .collect();
        due.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        for (field, _) in &due {
            self.deadlines.remove(field);
        }
        due.into_iter().map(|(field, _)| field).collect()
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
