//! Deferred and recurring timers for the single-threaded game loop.
//!
//! Callbacks never run on their own: the host drains due events between
//! frames and applies them to the simulation. Every timer has an id so a
//! reset can cancel it before it fires.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// Handle returned when scheduling; used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<E> {
    due_ms: f64,
    seq: u64,
    id: TimerId,
    interval_ms: Option<f64>,
    event: E,
}

// Min-heap on (due, seq): BinaryHeap is a max-heap, so the order is reversed.
impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E> Eq for Entry<E> {}

/// Event queue keyed on simulation time in milliseconds.
#[derive(Debug)]
pub struct Scheduler<E> {
    queue: BinaryHeap<Entry<E>>,
    /// Ids that are scheduled and not cancelled (repeating timers stay here).
    live: HashSet<TimerId>,
    next_id: u64,
    next_seq: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            live: HashSet::new(),
            next_id: 1,
            next_seq: 0,
        }
    }

    fn push(&mut self, due_ms: f64, interval_ms: Option<f64>, id: TimerId, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            due_ms,
            seq,
            id,
            interval_ms,
            event,
        });
    }

    fn allocate(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);
        id
    }

    /// Fire `event` once, `delay_ms` after `now_ms`.
    pub fn schedule_once(&mut self, now_ms: f64, delay_ms: f64, event: E) -> TimerId {
        let id = self.allocate();
        self.push(now_ms + delay_ms.max(0.0), None, id, event);
        id
    }

    /// Fire `event` every `interval_ms`, first at `now_ms + interval_ms`.
    pub fn schedule_repeating(&mut self, now_ms: f64, interval_ms: f64, event: E) -> TimerId {
        let id = self.allocate();
        // A zero interval would re-fire forever within one drain.
        let interval = interval_ms.max(1.0);
        self.push(now_ms + interval, Some(interval), id, event);
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id)
    }

    /// Whether the timer is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.live.contains(&id)
    }

    /// Number of timers still pending.
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.live.clear();
    }
}

impl<E: Clone> Scheduler<E> {
    /// Pop every event due at or before `now_ms`, in due order.
    /// Repeating timers re-arm at `due + interval` and may fire several
    /// times if the host stalled for longer than one interval.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<(TimerId, E)> {
        let mut fired = Vec::new();
        while let Some(top) = self.queue.peek() {
            if top.due_ms > now_ms {
                break;
            }
            let Some(entry) = self.queue.pop() else { break };
            if !self.live.contains(&entry.id) {
                // Cancelled while queued
                continue;
            }
            match entry.interval_ms {
                Some(interval) => {
                    fired.push((entry.id, entry.event.clone()));
                    self.push(entry.due_ms + interval, Some(interval), entry.id, entry.event);
                }
                None => {
                    self.live.remove(&entry.id);
                    fired.push((entry.id, entry.event));
                }
            }
        }
        fired
    }
}
