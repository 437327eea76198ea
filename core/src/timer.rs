//! Deterministic timer queue.
//!
//! There is no background clock: callers pass the current time to
//! [`TimerQueue::drain_due`] (via `ReadingSession::tick`). Each timer records
//! the page epoch it was scheduled under so firings that outlive their page
//! can be recognised and dropped.

/// What a timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Clear the cosmetic drag snapshot after release.
    DragReset { word_index: usize },
    /// Hand the finished page to navigation.
    PageComplete,
    /// Advance auto-play; `generation` identifies the run that scheduled it.
    AutoPlayStep { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    pub id: u64,
    pub kind: TimerKind,
    pub due_ms: f64,
    pub epoch: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, due_ms: f64, epoch: u64) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.timers.push(Timer {
            id,
            kind,
            due_ms,
            epoch,
        });
        id
    }

    pub fn cancel(&mut self, id: u64) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        before != self.timers.len()
    }

    /// Cancel every timer matching `pred`.
    pub fn cancel_where<F: Fn(&TimerKind) -> bool>(&mut self, pred: F) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| !pred(&t.kind));
        before - self.timers.len()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn pending(&self) -> &[Timer] {
        &self.timers
    }

    /// Remove and return timers due at `now_ms`, earliest first.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<Timer> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|t| t.due_ms <= now_ms);
        self.timers = rest;
        due.sort_by(|a, b| {
            a.due_ms
                .partial_cmp(&b.due_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });
        due
    }
}
