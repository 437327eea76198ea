//! Per-word visitation state machine.
//!
//! Every word on a page starts untouched. Each `enter` counts a visit and
//! makes the word the single active word; whether the visit also completes
//! the word depends on the [`VisitPolicy`]. Leaving only clears the active
//! flag: visit counts, completion and struggle survive until the page is
//! replaced.

use serde::{Deserialize, Serialize};

/// Visits at which a completed word is flagged as a struggle.
pub const DEFAULT_STRUGGLE_THRESHOLD: u32 = 3;

/// Mutable state of one word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordVisitState {
    pub visit_count: u32,
    pub is_active: bool,
    pub is_completed: bool,
    pub is_struggling: bool,
}

impl WordVisitState {
    pub fn is_untouched(&self) -> bool {
        self.visit_count == 0
    }
}

/// Whether touching a word ahead of the reading cursor completes it.
///
/// Reading views disagreed on this; both behaviours are available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitPolicy {
    /// Words ahead of the next word to read become active but stay incomplete.
    #[default]
    PreviewAhead,
    /// Any touched word is completed immediately.
    CompleteOnTouch,
}

/// What an `enter` did to the entered word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitOutcome {
    pub index: usize,
    pub visit_count: u32,
    /// The word went from incomplete to complete on this visit.
    pub newly_completed: bool,
    /// The struggle flag was raised on this visit.
    pub became_struggling: bool,
    /// The word was ahead of the reading cursor and only previewed.
    pub previewed: bool,
}

/// Visit states for every word of one page.
#[derive(Debug, Clone)]
pub struct VisitBoard {
    states: Vec<WordVisitState>,
    policy: VisitPolicy,
    struggle_threshold: u32,
}

impl VisitBoard {
    /// All words untouched.
    pub fn new(word_count: usize, policy: VisitPolicy, struggle_threshold: u32) -> Self {
        Self {
            states: vec![WordVisitState::default(); word_count],
            policy,
            struggle_threshold,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WordVisitState> {
        self.states.get(index)
    }

    pub fn states(&self) -> &[WordVisitState] {
        &self.states
    }

    pub fn policy(&self) -> VisitPolicy {
        self.policy
    }

    /// Lowest-index word that is not completed yet.
    pub fn next_to_read(&self) -> Option<usize> {
        self.states.iter().position(|s| !s.is_completed)
    }

    /// Currently active word.
    pub fn active(&self) -> Option<usize> {
        self.states.iter().position(|s| s.is_active)
    }

    /// True when every word has been completed.
    pub fn all_completed(&self) -> bool {
        self.states.iter().all(|s| s.is_completed)
    }

    pub fn completed_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_completed).count()
    }

    /// Apply an `entered(index)` event. Out-of-range indexes are ignored.
    pub fn enter(&mut self, index: usize) -> Option<VisitOutcome> {
        if index >= self.states.len() {
            return None;
        }
        let next = self.next_to_read();

        let state = &mut self.states[index];
        state.visit_count = state.visit_count.saturating_add(1);

        let completes = match self.policy {
            VisitPolicy::PreviewAhead => {
                next == Some(index) || state.is_completed || next.is_none()
            }
            VisitPolicy::CompleteOnTouch => true,
        };

        let newly_completed = completes && !state.is_completed;
        let mut became_struggling = false;
        if completes {
            state.is_completed = true;
            if state.visit_count >= self.struggle_threshold && !state.is_struggling {
                state.is_struggling = true;
                became_struggling = true;
            }
        }
        let visit_count = state.visit_count;

        for (i, s) in self.states.iter_mut().enumerate() {
            s.is_active = i == index;
        }

        let outcome = VisitOutcome {
            index,
            visit_count,
            newly_completed,
            became_struggling,
            previewed: !completes,
        };
        tracing::debug!(?outcome, "word entered");
        Some(outcome)
    }

    /// Apply a `left()` event: clear the active flag. Returns the word left.
    pub fn leave(&mut self) -> Option<usize> {
        let active = self.active()?;
        self.states[active].is_active = false;
        Some(active)
    }
}
