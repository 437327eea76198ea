//! Reading context for platform communication.
//!
//! `ReadingContext` is a plain data container with public fields. After any
//! `ReadingSession` call the view layer reads these fields to decide what to
//! highlight, and drains `events` to drive animations, navigation and
//! gamification. No callbacks, no traits: just data transfer.

use crate::book::NavigationDecision;
use crate::director::HelpPayload;

/// Something the view layer may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    WordEntered { index: usize, visit_count: u32 },
    WordLeft { index: usize },
    WordCompleted { index: usize },
    StruggleDetected { index: usize },
    PhonemeSpoken { word_index: usize, phoneme_index: usize },
    WordSpoken { index: usize },
    HelpOffered { index: usize },
    /// Every word on the page is complete. Emitted once per page.
    PageCompleted { page: usize },
    /// The post-completion pause elapsed; navigation should act on `decision`.
    NavigationDue { page: usize, decision: NavigationDecision },
    DragReset { word_index: usize },
    AutoPlayStarted { from: usize },
    AutoPlayAdvanced { index: usize },
    AutoPlayFinished,
    AutoPlayStopped,
}

/// Visual state of the slider under the finger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSnapshot {
    pub word_index: usize,
    pub progress: f64,
    pub phoneme_index: Option<usize>,
}

/// Reading context for the view layer.
///
/// # Fields
///
/// - `page_index`: page of the open book being shown
/// - `active_word`: word under the pointer (highlight)
/// - `drag`: slider progress, kept briefly after release for the reset animation
/// - `autoplay_word`: word being read by auto-play
/// - `help`: phonetic breakdown to show, if any
/// - `events`: everything that happened since the last drain
#[derive(Debug, Clone, Default)]
pub struct ReadingContext {
    pub page_index: usize,
    pub active_word: Option<usize>,
    pub drag: Option<DragSnapshot>,
    pub autoplay_word: Option<usize>,
    pub help: Option<HelpPayload>,
    pub events: Vec<SessionEvent>,
}

impl ReadingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear visual state. Does NOT clear `events` (the platform drains them).
    pub fn clear(&mut self) {
        self.active_word = None;
        self.drag = None;
        self.autoplay_word = None;
        self.help = None;
    }

    /// Take pending events, leaving the queue empty.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Dismiss the help panel.
    pub fn dismiss_help(&mut self) -> Option<HelpPayload> {
        self.help.take()
    }
}
