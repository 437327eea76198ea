//! Per-page state.
//!
//! A `PageState` is built from the page text and replaced wholesale when the
//! reader moves on; nothing carries over between pages. The epoch stamps
//! timers scheduled while the page was current.

use crate::lexicon::PhonemeLexicon;
use crate::progress::PageProgress;
use crate::segmenter::{segment, WordUnit};
use crate::visit::{VisitBoard, VisitPolicy, WordVisitState};

#[derive(Debug, Clone)]
pub struct PageState {
    words: Vec<WordUnit>,
    visits: VisitBoard,
    progress: PageProgress,
    epoch: u64,
}

impl PageState {
    pub fn new<L: PhonemeLexicon + ?Sized>(
        text: &str,
        lexicon: &L,
        policy: VisitPolicy,
        struggle_threshold: u32,
        epoch: u64,
    ) -> Self {
        let words = segment(text, lexicon);
        let visits = VisitBoard::new(words.len(), policy, struggle_threshold);
        Self {
            words,
            visits,
            progress: PageProgress::new(),
            epoch,
        }
    }

    /// A page with no words, used before anything is loaded.
    pub fn empty(epoch: u64) -> Self {
        Self {
            words: Vec::new(),
            visits: VisitBoard::new(0, VisitPolicy::default(), u32::MAX),
            progress: PageProgress::new(),
            epoch,
        }
    }

    pub fn words(&self) -> &[WordUnit] {
        &self.words
    }

    pub fn word(&self, index: usize) -> Option<&WordUnit> {
        self.words.get(index)
    }

    pub fn visits(&self) -> &VisitBoard {
        &self.visits
    }

    pub fn visit_state(&self, index: usize) -> Option<&WordVisitState> {
        self.visits.get(index)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn page_completed(&self) -> bool {
        self.progress.is_completed()
    }

    pub(crate) fn parts_mut(&mut self) -> (&[WordUnit], &mut VisitBoard, &mut PageProgress) {
        (&self.words, &mut self.visits, &mut self.progress)
    }
}
