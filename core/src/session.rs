//! Reading session: the engine facade.
//!
//! `ReadingSession` wires the pieces together for one reader and one open
//! book. It owns the page state, pointer tracker, velocity estimator,
//! pronunciation director, auto-player and timer queue, and exposes the
//! handful of calls a view layer makes:
//!
//! - ambient tracking: [`pointer_move`](ReadingSession::pointer_move)
//! - word sliders: [`pointer_down`](ReadingSession::pointer_down),
//!   [`pointer_drag`](ReadingSession::pointer_drag),
//!   [`pointer_up`](ReadingSession::pointer_up),
//!   [`pointer_cancel`](ReadingSession::pointer_cancel)
//! - taps, auto-play, page navigation and [`tick`](ReadingSession::tick)
//!
//! After each call the platform reads [`context`](ReadingSession::context).
//! Everything runs on the caller's thread; timestamps are supplied by the
//! caller, which keeps timed behaviour deterministic.

use crate::audio::{AudioChannel, AudioOutput, ClipCatalog};
use crate::autoplay::{AutoPlayStep, AutoPlayer};
use crate::book::{Book, NavigationDecision};
use crate::context::{DragSnapshot, ReadingContext, SessionEvent};
use crate::director::{HelpProvider, PronunciationDirector, Spoken};
use crate::drag::DragSession;
use crate::lexicon::PhonemeLexicon;
use crate::page::PageState;
use crate::timer::{TimerKind, TimerQueue};
use crate::tracker::{PointerTracker, PointerTransition, WordBox};
use crate::velocity::{PointerSample, VelocityEstimator};
use crate::Config;
use kurbo::Rect;
use std::sync::Arc;

/// How the current drag started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    /// Explicit pointer-down on a word slider.
    Slider,
    /// Implicit session while ambient tracking hovers a word.
    Hover,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    session: DragSession,
    mode: DragMode,
}

pub struct ReadingSession<L: PhonemeLexicon> {
    lexicon: Arc<L>,
    config: Config,
    director: PronunciationDirector,
    help: Option<Box<dyn HelpProvider>>,
    tracker: PointerTracker,
    velocity: VelocityEstimator,
    drag: Option<ActiveDrag>,
    page: PageState,
    autoplay: AutoPlayer,
    timers: TimerQueue,
    book: Book,
    page_index: usize,
    epoch: u64,
    context: ReadingContext,
}

impl<L: PhonemeLexicon> std::fmt::Debug for ReadingSession<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadingSession")
            .field("page_index", &self.page_index)
            .field("epoch", &self.epoch)
            .field("page", &self.page)
            .field("autoplay", &self.autoplay)
            .field("timers", &self.timers)
            .finish_non_exhaustive()
    }
}

impl<L: PhonemeLexicon> ReadingSession<L> {
    /// Create a session with no page loaded.
    pub fn new(lexicon: Arc<L>, audio: Box<dyn AudioOutput>, config: Config) -> Self {
        let director = PronunciationDirector::new(config.director_config(), AudioChannel::new(audio));
        Self {
            lexicon,
            director,
            help: None,
            tracker: PointerTracker::new(config.tracker_config()),
            velocity: VelocityEstimator::new(config.slow_speed_threshold),
            drag: None,
            page: PageState::empty(0),
            autoplay: AutoPlayer::new(config.autoplay_config()),
            timers: TimerQueue::new(),
            book: Book::default(),
            page_index: 0,
            epoch: 0,
            context: ReadingContext::new(),
            config,
        }
    }

    /// Attach a syllable/hint source for help payloads.
    pub fn with_help_provider(mut self, provider: Box<dyn HelpProvider>) -> Self {
        self.help = Some(provider);
        self
    }

    /// Prefer recorded clips for whole-word audio.
    pub fn with_clips(mut self, clips: ClipCatalog) -> Self {
        self.director = self.director.with_clips(clips);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn context(&self) -> &ReadingContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ReadingContext {
        &mut self.context
    }

    /// Drain pending events.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        self.context.take_events()
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.is_running()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn audio_failures(&self) -> usize {
        self.director.channel().failures()
    }

    pub fn set_autoplay_speed(&mut self, speed: f64) {
        self.config.autoplay_speed = speed;
        self.autoplay.set_speed(speed);
    }

    // ========== Pages ==========

    /// Show loose text as a one-page book.
    pub fn load_page(&mut self, text: &str) {
        self.open_book(Book::single_page(text));
    }

    /// Open `book` at its first page.
    pub fn open_book(&mut self, book: Book) {
        tracing::info!(title = %book.title, pages = book.page_count(), "opening book");
        self.book = book;
        self.page_index = 0;
        self.replace_page();
    }

    /// Move to the next page if there is one.
    pub fn advance_page(&mut self) -> NavigationDecision {
        let decision = self.book.decision_after(self.page_index);
        if let NavigationDecision::Advance { next_page } = decision {
            self.page_index = next_page;
            self.replace_page();
        }
        decision
    }

    /// Stop everything: auto-play, timers, audio and drags.
    pub fn teardown(&mut self) {
        self.stop_autoplay();
        self.timers.clear();
        self.director.stop();
        self.drag = None;
        self.tracker.reset();
        self.velocity.reset();
        self.context.clear();
    }

    fn replace_page(&mut self) {
        self.stop_autoplay();
        self.timers.clear();
        self.director.stop();
        self.drag = None;
        self.tracker.reset();
        self.velocity.reset();

        self.epoch += 1;
        let text = self.book.page(self.page_index).unwrap_or("");
        self.page = PageState::new(
            text,
            &*self.lexicon,
            self.config.visit_policy,
            self.config.struggle_threshold,
            self.epoch,
        );
        self.context.clear();
        self.context.page_index = self.page_index;
        tracing::debug!(
            page = self.page_index,
            epoch = self.epoch,
            words = self.page.words().len(),
            "page loaded"
        );
    }

    // ========== Ambient tracking ==========

    /// Process a pointer move over the page.
    ///
    /// `boxes` are the current word rectangles from the renderer.
    pub fn pointer_move(&mut self, sample: PointerSample, boxes: &[WordBox]) {
        // A slider gesture owns the pointer until it is released or cancelled.
        if matches!(&self.drag, Some(d) if d.mode == DragMode::Slider) {
            return;
        }
        let had_previous = self.velocity.has_previous();
        self.velocity.push(sample);

        let word_count = self.page.words().len();
        match self.tracker.update(sample.position(), boxes, word_count) {
            Some(PointerTransition::Entered { index, previous }) => {
                if let Some(previous) = previous {
                    self.finish_hover(previous);
                    self.context.events.push(SessionEvent::WordLeft { index: previous });
                }
                self.stop_autoplay();
                self.enter_word(index, sample.timestamp_ms);
                let rect = box_rect(boxes, index);
                let phonemes = self.page.word(index).map_or(0, |w| w.phonemes.len());
                let session = DragSession::start(index, phonemes, rect, sample.x);
                self.context.drag = Some(snapshot(&session));
                self.drag = Some(ActiveDrag {
                    session,
                    mode: DragMode::Hover,
                });
            }
            Some(PointerTransition::Left { previous }) => {
                self.finish_hover(previous);
                self.page.parts_mut().1.leave();
                self.context.active_word = None;
                self.context.drag = None;
                self.context.events.push(SessionEvent::WordLeft { index: previous });
            }
            None => {}
        }

        if let Some(index) = self.tracker.current() {
            let hovering = matches!(
                &self.drag,
                Some(d) if d.mode == DragMode::Hover && d.session.word_index == index
            );
            if hovering {
                let rect = box_rect(boxes, index);
                self.advance_drag(sample.x, rect, had_previous);
            }
        }
    }

    fn finish_hover(&mut self, index: usize) {
        let Some(active) = self.drag.take() else {
            return;
        };
        if active.mode != DragMode::Hover || active.session.word_index != index {
            self.drag = Some(active);
            return;
        }
        if let Some(word) = self.page.word(index) {
            if let Some(Spoken::Word { word_index }) =
                self.director
                    .on_release(word, &active.session, self.velocity.pace())
            {
                self.context.events.push(SessionEvent::WordSpoken { index: word_index });
            }
        }
    }

    // ========== Word sliders ==========

    /// Pointer pressed on the slider of word `index`.
    ///
    /// Returns false when the index does not name a word on this page.
    pub fn pointer_down(&mut self, index: usize, sample: PointerSample, rect: Rect) -> bool {
        let Some(phonemes) = self.page.word(index).map(|w| w.phonemes.len()) else {
            return false;
        };
        self.stop_autoplay();
        self.drag = None;
        self.timers
            .cancel_where(|k| matches!(k, TimerKind::DragReset { .. }));
        self.velocity.reset();
        self.velocity.push(sample);

        self.enter_word(index, sample.timestamp_ms);
        let session = DragSession::start(index, phonemes, rect, sample.x);
        self.context.drag = Some(snapshot(&session));
        self.drag = Some(ActiveDrag {
            session,
            mode: DragMode::Slider,
        });
        true
    }

    /// Pointer moved while pressed on a slider.
    pub fn pointer_drag(&mut self, sample: PointerSample, rect: Rect) {
        if !matches!(&self.drag, Some(d) if d.mode == DragMode::Slider) {
            return;
        }
        let had_previous = self.velocity.has_previous();
        self.velocity.push(sample);
        self.advance_drag(sample.x, rect, had_previous);
    }

    /// Pointer released. A release without travel is handled as a tap.
    ///
    /// The release sample does not feed the velocity estimator: touch-up
    /// events usually repeat the last position and would read as a stop.
    pub fn pointer_up(&mut self, sample: PointerSample) {
        let Some(active) = self.drag.take() else {
            return;
        };
        if active.mode != DragMode::Slider {
            self.drag = Some(active);
            return;
        }
        let index = active.session.word_index;
        if active.session.moved {
            if let Some(word) = self.page.word(index) {
                if self
                    .director
                    .on_release(word, &active.session, self.velocity.pace())
                    .is_some()
                {
                    self.context.events.push(SessionEvent::WordSpoken { index });
                }
            }
        } else {
            self.speak_tapped(index);
        }

        self.page.parts_mut().1.leave();
        self.context.active_word = None;
        self.context.events.push(SessionEvent::WordLeft { index });
        self.timers.schedule(
            TimerKind::DragReset { word_index: index },
            sample.timestamp_ms + self.config.drag_reset_delay_ms,
            self.epoch,
        );
    }

    /// Gesture aborted by the platform: no audio, no lingering snapshot.
    pub fn pointer_cancel(&mut self) {
        if let Some(active) = self.drag.take() {
            if active.mode == DragMode::Slider {
                self.page.parts_mut().1.leave();
                self.context.active_word = None;
                self.context.drag = None;
                self.context.events.push(SessionEvent::WordLeft {
                    index: active.session.word_index,
                });
            } else {
                self.drag = Some(active);
            }
        }
    }

    /// A tap on word `index` outside any slider gesture.
    pub fn tap(&mut self, index: usize, now_ms: f64) -> bool {
        if self.page.word(index).is_none() {
            return false;
        }
        self.stop_autoplay();
        self.enter_word(index, now_ms);
        self.speak_tapped(index);
        self.page.parts_mut().1.leave();
        self.context.active_word = None;
        self.context.events.push(SessionEvent::WordLeft { index });
        true
    }

    fn speak_tapped(&mut self, index: usize) {
        let Some(word) = self.page.word(index) else {
            return;
        };
        self.director.on_tap(word);
        self.context.events.push(SessionEvent::WordSpoken { index });

        let Some(state) = self.page.visit_state(index) else {
            return;
        };
        if let Some(payload) = self.director.help_for(
            word,
            state,
            self.help.as_deref(),
            self.config.age_level,
            &*self.lexicon,
        ) {
            tracing::debug!(index, "offering help");
            self.context.help = Some(payload);
            self.context.events.push(SessionEvent::HelpOffered { index });
        }
    }

    fn advance_drag(&mut self, x: f64, rect: Rect, allow_phonemes: bool) {
        let Some(active) = self.drag.as_mut() else {
            return;
        };
        let was_moved = active.session.moved;
        active.session.update(rect, x, self.config.tap_slop);
        self.context.drag = Some(snapshot(&active.session));
        // A press that has not left the tap slop is still a tap.
        if !allow_phonemes || !active.session.moved {
            return;
        }
        let Some(word) = self.page.word(active.session.word_index) else {
            return;
        };
        let pace = self.velocity.pace();

        // On narrow words the slop can span whole segments: voice the ones
        // crossed since the press before the one now under the pointer.
        let mut spoken = Vec::new();
        if !was_moved {
            if let (Some(start), Some(current)) =
                (active.session.start_phoneme, active.session.phoneme_index)
            {
                for segment in start..current {
                    spoken.extend(self.director.voice_segment(
                        word,
                        &mut active.session,
                        segment,
                        pace,
                        &*self.lexicon,
                    ));
                }
            }
        }
        spoken.extend(self.director.on_drag_progress(
            word,
            &mut active.session,
            pace,
            &*self.lexicon,
        ));

        for sound in spoken {
            if let Spoken::Phoneme {
                word_index,
                phoneme_index,
            } = sound
            {
                self.context.events.push(SessionEvent::PhonemeSpoken {
                    word_index,
                    phoneme_index,
                });
            }
        }
    }

    fn enter_word(&mut self, index: usize, now_ms: f64) {
        let (_, visits, progress) = self.page.parts_mut();
        let Some(outcome) = visits.enter(index) else {
            return;
        };
        let page_done = progress.observe(visits);

        self.context.active_word = Some(index);
        self.context.events.push(SessionEvent::WordEntered {
            index,
            visit_count: outcome.visit_count,
        });
        if outcome.newly_completed {
            self.context.events.push(SessionEvent::WordCompleted { index });
        }
        if outcome.became_struggling {
            self.context.events.push(SessionEvent::StruggleDetected { index });
        }
        if page_done {
            self.context.events.push(SessionEvent::PageCompleted {
                page: self.page_index,
            });
            self.timers.schedule(
                TimerKind::PageComplete,
                now_ms + self.config.page_complete_delay_ms,
                self.epoch,
            );
        }
    }

    // ========== Auto-play ==========

    /// Read the page aloud from the first word.
    pub fn start_autoplay(&mut self, now_ms: f64) -> bool {
        if self.page.words().is_empty() {
            return false;
        }
        self.stop_autoplay();
        let generation = self.autoplay.start(0);
        self.context.events.push(SessionEvent::AutoPlayStarted { from: 0 });
        self.autoplay_speak(0, generation, now_ms);
        true
    }

    /// Stop auto-play. In-flight audio is left alone; see [`stop_audio`](Self::stop_audio).
    pub fn stop_autoplay(&mut self) -> bool {
        if !self.autoplay.stop() {
            return false;
        }
        self.timers
            .cancel_where(|k| matches!(k, TimerKind::AutoPlayStep { .. }));
        self.context.autoplay_word = None;
        self.context.events.push(SessionEvent::AutoPlayStopped);
        tracing::debug!("auto-play stopped");
        true
    }

    /// Silence whatever is playing.
    pub fn stop_audio(&mut self) {
        self.director.stop();
    }

    fn autoplay_speak(&mut self, index: usize, generation: u64, now_ms: f64) {
        if let Some(word) = self.page.word(index) {
            self.director.speak_word(word);
            self.context.events.push(SessionEvent::WordSpoken { index });
        }
        self.context.autoplay_word = Some(index);
        self.context.events.push(SessionEvent::AutoPlayAdvanced { index });
        self.timers.schedule(
            TimerKind::AutoPlayStep { generation },
            now_ms + self.autoplay.config().step_delay_ms(),
            self.epoch,
        );
    }

    // ========== Timers ==========

    /// Fire every timer due at `now_ms`.
    pub fn tick(&mut self, now_ms: f64) {
        for timer in self.timers.drain_due(now_ms) {
            if timer.epoch != self.page.epoch() {
                tracing::warn!(?timer, current = self.page.epoch(), "discarding stale timer");
                continue;
            }
            match timer.kind {
                TimerKind::DragReset { word_index } => {
                    let showing = self.context.drag.map(|d| d.word_index) == Some(word_index);
                    if self.drag.is_none() && showing {
                        self.context.drag = None;
                        self.context.events.push(SessionEvent::DragReset { word_index });
                    }
                }
                TimerKind::PageComplete => {
                    let decision = self.book.decision_after(self.page_index);
                    tracing::info!(page = self.page_index, ?decision, "navigation due");
                    self.context.events.push(SessionEvent::NavigationDue {
                        page: self.page_index,
                        decision,
                    });
                }
                TimerKind::AutoPlayStep { generation } => {
                    let word_count = self.page.words().len();
                    match self.autoplay.on_step(generation, word_count) {
                        AutoPlayStep::Stale => {}
                        AutoPlayStep::Advance(index) => {
                            self.autoplay_speak(index, generation, now_ms);
                        }
                        AutoPlayStep::Finished => {
                            self.context.autoplay_word = None;
                            self.context.events.push(SessionEvent::AutoPlayFinished);
                        }
                    }
                }
            }
        }
    }
}

fn box_rect(boxes: &[WordBox], index: usize) -> Rect {
    boxes
        .iter()
        .find(|b| b.index == index)
        .map(|b| b.rect)
        .unwrap_or(Rect::ZERO)
}

fn snapshot(session: &DragSession) -> DragSnapshot {
    DragSnapshot {
        word_index: session.word_index,
        progress: session.progress,
        phoneme_index: session.phoneme_index,
    }
}
