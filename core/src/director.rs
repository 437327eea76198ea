//! Pronunciation decisions.
//!
//! The director turns the current word, drag state and pace into audio:
//!
//! - slow drag over a word with phonemes: each newly reached phoneme segment
//!   is voiced once, through its speakable surrogate;
//! - release past the completion threshold: the whole word, when the drag was
//!   fast or the word has no phonemes;
//! - tap: always the whole word.
//!
//! It also owns the rule for when help is offered. What the help contains
//! (syllables, hints) comes from a [`HelpProvider`].

use crate::audio::{AudioChannel, ClipCatalog, Utterance, UtteranceKind};
use crate::drag::DragSession;
use crate::lexicon::PhonemeLexicon;
use crate::segmenter::WordUnit;
use crate::velocity::Pace;
use crate::visit::WordVisitState;
use serde::{Deserialize, Serialize};

/// Syllable and hint source for the help payload.
pub trait HelpProvider {
    fn syllables(&self, word: &str) -> Vec<String>;
    fn hint(&self, word: &str, age_level: u8) -> String;
}

/// Phonetic breakdown shown when a child keeps coming back to a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpPayload {
    pub word_index: usize,
    pub word: String,
    pub syllables: Vec<String>,
    pub hint: String,
    /// Speakable surrogate for each phoneme, in order.
    pub sounds: Vec<String>,
}

/// Tunables for the director.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectorConfig {
    /// Release progress above which a drag counts as a full read.
    pub completion_progress: f64,
    /// Visits after which a completed word offers help.
    pub help_visit_threshold: u32,
    pub word_rate: f32,
    pub phoneme_rate: f32,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            completion_progress: 0.8,
            help_visit_threshold: 2,
            word_rate: 0.8,
            phoneme_rate: 0.7,
        }
    }
}

/// Audio decision that was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spoken {
    Phoneme { word_index: usize, phoneme_index: usize },
    Word { word_index: usize },
}

#[derive(Debug)]
pub struct PronunciationDirector {
    config: DirectorConfig,
    channel: AudioChannel,
    clips: ClipCatalog,
}

impl PronunciationDirector {
    pub fn new(config: DirectorConfig, channel: AudioChannel) -> Self {
        Self {
            config,
            channel,
            clips: ClipCatalog::new(),
        }
    }

    pub fn with_clips(mut self, clips: ClipCatalog) -> Self {
        self.clips = clips;
        self
    }

    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    pub fn channel(&self) -> &AudioChannel {
        &self.channel
    }

    /// Phoneme path: called on every drag move after `drag.update`.
    pub fn on_drag_progress<L: PhonemeLexicon + ?Sized>(
        &mut self,
        word: &WordUnit,
        drag: &mut DragSession,
        pace: Pace,
        lexicon: &L,
    ) -> Option<Spoken> {
        let segment = drag.phoneme_index?;
        self.voice_segment(word, drag, segment, pace, lexicon)
    }

    /// Voice `segment` of `word` unless it was already voiced in this gesture.
    pub fn voice_segment<L: PhonemeLexicon + ?Sized>(
        &mut self,
        word: &WordUnit,
        drag: &mut DragSession,
        segment: usize,
        pace: Pace,
        lexicon: &L,
    ) -> Option<Spoken> {
        if pace != Pace::Slow || !word.has_phonemes() {
            return None;
        }
        if !drag.is_unspoken(segment) {
            return None;
        }
        let phoneme = word.phonemes.get(segment)?;
        // The marker advances even if the backend rejects the sound, so a
        // failing device does not retrigger on every move.
        drag.mark_spoken(segment);
        self.channel.play(Utterance {
            kind: UtteranceKind::Phoneme {
                word_index: word.index,
                phoneme_index: segment,
            },
            text: lexicon.speakable(phoneme),
            rate: self.config.phoneme_rate,
            clip: None,
        });
        Some(Spoken::Phoneme {
            word_index: word.index,
            phoneme_index: segment,
        })
    }

    /// Release path: whole word after a full, fast (or phoneme-less) read.
    pub fn on_release(&mut self, word: &WordUnit, drag: &DragSession, pace: Pace) -> Option<Spoken> {
        let read_through = drag.progress > self.config.completion_progress;
        if read_through && (pace == Pace::Fast || !word.has_phonemes()) {
            Some(self.say_word(word))
        } else {
            None
        }
    }

    /// Tap path: always the whole word.
    pub fn on_tap(&mut self, word: &WordUnit) -> Spoken {
        self.say_word(word)
    }

    /// Auto-play path: the whole word, nothing else.
    pub fn speak_word(&mut self, word: &WordUnit) -> Spoken {
        self.say_word(word)
    }

    /// Whether a tap on this word should surface the phonetic breakdown.
    pub fn wants_help(&self, state: &WordVisitState) -> bool {
        state.is_completed
            && (state.visit_count >= self.config.help_visit_threshold || state.is_struggling)
    }

    /// Build the help payload when [`wants_help`](Self::wants_help) holds.
    pub fn help_for<L: PhonemeLexicon + ?Sized>(
        &self,
        word: &WordUnit,
        state: &WordVisitState,
        provider: Option<&dyn HelpProvider>,
        age_level: u8,
        lexicon: &L,
    ) -> Option<HelpPayload> {
        if !self.wants_help(state) {
            return None;
        }
        let text = word.spoken_text();
        let (syllables, hint) = match provider {
            Some(p) => (p.syllables(text), p.hint(text, age_level)),
            None => (vec![text.to_string()], String::new()),
        };
        Some(HelpPayload {
            word_index: word.index,
            word: text.to_string(),
            syllables,
            hint,
            sounds: word.phonemes.iter().map(|p| lexicon.speakable(p)).collect(),
        })
    }

    /// Silence the channel (teardown, explicit stop).
    pub fn stop(&mut self) {
        self.channel.stop();
    }

    fn say_word(&mut self, word: &WordUnit) -> Spoken {
        let clip = self.clips.get(&word.normalized_text).cloned();
        self.channel.play(Utterance {
            kind: UtteranceKind::Word {
                word_index: word.index,
            },
            text: word.spoken_text().to_string(),
            rate: self.config.word_rate,
            clip,
        });
        Spoken::Word {
            word_index: word.index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCall, ClipHandle, MemoryAudio};
    use crate::lexicon::Lexicon;
    use crate::segmenter::segment;
    use kurbo::Rect;

    fn setup() -> (PronunciationDirector, MemoryAudio, Lexicon) {
        let audio = MemoryAudio::new();
        let mut lx = Lexicon::load_demo();
        lx.set_surrogate("K", "kuh");
        let d = PronunciationDirector::new(
            DirectorConfig::default(),
            AudioChannel::new(Box::new(audio.clone())),
        );
        (d, audio, lx)
    }

    #[test]
    fn slow_drag_voices_each_segment_once() {
        let (mut d, audio, lx) = setup();
        let words = segment("cat", &lx);
        let rect = Rect::new(0.0, 0.0, 90.0, 20.0);
        let mut drag = DragSession::start(0, 3, rect, 0.0);
        for x in [5.0, 10.0, 35.0, 40.0, 70.0, 89.0] {
            drag.update(rect, x, 8.0);
            d.on_drag_progress(&words[0], &mut drag, Pace::Slow, &lx);
        }
        assert_eq!(audio.spoken(), vec!["kuh", "ae", "t"]);
    }

    #[test]
    fn fast_drag_stays_silent_until_release() {
        let (mut d, audio, lx) = setup();
        let words = segment("cat", &lx);
        let rect = Rect::new(0.0, 0.0, 90.0, 20.0);
        let mut drag = DragSession::start(0, 3, rect, 0.0);
        drag.update(rect, 85.0, 8.0);
        assert!(d.on_drag_progress(&words[0], &mut drag, Pace::Fast, &lx).is_none());
        assert!(audio.spoken().is_empty());
        assert_eq!(
            d.on_release(&words[0], &drag, Pace::Fast),
            Some(Spoken::Word { word_index: 0 })
        );
        assert_eq!(audio.spoken(), vec!["cat"]);
    }

    #[test]
    fn short_release_says_nothing() {
        let (mut d, _audio, lx) = setup();
        let words = segment("cat", &lx);
        let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
        let mut drag = DragSession::start(0, 3, rect, 0.0);
        drag.update(rect, 80.0, 8.0);
        assert!(d.on_release(&words[0], &drag, Pace::Fast).is_none());
    }

    #[test]
    fn unknown_word_falls_back_to_whole_word() {
        let (mut d, audio, lx) = setup();
        let words = segment("zebra", &lx);
        let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
        let mut drag = DragSession::start(0, 0, rect, 0.0);
        drag.update(rect, 95.0, 8.0);
        assert!(d.on_drag_progress(&words[0], &mut drag, Pace::Slow, &lx).is_none());
        assert!(d.on_release(&words[0], &drag, Pace::Slow).is_some());
        assert_eq!(audio.spoken(), vec!["zebra"]);
    }

    #[test]
    fn help_needs_completion_and_repeat_visits() {
        let (d, _audio, lx) = setup();
        let words = segment("cat", &lx);
        let mut state = WordVisitState {
            visit_count: 1,
            is_completed: true,
            ..Default::default()
        };
        assert!(d.help_for(&words[0], &state, None, 5, &lx).is_none());
        state.visit_count = 2;
        let help = d.help_for(&words[0], &state, None, 5, &lx).unwrap();
        assert_eq!(help.sounds, vec!["kuh", "ae", "t"]);
        assert_eq!(help.syllables, vec!["cat"]);
        state.is_completed = false;
        assert!(d.help_for(&words[0], &state, None, 5, &lx).is_none());
    }

    #[test]
    fn recorded_clip_wins_for_whole_words() {
        let (d, audio, lx) = setup();
        let mut clips = ClipCatalog::new();
        clips.insert("cat", ClipHandle("cat.ogg".into()));
        let mut d = d.with_clips(clips);
        let words = segment("Cat!", &lx);
        d.on_tap(&words[0]);
        assert!(audio.calls().contains(&AudioCall::Clip(ClipHandle("cat.ogg".into()))));
    }
}
