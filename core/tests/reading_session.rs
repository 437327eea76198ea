// core/tests/reading_session.rs
//
// Integration tests for ReadingSession slider gestures, taps and help.
//
// Tests cover:
// - Slow drags voicing each phoneme segment once, in order
// - Fast drags staying silent until a full release
// - Press-release without travel handled as a tap
// - Help offered on revisits of completed words
// - Struggle detection and visit policies
// - Audio backend failures not blocking completion

use kurbo::Rect;
use readalong_core::{
    AudioCall, Config, Lexicon, MemoryAudio, PointerSample, ReadingSession, SessionEvent,
    VisitPolicy,
};
use std::sync::Arc;

fn session_with(text: &str, config: Config) -> (ReadingSession<Lexicon>, MemoryAudio) {
    let audio = MemoryAudio::new();
    let mut session = ReadingSession::new(
        Arc::new(Lexicon::load_demo()),
        Box::new(audio.clone()),
        config,
    );
    session.load_page(text);
    session.take_events();
    audio.clear();
    (session, audio)
}

fn session(text: &str) -> (ReadingSession<Lexicon>, MemoryAudio) {
    session_with(text, Config::default())
}

fn slider() -> Rect {
    Rect::new(0.0, 0.0, 90.0, 20.0)
}

fn at(x: f64, t: f64) -> PointerSample {
    PointerSample::new(x, 10.0, t)
}

#[test]
fn slow_drag_voices_each_phoneme_once() {
    let (mut s, audio) = session("cat");

    assert!(s.pointer_down(0, at(0.0, 0.0), slider()));
    // Pointer-down alone never speaks.
    assert!(audio.spoken().is_empty());

    s.pointer_drag(at(5.0, 100.0), slider());
    s.pointer_drag(at(10.0, 200.0), slider());
    s.pointer_drag(at(35.0, 300.0), slider());
    s.pointer_drag(at(70.0, 500.0), slider());
    s.pointer_drag(at(89.0, 700.0), slider());
    // Sliding back does not revoice earlier segments.
    s.pointer_drag(at(40.0, 1000.0), slider());
    s.pointer_up(at(40.0, 1100.0));

    assert_eq!(audio.spoken(), vec!["k", "ae", "t"]);

    let phonemes: Vec<usize> = s
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            SessionEvent::PhonemeSpoken { phoneme_index, .. } => Some(phoneme_index),
            _ => None,
        })
        .collect();
    assert_eq!(phonemes, vec![0, 1, 2]);
}

#[test]
fn fast_drag_speaks_word_on_release() {
    let (mut s, audio) = session("the cat");

    s.pointer_down(1, at(0.0, 0.0), slider());
    s.pointer_drag(at(85.0, 50.0), slider());
    assert!(audio.spoken().is_empty());

    s.pointer_up(at(85.0, 60.0));
    assert_eq!(audio.spoken(), vec!["cat"]);
    assert!(s.take_events().contains(&SessionEvent::WordSpoken { index: 1 }));
}

#[test]
fn partial_fast_drag_says_nothing() {
    let (mut s, audio) = session("cat");

    s.pointer_down(0, at(0.0, 0.0), slider());
    s.pointer_drag(at(60.0, 20.0), slider());
    s.pointer_up(at(60.0, 30.0));
    assert!(audio.spoken().is_empty());
}

#[test]
fn unknown_word_is_spoken_whole_after_full_drag() {
    let (mut s, audio) = session("zebra!");

    s.pointer_down(0, at(0.0, 0.0), slider());
    s.pointer_drag(at(30.0, 200.0), slider());
    s.pointer_drag(at(88.0, 600.0), slider());
    s.pointer_up(at(88.0, 700.0));
    assert_eq!(audio.spoken(), vec!["zebra"]);
}

#[test]
fn press_without_travel_is_a_tap() {
    let (mut s, audio) = session("cat");

    s.pointer_down(0, at(40.0, 0.0), slider());
    s.pointer_drag(at(44.0, 80.0), slider());
    s.pointer_up(at(44.0, 120.0));

    assert_eq!(audio.spoken(), vec!["cat"]);
}

#[test]
fn drag_snapshot_resets_after_delay() {
    let (mut s, _audio) = session("the cat");

    s.pointer_down(1, at(0.0, 0.0), slider());
    s.pointer_drag(at(45.0, 100.0), slider());
    assert_eq!(s.context().drag.map(|d| d.word_index), Some(1));

    s.pointer_up(at(45.0, 200.0));
    // Still visible for the snap-back animation.
    assert!(s.context().drag.is_some());
    s.tick(499.0);
    assert!(s.context().drag.is_some());
    s.tick(500.0);
    assert!(s.context().drag.is_none());
    assert!(s
        .take_events()
        .contains(&SessionEvent::DragReset { word_index: 1 }));
}

#[test]
fn pointer_down_on_missing_word_is_ignored() {
    let (mut s, audio) = session("cat");

    assert!(!s.pointer_down(5, at(0.0, 0.0), slider()));
    s.pointer_up(at(0.0, 10.0));
    assert!(audio.calls().is_empty());
    assert!(!s.context().has_events());
}

#[test]
fn cancel_drops_the_gesture_silently() {
    let (mut s, audio) = session("cat");

    s.pointer_down(0, at(0.0, 0.0), slider());
    s.pointer_drag(at(88.0, 10.0), slider());
    s.pointer_cancel();
    s.pointer_up(at(88.0, 20.0));

    assert!(audio.spoken().is_empty());
    assert!(s.context().drag.is_none());
    assert_eq!(s.context().active_word, None);
}

#[test]
fn help_offered_on_second_visit() {
    let (mut s, _audio) = session("the cat");

    s.tap(0, 0.0);
    assert!(s.context().help.is_none());

    s.tap(0, 100.0);
    let help = s.context().help.clone().expect("help after revisit");
    assert_eq!(help.word, "the");
    assert_eq!(help.sounds, vec!["dh", "ah"]);
    assert_eq!(help.syllables, vec!["the"]);
    assert!(s.take_events().contains(&SessionEvent::HelpOffered { index: 0 }));

    assert!(s.context_mut().dismiss_help().is_some());
    assert!(s.context().help.is_none());
}

#[test]
fn third_visit_flags_struggle() {
    let (mut s, _audio) = session("the cat");

    for t in [0.0, 100.0, 200.0] {
        s.tap(0, t);
    }
    let events = s.take_events();
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, SessionEvent::StruggleDetected { index: 0 }))
            .count(),
        1
    );
    let state = s.page().visit_state(0).unwrap();
    assert_eq!(state.visit_count, 3);
    assert!(state.is_struggling);
}

#[test]
fn words_ahead_are_previewed_not_completed() {
    let (mut s, _audio) = session("I see a cat.");

    s.tap(3, 0.0);
    assert!(!s.page().visit_state(3).unwrap().is_completed);
    assert_eq!(s.page().visit_state(3).unwrap().visit_count, 1);

    for (i, t) in [(0, 10.0), (1, 20.0), (2, 30.0), (3, 40.0)] {
        s.tap(i, t);
    }
    assert!(s.page().visits().all_completed());
    assert!(s.page().page_completed());
}

#[test]
fn complete_on_touch_completes_any_word() {
    let config = Config {
        visit_policy: VisitPolicy::CompleteOnTouch,
        ..Config::default()
    };
    let (mut s, _audio) = session_with("I see a cat.", config);

    s.tap(3, 0.0);
    assert!(s.take_events().contains(&SessionEvent::WordCompleted { index: 3 }));
}

#[test]
fn failing_audio_does_not_block_completion() {
    let (mut s, audio) = session("cat");
    audio.set_failing(true);

    s.tap(0, 0.0);
    assert!(s.page().visit_state(0).unwrap().is_completed);
    assert_eq!(s.audio_failures(), 1);
    assert!(audio
        .calls()
        .iter()
        .all(|c| matches!(c, AudioCall::CancelAll)));
}

#[test]
fn only_one_word_is_active() {
    let (mut s, _audio) = session("I see a cat.");

    s.pointer_down(1, at(0.0, 0.0), slider());
    s.pointer_down(2, at(0.0, 50.0), slider());
    let active: Vec<usize> = s
        .page()
        .visits()
        .states()
        .iter()
        .enumerate()
        .filter(|(_, st)| st.is_active)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(active, vec![2]);
}

/// Slide across a word `width` px wide at a constant speed, one sample per
/// 16ms frame (the last frame is shortened so the speed never changes).
fn constant_drag_across(s: &mut ReadingSession<Lexicon>, index: usize, width: f64, speed: f64) {
    let rect = Rect::new(0.0, 0.0, width, 20.0);
    let (mut x, mut t) = (0.0, 0.0);
    s.pointer_down(index, at(x, t), rect);
    while x < rect.x1 {
        let dx = (speed * 16.0).min(rect.x1 - x);
        x += dx;
        t += dx / speed;
        s.pointer_drag(at(x, t), rect);
    }
    s.pointer_up(at(x, t));
}

fn constant_drag(s: &mut ReadingSession<Lexicon>, index: usize, speed: f64) {
    constant_drag_across(s, index, 100.0, speed);
}

#[test]
fn constant_slow_crossing_voices_four_segments_once() {
    let (mut s, audio) = session("frog");
    constant_drag(&mut s, 0, 0.1);
    assert_eq!(audio.spoken(), vec!["f", "r", "aa", "g"]);
}

#[test]
fn narrow_word_voices_the_segment_under_the_press() {
    // 7px segments: the tap slop is crossed inside the second one.
    let (mut s, audio) = session("frog");
    constant_drag_across(&mut s, 0, 28.0, 0.1);
    assert_eq!(audio.spoken(), vec!["f", "r", "aa", "g"]);

    let phonemes: Vec<usize> = s
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            SessionEvent::PhonemeSpoken { phoneme_index, .. } => Some(phoneme_index),
            _ => None,
        })
        .collect();
    assert_eq!(phonemes, vec![0, 1, 2, 3]);

    // 3px segments: the slop covers two of them.
    let (mut s, audio) = session("frog");
    constant_drag_across(&mut s, 0, 12.0, 0.1);
    assert_eq!(audio.spoken(), vec!["f", "r", "aa", "g"]);
}

#[test]
fn constant_fast_crossing_skips_phonemes() {
    let (mut s, audio) = session("frog");
    constant_drag(&mut s, 0, 0.5);
    assert_eq!(audio.spoken(), vec!["frog"]);
    assert!(!s
        .take_events()
        .iter()
        .any(|e| matches!(e, SessionEvent::PhonemeSpoken { .. })));
}

#[test]
fn reading_a_page_in_order_completes_it_on_the_last_word() {
    let (mut s, _audio) = session("I see a cat.");
    let words = s.page().words();
    assert_eq!(words.len(), 4);
    assert_eq!(words[3].original_text, "cat.");
    assert_eq!(words[3].normalized_text, "cat");
    assert_eq!(words[3].trailing_punctuation, ".");

    for i in 0..4 {
        assert!(!s.page().page_completed());
        constant_drag(&mut s, i, 0.5);
    }
    assert!(s.page().page_completed());
    let completions = s
        .take_events()
        .into_iter()
        .filter(|e| matches!(e, SessionEvent::PageCompleted { .. }))
        .count();
    assert_eq!(completions, 1);
}
