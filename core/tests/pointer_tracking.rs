// core/tests/pointer_tracking.rs
//
// Integration tests for ambient pointer tracking over rendered word boxes.
//
// Tests cover:
// - Entered/left transitions and the single active word
// - Box arrays that do not match the page (stale layout)
// - Hover drags voicing phonemes at a slow pace
// - Fast sweeps speaking the whole word when the pointer moves on
// - Ambient entry stopping auto-play
// - Slider gestures ignoring ambient moves until release

use kurbo::Rect;
use readalong_core::{
    Config, Lexicon, MemoryAudio, PointerSample, ReadingSession, SessionEvent, WordBox,
};
use std::sync::Arc;

fn session(text: &str) -> (ReadingSession<Lexicon>, MemoryAudio) {
    let audio = MemoryAudio::new();
    let mut s = ReadingSession::new(
        Arc::new(Lexicon::load_demo()),
        Box::new(audio.clone()),
        Config::default(),
    );
    s.load_page(text);
    s.take_events();
    audio.clear();
    (s, audio)
}

/// One line of words, 60px wide with 40px gaps, top edge at y=100.
fn line(count: usize) -> Vec<WordBox> {
    (0..count)
        .map(|i| {
            let left = i as f64 * 100.0;
            WordBox::new(i, left, 100.0, left + 60.0, 130.0)
        })
        .collect()
}

// The tracker looks 50px above the finger, so y=165 hovers the line.
fn finger(x: f64, t: f64) -> PointerSample {
    PointerSample::new(x, 165.0, t)
}

#[test]
fn entering_and_leaving_words() {
    let (mut s, _audio) = session("I see a cat.");
    let boxes = line(4);

    s.pointer_move(finger(30.0, 0.0), &boxes);
    assert_eq!(s.context().active_word, Some(0));
    assert_eq!(
        s.take_events(),
        vec![
            SessionEvent::WordEntered { index: 0, visit_count: 1 },
            SessionEvent::WordCompleted { index: 0 },
        ]
    );

    s.pointer_move(finger(130.0, 100.0), &boxes);
    assert_eq!(s.context().active_word, Some(1));
    let events = s.take_events();
    assert_eq!(events[0], SessionEvent::WordLeft { index: 0 });
    assert_eq!(events[1], SessionEvent::WordEntered { index: 1, visit_count: 1 });

    s.pointer_move(PointerSample::new(130.0, 400.0, 200.0), &boxes);
    assert_eq!(s.context().active_word, None);
    assert_eq!(s.page().visits().active(), None);
    assert!(s.take_events().contains(&SessionEvent::WordLeft { index: 1 }));

    // Visits survive leaving.
    assert!(s.page().visit_state(0).unwrap().is_completed);
}

#[test]
fn staying_on_a_word_counts_one_visit() {
    let (mut s, _audio) = session("I see a cat.");
    let boxes = line(4);

    for (i, x) in [10.0, 20.0, 30.0, 40.0].into_iter().enumerate() {
        s.pointer_move(finger(x, i as f64 * 50.0), &boxes);
    }
    assert_eq!(s.page().visit_state(0).unwrap().visit_count, 1);
}

#[test]
fn boxes_beyond_the_page_are_ignored() {
    let (mut s, audio) = session("I see");
    let boxes = vec![WordBox::new(7, 0.0, 100.0, 60.0, 130.0)];

    s.pointer_move(finger(30.0, 0.0), &boxes);
    s.pointer_move(finger(35.0, 100.0), &boxes);
    assert_eq!(s.context().active_word, None);
    assert!(!s.context().has_events());
    assert!(audio.calls().is_empty());
}

#[test]
fn degenerate_boxes_never_match() {
    let (mut s, _audio) = session("I see");
    let boxes = vec![
        WordBox::new(0, 0.0, 100.0, 0.0, 130.0),
        WordBox::new(1, f64::NAN, 100.0, 60.0, 130.0),
    ];

    s.pointer_move(finger(0.0, 0.0), &boxes);
    s.pointer_move(finger(30.0, 10.0), &boxes);
    assert_eq!(s.context().active_word, None);
}

#[test]
fn slow_hover_voices_phonemes() {
    let (mut s, audio) = session("cat");
    let boxes = vec![WordBox::new(0, 0.0, 100.0, 90.0, 130.0)];

    s.pointer_move(finger(1.0, 0.0), &boxes);
    s.pointer_move(finger(10.0, 100.0), &boxes);
    s.pointer_move(finger(40.0, 300.0), &boxes);
    s.pointer_move(finger(80.0, 500.0), &boxes);

    assert_eq!(audio.spoken(), vec!["k", "ae", "t"]);
}

#[test]
fn fast_sweep_speaks_word_when_leaving() {
    let (mut s, audio) = session("cat");
    let boxes = vec![WordBox::new(0, 0.0, 100.0, 90.0, 130.0)];

    s.pointer_move(finger(1.0, 0.0), &boxes);
    s.pointer_move(finger(85.0, 20.0), &boxes);
    assert!(audio.spoken().is_empty());

    s.pointer_move(finger(200.0, 40.0), &boxes);
    assert_eq!(audio.spoken(), vec!["cat"]);
}

#[test]
fn hovering_a_word_stops_autoplay() {
    let (mut s, audio) = session("I see a cat.");
    let boxes = line(4);

    s.start_autoplay(0.0);
    s.pointer_move(finger(230.0, 100.0), &boxes);
    assert!(!s.is_autoplaying());
    assert!(s.take_events().contains(&SessionEvent::AutoPlayStopped));

    s.tick(10_000.0);
    assert_eq!(audio.spoken(), vec!["i"]);
}

#[test]
fn slider_gesture_survives_ambient_moves() {
    let (mut s, audio) = session("the cat");
    let boxes = line(2);
    let slider = Rect::new(100.0, 100.0, 160.0, 130.0);

    assert!(s.pointer_down(1, PointerSample::new(100.0, 115.0, 0.0), slider));
    // The platform also reports the press as a move over the first word.
    s.pointer_move(finger(30.0, 5.0), &boxes);
    assert_eq!(s.context().active_word, Some(1));
    assert_eq!(s.page().visit_state(0).unwrap().visit_count, 0);

    s.pointer_drag(PointerSample::new(158.0, 115.0, 40.0), slider);
    s.pointer_up(PointerSample::new(158.0, 115.0, 50.0));
    assert_eq!(audio.spoken(), vec!["cat"]);
    assert!(s.take_events().contains(&SessionEvent::WordSpoken { index: 1 }));
}
