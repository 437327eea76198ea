//! Drag session across a single word slider.
//!
//! ## Usage
//!
//! 1) Pointer-down on a word: [`DragSession::start`] with the word's phoneme count.
//! 2) Each move: [`DragSession::update`] with the word rectangle and pointer x.
//! 3) Pointer-up or cancel: drop the session.
//!
//! Progress is the pointer's fractional position across the word's width and
//! maps onto phoneme segments by floor division.

use kurbo::Rect;

/// Pointer travel (px) below which a press-release counts as a tap.
pub const DEFAULT_TAP_SLOP: f64 = 8.0;

/// Fractional position of `x` across `rect`, clamped to `[0, 1]`.
pub fn progress_in(rect: Rect, x: f64) -> f64 {
    let r = rect.abs();
    let width = r.width();
    if !(width > 0.0) || !x.is_finite() {
        return 0.0;
    }
    ((x - r.x0) / width).clamp(0.0, 1.0)
}

/// Phoneme segment under `progress`, or `None` for words without phonemes.
pub fn phoneme_segment(progress: f64, phoneme_count: usize) -> Option<usize> {
    if phoneme_count == 0 {
        return None;
    }
    let raw = (progress.clamp(0.0, 1.0) * phoneme_count as f64).floor() as usize;
    Some(raw.min(phoneme_count - 1))
}

/// State of one continuous pointer-down-to-up gesture on a word.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub word_index: usize,
    pub progress: f64,
    pub phoneme_index: Option<usize>,
    /// Highest phoneme segment voiced so far in this gesture.
    pub last_spoken_phoneme: Option<usize>,
    pub start_x: f64,
    /// Segment under the press; held back while the gesture may still be a tap.
    pub start_phoneme: Option<usize>,
    /// Set once the pointer travelled further than the tap slop.
    pub moved: bool,
    phoneme_count: usize,
}

impl DragSession {
    pub fn start(word_index: usize, phoneme_count: usize, rect: Rect, x: f64) -> Self {
        let progress = progress_in(rect, x);
        let phoneme_index = phoneme_segment(progress, phoneme_count);
        Self {
            word_index,
            progress,
            phoneme_index,
            last_spoken_phoneme: None,
            start_x: x,
            start_phoneme: phoneme_index,
            moved: false,
            phoneme_count,
        }
    }

    /// Move the pointer. Returns the segment now under the pointer.
    pub fn update(&mut self, rect: Rect, x: f64, tap_slop: f64) -> Option<usize> {
        self.progress = progress_in(rect, x);
        self.phoneme_index = phoneme_segment(self.progress, self.phoneme_count);
        if (x - self.start_x).abs() > tap_slop {
            self.moved = true;
        }
        self.phoneme_index
    }

    pub fn phoneme_count(&self) -> usize {
        self.phoneme_count
    }

    /// Whether `segment` has not been voiced yet in this gesture.
    pub fn is_unspoken(&self, segment: usize) -> bool {
        self.last_spoken_phoneme.map_or(true, |last| segment > last)
    }

    pub fn mark_spoken(&mut self, segment: usize) {
        self.last_spoken_phoneme = Some(segment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped() {
        let r = Rect::new(100.0, 0.0, 200.0, 20.0);
        assert_eq!(progress_in(r, 50.0), 0.0);
        assert_eq!(progress_in(r, 150.0), 0.5);
        assert_eq!(progress_in(r, 260.0), 1.0);
        assert_eq!(progress_in(Rect::new(5.0, 0.0, 5.0, 1.0), 5.0), 0.0);
    }

    #[test]
    fn segments_floor_and_clamp() {
        assert_eq!(phoneme_segment(0.0, 4), Some(0));
        assert_eq!(phoneme_segment(0.249, 4), Some(0));
        assert_eq!(phoneme_segment(0.25, 4), Some(1));
        assert_eq!(phoneme_segment(0.99, 4), Some(3));
        assert_eq!(phoneme_segment(1.0, 4), Some(3));
        assert_eq!(phoneme_segment(0.5, 0), None);
    }

    #[test]
    fn small_wiggle_stays_a_tap() {
        let r = Rect::new(0.0, 0.0, 100.0, 20.0);
        let mut d = DragSession::start(0, 3, r, 10.0);
        d.update(r, 15.0, DEFAULT_TAP_SLOP);
        assert!(!d.moved);
        d.update(r, 40.0, DEFAULT_TAP_SLOP);
        assert!(d.moved);
    }

    #[test]
    fn spoken_marker_is_monotonic() {
        let r = Rect::new(0.0, 0.0, 100.0, 20.0);
        let mut d = DragSession::start(0, 4, r, 0.0);
        assert!(d.is_unspoken(0));
        d.mark_spoken(2);
        assert!(!d.is_unspoken(1));
        assert!(!d.is_unspoken(2));
        assert!(d.is_unspoken(3));
    }
}
