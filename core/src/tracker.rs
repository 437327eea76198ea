//! Pointer → word resolution.
//!
//! The rendering layer hands over one rectangle per visible word on every
//! pointer event; this module never queries layout itself. Resolution is a
//! plain inflated-rectangle containment test with two twists:
//!
//! - margins are asymmetric (more vertical slack than horizontal), and
//! - the query point is lifted by `lookahead` pixels, so a finger resting on
//!   the line below still selects the word being read.
//!
//! When inflated rectangles overlap (short adjacent words) the first box in
//! iteration order wins. There is no z-ordering; callers that care must order
//! the boxes themselves.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Screen rectangle of one word, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordBox {
    pub index: usize,
    pub rect: Rect,
}

impl WordBox {
    pub fn new(index: usize, left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            index,
            rect: Rect::new(left, top, right, bottom),
        }
    }
}

/// Hit-test tolerances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub horizontal_margin: f64,
    pub vertical_margin: f64,
    /// Upward offset applied to the raw pointer position.
    pub lookahead: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            horizontal_margin: 10.0,
            vertical_margin: 30.0,
            lookahead: 50.0,
        }
    }
}

/// Edge reported when the resolved word changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTransition {
    /// The pointer now resolves to `index`; `previous` is the word it left, if any.
    Entered { index: usize, previous: Option<usize> },
    /// The pointer no longer resolves to any word.
    Left { previous: usize },
}

/// Stateless hit test: first box whose inflated rect contains the lifted point.
pub fn locate(config: &TrackerConfig, point: Point, boxes: &[WordBox]) -> Option<usize> {
    let query = Point::new(point.x, point.y - config.lookahead);
    boxes
        .iter()
        .find(|b| {
            let r = b.rect.abs();
            // NaN or empty geometry from a half-finished layout never matches.
            if !(r.width() > 0.0 && r.height() > 0.0) {
                return false;
            }
            let expanded = r.inflate(config.horizontal_margin, config.vertical_margin);
            query.x >= expanded.x0
                && query.x <= expanded.x1
                && query.y >= expanded.y0
                && query.y <= expanded.y1
        })
        .map(|b| b.index)
}

/// Edge-triggered tracker remembering the last resolved word.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    config: TrackerConfig,
    current: Option<usize>,
}

impl PointerTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Word currently under the pointer.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Resolve `point` and report a transition if the resolved word changed.
    ///
    /// Boxes whose index is not below `word_count` cannot be targeted; this
    /// covers box arrays that lag behind a page change.
    pub fn update(
        &mut self,
        point: Point,
        boxes: &[WordBox],
        word_count: usize,
    ) -> Option<PointerTransition> {
        let resolved = locate(&self.config, point, boxes).filter(|&i| i < word_count);
        let previous = self.current;
        if resolved == previous {
            return None;
        }
        self.current = resolved;
        let transition = match (resolved, previous) {
            (Some(index), previous) => PointerTransition::Entered { index, previous },
            (None, Some(previous)) => PointerTransition::Left { previous },
            (None, None) => return None,
        };
        tracing::debug!(?transition, "pointer transition");
        Some(transition)
    }

    /// Forget the resolved word without emitting a transition (page change).
    pub fn reset(&mut self) {
        self.current = None;
    }
}
