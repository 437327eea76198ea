//! Auto-play: read the page aloud word by word.
//!
//! The walk is cooperative. Each step speaks a word and schedules the next
//! step on the session's timer queue; nothing runs in the background. A run
//! is identified by a generation number, and both the running flag and the
//! generation are checked when a step fires, so a stopped or restarted run
//! can never advance again even if one of its timers slips through.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoPlayConfig {
    /// Pause after each word at speed 1.0.
    pub base_delay_ms: f64,
    /// Playback speed multiplier; higher is faster.
    pub speed: f64,
}

impl Default for AutoPlayConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 1200.0,
            speed: 1.0,
        }
    }
}

impl AutoPlayConfig {
    /// Slowest and fastest accepted speed settings.
    pub const SPEED_RANGE: (f64, f64) = (0.25, 4.0);

    /// Delay between words for the configured speed.
    pub fn step_delay_ms(&self) -> f64 {
        let (lo, hi) = Self::SPEED_RANGE;
        let speed = if self.speed.is_finite() {
            self.speed.clamp(lo, hi)
        } else {
            1.0
        };
        self.base_delay_ms.max(0.0) / speed
    }
}

/// Result of a fired step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoPlayStep {
    /// The step belongs to a stopped or superseded run.
    Stale,
    /// Speak this word next.
    Advance(usize),
    /// The last word was spoken; the run is over.
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct AutoPlayer {
    config: AutoPlayConfig,
    running: bool,
    cursor: usize,
    generation: u64,
}

impl AutoPlayer {
    pub fn new(config: AutoPlayConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &AutoPlayConfig {
        &self.config
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.config.speed = speed;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Word currently being read aloud.
    pub fn current(&self) -> Option<usize> {
        self.running.then_some(self.cursor)
    }

    /// Begin a new run at `from`. Returns the run's generation.
    pub fn start(&mut self, from: usize) -> u64 {
        self.generation += 1;
        self.running = true;
        self.cursor = from;
        self.generation
    }

    /// Stop the current run. Returns true if one was running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        self.generation += 1;
        was_running
    }

    /// Handle a fired step timer.
    pub fn on_step(&mut self, generation: u64, word_count: usize) -> AutoPlayStep {
        if !self.running || generation != self.generation {
            return AutoPlayStep::Stale;
        }
        self.cursor += 1;
        if self.cursor >= word_count {
            self.running = false;
            AutoPlayStep::Finished
        } else {
            AutoPlayStep::Advance(self.cursor)
        }
    }
}
