//! Game state machine: `Idle -> Running -> Ended -> Idle`.
//!
//! The host calls [`Game::tick`] once per display frame and [`Game::click`] for
//! pointer input (already mapped to canvas pixels), then drains [`Game::take_cues`]
//! for audio/visual feedback and renders with [`Game::draw`].

use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::GameError;
use crate::config::{GameConfig, Speed};
use crate::layout::Layout;
use crate::round::{Palette, Round, new_round};
use crate::surface::{Cue, Surface};

/// Scales the speed preset into pixels per 60 Hz frame.
pub const FALL_TIME_CONSTANT: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Ended,
}

/// How an attempt was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Clicked the target matching the falling color.
    Hit,
    /// Clicked the other target.
    Wrong,
    /// Falling square reached the floor.
    Missed,
}

/// Final result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    pub score: u32,
    pub limit: u32,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.score, self.limit)
    }
}

pub struct Game {
    config: GameConfig,
    palette: Palette,
    layout: Layout,
    rng: ChaCha8Rng,
    phase: Phase,
    score: u32,
    attempts: u32,
    attempt_limit: u32, // refreshed from config at start and on every resolution
    round: Option<Round>,
    // Set by any resolution, cleared by the next tick. Extra clicks in the same
    // frame must not resolve the freshly generated round.
    resolved_this_tick: bool,
    cues: Vec<Cue>,
    summary: Option<Summary>,
    generation: u64, // bumped by every start
}

impl Game {
    pub fn new(config: GameConfig, palette: Palette, layout: Layout, rng: ChaCha8Rng) -> Self {
        Self {
            attempt_limit: config.attempt_limit(),
            config,
            palette,
            layout,
            rng,
            phase: Phase::Idle,
            score: 0,
            attempts: 0,
            round: None,
            resolved_this_tick: false,
            cues: Vec::new(),
            summary: None,
            generation: 0,
        }
    }

    /// Default palette and config with a reproducible round sequence.
    pub fn with_seed(layout: Layout, seed: u64) -> Self {
        Self::new(
            GameConfig::default(),
            Palette::default(),
            layout,
            ChaCha8Rng::seed_from_u64(seed),
        )
    }

    // --- Commands ------------------------------------------------------------

    /// Begin a new game. Also valid from `Ended` (acknowledges the summary) and
    /// while running (restarts).
    pub fn start(&mut self) {
        self.score = 0;
        self.attempts = 0;
        self.attempt_limit = self.config.attempt_limit();
        self.summary = None;
        self.resolved_this_tick = false;
        self.round = Some(new_round(&self.layout, &self.palette, &mut self.rng));
        self.phase = Phase::Running;
        self.generation += 1;
        self.cues.push(Cue::GameStart);
        log::info!(
            "game started: speed={} limit={}",
            self.config.speed,
            self.attempt_limit
        );
    }

    /// Abort to `Idle`, discarding the round and counters. Returns false when
    /// already idle.
    pub fn stop(&mut self) -> bool {
        if self.phase == Phase::Idle {
            return false;
        }
        self.reset_to_idle();
        log::info!("game stopped");
        true
    }

    /// Dismiss the end-of-game summary.
    pub fn acknowledge(&mut self) -> bool {
        if self.phase != Phase::Ended {
            return false;
        }
        self.reset_to_idle();
        true
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.config.speed = speed;
    }

    /// Applies from the next resolution. A limit below the attempts already
    /// made ends the running game at that resolution.
    pub fn set_attempt_limit(&mut self, limit: u32) -> Result<(), GameError> {
        self.config.set_attempt_limit(limit)
    }

    /// New canvas dimensions. The in-flight round keeps its geometry; the next
    /// round is laid out with the new size.
    pub fn resize(&mut self, layout: Layout) {
        self.layout = layout;
    }

    // --- Simulation ----------------------------------------------------------

    /// Advance one frame. `dt` is measured in 60 Hz frames (`1.0` = one frame).
    pub fn tick(&mut self, dt: f64) -> Option<Outcome> {
        self.resolved_this_tick = false;
        if self.phase != Phase::Running {
            return None;
        }
        let step = self.config.speed.value() * FALL_TIME_CONSTANT * dt.max(0.0);
        let round = self.round.as_mut()?;
        round.falling.y += step;
        if round.has_landed() {
            self.resolve(Outcome::Missed);
            return Some(Outcome::Missed);
        }
        None
    }

    /// Hit-test a point in canvas pixels against the targets.
    pub fn click(&mut self, x: f64, y: f64) -> Option<Outcome> {
        if self.phase != Phase::Running || self.resolved_this_tick {
            return None;
        }
        let round = self.round.as_ref()?;
        let target = round.target_at(x, y)?;
        let outcome = if round.is_correct(target) {
            Outcome::Hit
        } else {
            Outcome::Wrong
        };
        self.resolve(outcome);
        Some(outcome)
    }

    fn resolve(&mut self, outcome: Outcome) {
        self.attempts += 1;
        self.resolved_this_tick = true;
        self.attempt_limit = self.config.attempt_limit().max(self.attempts);
        match outcome {
            Outcome::Hit => {
                self.score += 1;
                self.cues.push(Cue::Correct);
            }
            Outcome::Wrong | Outcome::Missed => self.cues.push(Cue::Incorrect),
        }
        log::debug!(
            "attempt {}/{} resolved as {:?}, score {}",
            self.attempts,
            self.attempt_limit,
            outcome,
            self.score
        );

        if self.attempts >= self.attempt_limit {
            self.finish();
        } else {
            self.round = Some(new_round(&self.layout, &self.palette, &mut self.rng));
        }
    }

    fn finish(&mut self) {
        self.round = None;
        self.phase = Phase::Ended;
        let summary = Summary {
            score: self.score,
            limit: self.attempt_limit,
        };
        self.summary = Some(summary);
        self.cues.push(Cue::GameEnd);
        log::info!("game over: {summary}");
    }

    fn reset_to_idle(&mut self) {
        self.phase = Phase::Idle;
        self.score = 0;
        self.attempts = 0;
        self.round = None;
        self.summary = None;
        self.resolved_this_tick = false;
    }

    // --- Output --------------------------------------------------------------

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear(self.layout.width(), self.layout.height());
        if self.phase != Phase::Running {
            return;
        }
        let Some(round) = &self.round else { return };
        for sq in round.targets.iter().chain(std::iter::once(&round.falling)) {
            surface.fill_square(sq.x, sq.y, round.size, sq.color);
            surface.stroke_square(sq.x, sq.y, round.size);
        }
    }

    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Limit of the current (or next, when idle) game.
    pub fn attempt_limit(&self) -> u32 {
        match self.phase {
            Phase::Idle => self.config.attempt_limit(),
            Phase::Running | Phase::Ended => self.attempt_limit,
        }
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Only present while `Ended`.
    pub fn summary(&self) -> Option<Summary> {
        self.summary
    }

    /// Identifies the current game; changes on every [`Game::start`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Summary of the game started as `generation`, if that game is the one
    /// currently waiting for acknowledgement.
    pub fn summary_for(&self, generation: u64) -> Option<Summary> {
        self.summary.filter(|_| self.generation == generation)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Running score line, e.g. `3 of 10`.
    pub fn score_text(&self) -> String {
        format!("{} of {}", self.score, self.attempt_limit())
    }
}
