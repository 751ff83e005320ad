//! Color Squares core crate.
//!
//! A square falls toward two colored targets; click the target whose color
//! matches before it lands. Game rules (round generation, ticking, hit-testing,
//! scoring) live in platform-independent modules and are tested natively. The
//! `web` module wires them to a canvas, DOM buttons and WebAudio.

use thiserror::Error;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod game;
pub mod layout;
pub mod round;
pub mod surface;
mod web;

pub use config::{ATTEMPT_LIMITS, GameConfig, Speed};
pub use game::{FALL_TIME_CONSTANT, Game, Outcome, Phase, Summary};
pub use layout::Layout;
pub use round::{Color, DEFAULT_COLORS, Palette, Round, Square, new_round};
pub use surface::{Cue, Surface};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("palette needs at least two distinct colors, got {distinct}")]
    DegeneratePalette { distinct: usize },
    #[error("unknown speed preset '{0}' (expected slow, medium or fast)")]
    UnknownSpeed(String),
    #[error("unsupported attempt limit {0}")]
    UnsupportedAttemptLimit(u32),
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    web::init_logging();
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Bind the canvas and buttons. Safe to call more than once.
#[wasm_bindgen]
pub fn init_game() -> Result<(), JsValue> {
    web::init()
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::init()?;
    web::start()
}

#[wasm_bindgen]
pub fn stop_game() {
    web::stop();
}

#[wasm_bindgen]
pub fn set_speed(name: &str) -> Result<(), JsValue> {
    let speed: Speed = name.parse()?;
    web::init()?;
    web::set_speed(speed);
    Ok(())
}

#[wasm_bindgen]
pub fn set_attempt_limit(limit: u32) -> Result<(), JsValue> {
    web::init()?;
    web::set_attempt_limit(limit)?;
    Ok(())
}

#[wasm_bindgen]
pub fn acknowledge_summary() {
    web::acknowledge();
}

/// Final score as `{"score":N,"limit":M}`, or `null` unless a game just ended.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn summary_json() -> Result<JsValue, JsValue> {
    match web::summary() {
        Some(s) => serde_json::to_string(&s)
            .map(|json| JsValue::from_str(&json))
            .map_err(|e| JsValue::from_str(&e.to_string())),
        None => Ok(JsValue::NULL),
    }
}
