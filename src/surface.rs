//! Seams between the game and its host: the draw target and feedback cues.

use crate::round::Color;

/// Drawing primitives the game needs once per frame.
pub trait Surface {
    fn clear(&mut self, width: f64, height: f64);
    fn fill_square(&mut self, x: f64, y: f64, size: f64, color: Color);
    fn stroke_square(&mut self, x: f64, y: f64, size: f64);
}

/// Discrete feedback signal, fire-and-forget for the host (audio, flashes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Correct,
    Incorrect,
    GameStart,
    GameEnd,
}
