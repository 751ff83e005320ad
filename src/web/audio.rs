//! Short synthesized notes for game feedback.

use wasm_bindgen::JsValue;
use web_sys::{AudioContext, OscillatorType};

use crate::surface::Cue;

const C4: f64 = 261.63;
const E4: f64 = 329.63;
const G4: f64 = 392.00;
const C5: f64 = 523.25;
const A3: f64 = 220.00;

/// Eighth note at 120 BPM.
const NOTE_SECS: f64 = 0.25;
const ARPEGGIO_STEP_SECS: f64 = 0.1;

fn notes(cue: Cue) -> &'static [f64] {
    match cue {
        Cue::Correct => &[C5],
        Cue::Incorrect => &[A3],
        Cue::GameStart => &[C4, E4, G4],
        Cue::GameEnd => &[G4, E4, C4],
    }
}

/// Plays [`Cue`]s. Browsers only allow audio after a user gesture, so the
/// context is created by [`CuePlayer::unlock`] from the start button handler.
#[derive(Default)]
pub(crate) struct CuePlayer {
    ctx: Option<AudioContext>,
}

impl CuePlayer {
    pub(crate) fn unlock(&mut self) {
        if self.ctx.is_none() {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(e) => {
                    log::warn!("audio unavailable: {e:?}");
                    return;
                }
            }
        }
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub(crate) fn play(&self, cue: Cue) {
        let Some(ctx) = &self.ctx else { return };
        let start = ctx.current_time();
        for (i, &freq) in notes(cue).iter().enumerate() {
            if let Err(e) = tone(ctx, freq, start + i as f64 * ARPEGGIO_STEP_SECS) {
                log::warn!("failed to play {cue:?}: {e:?}");
                return;
            }
        }
    }
}

fn tone(ctx: &AudioContext, freq: f64, at: f64) -> Result<(), JsValue> {
    let osc = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;
    osc.set_type(OscillatorType::Triangle);
    osc.frequency().set_value_at_time(freq as f32, at)?;
    // short attack, exponential release so notes do not click
    gain.gain().set_value_at_time(0.0001, at)?;
    gain.gain().exponential_ramp_to_value_at_time(0.3, at + 0.01)?;
    gain.gain()
        .exponential_ramp_to_value_at_time(0.0001, at + NOTE_SECS)?;
    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;
    osc.start_with_when(at)?;
    osc.stop_with_when(at + NOTE_SECS)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_note_sequences() {
        assert_eq!(notes(Cue::Correct), &[C5]);
        assert_eq!(notes(Cue::Incorrect), &[A3]);
        let start = notes(Cue::GameStart);
        let mut end = notes(Cue::GameEnd).to_vec();
        end.reverse();
        assert_eq!(start, end.as_slice());
    }
}
