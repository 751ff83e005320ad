//! Browser shell: canvas rendering, DOM buttons, frame loop and audio cues.
//!
//! Element ids the host page may provide: `gameCanvas` (created when missing),
//! `startButton`, `stopButton`, `speed1`..`speed3` and `score`. Anything other
//! than the canvas is optional.

mod audio;
mod canvas;
mod frame;

use std::cell::RefCell;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, window};

use crate::GameError;
use crate::config::{GameConfig, Speed};
use crate::game::{Game, Phase};
#[cfg(feature = "serde_json")]
use crate::game::Summary;
use crate::layout::Layout;
use crate::round::Palette;
use crate::surface::Cue;

use audio::CuePlayer;
use canvas::CanvasSurface;
use frame::FrameLoop;

const CANVAS_ID: &str = "gameCanvas";
const START_BUTTON_ID: &str = "startButton";
const STOP_BUTTON_ID: &str = "stopButton";
const SCORE_ID: &str = "score";
const SPEED_BUTTONS: [(&str, Speed); 3] = [
    ("speed1", Speed::Slow),
    ("speed2", Speed::Medium),
    ("speed3", Speed::Fast),
];

const SUMMARY_DELAY_MS: i32 = 500;
const FRAME_MS: f64 = 1000.0 / 60.0;
// Caps catch-up after the tab was in the background.
const MAX_FRAME_STEP: f64 = 4.0;

struct Shell {
    game: Game,
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
    audio: CuePlayer,
    frames: Option<FrameLoop>,
    last_ts: Option<f64>,
}

impl Shell {
    fn frame(&mut self, ts: f64) -> bool {
        let dt = match self.last_ts {
            Some(prev) => ((ts - prev) / FRAME_MS).clamp(0.0, MAX_FRAME_STEP),
            None => 1.0,
        };
        self.last_ts = Some(ts);
        self.game.tick(dt);
        self.game.draw(&mut self.surface);
        self.flush_cues();
        self.game.phase() == Phase::Running
    }

    fn click(&mut self, offset_x: f64, offset_y: f64) {
        let (x, y) = self.game.layout().to_canvas(
            offset_x,
            offset_y,
            self.canvas.client_width() as f64,
            self.canvas.client_height() as f64,
        );
        if self.game.click(x, y).is_some() {
            self.flush_cues();
        }
    }

    fn flush_cues(&mut self) {
        for cue in self.game.take_cues() {
            self.audio.play(cue);
            if cue == Cue::GameEnd {
                schedule_summary(self.game.generation());
            }
        }
        set_text(SCORE_ID, &self.game.score_text());
    }

    fn halt_frames(&mut self) {
        self.frames = None;
        self.last_ts = None;
    }
}

thread_local! {
    static SHELL: RefCell<Option<Shell>> = RefCell::new(None);
}

fn with_shell<R>(f: impl FnOnce(&mut Shell) -> R) -> Option<R> {
    SHELL.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn document() -> Option<Document> {
    window().and_then(|w| w.document())
}

pub(crate) fn init_logging() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    // A second call (host page re-running the start hook) keeps the first logger.
    let _ = console_log::init_with_level(level);
}

pub(crate) fn init() -> Result<(), JsValue> {
    if SHELL.with(|cell| cell.borrow().is_some()) {
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
        body.append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let layout = fit_canvas(&canvas);
    let game = Game::new(
        GameConfig::default(),
        Palette::default(),
        layout,
        ChaCha8Rng::seed_from_u64(random_seed()),
    );
    let speed = game.config().speed;
    let score = game.score_text();
    SHELL.with(|cell| {
        cell.replace(Some(Shell {
            game,
            canvas: canvas.clone(),
            surface: CanvasSurface::new(ctx),
            audio: CuePlayer::default(),
            frames: None,
            last_ts: None,
        }))
    });

    bind_listeners(&win, &doc, &canvas)?;
    mark_speed(speed);
    set_text(SCORE_ID, &score);
    set_hidden(START_BUTTON_ID, false);
    log::info!(
        "color squares ready on {}x{} canvas",
        layout.width(),
        layout.height()
    );
    Ok(())
}

pub(crate) fn start() -> Result<(), JsValue> {
    let started = with_shell(|shell| {
        shell.halt_frames();
        shell.audio.unlock();
        shell.game.start();
        shell.flush_cues();
    });
    if started.is_none() {
        return Err(JsValue::from_str("game not initialised"));
    }
    set_hidden(START_BUTTON_ID, true);

    let frames = FrameLoop::start(|ts| {
        SHELL.with(|cell| match cell.borrow_mut().as_mut() {
            Some(shell) => shell.frame(ts),
            None => false,
        })
    })?;
    with_shell(|shell| shell.frames = Some(frames));
    Ok(())
}

pub(crate) fn stop() {
    let stopped = with_shell(|shell| {
        shell.halt_frames();
        let changed = shell.game.stop();
        shell.game.draw(&mut shell.surface);
        set_text(SCORE_ID, &shell.game.score_text());
        changed
    });
    if stopped == Some(true) {
        set_hidden(START_BUTTON_ID, false);
    }
}

pub(crate) fn acknowledge() {
    if with_shell(|shell| shell.game.acknowledge()) == Some(true) {
        set_hidden(START_BUTTON_ID, false);
    }
}

pub(crate) fn set_speed(speed: Speed) {
    with_shell(|shell| shell.game.set_speed(speed));
    mark_speed(speed);
}

pub(crate) fn set_attempt_limit(limit: u32) -> Result<(), GameError> {
    with_shell(|shell| shell.game.set_attempt_limit(limit)).unwrap_or(Ok(()))?;
    with_shell(|shell| {
        if shell.game.phase() == Phase::Idle {
            set_text(SCORE_ID, &shell.game.score_text());
        }
    });
    Ok(())
}

#[cfg(feature = "serde_json")]
pub(crate) fn summary() -> Option<Summary> {
    with_shell(|shell| shell.game.summary()).flatten()
}

// --- DOM helpers ---------------------------------------------------------------

fn bind_listeners(
    win: &web_sys::Window,
    doc: &Document,
    canvas: &HtmlCanvasElement,
) -> Result<(), JsValue> {
    // Pointer input (offsets are in CSS pixels of the canvas box)
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let (x, y) = (evt.offset_x() as f64, evt.offset_y() as f64);
            with_shell(|shell| shell.click(x, y));
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Resize: next round picks up the new layout
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            with_shell(|shell| {
                let layout = fit_canvas(&shell.canvas);
                shell.game.resize(layout);
                log::debug!("canvas resized to {}x{}", layout.width(), layout.height());
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(btn) = doc.get_element_by_id(START_BUTTON_ID) {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            if let Err(e) = start() {
                log::error!("start failed: {e:?}");
            }
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(btn) = doc.get_element_by_id(STOP_BUTTON_ID) {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            stop();
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    for (id, speed) in SPEED_BUTTONS {
        let Some(btn) = doc.get_element_by_id(id) else {
            continue;
        };
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            set_speed(speed);
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// Size the canvas backing store to its container and return the new layout.
fn fit_canvas(canvas: &HtmlCanvasElement) -> Layout {
    let (w, h) = canvas
        .parent_element()
        .map(|p| (p.client_width(), p.client_height()))
        .filter(|&(w, h)| w > 0 && h > 0)
        .map(|(w, h)| (w as u32, h as u32))
        .unwrap_or_else(|| {
            let d = Layout::default();
            (d.width() as u32, d.height() as u32)
        });
    canvas.set_width(w);
    canvas.set_height(h);
    Layout::new(w as f64, h as f64)
}

fn random_seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(e) => {
            log::warn!("no entropy source ({e}), seeding from clock");
            window()
                .and_then(|w| w.performance())
                .map(|p| p.now().to_bits())
                .unwrap_or(0)
        }
    }
}

/// Show the result of game `generation` after a short delay. A timer that fires
/// after another game has started does nothing.
fn schedule_summary(generation: u64) {
    let Some(win) = window() else { return };
    let cb = Closure::once_into_js(move || {
        let Some(summary) = with_shell(|shell| shell.game.summary_for(generation)).flatten()
        else {
            return;
        };
        if let Some(w) = window() {
            let _ = w.alert_with_message(&format!("Game over! Your result: {summary}"));
        }
        acknowledge();
    });
    if let Err(e) = win.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.unchecked_ref(),
        SUMMARY_DELAY_MS,
    ) {
        log::warn!("could not schedule summary: {e:?}");
    }
}

fn set_text(id: &str, text: &str) {
    if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
        el.set_text_content(Some(text));
    }
}

fn set_hidden(id: &str, hidden: bool) {
    if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
        let classes = el.class_list();
        let _ = if hidden {
            classes.add_1("hidden")
        } else {
            classes.remove_1("hidden")
        };
    }
}

fn mark_speed(speed: Speed) {
    let Some(doc) = document() else { return };
    for (id, preset) in SPEED_BUTTONS {
        if let Some(el) = doc.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("active", preset == speed);
        }
    }
}
