//! Cancellable `requestAnimationFrame` loop.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Owns the frame closure. The closure only holds a weak reference to itself, so
/// dropping the loop frees it; [`FrameLoop::cancel`] also revokes the pending frame.
pub(crate) struct FrameLoop {
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
    cancelled: Rc<Cell<bool>>,
}

impl FrameLoop {
    /// Schedule `on_frame` every display refresh until it returns `false` or the
    /// loop is cancelled.
    pub(crate) fn start<F>(mut on_frame: F) -> Result<Self, JsValue>
    where
        F: FnMut(f64) -> bool + 'static,
    {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let cancelled = Rc::new(Cell::new(false));

        let weak: Weak<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::downgrade(&callback);
        let pending_in = pending.clone();
        let cancelled_in = cancelled.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            pending_in.set(None);
            if cancelled_in.get() {
                return;
            }
            if !on_frame(ts) || cancelled_in.get() {
                return;
            }
            if let Some(cb) = weak.upgrade() {
                if let Some(closure) = cb.borrow().as_ref() {
                    pending_in.set(request_frame(closure).ok());
                }
            }
        }) as Box<dyn FnMut(f64)>));

        if let Some(closure) = callback.borrow().as_ref() {
            pending.set(Some(request_frame(closure)?));
        }
        Ok(Self {
            callback,
            pending,
            cancelled,
        })
    }

    pub(crate) fn cancel(&self) {
        self.cancelled.set(true);
        if let Some(id) = self.pending.take() {
            if let Some(w) = window() {
                let _ = w.cancel_animation_frame(id);
            }
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
        self.callback.borrow_mut().take();
    }
}

fn request_frame(closure: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    let w = window().ok_or_else(|| JsValue::from_str("no window"))?;
    w.request_animation_frame(closure.as_ref().unchecked_ref())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    async fn next_frame() {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            if let Some(w) = window() {
                let _ = w.request_animation_frame(&resolve);
            }
        });
        let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
    }

    fn counting_loop(count: &Rc<Cell<u32>>, keep_going: bool) -> FrameLoop {
        let c = count.clone();
        FrameLoop::start(move |_ts| {
            c.set(c.get() + 1);
            keep_going
        })
        .unwrap()
    }

    #[wasm_bindgen_test]
    async fn test_cancel_halts_scheduled_frames() {
        let count = Rc::new(Cell::new(0));
        let frames = counting_loop(&count, true);
        next_frame().await;
        next_frame().await;
        assert!(count.get() >= 1);

        frames.cancel();
        let seen = count.get();
        next_frame().await;
        next_frame().await;
        assert_eq!(count.get(), seen);
    }

    #[wasm_bindgen_test]
    async fn test_drop_halts_scheduled_frames() {
        let count = Rc::new(Cell::new(0));
        let frames = counting_loop(&count, true);
        next_frame().await;
        drop(frames);
        let seen = count.get();
        next_frame().await;
        next_frame().await;
        assert_eq!(count.get(), seen);
    }

    #[wasm_bindgen_test]
    async fn test_cancel_before_first_frame() {
        let count = Rc::new(Cell::new(0));
        let frames = counting_loop(&count, true);
        frames.cancel();
        next_frame().await;
        next_frame().await;
        assert_eq!(count.get(), 0);
    }

    #[wasm_bindgen_test]
    async fn test_returning_false_stops_rescheduling() {
        let count = Rc::new(Cell::new(0));
        let _frames = counting_loop(&count, false);
        next_frame().await;
        next_frame().await;
        next_frame().await;
        assert_eq!(count.get(), 1);
    }
}
