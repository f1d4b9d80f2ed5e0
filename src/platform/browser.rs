//! requestAnimationFrame scheduling (wasm32 only)

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::animation::{FrameHandle, FrameScheduler};

/// Callback invoked with the fired frame and the wall-clock time (ms)
pub type FrameCallback = Rc<dyn Fn(FrameHandle, f64)>;

/// Schedules frames on the browser's display refresh
#[derive(Clone)]
pub struct BrowserFrames {
    on_frame: FrameCallback,
}

impl BrowserFrames {
    pub fn new(on_frame: FrameCallback) -> Self {
        Self { on_frame }
    }
}

impl FrameScheduler for BrowserFrames {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let Some(window) = web_sys::window() else {
            log::error!("No window; animation frame not scheduled");
            return None;
        };

        // The id is only known once the request returns
        let id = Rc::new(Cell::new(0));
        let on_frame = Rc::clone(&self.on_frame);
        let fired_id = Rc::clone(&id);
        let closure = Closure::once(move |_time: f64| {
            on_frame(FrameHandle(fired_id.get()), js_sys::Date::now());
        });

        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(frame_id) => {
                id.set(frame_id);
                closure.forget();
                Some(FrameHandle(frame_id))
            }
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle.0);
        }
    }
}
