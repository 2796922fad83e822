//! requestAnimationFrame-backed frame host

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{FrameHandle, FrameHost};

/// Callback invoked with the frame's handle and DOMHighResTimeStamp
pub type FrameCallback = Rc<dyn Fn(FrameHandle, f64)>;

pub struct WebFrameHost {
    window: web_sys::Window,
    on_frame: FrameCallback,
    next_handle: u32,
    /// Most recent handle and its animation frame request id
    scheduled: Option<(FrameHandle, i32)>,
}

impl WebFrameHost {
    pub fn new(window: web_sys::Window, on_frame: FrameCallback) -> Self {
        Self {
            window,
            on_frame,
            next_handle: 1,
            scheduled: None,
        }
    }
}

impl FrameHost for WebFrameHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let handle = FrameHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);

        let on_frame = self.on_frame.clone();
        let closure = Closure::once_into_js(move |time: f64| on_frame(handle, time));
        match self.window.request_animation_frame(closure.unchecked_ref()) {
            Ok(id) => {
                self.scheduled = Some((handle, id));
                Some(handle)
            }
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some((scheduled, id)) = self.scheduled {
            if scheduled == handle {
                if let Err(e) = self.window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame failed: {:?}", e);
                }
                self.scheduled = None;
            }
        }
    }
}
