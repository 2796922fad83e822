//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling (requestAnimationFrame on web)
//! - Input debouncing

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::{FrameCallback, WebFrameHost};

/// Token for one scheduled frame callback.
///
/// A callback carrying a handle that no longer matches the pending one is stale
/// and must be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u32);

/// Per-frame clock provided by the host
pub trait FrameHost {
    /// Schedule one callback on the next frame; None if the host refused
    fn request_frame(&mut self) -> Option<FrameHandle>;
    /// Cancel a scheduled callback if it has not fired yet
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Drops repeated start requests that arrive within a short window
/// (touchend followed by a synthetic click, double taps).
#[derive(Debug, Clone)]
pub struct StartDebounce {
    window_ms: f64,
    last_ms: Option<f64>,
}

impl StartDebounce {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            last_ms: None,
        }
    }

    /// Returns true if a request at `now_ms` should go through
    pub fn accept(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_ms {
            if now_ms - last < self.window_ms {
                return false;
            }
        }
        self.last_ms = Some(now_ms);
        true
    }
}
