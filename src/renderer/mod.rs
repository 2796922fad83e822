//! Rendering module
//!
//! The simulation hands a `Frame` draw list to a `Surface` once per tick.
//! On web the surface is a 2D canvas.

#[cfg(target_arch = "wasm32")]
mod canvas;
pub mod scene;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use scene::build_frame;
pub use shapes::{Frame, Shape, colors, css_color};

/// Destination for finished frames
pub trait Surface {
    /// Whether the character image is available
    fn sprite_ready(&self) -> bool {
        false
    }

    fn present(&mut self, frame: &Frame);
}
