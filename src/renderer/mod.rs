//! Rendering module
//!
//! The simulation hands a complete `Frame` to a `RenderSink` once per tick
//! while tiles slide and once per state change while idle. Pixels, fonts and
//! colours belong to the sink.

pub mod text;

pub use crate::sim::{Frame, Overlay, TileSprite};
pub use text::TextRenderer;

/// Anything that can draw a frame
pub trait RenderSink {
    fn render(&mut self, frame: &Frame);
}

impl<T: RenderSink + ?Sized> RenderSink for &mut T {
    fn render(&mut self, frame: &Frame) {
        (**self).render(frame);
    }
}
