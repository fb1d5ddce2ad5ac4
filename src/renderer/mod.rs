//! Rendering module
//!
//! The simulation hands a read-only [`Snapshot`] to a [`RenderSink`] once per
//! frame. Sinks never feed anything back into the game.

pub mod terminal;

pub use terminal::{TerminalRenderer, Viewport};

use crate::sim::Snapshot;
use crate::ui::Overlays;

/// Consumer of per-frame snapshots
pub trait RenderSink {
    fn render(&mut self, snapshot: &Snapshot<'_>, overlays: &Overlays) -> std::io::Result<()>;
}

/// Sink that draws nothing (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn render(&mut self, _snapshot: &Snapshot<'_>, _overlays: &Overlays) -> std::io::Result<()> {
        Ok(())
    }
}
