//! Presentation host: owns the window, the GPU surface and the frame loop,
//! and drives a [`Visualiser`] through it.

pub mod canvas;
pub mod context;
pub mod host;
pub mod input;

use std::time::Duration;

use vis_core::Canvas;

pub use host::run;
pub use input::{Key, KeyState, MouseButton, MouseEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: usize,
    pub label: String,
}

impl MenuEntry {
    pub fn new(id: usize, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// A display driven by the host. All calls happen on the render thread.
pub trait Visualiser {
    fn title(&self) -> String;

    /// Initial window size in logical pixels.
    fn initial_size(&self) -> (u32, u32);

    /// Target redraw rate in frames per second.
    fn frame_rate(&self) -> f64;

    fn reshape(&mut self, width: f32, height: f32);

    /// Draws one frame; `dt` is the time since the previous one.
    fn render(&mut self, canvas: &mut dyn Canvas, dt: Duration);

    fn on_key(&mut self, key: Key, state: KeyState) -> Flow;

    fn on_mouse(&mut self, event: MouseEvent) -> Flow {
        let _ = event;
        Flow::Continue
    }

    /// Entries for the right-click menu; empty disables it.
    fn menu(&self) -> Vec<MenuEntry> {
        Vec::new()
    }

    fn on_menu(&mut self, id: usize) -> Flow {
        let _ = id;
        Flow::Continue
    }

    fn fullscreen(&self) -> bool {
        false
    }

    /// Called once before the window closes.
    fn on_exit(&mut self) {}
}
