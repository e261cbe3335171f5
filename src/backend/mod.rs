//! The terminal collaborator: what the engine needs from whatever draws the
//! character grid and produces keyboard/pointer input.

use std::time::Duration;

use anyhow::Result;
use ratatui::style::Color;

use crate::keys::KeyInput;

pub mod memory;
pub mod terminal;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Component-wise minimum.
    pub fn min(self, other: Size) -> Size {
        Size { width: self.width.min(other.width), height: self.height.min(other.height) }
    }
}

/// Pointer snapshot in character cells, relative to the viewport's top-left
/// content cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerState {
    pub position: Position,
    pub left_down: bool,
}

/// Output half of the terminal: a fixed-size viewport of character cells.
pub trait Backend {
    fn set_viewport_size(&mut self, size: Size) -> Result<()>;
    fn max_viewport_size(&self) -> Result<Size>;
    fn write_at(
        &mut self,
        pos: Position,
        text: &str,
        fg: Option<Color>,
        bg: Option<Color>,
    ) -> Result<()>;
    fn clear_viewport(&mut self) -> Result<()>;
    fn set_cursor_visible(&mut self, visible: bool) -> Result<()>;
    fn set_cursor_blink_size(&mut self, percent: u8) -> Result<()>;
    fn set_cursor_position(&mut self, pos: Position) -> Result<()>;
    /// Push everything written since the last flush to the screen.
    fn flush(&mut self) -> Result<()>;
}

/// Keyboard half of the terminal. Runs on its own thread.
pub trait KeySource: Send + 'static {
    /// Wait up to `timeout` for the next key. `Ok(None)` means nothing
    /// arrived, so the caller can check whether it should keep going.
    fn read_key(&mut self, timeout: Duration) -> Result<Option<KeyInput>>;
}

/// Pointer half of the terminal. Polled from a timer task.
pub trait PointerSource: Send + 'static {
    fn poll_pointer(&mut self) -> Result<PointerState>;
}
