//! The character grid the engine draws on, with a write cursor.

use anyhow::Result;
use ratatui::style::Color;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::backend::{Backend, Position, Size};

pub struct Surface {
    backend: Box<dyn Backend>,
    size: Size,
    cursor: Position,
    indent: u16,
    needs_clear: bool,
}

impl Surface {
    /// `size` of `None` takes the backend's maximum.
    pub fn new(backend: Box<dyn Backend>, size: Option<Size>) -> Result<Self> {
        let mut surface = Self {
            backend,
            size: Size::default(),
            cursor: Position::ORIGIN,
            indent: 0,
            needs_clear: false,
        };
        let max = surface.backend.max_viewport_size()?;
        surface.set_size(size.unwrap_or(max))?;
        Ok(surface)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Resizes the viewport (clamped to the backend maximum) and clears it.
    pub fn set_size(&mut self, size: Size) -> Result<()> {
        let size = size.min(self.backend.max_viewport_size()?);
        debug!(width = size.width, height = size.height, "viewport resize");
        self.backend.set_viewport_size(size)?;
        self.size = size;
        self.clear()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn set_cursor(&mut self, pos: Position) {
        self.cursor = pos;
    }

    pub fn indent(&self) -> u16 {
        self.indent
    }

    /// Column that new lines start at.
    pub fn set_indent(&mut self, indent: u16) {
        self.indent = indent;
    }

    pub fn home(&mut self) {
        self.cursor = Position::new(self.indent, 0);
    }

    pub fn newline(&mut self) {
        self.cursor = Position::new(self.indent, self.cursor.y.saturating_add(1));
    }

    /// Rows from the cursor row to the bottom edge, cursor row included.
    pub fn rows_remaining(&self) -> u16 {
        self.size.height.saturating_sub(self.cursor.y)
    }

    /// Columns from the cursor to the right edge.
    pub fn columns_remaining(&self) -> u16 {
        self.size.width.saturating_sub(self.cursor.x)
    }

    /// Writes at the cursor and moves it right. Returns the display width
    /// of `text`, even when part of it was clipped.
    pub fn write(&mut self, text: &str, fg: Option<Color>, bg: Option<Color>) -> Result<u16> {
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        if self.cursor.y < self.size.height && self.cursor.x < self.size.width {
            self.backend.write_at(self.cursor, text, fg, bg)?;
        }
        self.cursor.x = self.cursor.x.saturating_add(width);
        Ok(width)
    }

    /// Writes a full row: the text, then blanks up to the right edge so a
    /// shorter row never leaves characters from the previous frame.
    pub fn print_line(&mut self, text: &str, fg: Option<Color>, bg: Option<Color>) -> Result<u16> {
        let width = self.write(text, fg, bg)?;
        self.pad_row()?;
        self.newline();
        Ok(width)
    }

    pub fn pad_row(&mut self) -> Result<()> {
        let room = self.columns_remaining();
        if room > 0 {
            let blank = " ".repeat(usize::from(room));
            self.write(&blank, None, None)?;
        }
        Ok(())
    }

    /// Marks the whole viewport for clearing at the next frame start.
    pub fn request_clear(&mut self) {
        self.needs_clear = true;
    }

    pub fn needs_clear(&self) -> bool {
        self.needs_clear
    }

    pub fn clear(&mut self) -> Result<()> {
        self.backend.clear_viewport()?;
        self.needs_clear = false;
        self.home();
        Ok(())
    }

    pub fn show_cursor_at(&mut self, pos: Position) -> Result<()> {
        self.backend.set_cursor_position(pos)?;
        self.backend.set_cursor_visible(true)
    }

    pub fn hide_cursor(&mut self) -> Result<()> {
        self.backend.set_cursor_visible(false)
    }

    pub fn set_cursor_blink_size(&mut self, percent: u8) -> Result<()> {
        self.backend.set_cursor_blink_size(percent)
    }

    pub fn present(&mut self) -> Result<()> {
        self.backend.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;

    fn surface(w: u16, h: u16) -> (Surface, MemoryBackend) {
        let screen = MemoryBackend::new(w, h);
        let surface = Surface::new(Box::new(screen.clone()), None).unwrap();
        (surface, screen)
    }

    #[test]
    fn print_line_advances_one_row() {
        let (mut s, screen) = surface(20, 5);
        s.print_line("first", None, None).unwrap();
        s.print_line("second", None, None).unwrap();
        assert_eq!(s.cursor(), Position::new(0, 2));
        assert_eq!(screen.rows(), vec!["first", "second"]);
    }

    #[test]
    fn padding_overwrites_stale_text() {
        let (mut s, screen) = surface(20, 3);
        s.print_line("a long first line", None, None).unwrap();
        s.home();
        s.print_line("short", None, None).unwrap();
        assert_eq!(screen.row(0), "short");
    }

    #[test]
    fn indent_applies_to_new_lines() {
        let (mut s, screen) = surface(20, 3);
        s.set_indent(2);
        s.home();
        s.print_line("x", None, None).unwrap();
        assert_eq!(s.cursor(), Position::new(2, 1));
        assert_eq!(screen.row(0), "  x");
    }

    #[test]
    fn rows_past_the_bottom_are_dropped() {
        let (mut s, screen) = surface(10, 1);
        s.print_line("one", None, None).unwrap();
        s.print_line("two", None, None).unwrap();
        assert_eq!(screen.rows(), vec!["one"]);
        assert_eq!(s.rows_remaining(), 0);
    }

    #[test]
    fn resize_clamps_and_clears() {
        let (mut s, screen) = surface(30, 10);
        s.set_size(Size::new(50, 4)).unwrap();
        assert_eq!(s.size(), Size::new(30, 4));
        assert_eq!(screen.viewport(), Size::new(30, 4));
        assert!(screen.clear_count() >= 2);
    }
}
