//! Headless terminal: a ratatui `Buffer` standing in for the screen, plus
//! scripted input sources.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
};

use super::{Backend, KeySource, PointerSource, PointerState, Position, Size};
use crate::keys::KeyInput;

#[derive(Debug)]
struct Screen {
    max: Size,
    buffer: Buffer,
    cursor: Option<Position>,
    cursor_visible: bool,
    blink_percent: u8,
    clears: usize,
    flushes: usize,
}

/// In-memory backend. Clones share the same screen, so a test can keep one
/// and hand the other to the engine.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    screen: Rc<RefCell<Screen>>,
}

impl MemoryBackend {
    pub fn new(width: u16, height: u16) -> Self {
        let max = Size::new(width, height);
        let screen = Screen {
            max,
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
            cursor: None,
            cursor_visible: false,
            blink_percent: 100,
            clears: 0,
            flushes: 0,
        };
        Self { screen: Rc::new(RefCell::new(screen)) }
    }

    /// Text of one viewport row, trailing blanks trimmed.
    pub fn row(&self, y: u16) -> String {
        let screen = self.screen.borrow();
        let area = screen.buffer.area;
        if y >= area.height {
            return String::new();
        }
        let mut out = String::new();
        for x in 0..area.width {
            out.push_str(screen.buffer.get(x, y).symbol());
        }
        out.trim_end().to_string()
    }

    /// All viewport rows, trailing blank rows dropped.
    pub fn rows(&self) -> Vec<String> {
        let height = self.screen.borrow().buffer.area.height;
        let mut rows: Vec<String> = (0..height).map(|y| self.row(y)).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        rows
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.rows().iter().any(|r| r.contains(needle))
    }

    pub fn fg_at(&self, x: u16, y: u16) -> Color {
        self.screen.borrow().buffer.get(x, y).fg
    }

    pub fn bg_at(&self, x: u16, y: u16) -> Color {
        self.screen.borrow().buffer.get(x, y).bg
    }

    pub fn viewport(&self) -> Size {
        let area = self.screen.borrow().buffer.area;
        Size::new(area.width, area.height)
    }

    /// Text cursor position when visible.
    pub fn cursor(&self) -> Option<Position> {
        let screen = self.screen.borrow();
        screen.cursor.filter(|_| screen.cursor_visible)
    }

    pub fn blink_percent(&self) -> u8 {
        self.screen.borrow().blink_percent
    }

    pub fn clear_count(&self) -> usize {
        self.screen.borrow().clears
    }

    pub fn flush_count(&self) -> usize {
        self.screen.borrow().flushes
    }
}

impl Backend for MemoryBackend {
    fn set_viewport_size(&mut self, size: Size) -> Result<()> {
        let mut screen = self.screen.borrow_mut();
        let size = size.min(screen.max);
        screen.buffer.resize(Rect::new(0, 0, size.width, size.height));
        screen.buffer.reset();
        Ok(())
    }

    fn max_viewport_size(&self) -> Result<Size> {
        Ok(self.screen.borrow().max)
    }

    fn write_at(
        &mut self,
        pos: Position,
        text: &str,
        fg: Option<Color>,
        bg: Option<Color>,
    ) -> Result<()> {
        let mut screen = self.screen.borrow_mut();
        let area = screen.buffer.area;
        if pos.x >= area.width || pos.y >= area.height {
            return Ok(());
        }
        let mut style = Style::default();
        if let Some(fg) = fg {
            style = style.fg(fg);
        }
        if let Some(bg) = bg {
            style = style.bg(bg);
        }
        let room = usize::from(area.width - pos.x);
        screen.buffer.set_stringn(pos.x, pos.y, text, room, style);
        Ok(())
    }

    fn clear_viewport(&mut self) -> Result<()> {
        let mut screen = self.screen.borrow_mut();
        screen.buffer.reset();
        screen.clears += 1;
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        self.screen.borrow_mut().cursor_visible = visible;
        Ok(())
    }

    fn set_cursor_blink_size(&mut self, percent: u8) -> Result<()> {
        self.screen.borrow_mut().blink_percent = percent.min(100);
        Ok(())
    }

    fn set_cursor_position(&mut self, pos: Position) -> Result<()> {
        self.screen.borrow_mut().cursor = Some(pos);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.screen.borrow_mut().flushes += 1;
        Ok(())
    }
}

/// Keys handed out one per `read_key`; idles for the timeout once drained.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<KeyInput>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = KeyInput>) -> Self {
        Self { keys: keys.into_iter().collect() }
    }
}

impl KeySource for ScriptedKeys {
    fn read_key(&mut self, timeout: Duration) -> Result<Option<KeyInput>> {
        match self.keys.pop_front() {
            Some(k) => Ok(Some(k)),
            None => {
                std::thread::sleep(timeout);
                Ok(None)
            }
        }
    }
}

/// Pointer snapshots handed out one per poll; the last one repeats.
#[derive(Debug, Default)]
pub struct ScriptedPointer {
    states: VecDeque<PointerState>,
    last: PointerState,
}

impl ScriptedPointer {
    pub fn new(states: impl IntoIterator<Item = PointerState>) -> Self {
        Self { states: states.into_iter().collect(), last: PointerState::default() }
    }
}

impl PointerSource for ScriptedPointer {
    fn poll_pointer(&mut self) -> Result<PointerState> {
        if let Some(s) = self.states.pop_front() {
            self.last = s;
        }
        Ok(self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_clipped_to_the_viewport() {
        let mut b = MemoryBackend::new(8, 2);
        b.write_at(Position::new(5, 0), "abcdef", None, None).unwrap();
        b.write_at(Position::new(0, 9), "nowhere", None, None).unwrap();
        assert_eq!(b.row(0), "     abc");
        assert_eq!(b.rows().len(), 1);
    }

    #[test]
    fn viewport_never_exceeds_max() {
        let mut b = MemoryBackend::new(10, 4);
        b.set_viewport_size(Size::new(40, 2)).unwrap();
        assert_eq!(b.viewport(), Size::new(10, 2));
    }

    #[test]
    fn scripted_pointer_repeats_last_state() {
        let down = PointerState { position: Position::new(2, 3), left_down: true };
        let mut p = ScriptedPointer::new([down]);
        assert_eq!(p.poll_pointer().unwrap(), down);
        assert_eq!(p.poll_pointer().unwrap(), down);
    }
}
