//! Real terminal: ratatui over crossterm.
//!
//! The engine writes into a shadow buffer sized to the viewport; `flush`
//! copies it into a ratatui frame so only changed cells reach the terminal.

use std::io::{self, Stdout};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossterm::{
    cursor::SetCursorStyle,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    Terminal,
};

use super::{Backend, KeySource, PointerSource, PointerState, Position, Size};
use crate::keys::KeyInput;

/// Raw mode + alternate screen (+ mouse capture). Undo with [`restore`].
pub fn enter(mouse: bool) -> Result<()> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    if mouse {
        execute!(stdout, EnableMouseCapture).context("enabling mouse capture")?;
    }
    Ok(())
}

pub fn restore() -> Result<()> {
    let mut stdout = io::stdout();
    // Harmless when capture was never enabled.
    execute!(stdout, DisableMouseCapture, LeaveAlternateScreen, SetCursorStyle::DefaultUserShape)
        .context("leaving alternate screen")?;
    disable_raw_mode().context("disabling raw mode")?;
    Ok(())
}

pub struct TerminalBackend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    shadow: Buffer,
    cursor: Position,
    cursor_visible: bool,
}

impl TerminalBackend {
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend).context("creating terminal")?;
        terminal.clear()?; // clean start
        let area = terminal.size()?;
        Ok(Self {
            terminal,
            shadow: Buffer::empty(Rect::new(0, 0, area.width, area.height)),
            cursor: Position::ORIGIN,
            cursor_visible: false,
        })
    }
}

impl Backend for TerminalBackend {
    fn set_viewport_size(&mut self, size: Size) -> Result<()> {
        let size = size.min(self.max_viewport_size()?);
        self.shadow.resize(Rect::new(0, 0, size.width, size.height));
        self.shadow.reset();
        self.terminal.clear()?;
        Ok(())
    }

    fn max_viewport_size(&self) -> Result<Size> {
        let (width, height) = crossterm::terminal::size().context("querying terminal size")?;
        Ok(Size::new(width, height))
    }

    fn write_at(
        &mut self,
        pos: Position,
        text: &str,
        fg: Option<Color>,
        bg: Option<Color>,
    ) -> Result<()> {
        let area = self.shadow.area;
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
        self.shadow.set_stringn(pos.x, pos.y, text, room, style);
        Ok(())
    }

    fn clear_viewport(&mut self) -> Result<()> {
        self.shadow.reset();
        self.terminal.clear()?;
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        self.cursor_visible = visible;
        Ok(())
    }

    fn set_cursor_blink_size(&mut self, percent: u8) -> Result<()> {
        let style = match percent {
            0..=33 => SetCursorStyle::BlinkingUnderScore,
            34..=66 => SetCursorStyle::BlinkingBar,
            _ => SetCursorStyle::BlinkingBlock,
        };
        execute!(self.terminal.backend_mut(), style)?;
        Ok(())
    }

    fn set_cursor_position(&mut self, pos: Position) -> Result<()> {
        self.cursor = pos;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let shadow = &self.shadow;
        let cursor = self.cursor_visible.then_some(self.cursor);
        self.terminal.draw(|f| {
            let frame_area = f.size();
            let w = shadow.area.width.min(frame_area.width);
            let h = shadow.area.height.min(frame_area.height);
            let target = f.buffer_mut();
            for y in 0..h {
                for x in 0..w {
                    *target.get_mut(x, y) = shadow.get(x, y).clone();
                }
            }
            // Without set_cursor ratatui hides the cursor after drawing.
            if let Some(c) = cursor {
                f.set_cursor(c.x, c.y);
            }
        })?;
        Ok(())
    }
}

/// Creates the keyboard reader and the pointer poller for a crossterm
/// terminal. Both share the pointer state: the reader sees mouse events in
/// the same stream as keys and records them, the poller snapshots it.
pub fn input_sources() -> (TerminalKeys, TerminalPointer) {
    let state = Arc::new(Mutex::new(PointerState::default()));
    (TerminalKeys { pointer: Arc::clone(&state) }, TerminalPointer { state })
}

pub struct TerminalKeys {
    pointer: Arc<Mutex<PointerState>>,
}

impl TerminalKeys {
    fn record_mouse(&self, m: MouseEvent) -> Result<()> {
        let mut state = self.pointer.lock().map_err(|_| anyhow!("pointer state poisoned"))?;
        state.position = Position::new(m.column, m.row);
        match m.kind {
            MouseEventKind::Down(MouseButton::Left) => state.left_down = true,
            MouseEventKind::Up(MouseButton::Left) => state.left_down = false,
            _ => {}
        }
        Ok(())
    }
}

impl KeySource for TerminalKeys {
    fn read_key(&mut self, timeout: Duration) -> Result<Option<KeyInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press => Ok(Some(KeyInput::from(k))),
            Event::Mouse(m) => {
                self.record_mouse(m)?;
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

pub struct TerminalPointer {
    state: Arc<Mutex<PointerState>>,
}

impl PointerSource for TerminalPointer {
    fn poll_pointer(&mut self) -> Result<PointerState> {
        let state = self.state.lock().map_err(|_| anyhow!("pointer state poisoned"))?;
        Ok(*state)
    }
}
