//! The state every engine call works against: surface, registry, input,
//! and the values modules read back between calls.

use anyhow::Result;
use tracing::debug;

use crate::backend::{Backend, Position, Size};
use crate::dispatch::{Dispatcher, InputEvent};
use crate::keybind::Registry;
use crate::line::LineBuffer;
use crate::scroll::ScrollState;
use crate::surface::Surface;

pub struct UiContext {
    pub surface: Surface,
    pub registry: Registry,
    /// Text being composed by `request_line`.
    pub line: LineBuffer,
    /// Selection of the list shown by `ScrollList`.
    pub scroll: ScrollState,
    pointer: Option<Position>,
    dispatcher: Dispatcher,
}

impl UiContext {
    pub fn new(surface: Surface, dispatcher: Dispatcher) -> Self {
        Self {
            surface,
            registry: Registry::new(),
            line: LineBuffer::default(),
            scroll: ScrollState::default(),
            pointer: None,
            dispatcher,
        }
    }

    /// A context whose input is exactly `events`, then `InputClosed`.
    pub fn scripted<B>(backend: B, events: impl IntoIterator<Item = InputEvent>) -> Result<Self>
    where
        B: Backend + 'static,
    {
        let events: Vec<InputEvent> = events.into_iter().collect();
        let (tx, dispatcher) = Dispatcher::channel(events.len());
        for ev in events {
            tx.try_send(ev)?;
        }
        drop(tx);
        let surface = Surface::new(Box::new(backend), None)?;
        Ok(Self::new(surface, dispatcher))
    }

    /// Starts a render pass: forget last frame's commands, hide the text
    /// cursor, clear if something asked for it, and go back to the top.
    pub fn begin_frame(&mut self) -> Result<()> {
        self.registry.clear();
        self.surface.hide_cursor()?;
        if self.surface.needs_clear() {
            debug!("full clear");
            self.surface.clear()?;
        }
        self.surface.home();
        Ok(())
    }

    /// Blocks for one input event and records the pointer position.
    pub fn next_event(&mut self) -> Result<InputEvent> {
        let ev = self.dispatcher.next_event()?;
        if let InputEvent::Click(p) | InputEvent::Hover(p) = ev {
            self.pointer = Some(p);
        }
        Ok(ev)
    }

    /// Last known pointer cell.
    pub fn pointer(&self) -> Option<Position> {
        self.pointer
    }

    pub fn set_size(&mut self, size: Size) -> Result<()> {
        self.surface.set_size(size)
    }

    pub fn current_text(&self) -> &str {
        self.line.text()
    }

    pub fn current_int(&self) -> Option<i64> {
        self.line.as_int()
    }

    pub fn current_decimal(&self) -> Option<f64> {
        self.line.as_decimal()
    }

    pub fn scroll_index(&self) -> usize {
        self.scroll.index()
    }
}
