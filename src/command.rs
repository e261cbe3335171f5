use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::style::Color;

use crate::context::UiContext;
use crate::keybind::{CommandId, Keybind};

/// What a command does when triggered. It gets the caller's state and the
/// engine context, so it can change stages, edit buffers or open a nested
/// dialog.
pub type Action<'a, S> = Box<dyn FnMut(&mut S, &mut UiContext) -> Result<()> + 'a>;

/// A keybind plus its action. `None` is a valid action: the command is
/// resolved and reported but nothing runs.
pub struct Command<'a, S> {
    pub bind: Keybind,
    action: Option<Action<'a, S>>,
}

impl<'a, S> Command<'a, S> {
    pub fn new<F>(bind: Keybind, action: F) -> Self
    where
        F: FnMut(&mut S, &mut UiContext) -> Result<()> + 'a,
    {
        Self { bind, action: Some(Box::new(action)) }
    }

    pub fn noop(bind: Keybind) -> Self {
        Self { bind, action: None }
    }

    pub fn key<F>(code: KeyCode, label: impl Into<String>, action: F) -> Self
    where
        F: FnMut(&mut S, &mut UiContext) -> Result<()> + 'a,
    {
        Self::new(Keybind::key(code, label), action)
    }

    pub fn char<F>(ch: char, label: impl Into<String>, action: F) -> Self
    where
        F: FnMut(&mut S, &mut UiContext) -> Result<()> + 'a,
    {
        Self::new(Keybind::char(ch, label), action)
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.bind = self.bind.with_modifiers(modifiers);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.bind = self.bind.with_color(color);
        self
    }

    pub fn id(&self) -> CommandId {
        self.bind.id()
    }

    pub fn execute(&mut self, state: &mut S, ctx: &mut UiContext) -> Result<()> {
        match self.action.as_mut() {
            Some(action) => action(state, ctx),
            None => Ok(()),
        }
    }
}

impl<S> std::fmt::Debug for Command<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("bind", &self.bind)
            .field("action", &self.action.is_some())
            .finish()
    }
}
