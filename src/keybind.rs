//! Keybinds and the per-frame registry of commands eligible for input.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::style::Color;
use tracing::debug;

use crate::backend::Position;
use crate::error::EngineError;
use crate::keys::{key_name, modifier_prefix, KeyInput, MODIFIER_MASK};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one command instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(u64);

impl CommandId {
    fn next() -> Self {
        CommandId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The input-facing half of a command: what triggers it and how it looks.
///
/// An empty label means the command is never drawn but can still be
/// triggered. A keybind with neither key code nor character can only be
/// reached by clicking it.
#[derive(Debug, Clone)]
pub struct Keybind {
    id: CommandId,
    pub key: Option<KeyCode>,
    pub ch: Option<char>,
    pub modifiers: KeyModifiers,
    pub label: String,
    pub color: Option<Color>,
}

impl Keybind {
    pub fn new(key: Option<KeyCode>, ch: Option<char>, label: impl Into<String>) -> Self {
        Self {
            id: CommandId::next(),
            key,
            ch,
            modifiers: KeyModifiers::NONE,
            label: label.into(),
            color: None,
        }
    }

    pub fn key(code: KeyCode, label: impl Into<String>) -> Self {
        Self::new(Some(code), None, label)
    }

    pub fn char(ch: char, label: impl Into<String>) -> Self {
        Self::new(None, Some(ch), label)
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers & MODIFIER_MASK;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    pub fn display(&self) -> bool {
        !self.label.is_empty()
    }

    /// Exact modifier equality: Ctrl+S and S are different commands.
    pub fn matches(&self, input: &KeyInput) -> bool {
        let key_hit = self.key.is_some() && self.key == input.code;
        let ch_hit = self.ch.is_some() && self.ch == input.ch;
        (key_hit || ch_hit) && self.modifiers == input.modifiers
    }

    /// The part before `)`, preferring the character over the key name.
    pub fn trigger_text(&self) -> String {
        let base = match (self.ch, self.key) {
            (Some(' '), _) => key_name(KeyCode::Char(' ')),
            (Some(c), _) => c.to_string(),
            (None, Some(code)) => key_name(code),
            (None, None) => String::new(),
        };
        format!("{}{}", modifier_prefix(self.modifiers), base)
    }

    /// `"<trigger>) <label>"`, or just the label for click-only commands.
    pub fn rendered_label(&self) -> String {
        let trigger = self.trigger_text();
        if trigger.is_empty() {
            self.label.clone()
        } else {
            format!("{trigger}) {}", self.label)
        }
    }
}

/// A keybind as placed on screen during the current frame.
#[derive(Debug, Clone)]
pub struct Registered {
    pub bind: Keybind,
    pub position: Position,
    /// Display width of the rendered label; zero when not displayed.
    pub width: u16,
}

impl Registered {
    pub fn contains(&self, pointer: Position) -> bool {
        pointer.y == self.position.y
            && pointer.x >= self.position.x
            && u32::from(pointer.x) < u32::from(self.position.x) + u32::from(self.width)
    }
}

/// Commands eligible to be triggered this frame, in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Registered>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails when this exact command instance is already registered.
    /// Two different commands sharing a trigger are fine; the first wins.
    pub fn register(
        &mut self,
        bind: &Keybind,
        position: Position,
        width: u16,
    ) -> Result<(), EngineError> {
        if self.contains(bind.id) {
            return Err(EngineError::DuplicateRegistration {
                id: bind.id,
                label: bind.label.clone(),
            });
        }
        debug!(id = %bind.id, label = %bind.label, x = position.x, y = position.y, "register");
        self.entries.push(Registered { bind: bind.clone(), position, width });
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: CommandId) -> bool {
        self.entries.iter().any(|r| r.bind.id == id)
    }

    pub fn get(&self, id: CommandId) -> Option<&Registered> {
        self.entries.iter().find(|r| r.bind.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registered> {
        self.entries.iter()
    }

    /// First registered command matching the key.
    pub fn resolve(&self, input: &KeyInput) -> Option<CommandId> {
        self.entries.iter().find(|r| r.bind.matches(input)).map(|r| r.bind.id)
    }

    /// First registered command under the pointer.
    pub fn resolve_pointer(&self, pointer: Position) -> Option<CommandId> {
        self.entries.iter().find(|r| r.contains(pointer)).map(|r| r.bind.id)
    }

    pub fn is_highlighted(
        &self,
        id: CommandId,
        pointer: Option<Position>,
    ) -> Result<bool, EngineError> {
        let reg = self.get(id).ok_or(EngineError::UnpositionedCommand { id })?;
        Ok(pointer.is_some_and(|p| reg.contains(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: u16, y: u16) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn double_registration_is_a_contract_violation() {
        let mut reg = Registry::new();
        let bind = Keybind::char('a', "Add");
        reg.register(&bind, at(0, 0), 6).unwrap();
        let err = reg.register(&bind, at(0, 1), 6).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateRegistration { id, .. } if id == bind.id()));
    }

    #[test]
    fn same_trigger_first_registered_wins() {
        let mut reg = Registry::new();
        let first = Keybind::char('x', "First");
        let second = Keybind::char('x', "Second");
        reg.register(&first, at(0, 0), 8).unwrap();
        reg.register(&second, at(0, 1), 9).unwrap();
        assert_eq!(reg.resolve(&KeyInput::char('x')), Some(first.id()));
        // Resolution does not depend on how often it is asked.
        assert_eq!(reg.resolve(&KeyInput::char('x')), Some(first.id()));
    }

    #[test]
    fn modifiers_must_match_exactly() {
        let mut reg = Registry::new();
        let plain = Keybind::char('s', "Sort");
        let save = Keybind::char('s', "Save").with_modifiers(KeyModifiers::CONTROL);
        reg.register(&plain, at(0, 0), 7).unwrap();
        reg.register(&save, at(0, 1), 12).unwrap();

        let ctrl_s = KeyInput::char('s').with_modifiers(KeyModifiers::CONTROL);
        assert_eq!(reg.resolve(&ctrl_s), Some(save.id()));
        assert_eq!(reg.resolve(&KeyInput::char('s')), Some(plain.id()));
        let alt_s = KeyInput::char('s').with_modifiers(KeyModifiers::ALT);
        assert_eq!(reg.resolve(&alt_s), None);
    }

    #[test]
    fn key_code_or_character_matches() {
        let mut reg = Registry::new();
        let both = Keybind::new(Some(KeyCode::Enter), Some('y'), "Yes");
        reg.register(&both, at(0, 0), 6).unwrap();
        assert_eq!(reg.resolve(&KeyInput::key(KeyCode::Enter)), Some(both.id()));
        assert_eq!(reg.resolve(&KeyInput::char('y')), Some(both.id()));
        assert_eq!(reg.resolve(&KeyInput::char('n')), None);
    }

    #[test]
    fn invisible_commands_still_resolve() {
        let mut reg = Registry::new();
        let hidden = Keybind::key(KeyCode::Up, "");
        assert!(!hidden.display());
        reg.register(&hidden, at(0, 0), 0).unwrap();
        assert_eq!(reg.resolve(&KeyInput::key(KeyCode::Up)), Some(hidden.id()));
        assert_eq!(reg.resolve_pointer(at(0, 0)), None);
    }

    #[test]
    fn click_only_command_is_found_by_pointer() {
        let mut reg = Registry::new();
        let click = Keybind::new(None, None, "Open");
        assert_eq!(click.rendered_label(), "Open");
        reg.register(&click, at(2, 3), 4).unwrap();
        assert_eq!(reg.resolve(&KeyInput::char('o')), None);
        assert_eq!(reg.resolve_pointer(at(5, 3)), Some(click.id()));
        assert_eq!(reg.resolve_pointer(at(6, 3)), None);
        assert_eq!(reg.resolve_pointer(at(1, 3)), None);
    }

    #[test]
    fn highlight_needs_a_position() {
        let reg = Registry::new();
        let loose = Keybind::char('q', "Quit");
        assert_eq!(
            reg.is_highlighted(loose.id(), Some(at(0, 0))),
            Err(EngineError::UnpositionedCommand { id: loose.id() })
        );
    }

    #[test]
    fn highlight_spans_the_rendered_label() {
        let mut reg = Registry::new();
        let bind = Keybind::char('q', "Quit");
        reg.register(&bind, at(4, 2), 7).unwrap();
        assert_eq!(reg.is_highlighted(bind.id(), Some(at(4, 2))), Ok(true));
        assert_eq!(reg.is_highlighted(bind.id(), Some(at(10, 2))), Ok(true));
        assert_eq!(reg.is_highlighted(bind.id(), Some(at(11, 2))), Ok(false));
        assert_eq!(reg.is_highlighted(bind.id(), Some(at(4, 3))), Ok(false));
        assert_eq!(reg.is_highlighted(bind.id(), None), Ok(false));
    }

    #[test]
    fn trigger_text_prefers_character() {
        let bind = Keybind::new(Some(KeyCode::Enter), Some('y'), "Yes");
        assert_eq!(bind.rendered_label(), "y) Yes");
        let save = Keybind::char('s', "Save").with_modifiers(KeyModifiers::CONTROL);
        assert_eq!(save.rendered_label(), "Ctrl+s) Save");
        assert_eq!(Keybind::key(KeyCode::Esc, "Back").rendered_label(), "Esc) Back");
    }
}
