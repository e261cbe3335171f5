use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// The only modifier bits that take part in matching.
pub const MODIFIER_MASK: KeyModifiers = KeyModifiers::SHIFT
    .union(KeyModifiers::CONTROL)
    .union(KeyModifiers::ALT);

/// One keyboard event as the engine sees it: an optional key code, an
/// optional character and a modifier mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub code: Option<KeyCode>,
    pub ch: Option<char>,
    pub modifiers: KeyModifiers,
}

impl KeyInput {
    pub fn key(code: KeyCode) -> Self {
        Self { code: Some(code), ch: None, modifiers: KeyModifiers::NONE }
    }

    pub fn char(ch: char) -> Self {
        Self { code: None, ch: Some(ch), modifiers: KeyModifiers::NONE }
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers & MODIFIER_MASK;
        self
    }

    /// Printable character carried by this event, if any.
    ///
    /// Control characters and chords with Ctrl/Alt are never text.
    pub fn text_char(&self) -> Option<char> {
        let chorded = self.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match self.ch {
            Some(c) if !c.is_control() && !chorded => Some(c),
            _ => None,
        }
    }
}

impl From<KeyEvent> for KeyInput {
    fn from(k: KeyEvent) -> Self {
        let modifiers = k.modifiers & MODIFIER_MASK;
        match k.code {
            // Shift is already folded into the character's case.
            KeyCode::Char(c) => Self {
                code: None,
                ch: Some(c),
                modifiers: modifiers - KeyModifiers::SHIFT,
            },
            // BackTab is Shift+Tab; it always arrives with Shift set.
            KeyCode::BackTab => Self {
                code: Some(KeyCode::BackTab),
                ch: None,
                modifiers: modifiers - KeyModifiers::SHIFT,
            },
            code => Self { code: Some(code), ch: None, modifiers },
        }
    }
}

/// Short human name for a key code, as shown in menu triggers.
pub fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::BackTab => "BackTab".into(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PgUp".into(),
        KeyCode::PageDown => "PgDn".into(),
        KeyCode::Insert => "Insert".into(),
        KeyCode::F(n) => format!("F{n}"),
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        other => format!("{other:?}"),
    }
}

/// `Ctrl+Alt+Shift+` style prefix for a modifier mask.
pub fn modifier_prefix(modifiers: KeyModifiers) -> String {
    let mut out = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        out.push_str("Ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        out.push_str("Alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        out.push_str("Shift+");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    #[test]
    fn char_events_drop_shift() {
        let ev = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        let k = KeyInput::from(ev);
        assert_eq!(k.ch, Some('A'));
        assert_eq!(k.code, None);
        assert_eq!(k.modifiers, KeyModifiers::NONE);
    }

    #[test]
    fn control_chords_keep_control() {
        let ev = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        let k = KeyInput::from(ev);
        assert_eq!(k.modifiers, KeyModifiers::CONTROL);
        assert_eq!(k.text_char(), None);
    }

    #[test]
    fn named_keys_carry_no_char() {
        let mut ev = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        ev.kind = KeyEventKind::Press;
        let k = KeyInput::from(ev);
        assert_eq!(k.code, Some(KeyCode::Enter));
        assert_eq!(k.ch, None);
        assert_eq!(k.text_char(), None);
    }

    #[test]
    fn back_tab_drops_its_implied_shift() {
        let k = KeyInput::from(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(k, KeyInput::key(KeyCode::BackTab));
        let ctrl = KeyInput::from(KeyEvent::new(
            KeyCode::BackTab,
            KeyModifiers::SHIFT | KeyModifiers::CONTROL,
        ));
        assert_eq!(ctrl.modifiers, KeyModifiers::CONTROL);
        // Other named keys keep Shift.
        let up = KeyInput::from(KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT));
        assert_eq!(up.modifiers, KeyModifiers::SHIFT);
    }

    #[test]
    fn names() {
        assert_eq!(key_name(KeyCode::F(5)), "F5");
        assert_eq!(key_name(KeyCode::PageDown), "PgDn");
        assert_eq!(modifier_prefix(KeyModifiers::CONTROL | KeyModifiers::ALT), "Ctrl+Alt+");
    }
}
