// style.rs
use ratatui::style::Color;

/// What a piece of text is for; each role has a fixed palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Text,
    Title,
    Selected,
    Muted,
    Error,
    Highlight,
}

const ACCENT: Color = Color::Cyan;
const SELECTED_TEXT: Color = Color::Yellow;
const MUTED: Color = Color::DarkGray;

impl Role {
    pub fn fg(self) -> Option<Color> {
        match self {
            Role::Text => None,
            Role::Title => Some(ACCENT),
            Role::Selected => Some(SELECTED_TEXT),
            Role::Muted => Some(MUTED),
            Role::Error => Some(Color::Red),
            Role::Highlight => Some(Color::Black),
        }
    }

    pub fn bg(self) -> Option<Color> {
        match self {
            Role::Highlight => Some(ACCENT),
            _ => None,
        }
    }
}
