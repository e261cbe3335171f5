//! Single-line text entry.

use anyhow::Result;
use crossterm::event::KeyCode;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::backend::Position;
use crate::choice::{Choice, Response, StaticText};
use crate::command::Command;
use crate::context::UiContext;
use crate::dispatch::InputEvent;
use crate::ui::Role;

const PROMPT: &str = "> ";

/// The text being composed. Numeric views are parsed on every read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
}

impl LineBuffer {
    pub fn with(text: &str) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.into();
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Appends `c` if it is printable and the buffer holds fewer than
    /// `max_len` characters.
    pub fn push(&mut self, c: char, max_len: usize) -> bool {
        if c.is_control() || self.len() >= max_len {
            return false;
        }
        self.text.push(c);
        true
    }

    /// Drops the last character; nothing happens on an empty buffer.
    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_int(&self) -> Option<i64> {
        self.text.trim().parse().ok()
    }

    /// Finite decimals only; "inf" and "NaN" are not numbers here.
    pub fn as_decimal(&self) -> Option<f64> {
        self.text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// `"> " + text`, dropping leading characters until it fits in `room`
/// cells so the end of the text (and the cursor after it) stays visible.
fn field_text(text: &str, room: usize) -> String {
    let budget = room.saturating_sub(PROMPT.width());
    let mut used = 0;
    let mut start = text.len();
    for (i, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        start = i;
    }
    format!("{PROMPT}{}", &text[start..])
}

/// One round of text entry.
///
/// Draws `"> text"` on one row with the text cursor after it, then
/// resolves one event. Text too long for the row scrolls left.
/// Backspace and Delete edit the buffer; a printable key that no command
/// claimed is appended. Submit/cancel are up to `extra`: the editor never
/// consumes Enter or Esc itself.
pub fn request_line<'a, S>(
    ctx: &mut UiContext,
    state: &mut S,
    max_len: usize,
    extra: impl IntoIterator<Item = Command<'a, S>>,
) -> Result<Response> {
    let mut choice = Choice::new();

    let field = ctx.surface.cursor();
    // One cell stays free for the cursor.
    let room = usize::from(ctx.surface.columns_remaining()).saturating_sub(1);
    let shown = field_text(ctx.line.text(), room);
    let cursor_x = field.x.saturating_add(u16::try_from(shown.width()).unwrap_or(u16::MAX));
    choice.add_static(StaticText::row(shown, Role::Selected));
    choice.add_spacer();
    choice.add_commands(extra);
    choice.add_command(Command::key(KeyCode::Backspace, "", |_: &mut S, ctx| {
        ctx.line.backspace();
        Ok(())
    }));
    choice.add_command(Command::key(KeyCode::Delete, "", |_: &mut S, ctx| {
        ctx.line.clear();
        Ok(())
    }));

    let resp = choice.request_with(ctx, state, |ctx| {
        ctx.surface.show_cursor_at(Position::new(cursor_x, field.y))
    })?;

    if let (InputEvent::Key(k), None) = (resp.event, resp.command) {
        if let Some(c) = k.text_char() {
            ctx.line.push(c, max_len);
        }
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backspace_on_empty_is_a_noop() {
        let mut b = LineBuffer::default();
        b.backspace();
        assert!(b.is_empty());
    }

    #[test]
    fn push_respects_max_and_control_chars() {
        let mut b = LineBuffer::default();
        for c in "12345".chars() {
            assert!(b.push(c, 5));
        }
        assert!(!b.push('6', 5));
        assert!(!b.push('\u{7}', 10));
        assert_eq!(b.text(), "12345");
        assert_eq!(b.as_int(), Some(12345));
    }

    #[test]
    fn numeric_views_follow_the_text() {
        let mut b = LineBuffer::with("12.5");
        assert_eq!(b.as_int(), None);
        assert_eq!(b.as_decimal(), Some(12.5));
        b.set_text("abc");
        assert_eq!(b.as_int(), None);
        assert_eq!(b.as_decimal(), None);
        b.set_text("inf");
        assert_eq!(b.as_decimal(), None);
        b.set_text(" -7 ");
        assert_eq!(b.as_int(), Some(-7));
        assert_eq!(b.as_decimal(), Some(-7.0));
    }

    #[test]
    fn field_keeps_the_tail_in_view() {
        assert_eq!(field_text("abc", 20), "> abc");
        assert_eq!(field_text("abcdefghijkl", 9), "> fghijkl");
        assert_eq!(field_text("abc", 1), "> ");
    }

    #[test]
    fn multibyte_length_counts_chars() {
        let mut b = LineBuffer::default();
        assert!(b.push('é', 2));
        assert!(b.push('ü', 2));
        assert!(!b.push('x', 2));
        b.backspace();
        assert_eq!(b.text(), "é");
    }
}
