//! Yes/no gate in front of an action.

use anyhow::Result;
use crossterm::event::KeyCode;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::backend::Size;
use crate::choice::Choice;
use crate::command::Command;
use crate::context::UiContext;
use crate::defaults::Defaults;
use crate::keybind::Keybind;

/// A command that asks `prompt` first and runs `action` only on "yes".
pub fn confirm<'a, S, F>(bind: Keybind, prompt: impl Into<String>, mut action: F) -> Command<'a, S>
where
    F: FnMut(&mut S, &mut UiContext) -> Result<()> + 'a,
{
    let prompt = prompt.into();
    Command::new(bind, move |state, ctx| {
        if ask(ctx, &prompt)? {
            action(state, ctx)?;
        }
        Ok(())
    })
}

/// Shows a dialog in its own viewport until Enter (yes) or Esc (no) is
/// chosen, then restores the caller's viewport.
pub fn ask(ctx: &mut UiContext, prompt: &str) -> Result<bool> {
    let previous = ctx.surface.size();
    let indent = ctx.surface.indent();
    let text_width = u16::try_from(prompt.width()).unwrap_or(u16::MAX);
    let width = text_width.saturating_add(4).max(Defaults::CONFIRM_MIN_WIDTH);

    ctx.surface.set_size(Size::new(width, Defaults::CONFIRM_HEIGHT))?;
    ctx.surface.set_indent(2);
    let answer = dialog_loop(ctx, prompt);
    ctx.surface.set_indent(indent);
    ctx.surface.set_size(previous)?;

    debug!(prompt, answer = ?answer.as_ref().ok(), "confirmation closed");
    answer
}

fn dialog_loop(ctx: &mut UiContext, prompt: &str) -> Result<bool> {
    loop {
        ctx.begin_frame()?;
        let mut confirmed = false;
        let mut choice = Choice::new();
        choice
            .add_spacer()
            .add_text(prompt)
            .add_spacer()
            .add_command(Command::key(KeyCode::Enter, "Yes", |yes: &mut bool, _| {
                *yes = true;
                Ok(())
            }))
            .add_command(Command::noop(Keybind::key(KeyCode::Esc, "No")));
        if choice.request(ctx, &mut confirmed)?.resolved() {
            return Ok(confirmed);
        }
    }
}
