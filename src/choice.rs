//! Menus: an ordered list of commands, spacers and text that is drawn and
//! then resolves exactly one input event.

use anyhow::Result;
use ratatui::style::Color;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::command::Command;
use crate::context::UiContext;
use crate::dispatch::InputEvent;
use crate::keybind::CommandId;
use crate::ui::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticText {
    pub text: String,
    pub role: Role,
    /// Overrides the role's colors when set.
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    /// Wrap onto further rows; otherwise the row is cut at the edge.
    pub wrap: bool,
}

impl StaticText {
    pub fn new(text: impl Into<String>, role: Role) -> Self {
        Self { text: text.into(), role, fg: None, bg: None, wrap: true }
    }

    /// Exactly one row, clipped.
    pub fn row(text: impl Into<String>, role: Role) -> Self {
        Self { wrap: false, ..Self::new(text, role) }
    }
}

#[derive(Debug)]
pub enum Entry<'a, S> {
    Command(Command<'a, S>),
    Spacer,
    Text(StaticText),
}

/// What one request produced: the raw event and the command it resolved
/// to, if any. The command's action has already run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub event: InputEvent,
    pub command: Option<CommandId>,
}

impl Response {
    pub fn resolved(&self) -> bool {
        self.command.is_some()
    }
}

#[derive(Debug)]
pub struct Choice<'a, S> {
    entries: Vec<Entry<'a, S>>,
}

impl<S> Default for Choice<'_, S> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<'a, S> Choice<'a, S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: Command<'a, S>) -> &mut Self {
        self.entries.push(Entry::Command(command));
        self
    }

    pub fn add_commands(&mut self, commands: impl IntoIterator<Item = Command<'a, S>>) -> &mut Self {
        self.entries.extend(commands.into_iter().map(Entry::Command));
        self
    }

    pub fn add_spacer(&mut self) -> &mut Self {
        self.entries.push(Entry::Spacer);
        self
    }

    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.add_styled_text(text, Role::Text)
    }

    pub fn add_styled_text(&mut self, text: impl Into<String>, role: Role) -> &mut Self {
        self.entries.push(Entry::Text(StaticText::new(text, role)));
        self
    }

    pub fn add_static(&mut self, text: StaticText) -> &mut Self {
        self.entries.push(Entry::Text(text));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers every command at the cursor and draws the visible entries.
    pub fn render(&self, ctx: &mut UiContext) -> Result<()> {
        for entry in &self.entries {
            match entry {
                Entry::Command(cmd) => render_command(ctx, cmd)?,
                Entry::Spacer => {
                    ctx.surface.pad_row()?;
                    ctx.surface.newline();
                }
                Entry::Text(t) => render_text(ctx, t)?,
            }
        }
        Ok(())
    }

    pub fn request(&mut self, ctx: &mut UiContext, state: &mut S) -> Result<Response> {
        self.request_with(ctx, state, |_| Ok(()))
    }

    /// Like [`Choice::request`], running `before_input` after drawing and
    /// before waiting (e.g. to park the text cursor).
    pub fn request_with<F>(
        &mut self,
        ctx: &mut UiContext,
        state: &mut S,
        before_input: F,
    ) -> Result<Response>
    where
        F: FnOnce(&mut UiContext) -> Result<()>,
    {
        self.render(ctx)?;
        before_input(ctx)?;
        ctx.surface.present()?;

        let event = ctx.next_event()?;
        let command = resolve(ctx, &event);
        match command {
            Some(id) => match self.command_mut(id) {
                Some(cmd) => {
                    debug!(id = %id, label = %cmd.bind.label, "execute");
                    cmd.execute(state, ctx)?;
                }
                None => debug!(id = %id, "resolved command belongs to another menu"),
            },
            None => debug!(?event, "no command matched"),
        }
        Ok(Response { event, command })
    }

    fn command_mut(&mut self, id: CommandId) -> Option<&mut Command<'a, S>> {
        self.entries.iter_mut().find_map(|e| match e {
            Entry::Command(c) if c.id() == id => Some(c),
            _ => None,
        })
    }
}

/// Keyboard events match by trigger, clicks by position. Hovering never
/// resolves anything.
pub fn resolve(ctx: &UiContext, event: &InputEvent) -> Option<CommandId> {
    match event {
        InputEvent::Key(k) => ctx.registry.resolve(k),
        InputEvent::Click(p) => ctx.registry.resolve_pointer(*p),
        InputEvent::Hover(_) => None,
    }
}

fn render_command<S>(ctx: &mut UiContext, cmd: &Command<'_, S>) -> Result<()> {
    let pos = ctx.surface.cursor();
    if !cmd.bind.display() {
        ctx.registry.register(&cmd.bind, pos, 0)?;
        return Ok(());
    }
    let label = cmd.bind.rendered_label();
    let width = u16::try_from(label.width()).unwrap_or(u16::MAX);
    ctx.registry.register(&cmd.bind, pos, width)?;

    let (fg, bg) = if ctx.registry.is_highlighted(cmd.id(), ctx.pointer())? {
        (Role::Highlight.fg(), Role::Highlight.bg())
    } else {
        (cmd.bind.color.or(Role::Text.fg()), None)
    };
    ctx.surface.print_line(&label, fg, bg)?;
    Ok(())
}

fn render_text(ctx: &mut UiContext, t: &StaticText) -> Result<()> {
    let fg = t.fg.or(t.role.fg());
    let bg = t.bg.or(t.role.bg());
    let room = usize::from(ctx.surface.columns_remaining().max(1));
    if t.text.is_empty() || !t.wrap {
        ctx.surface.print_line(&t.text, fg, bg)?;
        return Ok(());
    }
    for line in textwrap::wrap(&t.text, room) {
        ctx.surface.print_line(&line, fg, bg)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::backend::Position;
    use crate::error::EngineError;
    use crate::keys::KeyInput;
    use crossterm::event::KeyCode;

    fn ctx_with(events: Vec<InputEvent>) -> (UiContext, MemoryBackend) {
        let screen = MemoryBackend::new(30, 10);
        let ctx = UiContext::scripted(screen.clone(), events).unwrap();
        (ctx, screen)
    }

    #[test]
    fn renders_entries_top_to_bottom() {
        let (mut ctx, screen) = ctx_with(vec![InputEvent::Key(KeyInput::char('z'))]);
        let mut count = 0u32;
        let mut choice = Choice::new();
        choice
            .add_styled_text("Main menu", Role::Title)
            .add_spacer()
            .add_command(Command::char('1', "Play", |n: &mut u32, _| {
                *n += 1;
                Ok(())
            }))
            .add_command(Command::key(KeyCode::Up, "", |_, _| Ok(())))
            .add_command(Command::key(KeyCode::Esc, "Back", |_, _| Ok(())));
        ctx.begin_frame().unwrap();
        let resp = choice.request(&mut ctx, &mut count).unwrap();

        assert_eq!(screen.rows(), vec!["Main menu", "", "1) Play", "Esc) Back"]);
        assert!(!resp.resolved());
        assert_eq!(count, 0);
        assert_eq!(ctx.registry.len(), 3);
    }

    #[test]
    fn matching_key_runs_the_action_before_returning() {
        let (mut ctx, _) = ctx_with(vec![InputEvent::Key(KeyInput::char('1'))]);
        let mut count = 0u32;
        let mut choice = Choice::new();
        let play = Command::char('1', "Play", |n: &mut u32, _| {
            *n += 1;
            Ok(())
        });
        let play_id = play.id();
        choice.add_command(play);
        ctx.begin_frame().unwrap();
        let resp = choice.request(&mut ctx, &mut count).unwrap();
        assert_eq!(resp.command, Some(play_id));
        assert_eq!(count, 1);
    }

    #[test]
    fn noop_command_resolves_without_effect() {
        let (mut ctx, _) = ctx_with(vec![InputEvent::Key(KeyInput::key(KeyCode::Esc))]);
        let mut choice: Choice<'_, ()> = Choice::new();
        choice.add_command(Command::noop(crate::keybind::Keybind::key(KeyCode::Esc, "No")));
        ctx.begin_frame().unwrap();
        assert!(choice.request(&mut ctx, &mut ()).unwrap().resolved());
    }

    #[test]
    fn click_resolves_by_position() {
        // "1) Play" on row 0, "2) Quit" on row 1.
        let (mut ctx, _) = ctx_with(vec![InputEvent::Click(Position::new(4, 1))]);
        let mut picked = String::new();
        let mut choice = Choice::new();
        choice
            .add_command(Command::char('1', "Play", |s: &mut String, _| {
                s.push_str("play");
                Ok(())
            }))
            .add_command(Command::char('2', "Quit", |s: &mut String, _| {
                s.push_str("quit");
                Ok(())
            }));
        ctx.begin_frame().unwrap();
        choice.request(&mut ctx, &mut picked).unwrap();
        assert_eq!(picked, "quit");
        assert_eq!(ctx.pointer(), Some(Position::new(4, 1)));
    }

    #[test]
    fn hover_highlights_on_next_render() {
        let (mut ctx, screen) = ctx_with(vec![InputEvent::Hover(Position::new(1, 0))]);
        let mut choice: Choice<'_, ()> = Choice::new();
        choice.add_command(Command::char('1', "Play", |_, _| Ok(())));
        ctx.begin_frame().unwrap();
        let resp = choice.request(&mut ctx, &mut ()).unwrap();
        assert!(!resp.resolved());
        assert_eq!(screen.bg_at(0, 0), Color::Reset);

        ctx.begin_frame().unwrap();
        choice.render(&mut ctx).unwrap();
        assert_eq!(Some(screen.bg_at(0, 0)), Role::Highlight.bg());
    }

    #[test]
    fn requesting_twice_without_a_new_frame_is_a_caller_bug() {
        let (mut ctx, _) = ctx_with(vec![InputEvent::Key(KeyInput::char('x'))]);
        let mut choice: Choice<'_, ()> = Choice::new();
        choice.add_command(Command::char('1', "Play", |_, _| Ok(())));
        ctx.begin_frame().unwrap();
        choice.request(&mut ctx, &mut ()).unwrap();
        let err = choice.request(&mut ctx, &mut ()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::DuplicateRegistration { .. })
        ));
    }

    #[test]
    fn request_presents_the_frame_before_waiting() {
        let (mut ctx, screen) = ctx_with(vec![InputEvent::Key(KeyInput::char('z'))]);
        let mut choice: Choice<'_, ()> = Choice::new();
        choice.add_text("hello");
        ctx.begin_frame().unwrap();
        let before = screen.flush_count();
        choice.request(&mut ctx, &mut ()).unwrap();
        assert_eq!(screen.flush_count(), before + 1);

        // Input is gone, but the frame still reached the screen.
        ctx.begin_frame().unwrap();
        assert!(choice.request(&mut ctx, &mut ()).is_err());
        assert_eq!(screen.flush_count(), before + 2);
    }

    #[test]
    fn long_text_wraps() {
        let (mut ctx, screen) = ctx_with(vec![]);
        let mut choice: Choice<'_, ()> = Choice::new();
        choice.add_text("one two three four five six seven eight nine");
        ctx.begin_frame().unwrap();
        choice.render(&mut ctx).unwrap();
        let rows = screen.rows();
        assert!(rows.len() >= 2);
        assert!(rows.iter().all(|r| r.len() <= 30));
    }
}
