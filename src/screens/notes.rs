use anyhow::Result;
use crossterm::event::KeyCode;
use menu_console::{confirm, request_line, Choice, Command, Keybind, Role, ScrollList, UiContext};
use ratatui::style::Color;

use crate::app::{App, NotesMode};
use crate::screens::{back_command, quit_command};

const MAX_NOTE_LEN: usize = 40;
const NOTES_PER_PAGE: usize = 8;

pub fn step(ctx: &mut UiContext, app: &mut App) -> Result<()> {
    ctx.begin_frame()?;
    match app.notes_mode {
        NotesMode::List => list(ctx, app),
        NotesMode::Adding => add(ctx, app),
    }
}

fn list(ctx: &mut UiContext, app: &mut App) -> Result<()> {
    // The list borrows its items for the whole request while the actions
    // need the app mutably.
    let notes = app.notes.clone();
    ScrollList::new(&notes, |n: &String| n.trim_start_matches('!').to_string())
        .title(format!("Notes ({})", notes.len()))
        .max_per_page(NOTES_PER_PAGE)
        .foreground(|n: &String| n.starts_with('!').then_some(Color::Red))
        .exit(back_command())
        .command(Command::char('a', "Add note", |app: &mut App, ctx| {
            ctx.line.clear();
            app.notes_mode = NotesMode::Adding;
            ctx.surface.request_clear();
            Ok(())
        }))
        .command(confirm(
            Keybind::char('d', "Delete selected"),
            "Delete the selected note?",
            |app: &mut App, ctx| {
                let i = ctx.scroll_index();
                if i < app.notes.len() {
                    app.notes.remove(i);
                }
                Ok(())
            },
        ))
        .command(quit_command())
        .request(ctx, app)?;
    Ok(())
}

fn add(ctx: &mut UiContext, app: &mut App) -> Result<()> {
    let mut header: Choice<'_, App> = Choice::new();
    header
        .add_styled_text("New note", Role::Title)
        .add_styled_text("Start with ! to mark it urgent.", Role::Muted)
        .add_spacer();
    header.render(ctx)?;

    let save = Command::key(KeyCode::Enter, "Save", |app: &mut App, ctx| {
        let text = ctx.current_text().trim().to_string();
        if !text.is_empty() {
            app.notes.push(text);
        }
        ctx.line.clear();
        app.notes_mode = NotesMode::List;
        ctx.surface.request_clear();
        Ok(())
    });
    let cancel = Command::key(KeyCode::Esc, "Cancel", |app: &mut App, ctx| {
        ctx.line.clear();
        app.notes_mode = NotesMode::List;
        ctx.surface.request_clear();
        Ok(())
    });
    request_line(ctx, app, MAX_NOTE_LEN, [save, cancel])?;
    Ok(())
}
