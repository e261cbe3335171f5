use anyhow::Result;
use menu_console::{Choice, Command, Role, UiContext};

use crate::app::{App, Stage};
use crate::screens::{guess::GuessGame, quit_command};

pub fn step(ctx: &mut UiContext, app: &mut App) -> Result<()> {
    ctx.begin_frame()?;

    let mut menu = Choice::new();
    menu.add_styled_text("Menu Console", Role::Title).add_spacer();
    if let Some(status) = &app.status {
        menu.add_styled_text(status.clone(), Role::Error).add_spacer();
    }
    menu.add_command(Command::char('1', "Notes", |app: &mut App, ctx| {
        app.status = None;
        app.go(Stage::Notes, ctx);
        Ok(())
    }))
    .add_command(Command::char('2', "Guess a number", |app: &mut App, ctx| {
        app.status = None;
        app.guess = GuessGame::new();
        ctx.line.clear();
        app.go(Stage::Guess, ctx);
        Ok(())
    }))
    .add_spacer()
    .add_command(quit_command());

    menu.request(ctx, app)?;
    Ok(())
}
