pub mod guess;
pub mod main_menu;
pub mod notes;

use crossterm::event::{KeyCode, KeyModifiers};
use menu_console::{confirm, Command, Keybind};

use crate::app::{App, Stage};

/// Esc back to the main menu, so every module gets "Back" for free.
pub fn back_command<'a>() -> Command<'a, App> {
    Command::key(KeyCode::Esc, "Back", |app: &mut App, ctx| {
        app.go(Stage::MainMenu, ctx);
        Ok(())
    })
}

/// Ctrl+Q from anywhere, behind a confirmation.
pub fn quit_command<'a>() -> Command<'a, App> {
    let bind = Keybind::char('q', "Quit").with_modifiers(KeyModifiers::CONTROL);
    confirm(bind, "Do you really want to quit?", |app: &mut App, ctx| {
        app.go(Stage::Quit, ctx);
        Ok(())
    })
}
