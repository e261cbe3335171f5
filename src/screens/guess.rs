use std::cmp::Ordering;

use anyhow::Result;
use crossterm::event::KeyCode;
use menu_console::{request_line, Choice, Command, Role, UiContext};
use rand::Rng;

use crate::app::App;
use crate::screens::{back_command, quit_command};

const LOW: i64 = 1;
const HIGH: i64 = 100;
const HISTORY_ROWS: usize = 5;

#[derive(Debug, Clone)]
pub struct GuessGame {
    target: i64,
    tries: u32,
    history: Vec<String>,
    solved: bool,
}

impl GuessGame {
    pub fn new() -> Self {
        Self::with_target(rand::thread_rng().gen_range(LOW..=HIGH))
    }

    pub fn with_target(target: i64) -> Self {
        Self { target, tries: 0, history: Vec::new(), solved: false }
    }

    pub fn solved(&self) -> bool {
        self.solved
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn check(&mut self, guess: i64) {
        self.tries += 1;
        let line = match guess.cmp(&self.target) {
            Ordering::Less => format!("{guess} is too low"),
            Ordering::Greater => format!("{guess} is too high"),
            Ordering::Equal => {
                self.solved = true;
                format!("{guess} is right! ({} tries)", self.tries)
            }
        };
        self.history.push(line);
    }

    fn reject(&mut self, text: &str) {
        self.history.push(format!("{text:?} is not a whole number"));
    }
}

impl Default for GuessGame {
    fn default() -> Self {
        Self::new()
    }
}

pub fn step(ctx: &mut UiContext, app: &mut App) -> Result<()> {
    ctx.begin_frame()?;

    let mut header: Choice<'_, App> = Choice::new();
    header
        .add_styled_text(format!("Guess a number between {LOW} and {HIGH}"), Role::Title)
        .add_spacer();
    let skip = app.guess.history.len().saturating_sub(HISTORY_ROWS);
    for line in &app.guess.history[skip..] {
        header.add_text(line.clone());
    }
    header.add_spacer();
    header.render(ctx)?;

    if app.guess.solved {
        let mut done = Choice::new();
        done.add_command(Command::key(KeyCode::Enter, "Play again", |app: &mut App, ctx| {
            app.guess = GuessGame::new();
            ctx.surface.request_clear();
            Ok(())
        }))
        .add_command(back_command())
        .add_command(quit_command());
        done.request(ctx, app)?;
        return Ok(());
    }

    let submit = Command::key(KeyCode::Enter, "Guess", |app: &mut App, ctx| {
        match ctx.current_int() {
            Some(n) => app.guess.check(n),
            None => app.guess.reject(ctx.current_text()),
        }
        ctx.line.clear();
        ctx.surface.request_clear();
        Ok(())
    });
    request_line(ctx, app, 3, [submit, back_command(), quit_command()])?;
    Ok(())
}
