use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info};

use menu_console::backend::terminal::{self, TerminalBackend};
use menu_console::{Backend, Dispatcher, EngineConfig, EngineError, Surface, UiContext};

use crate::screens::{self, guess::GuessGame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    MainMenu,
    Notes,
    Guess,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotesMode {
    #[default]
    List,
    Adding,
}

/// Everything the demo modules keep between frames.
#[derive(Debug)]
pub struct App {
    pub stage: Stage,
    pub notes: Vec<String>,
    pub notes_mode: NotesMode,
    pub guess: GuessGame,
    /// Last error shown on the main menu.
    pub status: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            stage: Stage::MainMenu,
            notes: vec![
                "Buy milk".into(),
                "Call the plumber".into(),
                "!Renew passport".into(),
            ],
            notes_mode: NotesMode::List,
            guess: GuessGame::new(),
            status: None,
        }
    }

    /// Switches module; the next frame starts on a clean screen.
    pub fn go(&mut self, stage: Stage, ctx: &mut UiContext) {
        info!(from = ?self.stage, to = ?stage, "stage change");
        self.stage = stage;
        ctx.surface.request_clear();
    }

    /// Back to a known state after a module failed.
    fn reset_module(&mut self, ctx: &mut UiContext) {
        self.notes_mode = NotesMode::List;
        self.guess = GuessGame::new();
        ctx.line.clear();
        ctx.scroll.reset();
        self.go(Stage::MainMenu, ctx);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

pub fn run(config: &EngineConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("input")
        .enable_time()
        .build()
        .context("starting input runtime")?;

    terminal::enter(config.mouse)?;
    let result = run_session(&runtime, config);
    let restored = terminal::restore();
    runtime.shutdown_timeout(Duration::from_millis(500));
    result.and(restored)
}

fn run_session(runtime: &tokio::runtime::Runtime, config: &EngineConfig) -> Result<()> {
    let backend = TerminalBackend::new()?;
    let viewport = config.viewport(backend.max_viewport_size()?);
    let (keys, pointer) = terminal::input_sources();
    let dispatcher =
        Dispatcher::spawn(runtime.handle(), keys, config.mouse.then_some(pointer), &config.input);

    let mut surface = Surface::new(Box::new(backend), Some(viewport))?;
    surface.set_cursor_blink_size(config.cursor_blink_percent)?;
    let mut ctx = UiContext::new(surface, dispatcher);

    let mut app = App::new();
    run_loop(&mut ctx, &mut app)
}

/// Runs modules until one of them chooses to quit. A module error is
/// logged, shown on the main menu and the module is reset; only closed
/// input ends the loop with an error.
pub fn run_loop(ctx: &mut UiContext, app: &mut App) -> Result<()> {
    while app.stage != Stage::Quit {
        let step = match app.stage {
            Stage::MainMenu => screens::main_menu::step(ctx, app),
            Stage::Notes => screens::notes::step(ctx, app),
            Stage::Guess => screens::guess::step(ctx, app),
            Stage::Quit => break,
        };
        if let Err(e) = step {
            if matches!(e.downcast_ref::<EngineError>(), Some(EngineError::InputClosed)) {
                return Err(e);
            }
            error!(stage = ?app.stage, "module failed: {e:#}");
            app.status = Some(format!("{e:#}"));
            app.reset_module(ctx);
        }
    }
    info!("quit");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use menu_console::backend::memory::MemoryBackend;
    use menu_console::{InputEvent, KeyInput};

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyInput::key(code))
    }

    fn ch(c: char) -> InputEvent {
        InputEvent::Key(KeyInput::char(c))
    }

    #[test]
    fn add_a_note_then_quit_through_the_confirmation() {
        let screen = MemoryBackend::new(60, 20);
        let events = vec![
            ch('1'),
            ch('a'),
            ch('h'),
            ch('i'),
            key(KeyCode::Enter),
            key(KeyCode::Esc),
            InputEvent::Key(KeyInput::char('q').with_modifiers(KeyModifiers::CONTROL)),
            key(KeyCode::Enter),
        ];
        let mut ctx = UiContext::scripted(screen.clone(), events).unwrap();
        let mut app = App::new();
        run_loop(&mut ctx, &mut app).unwrap();

        assert_eq!(app.stage, Stage::Quit);
        assert_eq!(app.notes.last().map(String::as_str), Some("hi"));
    }

    #[test]
    fn declining_to_quit_keeps_running() {
        let screen = MemoryBackend::new(60, 20);
        let events = vec![
            InputEvent::Key(KeyInput::char('q').with_modifiers(KeyModifiers::CONTROL)),
            key(KeyCode::Esc),
        ];
        let mut ctx = UiContext::scripted(screen.clone(), events).unwrap();
        let mut app = App::new();
        let err = run_loop(&mut ctx, &mut app).unwrap_err();
        assert_eq!(err.downcast_ref::<EngineError>(), Some(&EngineError::InputClosed));
        assert_eq!(app.stage, Stage::MainMenu);
        assert!(screen.contains("1) Notes"));
    }
}
