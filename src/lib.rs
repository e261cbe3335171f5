//! Console interaction engine: text menus, scrollable lists and line entry
//! on a fixed-size character grid, driven by keyboard and mouse.
//!
//! A module builds a [`Choice`] (or calls [`request_line`] /
//! [`ScrollList::request`]) once per frame. The engine registers the
//! menu's commands, draws them on the [`Surface`], blocks for one input
//! event, runs the matching command's action and returns.
//!
//! ```ignore
//! loop {
//!     ctx.begin_frame()?;
//!     let mut menu = Choice::new();
//!     menu.add_styled_text("Main menu", Role::Title)
//!         .add_spacer()
//!         .add_command(Command::char('1', "Play", |game: &mut Game, _| game.start()))
//!         .add_command(Command::key(KeyCode::Esc, "Quit", |game: &mut Game, _| game.quit()));
//!     menu.request(&mut ctx, &mut game)?;
//! }
//! ```

pub mod backend;
pub mod choice;
pub mod command;
pub mod config;
pub mod confirm;
pub mod context;
pub mod defaults;
pub mod dispatch;
pub mod error;
pub mod keybind;
pub mod keys;
pub mod line;
pub mod scroll;
pub mod surface;
pub mod ui;

pub use backend::{Backend, KeySource, PointerSource, PointerState, Position, Size};
pub use choice::{Choice, Entry, Response, StaticText};
pub use command::{Action, Command};
pub use config::{EngineConfig, InputConfig};
pub use confirm::{ask, confirm};
pub use context::UiContext;
pub use dispatch::{Dispatcher, InputEvent};
pub use error::EngineError;
pub use keybind::{CommandId, Keybind, Registry};
pub use keys::KeyInput;
pub use line::{request_line, LineBuffer};
pub use scroll::{ScrollList, ScrollState};
pub use surface::Surface;
pub use ui::Role;
