//! Paginated single-column lists.

use std::ops::Range;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::style::Color;
use tracing::debug;

use crate::choice::{Choice, Response, StaticText};
use crate::command::Command;
use crate::context::UiContext;
use crate::defaults::Defaults;
use crate::ui::Role;

/// Selected index into a list. Navigation moves it freely (it may go
/// negative or past the end); [`ScrollState::clamp`] brings it back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    index: isize,
}

impl ScrollState {
    /// The selection, never below zero.
    pub fn index(&self) -> usize {
        usize::try_from(self.index).unwrap_or(0)
    }

    pub fn raw(&self) -> isize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = isize::try_from(index).unwrap_or(isize::MAX);
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn up(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn down(&mut self) {
        self.index = self.index.saturating_add(1);
    }

    pub fn page_forward(&mut self, page: usize) {
        self.index = self.index.saturating_add(isize::try_from(page).unwrap_or(isize::MAX));
    }

    pub fn page_backward(&mut self, page: usize) {
        self.index = self.index.saturating_sub(isize::try_from(page).unwrap_or(isize::MAX));
    }

    /// Into `[0, len - 1]`. An empty list leaves the index alone.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let last = isize::try_from(len - 1).unwrap_or(isize::MAX);
        self.index = self.index.clamp(0, last);
    }
}

/// First index of the page holding `index`. `page` must be non-zero.
pub fn page_start(index: usize, page: usize) -> usize {
    index - index % page
}

/// Indices shown on the page holding `index`.
pub fn page_range(index: usize, page: usize, len: usize) -> Range<usize> {
    let start = page_start(index, page);
    start..(start + page).min(len)
}

/// Whether moving the selection changed which page is on screen.
pub fn page_crossed(before: usize, after: usize, page: usize) -> bool {
    before / page != after / page
}

type Project<'a, T, R> = Box<dyn Fn(&T) -> R + 'a>;

/// A scrollable list over `items`, built per frame and consumed by
/// [`ScrollList::request`].
pub struct ScrollList<'a, T, S> {
    items: &'a [T],
    text: Project<'a, T, String>,
    fg: Option<Project<'a, T, Option<Color>>>,
    bg: Option<Project<'a, T, Option<Color>>>,
    title: Option<String>,
    max_per_page: Option<usize>,
    navigation: bool,
    exit: Option<Command<'a, S>>,
    extra: Vec<Command<'a, S>>,
}

impl<'a, T, S> ScrollList<'a, T, S> {
    pub fn new<F>(items: &'a [T], text: F) -> Self
    where
        F: Fn(&T) -> String + 'a,
    {
        Self {
            items,
            text: Box::new(text),
            fg: None,
            bg: None,
            title: None,
            max_per_page: None,
            navigation: true,
            exit: None,
            extra: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn max_per_page(mut self, max: usize) -> Self {
        self.max_per_page = Some(max);
        self
    }

    /// Built-in arrow/page keys; on by default.
    pub fn navigation(mut self, enabled: bool) -> Self {
        self.navigation = enabled;
        self
    }

    pub fn foreground<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Option<Color> + 'a,
    {
        self.fg = Some(Box::new(f));
        self
    }

    pub fn background<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Option<Color> + 'a,
    {
        self.bg = Some(Box::new(f));
        self
    }

    pub fn exit(mut self, command: Command<'a, S>) -> Self {
        self.exit = Some(command);
        self
    }

    pub fn command(mut self, command: Command<'a, S>) -> Self {
        self.extra.push(command);
        self
    }

    /// Rows the list leaves for itself after the title, hint and commands.
    /// The title and hint are single clipped rows.
    fn capacity(&self, ctx: &UiContext) -> usize {
        let commands = self.exit.iter().chain(&self.extra).filter(|c| c.bind.display()).count();
        let title_rows = if self.title.is_some() { 2 } else { 0 };
        let hint_rows = usize::from(self.navigation);
        let reserved = title_rows + 1 + hint_rows + commands;
        usize::from(ctx.surface.rows_remaining()).saturating_sub(reserved)
    }

    pub fn request(self, ctx: &mut UiContext, state: &mut S) -> Result<Response> {
        let len = self.items.len();
        let page = self
            .capacity(ctx)
            .min(self.max_per_page.unwrap_or(len))
            .min(len);

        let mut choice = Choice::new();
        if let Some(title) = &self.title {
            choice.add_static(StaticText::row(title.clone(), Role::Title));
            choice.add_spacer();
        }

        if page == 0 {
            choice.add_static(StaticText::row(Defaults::EMPTY_LIST_TEXT, Role::Muted));
        } else {
            ctx.scroll.clamp(len);
            let index = ctx.scroll.index();
            for i in page_range(index, page, len) {
                let item = &self.items[i];
                let selected = i == index;
                let mark = if selected { Defaults::SELECTED_MARK } else { Defaults::UNSELECTED_MARK };
                let role = if selected { Role::Selected } else { Role::Text };
                let mut row = StaticText::row(format!("{mark}{}", (self.text)(item)), role);
                row.fg = self.fg.as_ref().and_then(|f| f(item));
                row.bg = self.bg.as_ref().and_then(|f| f(item));
                choice.add_static(row);
            }
        }
        choice.add_spacer();

        let navigating = self.navigation && page > 0;
        if navigating {
            choice.add_commands(navigation_commands(page));
            choice.add_static(StaticText::row("Up/Down move  Left/Right page", Role::Muted));
        }
        if let Some(exit) = self.exit {
            choice.add_command(exit);
        }
        choice.add_commands(self.extra);

        let before = ctx.scroll.index();
        let resp = choice.request(ctx, state)?;

        if page > 0 {
            ctx.scroll.clamp(len);
            let after = ctx.scroll.index();
            if page_crossed(before, after, page) {
                debug!(before, after, page, "page boundary crossed");
                ctx.surface.clear()?;
            }
        }
        Ok(resp)
    }
}

fn navigation_commands<'a, S>(page: usize) -> Vec<Command<'a, S>> {
    vec![
        Command::key(KeyCode::Up, "", |_, ctx| {
            ctx.scroll.up();
            Ok(())
        }),
        Command::key(KeyCode::Down, "", |_, ctx| {
            ctx.scroll.down();
            Ok(())
        }),
        Command::key(KeyCode::Right, "", move |_, ctx| {
            ctx.scroll.page_forward(page);
            Ok(())
        }),
        Command::key(KeyCode::PageDown, "", move |_, ctx| {
            ctx.scroll.page_forward(page);
            Ok(())
        }),
        Command::key(KeyCode::Left, "", move |_, ctx| {
            ctx.scroll.page_backward(page);
            Ok(())
        }),
        Command::key(KeyCode::PageUp, "", move |_, ctx| {
            ctx.scroll.page_backward(page);
            Ok(())
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_start_is_aligned() {
        assert_eq!(page_start(0, 3), 0);
        assert_eq!(page_start(5, 3), 3);
        assert_eq!(page_range(4, 2, 5), 4..5);
    }

    #[test]
    fn navigation_is_raw_until_clamped() {
        let mut s = ScrollState::default();
        s.up();
        assert_eq!(s.raw(), -1);
        assert_eq!(s.index(), 0);
        s.page_forward(10);
        s.clamp(4);
        assert_eq!(s.index(), 3);
    }

    #[test]
    fn empty_list_leaves_index_alone() {
        let mut s = ScrollState::default();
        s.set_index(7);
        s.clamp(0);
        assert_eq!(s.index(), 7);
    }

    #[test]
    fn crossing_compares_pages() {
        assert!(!page_crossed(0, 1, 2));
        assert!(page_crossed(1, 2, 2));
        assert!(page_crossed(2, 0, 2));
        assert!(!page_crossed(4, 4, 2));
    }
}
