//! Page navigation state machine.
//!
//! [`Navigator::handle`] is a pure transition: it consumes one line of user
//! input and returns the [`Effect`]s the caller has to perform. Nothing here
//! touches stdin, stdout or the speech engine, see [`crate::session`] for
//! the loop that does.

use log::debug;

use crate::book::{PageNotFound, PagedBook};

pub const PAGE_PROMPT: &str = "Please enter the page number: ";
pub const COMMAND_MENU: &str = "Please Select an option: \n 1. Type 'r' to read again: \n 2. Type 'p' to read previous page\n 3. Type 'n' to read next page\n 4. Type 'q' to quit:\n 5. Type page number to read that page:\n";
pub const INVALID_PAGE: &str = "Invalid page number!";
pub const PREVIOUS_PAGE: &str = "Reading previous page";
pub const NEXT_PAGE: &str = "Reading next page";
pub const QUITTING: &str = "Quitting the book!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    AwaitingStart,
    AwaitingCommand,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Asks for a 1-based page number; printed and spoken.
    PageNumber,
    /// The command menu; printed only.
    Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Printed and spoken.
    Announce(String),
    /// Speak the text of the page at this 0-based index.
    ReadPage(usize),
    Prompt(Prompt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Repeat,
    Previous,
    Next,
    Quit,
    Goto(i64),
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "r" => Some(Command::Repeat),
            "p" => Some(Command::Previous),
            "n" => Some(Command::Next),
            "q" => Some(Command::Quit),
            other => page_number_to_cursor(other).map(Command::Goto),
        }
    }
}

/// Converts a 1-based page number typed by the user into a 0-based cursor.
///
/// Only ASCII digits are accepted; numbers that do not fit an `i64` are
/// rejected like any other garbage.
pub fn page_number_to_cursor(input: &str) -> Option<i64> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse::<i64>().ok().map(|page| page - 1)
}

pub fn total_pages_announcement(page_count: usize) -> String {
    format!("The book has total {page_count} pages!")
}

pub fn reading_announcement(cursor: usize) -> String {
    format!("Reading page {}", cursor + 1)
}

#[derive(Debug)]
pub struct Navigator {
    book: PagedBook,
    page_count: usize,
    cursor: Option<i64>,
    state: NavState,
}

impl Navigator {
    pub fn new(book: PagedBook) -> Self {
        let page_count = book.page_count();
        Self {
            book,
            page_count,
            cursor: None,
            state: NavState::AwaitingStart,
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn cursor(&self) -> Option<i64> {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.state == NavState::Quit
    }

    pub fn page_text(&self, index: usize) -> Result<&str, PageNotFound> {
        self.book.page(index as i64)
    }

    /// Effects of opening the session.
    pub fn start(&self) -> Vec<Effect> {
        vec![
            Effect::Announce(total_pages_announcement(self.page_count)),
            Effect::Prompt(Prompt::PageNumber),
        ]
    }

    pub fn handle(&mut self, input: &str) -> Vec<Effect> {
        debug!("navigator {:?} received {:?}", self.state, input.trim());
        match self.state {
            NavState::Quit => Vec::new(),
            NavState::AwaitingStart => self.handle_page_prompt(input),
            NavState::AwaitingCommand => self.handle_command(input),
        }
    }

    fn handle_page_prompt(&mut self, input: &str) -> Vec<Effect> {
        match Command::parse(input) {
            Some(Command::Quit) => self.quit(),
            Some(Command::Goto(cursor)) => self.goto(Vec::new(), cursor),
            Some(command) if self.cursor.is_some() => self.apply(command),
            _ => self.reject_page(Vec::new()),
        }
    }

    fn handle_command(&mut self, input: &str) -> Vec<Effect> {
        match Command::parse(input) {
            Some(command) => self.apply(command),
            None => vec![Effect::Prompt(Prompt::Command)],
        }
    }

    fn apply(&mut self, command: Command) -> Vec<Effect> {
        let current = self.cursor.unwrap_or_default();
        match command {
            Command::Repeat => self.goto(Vec::new(), current),
            Command::Previous => self.goto(
                vec![Effect::Announce(PREVIOUS_PAGE.to_string())],
                current.saturating_sub(1),
            ),
            Command::Next => {
                self.goto(
                vec![Effect::Announce(NEXT_PAGE.to_string())],
                current.saturating_add(1),
            )
            }
            Command::Quit => self.quit(),
            Command::Goto(cursor) => self.goto(Vec::new(), cursor),
        }
    }

    fn goto(&mut self, mut effects: Vec<Effect>, cursor: i64) -> Vec<Effect> {
        self.cursor = Some(cursor);
        let Some(index) = self.in_range(cursor) else {
            return self.reject_page(effects);
        };
        self.state = NavState::AwaitingCommand;
        effects.push(Effect::Announce(reading_announcement(index)));
        effects.push(Effect::ReadPage(index));
        effects.push(Effect::Prompt(Prompt::Command));
        effects
    }

    fn reject_page(&mut self, mut effects: Vec<Effect>) -> Vec<Effect> {
        self.state = NavState::AwaitingStart;
        effects.push(Effect::Announce(INVALID_PAGE.to_string()));
        effects.push(Effect::Announce(total_pages_announcement(self.page_count)));
        effects.push(Effect::Prompt(Prompt::PageNumber));
        effects
    }

    fn quit(&mut self) -> Vec<Effect> {
        self.state = NavState::Quit;
        vec![Effect::Announce(QUITTING.to_string())]
    }

    fn in_range(&self, cursor: i64) -> Option<usize> {
        usize::try_from(cursor)
            .ok()
            .filter(|&index| index < self.page_count)
    }
}
