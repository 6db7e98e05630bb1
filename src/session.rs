use std::io::{BufRead, Write};

use log::info;
use thiserror::Error;

use crate::book::PageNotFound;
use crate::navigator::{Effect, Navigator, Prompt, COMMAND_MENU, PAGE_PROMPT};
use crate::speech::{Speaker, SpeechError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Speech(#[from] SpeechError),
    #[error(transparent)]
    PageNotFound(#[from] PageNotFound),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Interactive read-through: prompts on `output`, commands from `input`,
/// speech through `speaker`.
pub struct Session<'a, S: Speaker, R: BufRead, W: Write> {
    navigator: Navigator,
    speaker: &'a mut S,
    input: R,
    output: W,
}

impl<'a, S: Speaker, R: BufRead, W: Write> Session<'a, S, R, W> {
    pub fn new(navigator: Navigator, speaker: &'a mut S, input: R, output: W) -> Self {
        Self {
            navigator,
            speaker,
            input,
            output,
        }
    }

    /// Runs until the reader quits or the input is closed.
    pub fn run(mut self) -> Result<Navigator, SessionError> {
        let effects = self.navigator.start();
        self.perform(effects)?;

        while !self.navigator.is_finished() {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                info!("Input closed, ending the reading session");
                break;
            }
            let effects = self.navigator.handle(&line);
            self.perform(effects)?;
        }
        Ok(self.navigator)
    }

    fn perform(&mut self, effects: Vec<Effect>) -> Result<(), SessionError> {
        for effect in effects {
            match effect {
                Effect::Announce(text) => {
                    writeln!(self.output, "{text}")?;
                    self.output.flush()?;
                    self.speaker.speak(&text)?;
                }
                Effect::ReadPage(index) => {
                    let text = self.navigator.page_text(index)?;
                    self.speaker.speak(text)?;
                }
                Effect::Prompt(Prompt::PageNumber) => {
                    self.speaker.speak(PAGE_PROMPT)?;
                    write!(self.output, "{PAGE_PROMPT}")?;
                    self.output.flush()?;
                }
                Effect::Prompt(Prompt::Command) => {
                    write!(self.output, "{COMMAND_MENU}")?;
                    self.output.flush()?;
                }
            }
        }
        Ok(())
    }
}
