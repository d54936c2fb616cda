//! Schema confirmation over a terminal.

use std::io::{self, BufRead, Write};

use query_engine_translation::translation::confirmation::UserTurnProvider;

const RULE: &str = "============================================================";

/// Shows each confirmation prompt on `output` and reads one line of response from `input`.
pub struct ConsoleTurns<R, W> {
    input: R,
    output: W,
}

impl ConsoleTurns<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        ConsoleTurns::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleTurns<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsoleTurns { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn show(&mut self, prompt: &str) -> io::Result<()> {
        write!(self.output, "\n{RULE}\n{prompt}\n{RULE}\n\n👤 Your response: ")?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> UserTurnProvider for ConsoleTurns<R, W> {
    fn next_turn(&mut self, prompt: &str) -> String {
        if let Err(error) = self.show(prompt) {
            tracing::warn!(%error, "Unable to show the confirmation prompt");
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(_) => line,
            Err(error) => {
                // an unreadable response counts as an empty one
                tracing::warn!(%error, "Unable to read a response");
                String::new()
            }
        }
    }
}
