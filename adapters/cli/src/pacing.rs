use std::io::{self, BufRead, Write};

use subsim_controller::TurnPacer;

/// Pacer that waits for ENTER on the console before every turn.
#[derive(Debug)]
pub(crate) struct ConsolePacer<I, O> {
    input: I,
    output: O,
}

impl<I, O> ConsolePacer<I, O> {
    /// Creates a pacer that prompts on `output` and waits on `input`.
    pub(crate) const fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}

impl<I: BufRead, O: Write> TurnPacer for ConsolePacer<I, O> {
    fn before_turn(&mut self, turn: u32) -> io::Result<()> {
        writeln!(self.output, "Press ENTER to continue turn {turn}")?;
        self.output.flush()?;
        let mut line = String::new();
        let _ = self.input.read_line(&mut line)?;
        Ok(())
    }
}
