//! Pagination Printer
//!
//! Prints a lazy sequence one item per line and pauses every `limit` lines
//! until the user acknowledges. The sequence may be unbounded; items are
//! pulled only as they are printed.

use std::fmt::Display;
use std::io;

use tracing::debug;

use crate::repl::console::Console;

/// Default number of lines between pauses
pub const DEFAULT_LIMIT: usize = 100;

/// Pagination Printer
#[derive(Debug, Clone)]
pub struct StreamPrinter {
    limit: usize,
    number_lines: bool,
}

impl Default for StreamPrinter {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl StreamPrinter {
    /// Create a printer pausing every `limit` lines (at least one)
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            number_lines: false,
        }
    }

    /// Lines printed between pauses
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Set the pause interval; zero is clamped to one
    pub fn set_limit(
        &mut self,
        limit: usize,
    ) {
        self.limit = limit.max(1);
    }

    /// Whether lines are prefixed with their index
    pub fn numbering(&self) -> bool {
        self.number_lines
    }

    /// Enable or disable line numbering
    pub fn set_numbering(
        &mut self,
        enabled: bool,
    ) {
        self.number_lines = enabled;
    }

    /// Flip line numbering, returning the new state
    pub fn toggle_numbering(&mut self) -> bool {
        self.number_lines = !self.number_lines;
        self.number_lines
    }

    /// Print every item, returning the number of lines written
    ///
    /// Each call starts counting from zero. End of input while paused stops
    /// the listing.
    pub fn print<I>(
        &self,
        items: I,
        console: &mut dyn Console,
    ) -> io::Result<usize>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let mut lines = 0;

        for item in items {
            if lines > 0 && lines % self.limit == 0 {
                let prompt = format!("Line {}. Press enter key to continue.", lines);
                if console.read_line(&prompt)?.is_none() {
                    debug!("end of input while paginating, stopping after {} lines", lines);
                    break;
                }
            }

            if self.number_lines {
                writeln!(console, "{} {}", lines, item)?;
            } else {
                writeln!(console, "{}", item)?;
            }
            lines += 1;
        }

        Ok(lines)
    }
}
