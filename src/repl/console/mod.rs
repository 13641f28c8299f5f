//! Console transport
//!
//! The session loop talks to the user through a [`Console`]: a blocking
//! line read and a formatted write. Three transports are provided:
//! - [`LineConsole`] - rustyline editor for interactive terminals
//! - [`IoConsole`] - any `BufRead` + `Write` pair (pipes, files)
//! - [`MemoryConsole`] - scripted input and captured output

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, IsTerminal, Write};
use std::rc::Rc;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Line-oriented terminal abstraction
pub trait Console {
    /// Show `prompt` and block for one line; `None` at end of input
    fn read_line(
        &mut self,
        prompt: &str,
    ) -> io::Result<Option<String>>;

    /// Write text without a trailing newline
    fn write_str(
        &mut self,
        text: &str,
    ) -> io::Result<()>;

    /// Support for `write!`/`writeln!` on consoles
    fn write_fmt(
        &mut self,
        args: fmt::Arguments<'_>,
    ) -> io::Result<()> {
        match args.as_str() {
            Some(text) => self.write_str(text),
            None => self.write_str(&args.to_string()),
        }
    }
}

/// Strip the line terminator, keeping all other whitespace
fn chomp(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Console over a reader/writer pair
#[derive(Debug)]
pub struct IoConsole<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> IoConsole<R, W> {
    /// Create a console from a reader and a writer
    pub fn new(
        reader: R,
        writer: W,
    ) -> Self {
        Self { reader, writer }
    }

    /// Recover the reader and writer
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl IoConsole<io::StdinLock<'static>, io::Stdout> {
    /// Console over the process's stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for IoConsole<R, W> {
    fn read_line(
        &mut self,
        prompt: &str,
    ) -> io::Result<Option<String>> {
        self.write_str(prompt)?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(chomp(line)))
    }

    fn write_str(
        &mut self,
        text: &str,
    ) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()
    }
}

/// Interactive console backed by rustyline
///
/// History is kept in memory for the lifetime of the session only.
pub struct LineConsole {
    editor: DefaultEditor,
}

impl LineConsole {
    /// Create a line editor on the current terminal
    pub fn new() -> io::Result<Self> {
        let editor = DefaultEditor::new()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Readline error: {:?}", e)))?;
        Ok(Self { editor })
    }
}

impl Console for LineConsole {
    fn read_line(
        &mut self,
        prompt: &str,
    ) -> io::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) => Ok(None),
            // Ctrl-C abandons the current line only
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
        }
    }

    fn write_str(
        &mut self,
        text: &str,
    ) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }
}

/// Scripted console: input lines are queued up front, output is captured
///
/// Cloning shares the same buffers, so a caller can keep a handle to inspect
/// the transcript after handing the console to a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    input: Rc<RefCell<VecDeque<String>>>,
    output: Rc<RefCell<String>>,
    prompts: Rc<RefCell<Vec<String>>>,
}

impl MemoryConsole {
    /// Create a console that will answer reads with `lines`
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let console = Self::default();
        console
            .input
            .borrow_mut()
            .extend(lines.into_iter().map(Into::into));
        console
    }

    /// Queue another input line
    pub fn push_line(
        &self,
        line: impl Into<String>,
    ) {
        self.input.borrow_mut().push_back(line.into());
    }

    /// Everything written so far, prompts excluded
    pub fn output(&self) -> String {
        self.output.borrow().clone()
    }

    /// Output split into lines
    pub fn output_lines(&self) -> Vec<String> {
        self.output.borrow().lines().map(str::to_string).collect()
    }

    /// Every prompt shown, in order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    /// Discard captured output and prompts
    pub fn clear_output(&self) {
        self.output.borrow_mut().clear();
        self.prompts.borrow_mut().clear();
    }
}

impl Console for MemoryConsole {
    fn read_line(
        &mut self,
        prompt: &str,
    ) -> io::Result<Option<String>> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self.input.borrow_mut().pop_front())
    }

    fn write_str(
        &mut self,
        text: &str,
    ) -> io::Result<()> {
        self.output.borrow_mut().push_str(text);
        Ok(())
    }
}

/// Pick a transport for the current process
///
/// Interactive terminals get the line editor; anything else (pipes,
/// redirected files) gets plain buffered IO.
pub fn default_console() -> io::Result<Box<dyn Console>> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        Ok(Box::new(LineConsole::new()?))
    } else {
        Ok(Box::new(IoConsole::stdio()))
    }
}
