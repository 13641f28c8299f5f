//! REPL Module
//!
//! The session loop and everything it drives.
//!
//! This module contains:
//! - [`session::EvalLoop`] - the read-eval-print loop
//! - [`commands::CommandRegistry`] - command table and built-in commands
//! - [`prompt::PromptTemplate`] - compiled prompt templates
//! - [`printer::ResultPrinter`] - result headers and type-keyed renderers
//! - [`printer::StreamPrinter`] - paginated output for lazy sequences
//! - [`console::Console`] - line transport

pub mod commands;
pub mod console;
pub mod error;
pub mod printer;
pub mod prompt;
pub mod session;

pub use commands::{parse_command_line, Command, CommandLine, CommandRegistry};
pub use console::{default_console, Console, IoConsole, LineConsole, MemoryConsole};
pub use error::{ReplError, ReplResult, TemplateFault};
pub use printer::{PrinterRegistry, ResultPrinter, StreamPrinter};
pub use prompt::{PromptContext, PromptTemplate};
pub use session::{EvalLoop, Session};
