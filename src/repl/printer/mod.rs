//! Result Printing
//!
//! Decides how an evaluated result is rendered:
//! 1. nothing at all for an absent result
//! 2. streams go to the [`StreamPrinter`]
//! 3. a renderer registered for the value's kind
//! 4. otherwise the value's `Display` followed by a newline
//!
//! Every printed result is preceded by a header made of the zero-padded
//! output counter and the output prefix.

pub mod stream;

pub use stream::StreamPrinter;

use std::collections::HashMap;
use std::io;
use std::rc::Rc;

use crate::engine::{Value, ValueKind};
use crate::repl::console::Console;

/// Default separator between the output counter and the value
pub const DEFAULT_OUTPUT_PREFIX: &str = " ==> ";

/// Renderer for one value kind
pub type RenderFn = Rc<dyn Fn(&Value, &mut dyn Console) -> io::Result<()>>;

/// Printer Registry
///
/// Maps a value kind to its renderer.
#[derive(Default, Clone)]
pub struct PrinterRegistry {
    printers: HashMap<ValueKind, RenderFn>,
}

impl PrinterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer, replacing any previous one for `kind`
    pub fn register<F>(
        &mut self,
        kind: ValueKind,
        render: F,
    ) where
        F: Fn(&Value, &mut dyn Console) -> io::Result<()> + 'static,
    {
        self.printers.insert(kind, Rc::new(render));
    }

    /// Renderer for `kind`, if one is registered
    pub fn get(
        &self,
        kind: ValueKind,
    ) -> Option<RenderFn> {
        self.printers.get(&kind).cloned()
    }
}

/// Default renderer
pub fn render_default(
    value: &Value,
    console: &mut dyn Console,
) -> io::Result<()> {
    writeln!(console, "{}", value)
}

/// Result Printer
#[derive(Clone)]
pub struct ResultPrinter {
    /// Results printed so far; the next header shows this value
    output_count: usize,
    /// Separator between header counter and value
    output_prefix: String,
    /// Type-keyed renderers
    printers: PrinterRegistry,
    /// Pagination for streams
    stream: StreamPrinter,
}

impl Default for ResultPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultPrinter {
    /// Create a printer with default settings
    pub fn new() -> Self {
        Self {
            output_count: 0,
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            printers: PrinterRegistry::new(),
            stream: StreamPrinter::default(),
        }
    }

    /// Number of results printed
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Separator between counter and value
    pub fn output_prefix(&self) -> &str {
        &self.output_prefix
    }

    /// Change the separator between counter and value
    pub fn set_output_prefix(
        &mut self,
        prefix: impl Into<String>,
    ) {
        self.output_prefix = prefix.into();
    }

    /// Registered renderers
    pub fn printers(&self) -> &PrinterRegistry {
        &self.printers
    }

    /// Registered renderers, mutable
    pub fn printers_mut(&mut self) -> &mut PrinterRegistry {
        &mut self.printers
    }

    /// Stream pagination settings
    pub fn stream(&self) -> &StreamPrinter {
        &self.stream
    }

    /// Stream pagination settings, mutable
    pub fn stream_mut(&mut self) -> &mut StreamPrinter {
        &mut self.stream
    }

    /// Print a result; returns whether anything was printed
    pub fn print(
        &mut self,
        result: Option<&Value>,
        console: &mut dyn Console,
    ) -> io::Result<bool> {
        let Some(value) = result else {
            return Ok(false);
        };

        write!(console, "{:03}{}", self.output_count, self.output_prefix)?;

        match value {
            Value::Stream(seq) => {
                self.stream.print(seq.clone(), console)?;
            }
            other => match self.printers.get(other.kind()) {
                Some(render) => render(other, console)?,
                None => render_default(other, console)?,
            },
        }

        self.output_count += 1;
        Ok(true)
    }
}
