//! Session Loop
//!
//! [`EvalLoop`] reads lines from a [`Console`], routes command lines to the
//! [`CommandRegistry`] and everything else to the active [`Evaluator`], then
//! hands results to the [`ResultPrinter`].
//!
//! Failures never end the loop. Only end of input, `quit`, or a broken
//! console transport do.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use anyhow::anyhow;
use tracing::{debug, info, warn};

use crate::engine::{Bindings, EngineManager, Evaluator, Value, ValueKind};
use crate::repl::commands::{parse_command_line, Command, CommandRegistry, DEFAULT_COMMAND_PREFIX};
use crate::repl::console::Console;
use crate::repl::error::{ReplError, ReplResult};
use crate::repl::printer::ResultPrinter;
use crate::repl::prompt::{PromptContext, PromptTemplate};
use crate::util::config::ReplSettings;

/// Per-session state
pub struct Session {
    /// Cleared by `quit`; checked at the top of every iteration
    running: bool,
    /// Lines read so far
    input_count: usize,
    /// Compiled prompt
    prompt: PromptTemplate,
    /// Marks a line as a command
    command_prefix: String,
    /// Most recent failure, for `stacktrace`
    last_error: Option<ReplError>,
    /// Output counter, prefix and renderers
    printer: ResultPrinter,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session with default settings
    pub fn new() -> Self {
        Self {
            running: false,
            input_count: 0,
            prompt: PromptTemplate::default(),
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            last_error: None,
            printer: ResultPrinter::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop after the current line
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn output_count(&self) -> usize {
        self.printer.output_count()
    }

    pub fn prompt(&self) -> &PromptTemplate {
        &self.prompt
    }

    pub fn set_prompt(
        &mut self,
        prompt: PromptTemplate,
    ) {
        self.prompt = prompt;
    }

    pub fn command_prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Change the command prefix; an empty prefix is ignored
    pub fn set_command_prefix(
        &mut self,
        prefix: impl Into<String>,
    ) {
        let prefix = prefix.into();
        if prefix.is_empty() {
            warn!("ignoring empty command prefix, keeping '{}'", self.command_prefix);
            return;
        }
        self.command_prefix = prefix;
    }

    pub fn last_error(&self) -> Option<&ReplError> {
        self.last_error.as_ref()
    }

    pub fn printer(&self) -> &ResultPrinter {
        &self.printer
    }

    pub fn printer_mut(&mut self) -> &mut ResultPrinter {
        &mut self.printer
    }
}

/// The read-eval-print loop
pub struct EvalLoop {
    session: Session,
    commands: CommandRegistry,
    engines: EngineManager,
    engine: Box<dyn Evaluator>,
    bindings: Bindings,
    console: Box<dyn Console>,
}

impl EvalLoop {
    /// Create a loop with default settings and the built-in commands
    pub fn new(
        engines: EngineManager,
        engine: Box<dyn Evaluator>,
        console: Box<dyn Console>,
    ) -> Self {
        Self {
            session: Session::new(),
            commands: CommandRegistry::with_builtins(),
            engines,
            engine,
            bindings: Bindings::new(),
            console,
        }
    }

    /// Create a loop configured from user settings
    ///
    /// Fails if the default engine is not registered or the prompt does not
    /// compile.
    pub fn from_settings(
        engines: EngineManager,
        settings: &ReplSettings,
        console: Box<dyn Console>,
    ) -> ReplResult<Self> {
        let engine = engines
            .by_id(&settings.default_engine)
            .ok_or_else(|| ReplError::UnknownEvaluator(settings.default_engine.clone()))?;

        let mut repl = Self::new(engines, engine, console);
        repl.set_prompt(&settings.prompt)?;
        repl.set_output_prefix(settings.output_prefix.as_str());
        repl.session.set_command_prefix(settings.command_prefix.as_str());

        let stream = repl.session.printer.stream_mut();
        stream.set_limit(settings.stream_limit);
        stream.set_numbering(settings.number_lines);

        Ok(repl)
    }

    /// Register a command, replacing any built-in of the same name
    pub fn add_command(
        &mut self,
        command: Command,
    ) {
        debug!("adding command '{}'", command.name);
        self.commands.register(command);
    }

    /// Register a renderer for one value kind
    pub fn add_printer<F>(
        &mut self,
        kind: ValueKind,
        render: F,
    ) where
        F: Fn(&Value, &mut dyn Console) -> std::io::Result<()> + 'static,
    {
        self.session.printer.printers_mut().register(kind, render);
    }

    /// Change the separator printed between the output counter and a result
    pub fn set_output_prefix(
        &mut self,
        prefix: impl Into<String>,
    ) {
        self.session.printer.set_output_prefix(prefix);
    }

    /// Compile and install a prompt template
    ///
    /// The current prompt is kept if `text` does not compile.
    pub fn set_prompt(
        &mut self,
        text: &str,
    ) -> ReplResult<()> {
        let prompt = PromptTemplate::compile(text)?;
        self.session.set_prompt(prompt);
        Ok(())
    }

    /// Replace the active evaluator, keeping every binding
    pub fn swap_engine(
        &mut self,
        id: &str,
    ) -> ReplResult<()> {
        let engine = self
            .engines
            .by_id(id)
            .ok_or_else(|| ReplError::UnknownEvaluator(id.to_string()))?;
        info!(
            "switching engine: {} -> {}",
            self.engine.info().engine_name,
            engine.info().engine_name
        );
        self.engine = engine;
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn engines(&self) -> &EngineManager {
        &self.engines
    }

    /// Registered engines, for adding factories after construction
    pub fn engines_mut(&mut self) -> &mut EngineManager {
        &mut self.engines
    }

    /// The active evaluator
    pub fn engine(&self) -> &dyn Evaluator {
        self.engine.as_ref()
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    pub fn console(&mut self) -> &mut dyn Console {
        self.console.as_mut()
    }

    /// Print lines through the pagination printer
    pub fn print_lines(
        &mut self,
        lines: Vec<String>,
    ) -> ReplResult<()> {
        self.session.printer.stream().print(lines, self.console.as_mut())?;
        Ok(())
    }

    /// Prompt for the next line
    pub fn render_prompt(&self) -> String {
        let info = self.engine.info();
        self.session.prompt.render(&PromptContext {
            input_count: self.session.input_count,
            engine_name: &info.engine_name,
            language_name: &info.language_name,
        })
    }

    /// Run until end of input or `quit`
    ///
    /// Returns an error only when the console itself fails.
    pub fn run(&mut self) -> ReplResult<()> {
        self.session.running = true;
        debug!("session started with engine {}", self.engine.info().engine_name);

        while self.session.running {
            let prompt = self.render_prompt();
            let Some(line) = self.console.read_line(&prompt)? else {
                debug!("end of input");
                break;
            };
            self.step(&line)?;
        }

        self.session.running = false;
        debug!(
            "session finished after {} inputs, {} outputs",
            self.session.input_count,
            self.session.output_count()
        );
        Ok(())
    }

    /// Handle one input line as if it had been read from the console
    pub fn step(
        &mut self,
        line: &str,
    ) -> ReplResult<()> {
        self.session.input_count += 1;

        let outcome = match self.dispatch(line) {
            Ok(true) => Ok(()),
            Ok(false) => self.evaluate(line),
            Err(err) => Err(err),
        };
        outcome.or_else(|err| self.fail(err))
    }

    /// Run the command on `line`; `Ok(false)` if it is not a command line
    fn dispatch(
        &mut self,
        line: &str,
    ) -> ReplResult<bool> {
        let Some(cmd) = parse_command_line(&self.session.command_prefix, line) else {
            return Ok(false);
        };

        let handler = self
            .commands
            .get(cmd.name)
            .map(|c| c.handler.clone())
            .ok_or_else(|| ReplError::UnknownCommand(cmd.name.to_string()))?;

        debug!("dispatching command '{}'", cmd.name);
        handler(self, cmd.arg)?;
        Ok(true)
    }

    fn evaluate(
        &mut self,
        line: &str,
    ) -> ReplResult<()> {
        let engine = &mut self.engine;
        let bindings = &mut self.bindings;
        let result = guarded("evaluator", || engine.eval(line, bindings))??;

        // streams are pulled while printing, so item failures surface here
        let printer = &mut self.session.printer;
        let console = self.console.as_mut();
        guarded("printer", || printer.print(result.as_ref(), console))??;

        if let Some(value) = result {
            self.bindings.set_last_result(value);
        }
        Ok(())
    }

    /// Report and record a failure; console errors are passed through
    fn fail(
        &mut self,
        err: ReplError,
    ) -> ReplResult<()> {
        match &err {
            ReplError::Io(_) => return Err(err),
            ReplError::Unexpected(e) => warn!("unexpected failure: {:?}", e),
            other => debug!("line failed: {}", other),
        }

        writeln!(self.console, "{}", err.report())?;
        self.session.last_error = Some(err);
        Ok(())
    }
}

/// Run `f`, turning a panic into an unexpected failure of `stage`
fn guarded<T>(
    stage: &str,
    f: impl FnOnce() -> T,
) -> ReplResult<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        ReplError::unexpected(anyhow!("{} panicked: {}", stage, panic_message(payload.as_ref())))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
