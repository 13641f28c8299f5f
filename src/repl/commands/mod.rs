//! REPL Command Registry
//!
//! Handles lines starting with the command prefix (`::` by default).
//!
//! A command line is `<prefix><name>[ <argument>]`. The argument is
//! everything after the first space, passed verbatim; handlers split it
//! further if they need to.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use anyhow::{anyhow, Context};

use crate::repl::error::{ReplError, ReplResult};
use crate::repl::session::EvalLoop;

/// Default command prefix
pub const DEFAULT_COMMAND_PREFIX: &str = "::";

/// A parsed command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLine<'a> {
    /// Command token, without the prefix
    pub name: &'a str,
    /// Everything after the first space, if there is one
    pub arg: Option<&'a str>,
}

/// Split a command line; `None` if `line` does not start with `prefix`
pub fn parse_command_line<'a>(
    prefix: &str,
    line: &'a str,
) -> Option<CommandLine<'a>> {
    let rest = line.strip_prefix(prefix)?;
    let (name, arg) = match rest.split_once(' ') {
        Some((name, arg)) => (name, Some(arg)),
        None => (rest, None),
    };
    Some(CommandLine { name, arg })
}

/// Command handler function type
pub type CommandFn = Rc<dyn Fn(&mut EvalLoop, Option<&str>) -> ReplResult<()>>;

/// REPL command
#[derive(Clone)]
pub struct Command {
    /// Command name
    pub name: String,
    /// Command description
    pub description: String,
    /// Command usage, without the prefix
    pub usage: String,
    /// Command handler
    pub handler: CommandFn,
}

impl Command {
    /// Create a command
    pub fn new<F>(
        name: &str,
        usage: &str,
        description: &str,
        handler: F,
    ) -> Self
    where
        F: Fn(&mut EvalLoop, Option<&str>) -> ReplResult<()> + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            usage: usage.to_string(),
            handler: Rc::new(handler),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

/// Command registry
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Command>,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in commands
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_commands();
        registry
    }

    fn register_builtin_commands(&mut self) {
        self.register(Command::new("quit", "quit", "Exit the session", cmd_quit));
        self.register(Command::new(
            "stacktrace",
            "stacktrace",
            "Show full detail of the last error",
            cmd_stacktrace,
        ));
        self.register(Command::new(
            "prompt",
            "prompt [template]",
            "Show or set the prompt ($i input count, $e engine, $l language, $S space, $$ dollar)",
            cmd_prompt,
        ));
        self.register(Command::new(
            "engines",
            "engines",
            "List available engines",
            cmd_engines,
        ));
        self.register(Command::new(
            "setEngine",
            "setEngine <id>",
            "Switch to another engine, keeping all bindings",
            cmd_set_engine,
        ));
        self.register(Command::new(
            "describe",
            "describe <name>",
            "Show the type and members of a binding",
            cmd_describe,
        ));
        self.register(Command::new(
            "stream.limit",
            "stream.limit [n]",
            "Show or set the number of stream lines between pauses",
            cmd_stream_limit,
        ));
        self.register(Command::new(
            "stream.toggleNumLines",
            "stream.toggleNumLines",
            "Toggle line numbers for streams",
            cmd_toggle_num_lines,
        ));
        self.register(Command::new(
            "listCommands",
            "listCommands",
            "List all commands",
            cmd_list_commands,
        ));
        self.register(Command::new(
            "bindings",
            "bindings",
            "List all bindings with their types",
            cmd_bindings,
        ));
    }

    /// Register a command, replacing any command of the same name
    pub fn register(
        &mut self,
        command: Command,
    ) {
        self.commands.insert(command.name.clone(), command);
    }

    /// Get a command by name
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Command> {
        self.commands.get(name)
    }

    /// All commands, sorted by name
    pub fn all_commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    /// All command names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn required<'a>(
    arg: Option<&'a str>,
    usage: &str,
) -> ReplResult<&'a str> {
    match arg.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ReplError::unexpected(anyhow!(
            "missing argument, usage: {}",
            usage
        ))),
    }
}

// Command implementations

fn cmd_quit(
    repl: &mut EvalLoop,
    _arg: Option<&str>,
) -> ReplResult<()> {
    repl.session_mut().stop();
    Ok(())
}

fn cmd_stacktrace(
    repl: &mut EvalLoop,
    _arg: Option<&str>,
) -> ReplResult<()> {
    let detail = repl.session().last_error().map(ReplError::detail);
    match detail {
        Some(detail) => writeln!(repl.console(), "{}", detail)?,
        None => writeln!(repl.console(), "No stack trace available.")?,
    }
    Ok(())
}

fn cmd_prompt(
    repl: &mut EvalLoop,
    arg: Option<&str>,
) -> ReplResult<()> {
    match arg {
        Some(text) => repl.set_prompt(text),
        None => {
            let source = repl.session().prompt().source().to_string();
            writeln!(repl.console(), "{}", source)?;
            Ok(())
        }
    }
}

fn cmd_engines(
    repl: &mut EvalLoop,
    _arg: Option<&str>,
) -> ReplResult<()> {
    let engines = repl.engines().engines();
    for info in engines {
        writeln!(
            repl.console(),
            "{}: {} [{}]",
            info.language_name,
            info.engine_name,
            info.extensions.join(", ")
        )?;
    }
    Ok(())
}

fn cmd_set_engine(
    repl: &mut EvalLoop,
    arg: Option<&str>,
) -> ReplResult<()> {
    let id = required(arg, "setEngine <id>")?;
    repl.swap_engine(id)
}

fn cmd_describe(
    repl: &mut EvalLoop,
    arg: Option<&str>,
) -> ReplResult<()> {
    let name = required(arg, "describe <name>")?;

    let lines: Vec<String> = match repl.bindings().get(name) {
        None => vec![format!("{} = null", name)],
        Some(value) => std::iter::once(format!("type({}) = {}", name, value.kind()))
            .chain(
                value
                    .members()
                    .into_iter()
                    .map(|m| format!("{}.{}[{}]", name, m.name, m.arity)),
            )
            .collect(),
    };

    for line in lines {
        writeln!(repl.console(), "{}", line)?;
    }
    Ok(())
}

fn cmd_stream_limit(
    repl: &mut EvalLoop,
    arg: Option<&str>,
) -> ReplResult<()> {
    let Some(arg) = arg else {
        let limit = repl.session().printer().stream().limit();
        writeln!(repl.console(), "stream.limit = {}", limit)?;
        return Ok(());
    };

    let limit: usize = arg
        .trim()
        .parse()
        .with_context(|| format!("invalid stream.limit '{}'", arg))
        .map_err(ReplError::Unexpected)?;
    if limit == 0 {
        return Err(ReplError::unexpected(anyhow!("stream.limit must be positive")));
    }
    repl.session_mut().printer_mut().stream_mut().set_limit(limit);
    Ok(())
}

fn cmd_toggle_num_lines(
    repl: &mut EvalLoop,
    _arg: Option<&str>,
) -> ReplResult<()> {
    let enabled = repl
        .session_mut()
        .printer_mut()
        .stream_mut()
        .toggle_numbering();
    writeln!(
        repl.console(),
        "Line numbering {}",
        if enabled { "on" } else { "off" }
    )?;
    Ok(())
}

fn cmd_list_commands(
    repl: &mut EvalLoop,
    _arg: Option<&str>,
) -> ReplResult<()> {
    let prefix = repl.session().command_prefix().to_string();
    let lines: Vec<String> = repl
        .commands()
        .all_commands()
        .map(|cmd| format!("{}{} - {}", prefix, cmd.usage, cmd.description))
        .collect();
    repl.print_lines(lines)
}

fn cmd_bindings(
    repl: &mut EvalLoop,
    _arg: Option<&str>,
) -> ReplResult<()> {
    if repl.bindings().is_empty() {
        writeln!(repl.console(), "No bindings")?;
        return Ok(());
    }
    let lines: Vec<String> = repl
        .bindings()
        .kinds()
        .into_iter()
        .map(|(name, kind)| format!("{}: {}", name, kind))
        .collect();
    repl.print_lines(lines)
}
