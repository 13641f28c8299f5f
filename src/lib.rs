//! evalloop - a read-eval-print loop framework
//!
//! Reads lines from a console and routes each one either to a command
//! (lines starting with `::`) or to a pluggable evaluator. Results are
//! printed with a numbered header, type-keyed renderers and paginated
//! output for lazy sequences.
//!
//! # Example
//!
//! ```rust
//! use evalloop::{EngineManager, EvalLoop, MemoryConsole};
//!
//! let console = MemoryConsole::new(["x = 2", "x * 21"]);
//! let engines = EngineManager::with_builtin_engines();
//! let engine = engines.by_id("calc").unwrap();
//!
//! let mut repl = EvalLoop::new(engines, engine, Box::new(console.clone()));
//! repl.run().unwrap();
//!
//! assert_eq!(console.output(), "000 ==> 42\n");
//! ```

#![warn(rust_2018_idioms)]

pub mod backends;
pub mod engine;
pub mod repl;
pub mod util;

// Re-exports
pub use engine::{
    Bindings, EngineInfo, EngineManager, EvalError, Evaluator, EvaluatorFactory, Inspect, Member, Value,
    ValueKind,
};
pub use repl::{
    Command, CommandRegistry, Console, EvalLoop, MemoryConsole, PromptTemplate, ReplError, ReplResult,
};
pub use util::config::ReplSettings;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Display name
pub const NAME: &str = "evalloop";
