//! Evaluator Abstraction
//!
//! Defines the interface between the session loop and the evaluators it
//! drives.
//!
//! This module contains:
//! - [`Evaluator`] - executes one line against the [`Bindings`]
//! - [`EvaluatorFactory`] - creates evaluators on demand
//! - [`EngineManager`] - registry of factories, resolves identifiers for hot-swap
//! - [`Value`] - values produced by evaluators

pub mod bindings;
pub mod value;

pub use bindings::{Bindings, LAST_RESULT};
pub use value::{Inspect, LazySeq, Member, NativeFn, Value, ValueKind};

use thiserror::Error;
use tracing::debug;

/// Descriptive metadata for an evaluator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInfo {
    /// Engine (implementation) name, `$e` in prompts
    pub engine_name: String,
    /// Language name, `$l` in prompts
    pub language_name: String,
    /// Identifiers this engine is registered under
    pub extensions: Vec<String>,
}

impl EngineInfo {
    /// Create engine metadata
    pub fn new(
        engine_name: impl Into<String>,
        language_name: impl Into<String>,
        extensions: &[&str],
    ) -> Self {
        Self {
            engine_name: engine_name.into(),
            language_name: language_name.into(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Whether this engine answers to the given identifier
    pub fn matches(
        &self,
        id: &str,
    ) -> bool {
        self.engine_name == id || self.extensions.iter().any(|e| e == id)
    }
}

/// Evaluation failure
#[derive(Debug, Error)]
pub enum EvalError {
    /// Input was rejected as malformed
    #[error("{message} (column {column})")]
    Syntax { message: String, column: usize },

    /// Input was well-formed but could not be evaluated
    #[error("{0}")]
    Runtime(String),

    /// Any failure the evaluator did not anticipate
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl EvalError {
    /// Create a syntax error
    pub fn syntax(
        message: impl Into<String>,
        column: usize,
    ) -> Self {
        EvalError::Syntax {
            message: message.into(),
            column,
        }
    }

    /// Create a runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        EvalError::Runtime(message.into())
    }
}

/// Evaluator Trait
///
/// An evaluator receives the binding environment on every call instead of
/// owning it, which is what lets the session swap evaluators without losing
/// definitions.
pub trait Evaluator {
    /// Engine metadata
    fn info(&self) -> &EngineInfo;

    /// Evaluate one line; `Ok(None)` means the line produced no value
    fn eval(
        &mut self,
        line: &str,
        bindings: &mut Bindings,
    ) -> Result<Option<Value>, EvalError>;
}

/// Creates evaluators for the [`EngineManager`]
pub trait EvaluatorFactory {
    /// Metadata of the evaluators this factory creates
    fn info(&self) -> EngineInfo;

    /// Create a fresh evaluator
    fn create(&self) -> Box<dyn Evaluator>;
}

/// Registry of available evaluators
#[derive(Default)]
pub struct EngineManager {
    factories: Vec<Box<dyn EvaluatorFactory>>,
}

impl EngineManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager holding the bundled evaluators
    pub fn with_builtin_engines() -> Self {
        let mut manager = Self::new();
        manager.register(Box::new(crate::backends::calc::CalcFactory));
        manager.register(Box::new(crate::backends::rpn::RpnFactory));
        manager
    }

    /// Register a factory; later registrations win on identifier clashes
    pub fn register(
        &mut self,
        factory: Box<dyn EvaluatorFactory>,
    ) {
        debug!("registering engine {}", factory.info().engine_name);
        self.factories.insert(0, factory);
    }

    /// Metadata of every registered engine, in registration order
    pub fn engines(&self) -> Vec<EngineInfo> {
        self.factories.iter().rev().map(|f| f.info()).collect()
    }

    /// Create an evaluator by extension or engine name
    pub fn by_id(
        &self,
        id: &str,
    ) -> Option<Box<dyn Evaluator>> {
        self.factories
            .iter()
            .find(|f| f.info().matches(id))
            .map(|f| f.create())
    }
}
