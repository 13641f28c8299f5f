//! RPN evaluator
//!
//! A reverse Polish stack calculator. Words are separated by whitespace:
//! numbers push, operators pop two operands, names push their binding and
//! `=name` pops into a binding. The value left on top of the stack is the
//! result.
//!
//! ```text
//! rpn:000> 3 4 + 2 *
//! 000 ==> 14
//! rpn:001> _ 2 / =half
//! ```

use smallvec::SmallVec;

use crate::engine::{Bindings, EngineInfo, EvalError, Evaluator, EvaluatorFactory, Value};

/// Engine name, `$e` in prompts
pub const ENGINE_NAME: &str = "Stack Calculator";
/// Language name, `$l` in prompts
pub const LANGUAGE_NAME: &str = "rpn";

type Stack = SmallVec<[f64; 8]>;

/// RPN evaluator
#[derive(Debug)]
pub struct RpnEvaluator {
    info: EngineInfo,
}

impl Default for RpnEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl RpnEvaluator {
    /// Create a new evaluator
    pub fn new() -> Self {
        Self {
            info: RpnFactory.info(),
        }
    }
}

fn pop(
    stack: &mut Stack,
    word: &str,
    column: usize,
) -> Result<f64, EvalError> {
    stack
        .pop()
        .ok_or_else(|| EvalError::syntax(format!("stack underflow at '{}'", word), column))
}

/// Whitespace-separated words with their 1-based column
fn words(line: &str) -> impl Iterator<Item = (usize, &str)> {
    let base = line.as_ptr() as usize;
    line.split_whitespace()
        .map(move |word| (word.as_ptr() as usize - base + 1, word))
}

/// Integral results are reported as `Int`
fn to_value(x: f64) -> Value {
    if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
        Value::Int(x as i64)
    } else {
        Value::Float(x)
    }
}

impl Evaluator for RpnEvaluator {
    fn info(&self) -> &EngineInfo {
        &self.info
    }

    fn eval(
        &mut self,
        line: &str,
        bindings: &mut Bindings,
    ) -> Result<Option<Value>, EvalError> {
        let mut stack = Stack::new();

        for (column, word) in words(line) {
            match word {
                "+" | "-" | "*" | "/" => {
                    let b = pop(&mut stack, word, column)?;
                    let a = pop(&mut stack, word, column)?;
                    let result = match word {
                        "+" => a + b,
                        "-" => a - b,
                        "*" => a * b,
                        _ if b == 0.0 => return Err(EvalError::runtime("division by zero")),
                        _ => a / b,
                    };
                    stack.push(result);
                }
                "dup" => {
                    let top = pop(&mut stack, word, column)?;
                    stack.push(top);
                    stack.push(top);
                }
                "swap" => {
                    let b = pop(&mut stack, word, column)?;
                    let a = pop(&mut stack, word, column)?;
                    stack.push(b);
                    stack.push(a);
                }
                _ if word.len() > 1 && word.starts_with('=') => {
                    let top = pop(&mut stack, word, column)?;
                    bindings.set(&word[1..], to_value(top));
                }
                _ => {
                    if let Ok(number) = word.parse::<f64>() {
                        stack.push(number);
                        continue;
                    }
                    let value = bindings
                        .get(word)
                        .ok_or_else(|| EvalError::runtime(format!("undefined name '{}'", word)))?;
                    let number = value.as_f64().ok_or_else(|| {
                        EvalError::runtime(format!("'{}' is a {}, not a number", word, value.kind()))
                    })?;
                    stack.push(number);
                }
            }
        }

        Ok(stack.pop().map(to_value))
    }
}

/// Factory registered under `rpn`
#[derive(Debug, Clone, Copy, Default)]
pub struct RpnFactory;

impl EvaluatorFactory for RpnFactory {
    fn info(&self) -> EngineInfo {
        EngineInfo::new(ENGINE_NAME, LANGUAGE_NAME, &["rpn", "stack"])
    }

    fn create(&self) -> Box<dyn Evaluator> {
        Box::new(RpnEvaluator::new())
    }
}
