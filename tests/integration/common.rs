//! Shared helpers for session tests

use std::cell::Cell;
use std::rc::Rc;

use evalloop::{
    Bindings, EngineInfo, EngineManager, EvalError, EvalLoop, Evaluator, EvaluatorFactory, MemoryConsole,
    Value,
};

/// A calc session over a scripted console
pub fn calc_session(lines: &[&str]) -> (EvalLoop, MemoryConsole) {
    let console = MemoryConsole::new(lines.iter().copied());
    let engines = EngineManager::with_builtin_engines();
    let engine = engines.by_id("calc").unwrap();
    let repl = EvalLoop::new(engines, engine, Box::new(console.clone()));
    (repl, console)
}

/// Run a calc session to end of input
pub fn run_calc(lines: &[&str]) -> (EvalLoop, MemoryConsole) {
    let (mut repl, console) = calc_session(lines);
    repl.run().unwrap();
    (repl, console)
}

/// Evaluator that counts calls and echoes its input
pub struct Counting {
    info: EngineInfo,
    pub calls: Rc<Cell<usize>>,
}

impl Counting {
    pub fn new() -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let evaluator = Self {
            info: EngineInfo::new("Counting Engine", "count", &["count"]),
            calls: calls.clone(),
        };
        (evaluator, calls)
    }
}

impl Evaluator for Counting {
    fn info(&self) -> &EngineInfo {
        &self.info
    }

    fn eval(
        &mut self,
        line: &str,
        _bindings: &mut Bindings,
    ) -> Result<Option<Value>, EvalError> {
        self.calls.set(self.calls.get() + 1);
        Ok(Some(Value::from(line)))
    }
}

/// Evaluator failing in every way an evaluator can
pub struct Faulty {
    info: EngineInfo,
}

impl Evaluator for Faulty {
    fn info(&self) -> &EngineInfo {
        &self.info
    }

    fn eval(
        &mut self,
        line: &str,
        _bindings: &mut Bindings,
    ) -> Result<Option<Value>, EvalError> {
        match line {
            "panic" => panic!("boom"),
            "internal" => Err(anyhow::anyhow!("lost connection").context("fetching value").into()),
            "syntax" => Err(EvalError::syntax("unexpected token", 4)),
            "stream" => Ok(Some(Value::stream((0i64..5).map(|i| {
                if i == 2 {
                    panic!("item {} unavailable", i);
                }
                Value::Int(i)
            })))),
            _ => Ok(Some(Value::Int(1))),
        }
    }
}

pub struct FaultyFactory;

impl EvaluatorFactory for FaultyFactory {
    fn info(&self) -> EngineInfo {
        EngineInfo::new("Faulty Engine", "faulty", &["faulty"])
    }

    fn create(&self) -> Box<dyn Evaluator> {
        Box::new(Faulty { info: self.info() })
    }
}
