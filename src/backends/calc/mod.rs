//! Calc evaluator
//!
//! A small infix expression language: integers, floats, strings, lists,
//! comparisons, assignment and a handful of builtins. It is the default
//! evaluator of the `evalloop` binary.
//!
//! ```text
//! calc:000> x = 6 * 7
//! calc:001> x / 4
//! 000 ==> 10.5
//! calc:002> range(0, 3)
//! 001 ==> 0
//! 1
//! 2
//! ```

pub mod lexer;
pub mod parser;

use anyhow::bail;
use tracing::trace;

use crate::engine::{
    Bindings, EngineInfo, EvalError, Evaluator, EvaluatorFactory, NativeFn, Value,
};

use self::parser::{BinOp, Expr, Stmt};

/// Engine name, `$e` in prompts
pub const ENGINE_NAME: &str = "Calc Interpreter";
/// Language name, `$l` in prompts
pub const LANGUAGE_NAME: &str = "calc";

/// Builtin functions, resolved after the binding environment
pub const BUILTINS: &[NativeFn] = &[
    NativeFn {
        name: "range",
        arity: 2,
        func: builtin_range,
    },
    NativeFn {
        name: "naturals",
        arity: 0,
        func: builtin_naturals,
    },
    NativeFn {
        name: "len",
        arity: 1,
        func: builtin_len,
    },
    NativeFn {
        name: "str",
        arity: 1,
        func: builtin_str,
    },
];

fn int_arg(
    args: &[Value],
    index: usize,
) -> anyhow::Result<i64> {
    match args.get(index) {
        Some(Value::Int(i)) => Ok(*i),
        Some(other) => bail!("expected Int argument, got {}", other.kind()),
        None => bail!("missing argument {}", index),
    }
}

fn builtin_range(args: &[Value]) -> anyhow::Result<Value> {
    let start = int_arg(args, 0)?;
    let end = int_arg(args, 1)?;
    Ok(Value::stream((start..end).map(Value::Int)))
}

fn builtin_naturals(_args: &[Value]) -> anyhow::Result<Value> {
    Ok(Value::stream((0i64..).map(Value::Int)))
}

fn builtin_len(args: &[Value]) -> anyhow::Result<Value> {
    match &args[0] {
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        Value::List(items) => Ok(Value::Int(items.len() as i64)),
        other => bail!("len() is not defined for {}", other.kind()),
    }
}

fn builtin_str(args: &[Value]) -> anyhow::Result<Value> {
    Ok(Value::Str(args[0].to_string()))
}

/// Calc evaluator
#[derive(Debug)]
pub struct CalcEvaluator {
    info: EngineInfo,
}

impl Default for CalcEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl CalcEvaluator {
    /// Create a new evaluator
    pub fn new() -> Self {
        Self {
            info: CalcFactory.info(),
        }
    }

    fn eval_expr(
        &self,
        expr: &Expr,
        bindings: &Bindings,
    ) -> Result<Value, EvalError> {
        match expr {
            Expr::Int(i) => Ok(Value::Int(*i)),
            Expr::Float(f) => Ok(Value::Float(*f)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Var(name) => lookup(name, bindings),
            Expr::List(items) => {
                let values = items
                    .iter()
                    .map(|item| self.eval_expr(item, bindings))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::List(values))
            }
            Expr::Neg(inner) => match self.eval_expr(inner, bindings)? {
                Value::Int(i) => i
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| EvalError::runtime("integer overflow")),
                Value::Float(f) => Ok(Value::Float(-f)),
                other => Err(EvalError::runtime(format!("cannot negate {}", other.kind()))),
            },
            Expr::Binary(op, left, right) => {
                let left = self.eval_expr(left, bindings)?;
                let right = self.eval_expr(right, bindings)?;
                binary(*op, left, right)
            }
            Expr::Call(callee, args) => {
                let callee = self.eval_expr(callee, bindings)?;
                let func = match callee {
                    Value::Function(func) => func,
                    other => {
                        return Err(EvalError::runtime(format!(
                            "{} is not callable",
                            other.kind()
                        )))
                    }
                };
                if args.len() != func.arity {
                    return Err(EvalError::runtime(format!(
                        "{}() takes {} argument(s), got {}",
                        func.name,
                        func.arity,
                        args.len()
                    )));
                }
                let args = args
                    .iter()
                    .map(|arg| self.eval_expr(arg, bindings))
                    .collect::<Result<Vec<_>, _>>()?;
                func.call(&args)
                    .map_err(|e| EvalError::runtime(format!("{}: {}", func.name, e)))
            }
        }
    }
}

fn lookup(
    name: &str,
    bindings: &Bindings,
) -> Result<Value, EvalError> {
    if let Some(value) = bindings.get(name) {
        return Ok(value.clone());
    }
    match name {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }
    BUILTINS
        .iter()
        .find(|f| f.name == name)
        .map(|f| Value::Function(f.clone()))
        .ok_or_else(|| EvalError::runtime(format!("undefined name '{}'", name)))
}

fn binary(
    op: BinOp,
    left: Value,
    right: Value,
) -> Result<Value, EvalError> {
    use Value::{Float, Int, List, Str};

    match (op, left, right) {
        (BinOp::Add, Str(a), b) => Ok(Str(format!("{}{}", a, b))),
        (BinOp::Add, a, Str(b)) => Ok(Str(format!("{}{}", a, b))),
        (BinOp::Add, List(mut a), List(b)) => {
            a.extend(b);
            Ok(List(a))
        }
        (BinOp::Eq, a, b) => Ok(Value::Bool(values_equal(&a, &b))),
        (BinOp::Ne, a, b) => Ok(Value::Bool(!values_equal(&a, &b))),
        (op, Int(a), Int(b)) => int_binary(op, a, b),
        (op, a, b) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => float_binary(op, x, y),
            _ => Err(EvalError::runtime(format!(
                "unsupported operand types for {:?}: {} and {}",
                op,
                a.kind(),
                b.kind()
            ))),
        },
    }
}

fn values_equal(
    a: &Value,
    b: &Value,
) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn int_binary(
    op: BinOp,
    a: i64,
    b: i64,
) -> Result<Value, EvalError> {
    let overflow = || EvalError::runtime("integer overflow");
    match op {
        BinOp::Add => a.checked_add(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Sub => a.checked_sub(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Mul => a.checked_mul(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Div | BinOp::Rem if b == 0 => Err(EvalError::runtime("division by zero")),
        BinOp::Div if a.checked_rem(b) == Some(0) => a.checked_div(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Div => Ok(Value::Float(a as f64 / b as f64)),
        BinOp::Rem => a.checked_rem(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Eq => Ok(Value::Bool(a == b)),
        BinOp::Ne => Ok(Value::Bool(a != b)),
        BinOp::Lt => Ok(Value::Bool(a < b)),
        BinOp::Le => Ok(Value::Bool(a <= b)),
        BinOp::Gt => Ok(Value::Bool(a > b)),
        BinOp::Ge => Ok(Value::Bool(a >= b)),
    }
}

fn float_binary(
    op: BinOp,
    a: f64,
    b: f64,
) -> Result<Value, EvalError> {
    match op {
        BinOp::Add => Ok(Value::Float(a + b)),
        BinOp::Sub => Ok(Value::Float(a - b)),
        BinOp::Mul => Ok(Value::Float(a * b)),
        BinOp::Div | BinOp::Rem if b == 0.0 => Err(EvalError::runtime("division by zero")),
        BinOp::Div => Ok(Value::Float(a / b)),
        BinOp::Rem => Ok(Value::Float(a % b)),
        BinOp::Eq => Ok(Value::Bool(a == b)),
        BinOp::Ne => Ok(Value::Bool(a != b)),
        BinOp::Lt => Ok(Value::Bool(a < b)),
        BinOp::Le => Ok(Value::Bool(a <= b)),
        BinOp::Gt => Ok(Value::Bool(a > b)),
        BinOp::Ge => Ok(Value::Bool(a >= b)),
    }
}

impl Evaluator for CalcEvaluator {
    fn info(&self) -> &EngineInfo {
        &self.info
    }

    fn eval(
        &mut self,
        line: &str,
        bindings: &mut Bindings,
    ) -> Result<Option<Value>, EvalError> {
        let tokens = lexer::tokenize(line)?;
        if tokens.is_empty() {
            return Ok(None);
        }
        match parser::parse(&tokens)? {
            Stmt::Assign(name, expr) => {
                let value = self.eval_expr(&expr, bindings)?;
                trace!("calc: bind {} = {}", name, value);
                bindings.set(name, value);
                Ok(None)
            }
            Stmt::Expr(expr) => self.eval_expr(&expr, bindings).map(Some),
        }
    }
}

/// Factory registered under `calc`
#[derive(Debug, Clone, Copy, Default)]
pub struct CalcFactory;

impl EvaluatorFactory for CalcFactory {
    fn info(&self) -> EngineInfo {
        EngineInfo::new(ENGINE_NAME, LANGUAGE_NAME, &["calc"])
    }

    fn create(&self) -> Box<dyn Evaluator> {
        Box::new(CalcEvaluator::new())
    }
}
