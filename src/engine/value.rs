//! Runtime values exchanged between evaluators and the session loop
//!
//! Values are a closed set of kinds plus an open `Object` kind for
//! evaluator-specific data. `ValueKind` is the tag used for type-keyed
//! printer dispatch and for `describe`/`bindings` output.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A member exposed by an inspectable value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Member name
    pub name: String,
    /// Number of parameters
    pub arity: usize,
}

impl Member {
    /// Create a new member description
    pub fn new(
        name: impl Into<String>,
        arity: usize,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

/// Capability for evaluator-specific values that can be described
pub trait Inspect: fmt::Display {
    /// Type name shown by `describe` and used as the printer key
    fn type_name(&self) -> &'static str;

    /// Public members of this value
    fn members(&self) -> Vec<Member> {
        Vec::new()
    }
}

/// Native function signature
pub type NativeFnPtr = fn(&[Value]) -> anyhow::Result<Value>;

/// A function implemented in Rust and callable from an evaluator
#[derive(Clone)]
pub struct NativeFn {
    /// Function name
    pub name: &'static str,
    /// Number of parameters
    pub arity: usize,
    /// Implementation
    pub func: NativeFnPtr,
}

impl NativeFn {
    /// Call the function
    pub fn call(
        &self,
        args: &[Value],
    ) -> anyhow::Result<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// A lazy, possibly unbounded sequence of values
///
/// Clones share the same underlying iterator, so a stream is consumed once
/// no matter how many bindings refer to it.
#[derive(Clone)]
pub struct LazySeq {
    inner: Rc<RefCell<Box<dyn Iterator<Item = Value>>>>,
}

impl LazySeq {
    /// Wrap an iterator
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Value> + 'static,
    {
        Self {
            inner: Rc::new(RefCell::new(Box::new(iter))),
        }
    }

    /// Pull the next item
    pub fn next_item(&self) -> Option<Value> {
        self.inner.borrow_mut().next()
    }
}

impl Iterator for LazySeq {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.next_item()
    }
}

impl fmt::Debug for LazySeq {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str("LazySeq(..)")
    }
}

/// Value kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
    List,
    Stream,
    Function,
    /// Evaluator-specific kind, keyed by its type name
    Object(&'static str),
}

impl fmt::Display for ValueKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ValueKind::Bool => write!(f, "Bool"),
            ValueKind::Int => write!(f, "Int"),
            ValueKind::Float => write!(f, "Float"),
            ValueKind::Str => write!(f, "Str"),
            ValueKind::List => write!(f, "List"),
            ValueKind::Stream => write!(f, "Stream"),
            ValueKind::Function => write!(f, "Function"),
            ValueKind::Object(name) => write!(f, "{}", name),
        }
    }
}

/// Runtime value
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Stream(LazySeq),
    Function(NativeFn),
    Object(Rc<dyn Inspect>),
}

impl Value {
    /// Build a stream value from any iterator of values
    pub fn stream<I>(iter: I) -> Self
    where
        I: Iterator<Item = Value> + 'static,
    {
        Value::Stream(LazySeq::new(iter))
    }

    /// Kind tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Stream(_) => ValueKind::Stream,
            Value::Function(_) => ValueKind::Function,
            Value::Object(obj) => ValueKind::Object(obj.type_name()),
        }
    }

    /// Public members, as shown by `describe`
    pub fn members(&self) -> Vec<Member> {
        match self {
            Value::Function(func) => vec![Member::new("call", func.arity)],
            Value::Object(obj) => obj.members(),
            _ => Vec::new(),
        }
    }

    /// Numeric view, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Truthiness used by evaluators
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            _ => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Stream(_) => write!(f, "<stream>"),
            Value::Function(func) => write!(f, "<fn {}>", func.name),
            Value::Object(obj) => write!(f, "{}", obj),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Stream(seq) => write!(f, "{:?}", seq),
            other => write!(f, "{}({})", other.kind(), other),
        }
    }
}

impl PartialEq for Value {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Stream(a), Value::Stream(b)) => Rc::ptr_eq(&a.inner, &b.inner),
            (Value::Function(a), Value::Function(b)) => a.name == b.name,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}
