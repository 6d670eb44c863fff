use std::fmt;
use std::rc::{Rc, Weak};

use crate::ast::{BinOp, Node};
use crate::builtins::BuiltIn;
use crate::context::{Context, SymbolTable};
use crate::output::format_number;
use crate::position::Span;

/// A runtime value of the CHP language.
///
/// Besides its payload every value remembers the span that produced it and
/// the context it was produced in. Both are only used for diagnostics; the
/// context is held weakly so values stored in a scope never keep their frame
/// alive.
///
/// # Examples
///
/// ```
/// use chp_lang::Value;
///
/// let n = Value::number(2.0);
/// let doubled = n.binary(chp_lang::ast::BinOp::Multiply, &Value::number(3.0)).unwrap();
/// assert_eq!(doubled.as_number(), Some(6.0));
///
/// let text = Value::string("ab");
/// assert!(text.is_truthy());
/// ```
#[derive(Debug, Clone)]
pub struct Value {
    pub kind: ValueKind,
    span: Option<Span>,
    context: Option<Weak<Context>>,
}

#[derive(Debug, Clone)]
pub enum ValueKind {
    /// Every number is a float; there is no boolean type, `TRUE` is 1
    Number(f64),

    String(String),

    List(Vec<Value>),

    /// Function defined in the script
    Function(Rc<Function>),

    /// Native function provided by the engine
    BuiltIn(BuiltIn),
}

/// A user-defined function and the scope it closes over.
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Rc<Node>,
    /// Inline definitions return their body value.
    pub auto_return: bool,
    /// Table active where the function was defined.
    pub closure: Rc<SymbolTable>,
}

impl Function {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<lambda>")
    }
}

impl fmt::Debug for Function {
    // The closure may contain this function, so it is left out.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.display_name())
            .field("params", &self.params)
            .field("auto_return", &self.auto_return)
            .finish_non_exhaustive()
    }
}

/// Which operand an operator failure is blamed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Culprit {
    /// The whole `left op right` expression.
    Both,
    /// Only the right operand, e.g. a zero divisor.
    Right,
}

/// Failure of an operator method, turned into a runtime error by the
/// evaluator once it knows where the operation happened.
#[derive(Debug, Clone, PartialEq)]
pub struct OpError {
    pub message: String,
    pub culprit: Culprit,
}

impl OpError {
    fn illegal(op: &str, left: &Value, right: Option<&Value>) -> Self {
        let message = match right {
            Some(right) => format!(
                "Illegal operation: {} {} {}",
                left.type_name(),
                op,
                right.type_name()
            ),
            None => format!("Illegal operation: {} {}", op, left.type_name()),
        };
        OpError {
            message,
            culprit: Culprit::Both,
        }
    }

    fn at_right(message: impl Into<String>) -> Self {
        OpError {
            message: message.into(),
            culprit: Culprit::Right,
        }
    }

    fn at_both(message: impl Into<String>) -> Self {
        OpError {
            message: message.into(),
            culprit: Culprit::Both,
        }
    }
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for OpError {}

type OpResult = Result<Value, OpError>;

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Value {
            kind,
            span: None,
            context: None,
        }
    }

    pub fn number(n: f64) -> Self {
        Value::new(ValueKind::Number(n))
    }

    pub fn boolean(b: bool) -> Self {
        Value::number(if b { 1.0 } else { 0.0 })
    }

    /// `NULL`, which is the number 0.
    pub fn null() -> Self {
        Value::number(0.0)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::new(ValueKind::String(s.into()))
    }

    pub fn list(elements: Vec<Value>) -> Self {
        Value::new(ValueKind::List(elements))
    }

    pub fn function(function: Function) -> Self {
        Value::new(ValueKind::Function(Rc::new(function)))
    }

    pub fn builtin(builtin: BuiltIn) -> Self {
        Value::new(ValueKind::BuiltIn(builtin))
    }

    pub fn span(&self) -> Option<&Span> {
        self.span.as_ref()
    }

    /// The context that produced this value, if it is still alive.
    pub fn context(&self) -> Option<Rc<Context>> {
        self.context.as_ref().and_then(Weak::upgrade)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, context: &Rc<Context>) -> Self {
        self.context = Some(Rc::downgrade(context));
        self
    }

    /// Copy re-tagged with a new origin.
    pub fn retag(&self, span: &Span, context: &Rc<Context>) -> Self {
        self.clone().with_span(span.clone()).with_context(context)
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ValueKind::Number(_) => "Number",
            ValueKind::String(_) => "String",
            ValueKind::List(_) => "List",
            ValueKind::Function(_) => "Function",
            ValueKind::BuiltIn(_) => "BuiltInFunction",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            ValueKind::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match &self.kind {
            ValueKind::List(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match &self.kind {
            ValueKind::Number(n) => *n != 0.0,
            ValueKind::String(s) => !s.is_empty(),
            ValueKind::List(elements) => !elements.is_empty(),
            ValueKind::Function(_) | ValueKind::BuiltIn(_) => false,
        }
    }

    /// Applies a binary operator with `self` as the left operand.
    pub fn binary(&self, op: BinOp, other: &Value) -> OpResult {
        match op {
            BinOp::Add => self.add(other),
            BinOp::Subtract => self.sub(other),
            BinOp::Multiply => self.mul(other),
            BinOp::Divide => self.div(other),
            BinOp::Modulo => self.modulo(other),
            BinOp::Power => self.pow(other),
            BinOp::Root => self.root(other),
            BinOp::Equal => self.eq(other),
            BinOp::NotEqual => self.ne(other),
            BinOp::LessThan => self.lt(other),
            BinOp::GreaterThan => self.gt(other),
            BinOp::LessEqual => self.lte(other),
            BinOp::GreaterEqual => self.gte(other),
            BinOp::And => self.and(other),
            BinOp::Or => self.or(other),
        }
    }

    pub fn add(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => Ok(Value::number(a + b)),
            (ValueKind::String(a), ValueKind::String(b)) => Ok(Value::string(format!("{a}{b}"))),
            (ValueKind::List(a), ValueKind::List(b)) => {
                let mut elements = a.clone();
                elements.extend(b.iter().cloned());
                Ok(Value::list(elements))
            }
            (ValueKind::List(a), ValueKind::Number(_) | ValueKind::String(_)) => {
                let mut elements = a.clone();
                elements.push(other.clone());
                Ok(Value::list(elements))
            }
            _ => Err(OpError::illegal("+", self, Some(other))),
        }
    }

    pub fn sub(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => Ok(Value::number(a - b)),
            (ValueKind::List(elements), ValueKind::Number(index)) => {
                let i = resolve_index(*index, elements.len())?;
                let mut elements = elements.clone();
                elements.remove(i);
                Ok(Value::list(elements))
            }
            _ => Err(OpError::illegal("-", self, Some(other))),
        }
    }

    pub fn mul(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => Ok(Value::number(a * b)),
            (ValueKind::String(s), ValueKind::Number(n)) => {
                Ok(Value::string(s.repeat(repeat_count(*n, s.len())?)))
            }
            (ValueKind::List(elements), ValueKind::Number(n)) => {
                let count = repeat_count(*n, elements.len())?;
                let mut repeated = Vec::with_capacity(elements.len() * count);
                for _ in 0..count {
                    repeated.extend(elements.iter().cloned());
                }
                Ok(Value::list(repeated))
            }
            _ => Err(OpError::illegal("*", self, Some(other))),
        }
    }

    pub fn div(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(_), ValueKind::Number(b)) if *b == 0.0 => {
                Err(OpError::at_right("Division by zero"))
            }
            (ValueKind::Number(a), ValueKind::Number(b)) => Ok(Value::number(a / b)),
            (ValueKind::String(s), ValueKind::Number(index)) => {
                let chars: Vec<char> = s.chars().collect();
                let i = resolve_index(*index, chars.len())?;
                Ok(Value::string(chars[i].to_string()))
            }
            (ValueKind::List(elements), ValueKind::Number(index)) => {
                let i = resolve_index(*index, elements.len())?;
                Ok(elements[i].clone())
            }
            _ => Err(OpError::illegal("/", self, Some(other))),
        }
    }

    /// Modulo whose result takes the sign of the divisor.
    pub fn modulo(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(_), ValueKind::Number(b)) if *b == 0.0 => {
                Err(OpError::at_right("Division by zero"))
            }
            (ValueKind::Number(a), ValueKind::Number(b)) => {
                let r = a % b;
                let r = if r != 0.0 && (r < 0.0) != (*b < 0.0) { r + b } else { r };
                Ok(Value::number(r))
            }
            _ => Err(OpError::illegal("MOD", self, Some(other))),
        }
    }

    pub fn pow(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => {
                if *a == 0.0 && *b == 0.0 {
                    return Err(OpError::at_both("Indeterminate result"));
                }
                if *a == 0.0 && *b < 0.0 {
                    return Err(OpError::at_both("Division by zero"));
                }
                let result = a.powf(*b);
                if result.is_nan() {
                    return Err(OpError::at_both("Result is not a real number"));
                }
                Ok(Value::number(result))
            }
            _ => Err(OpError::illegal("^", self, Some(other))),
        }
    }

    /// `self # other`: the `self`-th root of `other`.
    pub fn root(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(degree), ValueKind::Number(_)) => {
                if *degree == 0.0 {
                    return Err(OpError::at_both("Division by zero"));
                }
                other.pow(&Value::number(1.0 / degree))
            }
            _ => Err(OpError::illegal("#", self, Some(other))),
        }
    }

    pub fn eq(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => Ok(Value::boolean(a == b)),
            (ValueKind::String(a), ValueKind::String(b)) => Ok(Value::boolean(a == b)),
            _ => Err(OpError::illegal("==", self, Some(other))),
        }
    }

    pub fn ne(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => Ok(Value::boolean(a != b)),
            (ValueKind::String(a), ValueKind::String(b)) => Ok(Value::boolean(a != b)),
            _ => Err(OpError::illegal("!=", self, Some(other))),
        }
    }

    pub fn lt(&self, other: &Value) -> OpResult {
        self.compare(other, "<", |a, b| a < b)
    }

    pub fn gt(&self, other: &Value) -> OpResult {
        self.compare(other, ">", |a, b| a > b)
    }

    pub fn lte(&self, other: &Value) -> OpResult {
        self.compare(other, "<=", |a, b| a <= b)
    }

    pub fn gte(&self, other: &Value) -> OpResult {
        self.compare(other, ">=", |a, b| a >= b)
    }

    fn compare(&self, other: &Value, op: &str, test: impl Fn(f64, f64) -> bool) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => Ok(Value::boolean(test(*a, *b))),
            _ => Err(OpError::illegal(op, self, Some(other))),
        }
    }

    pub fn and(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => {
                Ok(Value::boolean(*a != 0.0 && *b != 0.0))
            }
            _ => Err(OpError::illegal("AND", self, Some(other))),
        }
    }

    pub fn or(&self, other: &Value) -> OpResult {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => {
                Ok(Value::boolean(*a != 0.0 || *b != 0.0))
            }
            _ => Err(OpError::illegal("OR", self, Some(other))),
        }
    }

    /// Logical negation: 1 for falsy values, 0 for truthy ones.
    pub fn not(&self) -> OpResult {
        match self.kind {
            ValueKind::Function(_) | ValueKind::BuiltIn(_) => {
                Err(OpError::illegal("NOT", self, None))
            }
            _ => Ok(Value::boolean(!self.is_truthy())),
        }
    }
}

impl PartialEq for Value {
    /// Structural equality of payloads; spans and contexts are ignored.
    /// Functions are equal only to themselves.
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => a == b,
            (ValueKind::String(a), ValueKind::String(b)) => a == b,
            (ValueKind::List(a), ValueKind::List(b)) => a == b,
            (ValueKind::Function(a), ValueKind::Function(b)) => Rc::ptr_eq(a, b),
            (ValueKind::BuiltIn(a), ValueKind::BuiltIn(b)) => a == b,
            _ => false,
        }
    }
}

/// Turns a script index into a position, counting negative indexes from
/// the end.
fn resolve_index(index: f64, len: usize) -> Result<usize, OpError> {
    let out_of_bounds = || OpError::at_right(format!("Index {} is out of bounds", format_number(index)));
    if index.fract() != 0.0 || !index.is_finite() {
        return Err(OpError::at_right(format!(
            "Index {} is not a whole number",
            format_number(index)
        )));
    }
    let len = len as i64;
    let i = index as i64;
    let resolved = if i < 0 { len + i } else { i };
    if resolved < 0 || resolved >= len {
        return Err(out_of_bounds());
    }
    Ok(resolved as usize)
}

/// Largest string (in bytes) or list a repeat may build.
const MAX_REPEAT_LEN: usize = 1 << 20;

/// Validates `n` as a repeat count for something `len` long.
fn repeat_count(n: f64, len: usize) -> Result<usize, OpError> {
    let refused = || OpError::at_right(format!("Cannot repeat {} times", format_number(n)));
    if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
        return Err(refused());
    }
    if len == 0 {
        return Ok(0);
    }
    // Saturates at usize::MAX, which the size check then refuses.
    let count = n as usize;
    match len.checked_mul(count) {
        Some(total) if total <= MAX_REPEAT_LEN => Ok(count),
        _ => Err(refused()),
    }
}
