use std::rc::Rc;

use crate::ast::{BinOp, UnaryOp};
use crate::position::Span;

/// A node of the syntax tree and the span of source it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }
}

/// One case of an `IF`/`ELIF` chain.
#[derive(Debug, Clone, PartialEq)]
pub struct IfCase {
    pub condition: Node,
    pub body: Node,
    /// Block form: a newline after `THEN`, closed by `END`. Evaluates to null.
    pub block: bool,
}

/// The `ELSE` branch of an `IF`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElseCase {
    pub body: Box<Node>,
    pub block: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // Literals
    /// Integer or float literal
    ///
    /// # Example
    /// ```text
    /// 42
    /// 3.5
    /// ```
    Number(f64),

    /// String literal
    ///
    /// # Example
    /// ```text
    /// "hello"
    /// 'hello'
    /// ```
    String(String),

    /// List literal
    ///
    /// # Example
    /// ```text
    /// [1, "two", [3]]
    /// ```
    List(Vec<Node>),

    // Variables
    /// Name lookup through the scope chain
    VarAccess(String),

    /// Assignment in the current scope, with or without `VAR`
    ///
    /// # Example
    /// ```text
    /// VAR x = 5
    /// x = x + 1
    /// ```
    VarAssign { name: String, value: Box<Node> },

    // Operations
    BinaryOp {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
    },

    UnaryOp { op: UnaryOp, operand: Box<Node> },

    // Control flow
    /// Conditional chain
    ///
    /// # Example
    /// ```text
    /// IF x > 0 THEN "pos" ELIF x < 0 THEN "neg" ELSE "zero"
    /// ```
    If {
        cases: Vec<IfCase>,
        else_case: Option<ElseCase>,
    },

    /// Counting loop
    ///
    /// # Example
    /// ```text
    /// FOR i = 0 THEN 10 THEN STEP 2 THEN PRINT(i)
    /// ```
    For {
        var: String,
        start: Box<Node>,
        end: Box<Node>,
        step: Option<Box<Node>>,
        body: Box<Node>,
        block: bool,
    },

    While {
        condition: Box<Node>,
        body: Box<Node>,
        block: bool,
    },

    // Functions
    /// Function definition, named or anonymous
    ///
    /// The body is shared with every function value built from it.
    /// Inline definitions (`auto_return`) return their body value.
    ///
    /// # Example
    /// ```text
    /// DEF add(a, b) THEN a + b
    /// DEF (x) THEN x * 2
    /// ```
    FuncDef {
        name: Option<String>,
        params: Vec<String>,
        body: Rc<Node>,
        auto_return: bool,
    },

    /// Call of any callable expression
    Call { callee: Box<Node>, args: Vec<Node> },

    /// `RETURN` with an optional value
    Return(Option<Box<Node>>),

    Continue,

    Break,

    /// Statement list: the program root and every block body
    Statements(Vec<Node>),
}
