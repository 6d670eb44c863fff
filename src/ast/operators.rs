use std::fmt;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    /// Addition, concatenation or list append (`+`)
    Add,
    /// Subtraction, or list element removal (`-`)
    Subtract,
    /// Multiplication or repetition (`*`)
    Multiply,
    /// Division, or indexing into strings and lists (`/`)
    Divide,
    /// Modulo (`MOD` or `%`), following the sign of the divisor
    Modulo,
    /// Power (`^`)
    Power,
    /// Root (`#`): `a # b` is `b ^ (1 / a)`
    Root,

    // Comparison
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Logical
    /// Logical AND (`AND`), both sides always evaluated
    And,
    /// Logical OR (`OR`), both sides always evaluated
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Subtract => "-",
            BinOp::Multiply => "*",
            BinOp::Divide => "/",
            BinOp::Modulo => "MOD",
            BinOp::Power => "^",
            BinOp::Root => "#",
            BinOp::Equal => "==",
            BinOp::NotEqual => "!=",
            BinOp::LessThan => "<",
            BinOp::GreaterThan => ">",
            BinOp::LessEqual => "<=",
            BinOp::GreaterEqual => ">=",
            BinOp::And => "AND",
            BinOp::Or => "OR",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`, evaluated as `x * -1`
    Negate,
    /// `+x`, the operand unchanged
    Plus,
    /// `NOT x`
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Negate => f.write_str("-"),
            UnaryOp::Plus => f.write_str("+"),
            UnaryOp::Not => f.write_str("NOT "),
        }
    }
}
