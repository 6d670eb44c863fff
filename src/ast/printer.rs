//! Renders syntax trees back into source form, used by `HELP` to show the
//! body of a user function.

use std::fmt;

use crate::ast::{ElseCase, IfCase, Node, NodeKind};
use crate::output::format_number;

const INDENT: &str = "    ";

struct Printer {
    out: String,
}

impl Printer {
    fn new() -> Self {
        Printer { out: String::new() }
    }

    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str(INDENT);
        }
    }

    /// Writes a construct body: inline after `THEN`, or as an indented block
    /// closed by `END`.
    fn body(&mut self, body: &Node, block: bool, level: usize, close: bool) {
        if block {
            self.out.push('\n');
            self.block_lines(body, level + 1);
            if close {
                self.out.push('\n');
                self.indent(level);
                self.out.push_str("END");
            }
        } else {
            self.out.push(' ');
            self.node(body, level);
        }
    }

    fn block_lines(&mut self, body: &Node, level: usize) {
        let statements = match &body.kind {
            NodeKind::Statements(statements) => statements.as_slice(),
            _ => std::slice::from_ref(body),
        };
        for (i, statement) in statements.iter().enumerate() {
            if i > 0 {
                self.out.push('\n');
            }
            self.indent(level);
            self.node(statement, level);
        }
    }

    fn list(&mut self, nodes: &[Node], level: usize) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.node(node, level);
        }
    }

    fn if_chain(&mut self, cases: &[IfCase], else_case: Option<&ElseCase>, level: usize) {
        let last_block = else_case.map(|e| e.block).or(cases.last().map(|c| c.block));
        for (i, case) in cases.iter().enumerate() {
            if i > 0 {
                if cases[i - 1].block {
                    self.out.push('\n');
                    self.indent(level);
                } else {
                    self.out.push(' ');
                }
                self.out.push_str("ELIF ");
            } else {
                self.out.push_str("IF ");
            }
            self.node(&case.condition, level);
            self.out.push_str(" THEN");
            self.body(&case.body, case.block, level, false);
        }
        if let Some(else_case) = else_case {
            if cases.last().is_some_and(|c| c.block) {
                self.out.push('\n');
                self.indent(level);
            } else {
                self.out.push(' ');
            }
            self.out.push_str("ELSE");
            self.body(&else_case.body, else_case.block, level, false);
        }
        if last_block == Some(true) {
            self.out.push('\n');
            self.indent(level);
            self.out.push_str("END");
        }
    }

    fn node(&mut self, node: &Node, level: usize) {
        match &node.kind {
            NodeKind::Number(n) => self.out.push_str(&format_number(*n)),
            NodeKind::String(s) => {
                let quote = if s.contains('"') { '\'' } else { '"' };
                self.out.push(quote);
                self.out.push_str(s);
                self.out.push(quote);
            }
            NodeKind::List(elements) => {
                self.out.push('[');
                self.list(elements, level);
                self.out.push(']');
            }
            NodeKind::VarAccess(name) => self.out.push_str(name),
            NodeKind::VarAssign { name, value } => {
                self.out.push_str("VAR ");
                self.out.push_str(name);
                self.out.push_str(" = ");
                self.node(value, level);
            }
            NodeKind::BinaryOp { op, left, right } => {
                self.out.push('(');
                self.node(left, level);
                self.out.push_str(&format!(" {op} "));
                self.node(right, level);
                self.out.push(')');
            }
            NodeKind::UnaryOp { op, operand } => {
                self.out.push_str(&op.to_string());
                self.node(operand, level);
            }
            NodeKind::If { cases, else_case } => {
                self.if_chain(cases, else_case.as_ref(), level);
            }
            NodeKind::For {
                var,
                start,
                end,
                step,
                body,
                block,
            } => {
                self.out.push_str(&format!("FOR {var} = "));
                self.node(start, level);
                self.out.push_str(" THEN ");
                self.node(end, level);
                if let Some(step) = step {
                    self.out.push_str(" THEN STEP ");
                    self.node(step, level);
                }
                self.out.push_str(" THEN");
                self.body(body, *block, level, true);
            }
            NodeKind::While {
                condition,
                body,
                block,
            } => {
                self.out.push_str("WHILE ");
                self.node(condition, level);
                self.out.push_str(" THEN");
                self.body(body, *block, level, true);
            }
            NodeKind::FuncDef {
                name,
                params,
                body,
                auto_return,
            } => {
                self.out.push_str("DEF ");
                if let Some(name) = name {
                    self.out.push_str(name);
                }
                self.out.push('(');
                self.out.push_str(&params.join(", "));
                self.out.push_str(") THEN");
                self.body(body, !auto_return, level, true);
            }
            NodeKind::Call { callee, args } => {
                self.node(callee, level);
                self.out.push('(');
                self.list(args, level);
                self.out.push(')');
            }
            NodeKind::Return(value) => {
                self.out.push_str("RETURN");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.node(value, level);
                }
            }
            NodeKind::Continue => self.out.push_str("CONTINUE"),
            NodeKind::Break => self.out.push_str("BREAK"),
            NodeKind::Statements(statements) => {
                for (i, statement) in statements.iter().enumerate() {
                    if i > 0 {
                        self.out.push('\n');
                        self.indent(level);
                    }
                    self.node(statement, level);
                }
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::new();
        printer.node(self, 0);
        f.write_str(&printer.out)
    }
}
