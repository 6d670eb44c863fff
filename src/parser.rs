use std::rc::Rc;

use log::trace;

use crate::ast::{BinOp, ElseCase, IfCase, Keyword, Node, NodeKind, Token, TokenKind, UnaryOp};
use crate::error::Error;
use crate::position::Span;

type ParseResult<T> = Result<T, Error>;

const EXPECTED_STATEMENT: &str = "Expected 'RETURN', 'CONTINUE', 'BREAK', 'VAR', 'IF', 'FOR', \
     'WHILE', 'DEF', int, float, identifier, '+', '-', '(', '[' or 'NOT'";
const EXPECTED_EXPR: &str = "Expected 'VAR', 'IF', 'FOR', 'WHILE', 'DEF', int, float, \
     identifier, '+', '-', '(', '[' or 'NOT'";
const EXPECTED_COMPARISON: &str = "Expected int, float, identifier, '+', '-', '(', '[', 'IF', \
     'FOR', 'WHILE', 'DEF' or 'NOT'";
/// Nesting budget shared by sub-expressions, unary chains and operator
/// chains. Keeps both the parser and every tree it builds shallow enough
/// for the stack.
const MAX_DEPTH: usize = 256;

const EXPECTED_ATOM: &str = "Expected int, float, identifier, '+', '-', '(', '[', 'IF', \
     'FOR', 'WHILE' or 'DEF'";

/// Recursive-descent parser over a finished token stream.
///
/// Optional constructs go through [`Parser::optional`]: a failure on the
/// very first token means the construct is absent, a failure after that is
/// reported.
pub struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    depth: usize,
    /// Set once the nesting budget ran out; that error is never swapped
    /// for another or taken as an absent construct.
    too_deep: bool,
}

impl Parser {
    /// `tokens` must end with an EOF token, as produced by the lexer.
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            cursor: 0,
            depth: 0,
            too_deep: false,
        }
    }

    /// Parses a whole program.
    pub fn parse(mut self) -> ParseResult<Node> {
        let program = self.statements()?;
        if !self.check(&TokenKind::Eof) {
            return Err(self.error_here("Expected an operator"));
        }
        trace!("parsed {program:#?}");
        Ok(program)
    }

    // ----- cursor -----

    fn current(&self) -> &Token {
        // The stream always ends with EOF; never step past it.
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.cursor.min(last)]
    }

    fn peek_kind(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.cursor + offset).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current().is(kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current().is_keyword(keyword)
    }

    fn error_here(&self, message: &str) -> Error {
        Error::invalid_syntax(self.current().span.clone(), message)
    }

    fn expect(&mut self, kind: &TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(message))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<Token> {
        if self.check_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.error_here(&format!("Expected '{keyword}'")))
        }
    }

    fn expect_identifier(&mut self, message: &str) -> ParseResult<(String, Span)> {
        match &self.current().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let token = self.advance();
                Ok((name, token.span))
            }
            _ => Err(self.error_here(message)),
        }
    }

    fn skip_newlines(&mut self) -> usize {
        let mut count = 0;
        while self.check(&TokenKind::Newline) {
            self.advance();
            count += 1;
        }
        count
    }

    /// Runs `parse` speculatively. Failing before any token was consumed
    /// gives `None` with the cursor untouched.
    fn optional<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<Option<T>> {
        let snapshot = self.cursor;
        match parse(self) {
            Ok(value) => Ok(Some(value)),
            Err(_) if self.cursor == snapshot && !self.too_deep => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Runs `parse` one nesting level deeper.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.keeping_depth(|parser| {
            parser.descend()?;
            parse(parser)
        })
    }

    /// Runs `parse` and puts the nesting depth back to where it was, even
    /// when `parse` fails.
    fn keeping_depth<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let outer = self.depth;
        let result = parse(self);
        self.depth = outer;
        result
    }

    fn descend(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_DEPTH {
            self.too_deep = true;
            return Err(self.error_here("Expression is nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    /// Swaps a failure for `message` when it happened before any token of
    /// this level was consumed.
    fn or_expected<T>(&self, start: usize, result: ParseResult<T>, message: &str) -> ParseResult<T> {
        match result {
            Err(_) if self.cursor == start && !self.too_deep => Err(self.error_here(message)),
            other => other,
        }
    }

    // ----- statements -----

    fn statements(&mut self) -> ParseResult<Node> {
        self.skip_newlines();
        let first = self.statement()?;
        let mut span = first.span.clone();
        let mut statements = vec![first];

        loop {
            if self.skip_newlines() == 0 {
                break;
            }
            // Nothing after the newlines starts a statement: the list ends
            // here and the caller decides what may follow.
            let Some(statement) = self.optional(Self::statement)? else {
                break;
            };
            span = span.to(&statement.span);
            statements.push(statement);
        }

        Ok(Node::new(NodeKind::Statements(statements), span))
    }

    fn statement(&mut self) -> ParseResult<Node> {
        let start = self.cursor;
        let token = self.current().clone();

        if token.is_keyword(Keyword::Return) {
            self.advance();
            let value = self.optional(Self::expr)?;
            let span = match &value {
                Some(value) => token.span.to(&value.span),
                None => token.span.clone(),
            };
            return Ok(Node::new(NodeKind::Return(value.map(Box::new)), span));
        }
        if token.is_keyword(Keyword::Continue) {
            self.advance();
            return Ok(Node::new(NodeKind::Continue, token.span));
        }
        if token.is_keyword(Keyword::Break) {
            self.advance();
            return Ok(Node::new(NodeKind::Break, token.span));
        }

        let result = self.expr();
        self.or_expected(start, result, EXPECTED_STATEMENT)
    }

    // ----- expressions -----

    fn expr(&mut self) -> ParseResult<Node> {
        self.nested(Self::assignment_or_logic)
    }

    fn assignment_or_logic(&mut self) -> ParseResult<Node> {
        let start = self.cursor;

        if self.check_keyword(Keyword::Var) {
            let var = self.advance();
            let (name, _) = self.expect_identifier("Expected identifier")?;
            self.expect(&TokenKind::Eq, "Expected '='")?;
            let value = self.expr()?;
            let span = var.span.to(&value.span);
            return Ok(Node::new(
                NodeKind::VarAssign {
                    name,
                    value: Box::new(value),
                },
                span,
            ));
        }

        if matches!(self.current().kind, TokenKind::Identifier(_))
            && matches!(self.peek_kind(1), Some(TokenKind::Eq))
        {
            let (name, name_span) = self.expect_identifier("Expected identifier")?;
            self.advance();
            let value = self.expr()?;
            let span = name_span.to(&value.span);
            return Ok(Node::new(
                NodeKind::VarAssign {
                    name,
                    value: Box::new(value),
                },
                span,
            ));
        }

        let result = self.bin_op(Self::comparison, |kind| match kind {
            TokenKind::Keyword(Keyword::And) => Some(BinOp::And),
            TokenKind::Keyword(Keyword::Or) => Some(BinOp::Or),
            _ => None,
        });
        self.or_expected(start, result, EXPECTED_EXPR)
    }

    fn comparison(&mut self) -> ParseResult<Node> {
        self.nested(Self::not_or_comparison)
    }

    fn not_or_comparison(&mut self) -> ParseResult<Node> {
        let start = self.cursor;

        if self.check_keyword(Keyword::Not) {
            let not = self.advance();
            let operand = self.comparison()?;
            let span = not.span.to(&operand.span);
            return Ok(Node::new(
                NodeKind::UnaryOp {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                span,
            ));
        }

        let result = self.bin_op(Self::arith, |kind| match kind {
            TokenKind::EqEq => Some(BinOp::Equal),
            TokenKind::NotEq => Some(BinOp::NotEqual),
            TokenKind::Lt => Some(BinOp::LessThan),
            TokenKind::Gt => Some(BinOp::GreaterThan),
            TokenKind::LtEq => Some(BinOp::LessEqual),
            TokenKind::GtEq => Some(BinOp::GreaterEqual),
            _ => None,
        });
        self.or_expected(start, result, EXPECTED_COMPARISON)
    }

    fn arith(&mut self) -> ParseResult<Node> {
        self.bin_op(Self::term, |kind| match kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Subtract),
            _ => None,
        })
    }

    fn term(&mut self) -> ParseResult<Node> {
        self.bin_op(Self::factor, |kind| match kind {
            TokenKind::Star => Some(BinOp::Multiply),
            TokenKind::Slash => Some(BinOp::Divide),
            TokenKind::Mod => Some(BinOp::Modulo),
            _ => None,
        })
    }

    fn factor(&mut self) -> ParseResult<Node> {
        self.nested(Self::signed)
    }

    fn signed(&mut self) -> ParseResult<Node> {
        let op = match self.current().kind {
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Negate),
            _ => None,
        };
        if let Some(op) = op {
            let sign = self.advance();
            let operand = self.factor()?;
            let span = sign.span.to(&operand.span);
            return Ok(Node::new(
                NodeKind::UnaryOp {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.power()
    }

    /// `^` and `#` take a whole factor on the right, so `2 ^ -1` parses.
    fn power(&mut self) -> ParseResult<Node> {
        let mut left = self.call()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Caret => BinOp::Power,
                TokenKind::Hash => BinOp::Root,
                _ => break,
            };
            self.advance();
            let right = self.factor()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    /// Left-associative chain of `operand (op operand)*`. Every operator
    /// deepens the tree on the left, so each one counts as a level.
    fn bin_op(
        &mut self,
        operand: fn(&mut Self) -> ParseResult<Node>,
        op_for: impl Fn(&TokenKind) -> Option<BinOp>,
    ) -> ParseResult<Node> {
        self.keeping_depth(|parser| {
            let mut left = operand(parser)?;
            while let Some(op) = op_for(&parser.current().kind) {
                parser.advance();
                parser.descend()?;
                let right = operand(parser)?;
                left = binary(op, left, right);
            }
            Ok(left)
        })
    }

    fn call(&mut self) -> ParseResult<Node> {
        let callee = self.atom()?;
        if !self.check(&TokenKind::LParen) {
            return Ok(callee);
        }
        self.advance();

        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            let start = self.cursor;
            let first = self.expr();
            args.push(self.or_expected(
                start,
                first,
                "Expected ')', 'VAR', 'IF', 'FOR', 'WHILE', 'DEF', int, float, identifier, \
                 '+', '-', '(', '[' or 'NOT'",
            )?);
            while self.check(&TokenKind::Comma) {
                self.advance();
                args.push(self.expr()?);
            }
        }
        let close = self.expect(&TokenKind::RParen, "Expected ',' or ')'")?;

        let span = callee.span.to(&close.span);
        Ok(Node::new(
            NodeKind::Call {
                callee: Box::new(callee),
                args,
            },
            span,
        ))
    }

    fn atom(&mut self) -> ParseResult<Node> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Node::new(NodeKind::Number(n as f64), token.span))
            }
            TokenKind::Float(n) => {
                self.advance();
                Ok(Node::new(NodeKind::Number(n), token.span))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Node::new(NodeKind::String(s), token.span))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Node::new(NodeKind::VarAccess(name), token.span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expr()?;
                self.expect(&TokenKind::RParen, "Expected ')'")?;
                Ok(inner)
            }
            TokenKind::LBracket => self.list_expr(),
            TokenKind::Keyword(Keyword::If) => self.if_expr(),
            TokenKind::Keyword(Keyword::For) => self.for_expr(),
            TokenKind::Keyword(Keyword::While) => self.while_expr(),
            TokenKind::Keyword(Keyword::Def) => self.func_def(),
            _ => Err(self.error_here(EXPECTED_ATOM)),
        }
    }

    fn list_expr(&mut self) -> ParseResult<Node> {
        let open = self.expect(&TokenKind::LBracket, "Expected '['")?;
        let mut elements = Vec::new();

        if !self.check(&TokenKind::RBracket) {
            let start = self.cursor;
            let first = self.expr();
            elements.push(self.or_expected(
                start,
                first,
                "Expected ']', 'VAR', 'IF', 'FOR', 'WHILE', 'DEF', int, float, identifier, \
                 '+', '-', '(', '[' or 'NOT'",
            )?);
            while self.check(&TokenKind::Comma) {
                self.advance();
                elements.push(self.expr()?);
            }
        }
        let close = self.expect(&TokenKind::RBracket, "Expected ',' or ']'")?;

        Ok(Node::new(NodeKind::List(elements), open.span.to(&close.span)))
    }

    // ----- control flow -----

    fn if_expr(&mut self) -> ParseResult<Node> {
        let if_token = self.expect_keyword(Keyword::If)?;
        let mut cases = Vec::new();
        let mut else_case = None;
        let end = self.if_cases(&mut cases, &mut else_case)?;
        Ok(Node::new(
            NodeKind::If { cases, else_case },
            if_token.span.to(&end),
        ))
    }

    /// Parses `condition THEN body` plus whatever follows it: more `ELIF`
    /// cases, an `ELSE`, or the closing `END`. Returns the span of the last
    /// token consumed.
    fn if_cases(&mut self, cases: &mut Vec<IfCase>, else_case: &mut Option<ElseCase>) -> ParseResult<Span> {
        let condition = self.expr()?;
        self.expect_keyword(Keyword::Then)?;

        if self.check(&TokenKind::Newline) {
            self.advance();
            let body = self.statements()?;
            let body_end = body.span.clone();
            cases.push(IfCase {
                condition,
                body,
                block: true,
            });

            if self.check_keyword(Keyword::End) {
                return Ok(self.advance().span);
            }
            if self.check_keyword(Keyword::Elif) || self.check_keyword(Keyword::Else) {
                return Ok(self.elif_or_else(cases, else_case)?.unwrap_or(body_end));
            }
            return Err(self.error_here("Expected 'END', 'ELIF' or 'ELSE'"));
        }

        let body = self.statement()?;
        let body_end = body.span.clone();
        cases.push(IfCase {
            condition,
            body,
            block: false,
        });
        Ok(self.elif_or_else(cases, else_case)?.unwrap_or(body_end))
    }

    fn elif_or_else(
        &mut self,
        cases: &mut Vec<IfCase>,
        else_case: &mut Option<ElseCase>,
    ) -> ParseResult<Option<Span>> {
        if self.check_keyword(Keyword::Elif) {
            self.advance();
            return self.if_cases(cases, else_case).map(Some);
        }
        if !self.check_keyword(Keyword::Else) {
            return Ok(None);
        }
        self.advance();

        if self.check(&TokenKind::Newline) {
            self.advance();
            let body = self.statements()?;
            let end = self.expect_keyword(Keyword::End)?;
            *else_case = Some(ElseCase {
                body: Box::new(body),
                block: true,
            });
            return Ok(Some(end.span));
        }

        let body = self.statement()?;
        let end = body.span.clone();
        *else_case = Some(ElseCase {
            body: Box::new(body),
            block: false,
        });
        Ok(Some(end))
    }

    /// Loop body after `THEN`: a block closed by `END`, or one statement.
    fn loop_body(&mut self) -> ParseResult<(Node, bool, Span)> {
        if self.check(&TokenKind::Newline) {
            self.advance();
            let body = self.statements()?;
            let end = self.expect_keyword(Keyword::End)?;
            return Ok((body, true, end.span));
        }
        let body = self.statement()?;
        let end = body.span.clone();
        Ok((body, false, end))
    }

    fn for_expr(&mut self) -> ParseResult<Node> {
        let for_token = self.expect_keyword(Keyword::For)?;
        let (var, _) = self.expect_identifier("Expected identifier")?;
        self.expect(&TokenKind::Eq, "Expected '='")?;
        let start = self.expr()?;
        self.expect_keyword(Keyword::Then)?;
        let end = self.expr()?;
        self.expect_keyword(Keyword::Then)?;

        let mut step = None;
        if self.check_keyword(Keyword::Step) {
            self.advance();
            step = Some(Box::new(self.expr()?));
            self.expect_keyword(Keyword::Then)?;
        }

        let (body, block, last) = self.loop_body()?;
        Ok(Node::new(
            NodeKind::For {
                var,
                start: Box::new(start),
                end: Box::new(end),
                step,
                body: Box::new(body),
                block,
            },
            for_token.span.to(&last),
        ))
    }

    fn while_expr(&mut self) -> ParseResult<Node> {
        let while_token = self.expect_keyword(Keyword::While)?;
        let condition = self.expr()?;
        self.expect_keyword(Keyword::Then)?;
        let (body, block, last) = self.loop_body()?;
        Ok(Node::new(
            NodeKind::While {
                condition: Box::new(condition),
                body: Box::new(body),
                block,
            },
            while_token.span.to(&last),
        ))
    }

    fn func_def(&mut self) -> ParseResult<Node> {
        let def = self.expect_keyword(Keyword::Def)?;

        let name = match &self.current().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        };
        let open_message = if name.is_some() {
            "Expected '('"
        } else {
            "Expected identifier or '('"
        };
        self.expect(&TokenKind::LParen, open_message)?;

        let mut params = Vec::new();
        if let TokenKind::Identifier(first) = &self.current().kind {
            params.push(first.clone());
            self.advance();
            while self.check(&TokenKind::Comma) {
                self.advance();
                let (param, _) = self.expect_identifier("Expected identifier")?;
                params.push(param);
            }
            self.expect(&TokenKind::RParen, "Expected ',' or ')'")?;
        } else {
            self.expect(&TokenKind::RParen, "Expected identifier or ')'")?;
        }

        self.expect_keyword(Keyword::Then)?;

        let (body, auto_return, last) = if self.check(&TokenKind::Newline) {
            self.advance();
            let body = self.statements()?;
            let end = self.expect_keyword(Keyword::End)?;
            (body, false, end.span)
        } else {
            let body = self.expr()?;
            let end = body.span.clone();
            (body, true, end)
        };

        Ok(Node::new(
            NodeKind::FuncDef {
                name,
                params,
                body: Rc::new(body),
                auto_return,
            },
            def.span.to(&last),
        ))
    }
}

fn binary(op: BinOp, left: Node, right: Node) -> Node {
    let span = left.span.to(&right.span);
    Node::new(
        NodeKind::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}

/// Lexes and parses `text` in one go.
pub fn parse(source_name: &str, text: &str) -> ParseResult<Node> {
    let tokens = crate::lexer::tokenize(source_name, text)?;
    Parser::new(tokens).parse()
}
