//! Tree-walking evaluation.
//!
//! Every node evaluates to `Result<Value, Signal>`. `RETURN`, `BREAK`,
//! `CONTINUE` and runtime errors travel up as [`Signal`]s through `?` until
//! a call or loop consumes them.

use std::rc::Rc;

use crate::ast::{BinOp, ElseCase, IfCase, Node, NodeKind, UnaryOp};
use crate::builtins::{BuiltIn, Invocation};
use crate::context::{Context, SymbolTable};
use crate::engine::Engine;
use crate::error::Error;
use crate::host::Host;
use crate::position::Span;
use crate::value::{Culprit, Function, OpError, Value, ValueKind};

/// Anything that stops normal evaluation of a node.
#[derive(Debug, Clone)]
pub enum Signal {
    Return(Value),
    Break,
    Continue,
    Error(Error),
}

impl From<Error> for Signal {
    fn from(error: Error) -> Self {
        Signal::Error(error)
    }
}

pub type EvalResult = Result<Value, Signal>;

fn runtime_error(span: &Span, message: impl Into<String>, context: &Rc<Context>) -> Signal {
    Signal::Error(Error::runtime(span.clone(), message, Some(Rc::clone(context))))
}

fn number_operand(node: &Node, value: &Value, what: &str, context: &Rc<Context>) -> Result<f64, Signal> {
    value
        .as_number()
        .ok_or_else(|| runtime_error(&node.span, format!("{what} must be a Number"), context))
}

impl<H: Host> Engine<H> {
    /// Evaluates one node. Every evaluation in progress counts against
    /// `max_nesting_depth`, across calls and sub-scripts.
    pub(crate) fn evaluate(&mut self, node: &Node, context: &Rc<Context>) -> EvalResult {
        if self.nesting >= self.options().max_nesting_depth {
            return Err(runtime_error(&node.span, "Maximum nesting depth exceeded", context));
        }
        self.nesting += 1;
        let result = self.dispatch(node, context);
        self.nesting -= 1;
        result
    }

    // Each node kind gets its own method so the frame of this recursion
    // stays small.
    fn dispatch(&mut self, node: &Node, context: &Rc<Context>) -> EvalResult {
        match &node.kind {
            NodeKind::Number(n) => Ok(Value::number(*n).retag(&node.span, context)),
            NodeKind::String(s) => Ok(Value::string(s.clone()).retag(&node.span, context)),
            NodeKind::List(elements) | NodeKind::Statements(elements) => {
                self.eval_sequence(node, elements, context)
            }
            NodeKind::VarAccess(name) => self.eval_var_access(node, name, context),
            NodeKind::VarAssign { name, value } => {
                let value = self.evaluate(value, context)?;
                context.symbols.set(name.clone(), value.clone());
                Ok(value)
            }
            NodeKind::BinaryOp { op, left, right } => self.eval_binary(node, *op, left, right, context),
            NodeKind::UnaryOp { op, operand } => self.eval_unary(node, *op, operand, context),
            NodeKind::If { cases, else_case } => self.eval_if(node, cases, else_case.as_ref(), context),
            NodeKind::For {
                var,
                start,
                end,
                step,
                body,
                block,
            } => self.eval_for(node, var, start, end, step.as_deref(), body, *block, context),
            NodeKind::While {
                condition,
                body,
                block,
            } => self.eval_while(node, condition, body, *block, context),
            NodeKind::FuncDef {
                name,
                params,
                body,
                auto_return,
            } => Ok(self.eval_func_def(node, name.as_ref(), params, body, *auto_return, context)),
            NodeKind::Call { callee, args } => self.eval_call(node, callee, args, context),
            NodeKind::Return(value) => {
                let value = match value {
                    Some(value) => self.evaluate(value, context)?,
                    None => Value::null().retag(&node.span, context),
                };
                Err(Signal::Return(value))
            }
            NodeKind::Continue => Err(Signal::Continue),
            NodeKind::Break => Err(Signal::Break),
        }
    }

    /// Lists and statement blocks: every element in order, collected.
    fn eval_sequence(&mut self, node: &Node, elements: &[Node], context: &Rc<Context>) -> EvalResult {
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            values.push(self.evaluate(element, context)?);
        }
        Ok(Value::list(values).retag(&node.span, context))
    }

    fn eval_binary(
        &mut self,
        node: &Node,
        op: BinOp,
        left: &Node,
        right: &Node,
        context: &Rc<Context>,
    ) -> EvalResult {
        let lhs = self.evaluate(left, context)?;
        let rhs = self.evaluate(right, context)?;
        let result = lhs
            .binary(op, &rhs)
            .map_err(|e| op_failure(e, &node.span, &right.span, context))?;
        Ok(result.retag(&node.span, context))
    }

    fn eval_unary(&mut self, node: &Node, op: UnaryOp, operand: &Node, context: &Rc<Context>) -> EvalResult {
        let value = self.evaluate(operand, context)?;
        let result = match op {
            UnaryOp::Negate => value.mul(&Value::number(-1.0)),
            UnaryOp::Plus => Ok(value),
            UnaryOp::Not => value.not(),
        }
        .map_err(|e| op_failure(e, &node.span, &node.span, context))?;
        Ok(result.retag(&node.span, context))
    }

    fn eval_if(
        &mut self,
        node: &Node,
        cases: &[IfCase],
        else_case: Option<&ElseCase>,
        context: &Rc<Context>,
    ) -> EvalResult {
        for case in cases {
            let condition = self.evaluate(&case.condition, context)?;
            if condition.is_truthy() {
                let value = self.evaluate(&case.body, context)?;
                return Ok(self.block_or(case.block, value, node, context));
            }
        }
        if let Some(else_case) = else_case {
            let value = self.evaluate(&else_case.body, context)?;
            return Ok(self.block_or(else_case.block, value, node, context));
        }
        Ok(Value::null().retag(&node.span, context))
    }

    fn eval_while(
        &mut self,
        node: &Node,
        condition: &Node,
        body: &Node,
        block: bool,
        context: &Rc<Context>,
    ) -> EvalResult {
        let mut collected = Vec::new();
        loop {
            let test = self.evaluate(condition, context)?;
            if !test.is_truthy() {
                break;
            }
            match self.evaluate(body, context) {
                Ok(value) => collected.push(value),
                Err(Signal::Continue) => continue,
                Err(Signal::Break) => break,
                Err(other) => return Err(other),
            }
        }
        Ok(self.loop_result(block, collected, node, context))
    }

    fn eval_func_def(
        &self,
        node: &Node,
        name: Option<&String>,
        params: &[String],
        body: &Rc<Node>,
        auto_return: bool,
        context: &Rc<Context>,
    ) -> Value {
        let function = Value::function(Function {
            name: name.cloned(),
            params: params.to_vec(),
            body: Rc::clone(body),
            auto_return,
            closure: Rc::clone(&context.symbols),
        })
        .retag(&node.span, context);
        if let Some(name) = name {
            context.symbols.set(name.clone(), function.clone());
        }
        function
    }

    fn eval_call(&mut self, node: &Node, callee: &Node, args: &[Node], context: &Rc<Context>) -> EvalResult {
        let callee = self.evaluate(callee, context)?;
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate(arg, context)?);
        }
        let result = self.call(&callee, values, &node.span, context)?;
        Ok(result.retag(&node.span, context))
    }

    fn eval_var_access(&self, node: &Node, name: &str, context: &Rc<Context>) -> EvalResult {
        match context.symbols.get(name) {
            Some(value) => Ok(value.retag(&node.span, context)),
            None => Err(runtime_error(
                &node.span,
                format!("'{name}' is not defined"),
                context,
            )),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn eval_for(
        &mut self,
        node: &Node,
        var: &str,
        start: &Node,
        end: &Node,
        step: Option<&Node>,
        body: &Node,
        block: bool,
        context: &Rc<Context>,
    ) -> EvalResult {
        let start_value = self.evaluate(start, context)?;
        let mut counter = number_operand(start, &start_value, "Loop start", context)?;
        let end_value = self.evaluate(end, context)?;
        let end_at = number_operand(end, &end_value, "Loop end", context)?;
        let step_by = match step {
            Some(step) => {
                let step_value = self.evaluate(step, context)?;
                number_operand(step, &step_value, "Loop step", context)?
            }
            None => 1.0,
        };

        let running = |i: f64| if step_by >= 0.0 { i < end_at } else { i > end_at };
        let mut collected = Vec::new();

        while running(counter) {
            context
                .symbols
                .set(var, Value::number(counter).retag(&start.span, context));
            counter += step_by;

            match self.evaluate(body, context) {
                Ok(value) => collected.push(value),
                Err(Signal::Continue) => continue,
                Err(Signal::Break) => break,
                Err(other) => return Err(other),
            }
        }
        Ok(self.loop_result(block, collected, node, context))
    }

    /// Block forms evaluate to null, inline forms to their body.
    fn block_or(&self, block: bool, value: Value, node: &Node, context: &Rc<Context>) -> Value {
        if block {
            Value::null().retag(&node.span, context)
        } else {
            value
        }
    }

    fn loop_result(&self, block: bool, collected: Vec<Value>, node: &Node, context: &Rc<Context>) -> Value {
        let value = if block {
            Value::null()
        } else {
            Value::list(collected)
        };
        value.retag(&node.span, context)
    }

    /// Invokes any callable value.
    pub(crate) fn call(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        span: &Span,
        caller: &Rc<Context>,
    ) -> EvalResult {
        if caller.depth() + 1 > self.options().max_call_depth {
            return Err(runtime_error(span, "Maximum call depth exceeded", caller));
        }
        match &callee.kind {
            ValueKind::Function(function) => self.call_function(function, args, span, caller),
            ValueKind::BuiltIn(builtin) => self.call_builtin(*builtin, args, span, caller),
            _ => Err(runtime_error(
                span,
                format!("Illegal operation: {} is not callable", callee.type_name()),
                caller,
            )),
        }
    }

    fn call_function(
        &mut self,
        function: &Rc<Function>,
        args: Vec<Value>,
        span: &Span,
        caller: &Rc<Context>,
    ) -> EvalResult {
        let symbols = Rc::new(SymbolTable::with_parent(Rc::clone(&function.closure)));
        let context = Rc::new(Context::call(
            function.display_name(),
            caller,
            span.clone(),
            symbols,
        ));
        bind_args(function.display_name(), function.params.as_slice(), args, span, &context)?;

        match self.evaluate(&function.body, &context) {
            Ok(value) if function.auto_return => Ok(value),
            Ok(_) | Err(Signal::Break | Signal::Continue) => Ok(Value::null()),
            Err(Signal::Return(value)) => Ok(value),
            Err(error) => Err(error),
        }
    }

    fn call_builtin(
        &mut self,
        builtin: BuiltIn,
        args: Vec<Value>,
        span: &Span,
        caller: &Rc<Context>,
    ) -> EvalResult {
        let symbols = Rc::new(SymbolTable::with_parent(Rc::clone(self.globals())));
        let context = Rc::new(Context::call(builtin.name(), caller, span.clone(), symbols));
        bind_args(builtin.name(), builtin.params(), args, span, &context)?;

        let invocation = Invocation {
            context,
            span: span.clone(),
        };
        Ok(self.execute_builtin(builtin, &invocation)?)
    }
}

/// Checks the argument count and binds each argument under its parameter
/// name in the callee's frame.
fn bind_args<S: AsRef<str>>(
    name: &str,
    params: &[S],
    args: Vec<Value>,
    span: &Span,
    context: &Rc<Context>,
) -> Result<(), Signal> {
    if args.len() > params.len() {
        return Err(runtime_error(
            span,
            format!("{} too many args passed into {name}", args.len() - params.len()),
            context,
        ));
    }
    if args.len() < params.len() {
        return Err(runtime_error(
            span,
            format!("{} too few args passed into {name}", params.len() - args.len()),
            context,
        ));
    }
    for (param, arg) in params.iter().zip(args) {
        context.symbols.set(param.as_ref(), arg.with_context(context));
    }
    Ok(())
}

fn op_failure(error: OpError, whole: &Span, right: &Span, context: &Rc<Context>) -> Signal {
    let span = match error.culprit {
        Culprit::Both => whole,
        Culprit::Right => right,
    };
    runtime_error(span, error.message, context)
}
