//! Native functions bound in the global scope.
//!
//! Each call gets its own [`Context`] whose table holds the arguments under
//! the parameter names from [`BuiltIn::params`]; the implementations read
//! them back by name.

use std::rc::Rc;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::ast::Keyword;
use crate::context::Context;
use crate::engine::Engine;
use crate::error::Error;
use crate::host::{HelpCategory, Host};
use crate::position::Span;
use crate::value::{Value, ValueKind};

/// Strings accepted by `INT` and `FLOAT`.
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?\s*$").expect("numeric pattern is valid")
});

const RULE_WIDTH: usize = 50;
const DIR_COLUMNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltIn {
    Print,
    Input,
    Int,
    Float,
    Str,
    Cls,
    Run,
    Len,
    Help,
    Factorial,
    Log,
    Round,
    Cos,
    Sin,
    Tan,
    Floor,
    Ceil,
    Radians,
    Degrees,
    Trunc,
    Dir,
}

impl BuiltIn {
    pub const ALL: [BuiltIn; 21] = [
        BuiltIn::Print,
        BuiltIn::Input,
        BuiltIn::Int,
        BuiltIn::Float,
        BuiltIn::Str,
        BuiltIn::Cls,
        BuiltIn::Run,
        BuiltIn::Len,
        BuiltIn::Help,
        BuiltIn::Factorial,
        BuiltIn::Log,
        BuiltIn::Round,
        BuiltIn::Cos,
        BuiltIn::Sin,
        BuiltIn::Tan,
        BuiltIn::Floor,
        BuiltIn::Ceil,
        BuiltIn::Radians,
        BuiltIn::Degrees,
        BuiltIn::Trunc,
        BuiltIn::Dir,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltIn::Print => "PRINT",
            BuiltIn::Input => "INPUT",
            BuiltIn::Int => "INT",
            BuiltIn::Float => "FLOAT",
            BuiltIn::Str => "STR",
            BuiltIn::Cls => "CLS",
            BuiltIn::Run => "RUN",
            BuiltIn::Len => "LEN",
            BuiltIn::Help => "HELP",
            BuiltIn::Factorial => "FACTORIAL",
            BuiltIn::Log => "LOG",
            BuiltIn::Round => "ROUND",
            BuiltIn::Cos => "COS",
            BuiltIn::Sin => "SIN",
            BuiltIn::Tan => "TAN",
            BuiltIn::Floor => "FLOOR",
            BuiltIn::Ceil => "CEIL",
            BuiltIn::Radians => "RADIANS",
            BuiltIn::Degrees => "DEGREES",
            BuiltIn::Trunc => "TRUNC",
            BuiltIn::Dir => "DIR",
        }
    }

    pub fn from_name(name: &str) -> Option<BuiltIn> {
        BuiltIn::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Parameter names, in call order.
    pub fn params(self) -> &'static [&'static str] {
        match self {
            BuiltIn::Print | BuiltIn::Int | BuiltIn::Float | BuiltIn::Str | BuiltIn::Help => {
                &["value"]
            }
            BuiltIn::Input | BuiltIn::Cls | BuiltIn::Dir => &[],
            BuiltIn::Run => &["fn"],
            BuiltIn::Log => &["variable", "base"],
            BuiltIn::Trunc => &["variable", "digits"],
            BuiltIn::Len
            | BuiltIn::Factorial
            | BuiltIn::Round
            | BuiltIn::Cos
            | BuiltIn::Sin
            | BuiltIn::Tan
            | BuiltIn::Floor
            | BuiltIn::Ceil
            | BuiltIn::Radians
            | BuiltIn::Degrees => &["variable"],
        }
    }
}

/// A running built-in: its frame and the span of the call.
pub(crate) struct Invocation {
    pub context: Rc<Context>,
    pub span: Span,
}

impl Invocation {
    fn arg(&self, name: &str) -> Result<Value, Error> {
        self.context
            .symbols
            .get(name)
            .ok_or_else(|| self.error(format!("'{name}' is not defined")))
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::runtime(self.span.clone(), message, Some(Rc::clone(&self.context)))
    }

    /// Error pointing at the argument when it knows where it came from.
    fn arg_error(&self, arg: &Value, message: impl Into<String>) -> Error {
        let span = arg.span().cloned().unwrap_or_else(|| self.span.clone());
        Error::runtime(span, message, Some(Rc::clone(&self.context)))
    }

    fn number(&self, name: &str, message: &str) -> Result<f64, Error> {
        let value = self.arg(name)?;
        value.as_number().ok_or_else(|| self.arg_error(&value, message))
    }

    fn variable(&self) -> Result<f64, Error> {
        self.number("variable", "Variable must be a Number")
    }
}

fn to_decimal(n: f64) -> Option<Decimal> {
    Decimal::from_f64(n)
}

impl<H: Host> Engine<H> {
    pub(crate) fn execute_builtin(&mut self, builtin: BuiltIn, call: &Invocation) -> Result<Value, Error> {
        match builtin {
            BuiltIn::Print => {
                let value = call.arg("value")?;
                self.write(call, &value.to_string())?;
                Ok(Value::null())
            }
            BuiltIn::Input => self.builtin_input(call),
            BuiltIn::Int => {
                let value = call.arg("value")?;
                let n = self.to_number(call, &value, "Cannot convert to INT")?;
                Ok(Value::number(n.trunc()))
            }
            BuiltIn::Float => {
                let value = call.arg("value")?;
                let n = self.to_number(call, &value, "Cannot convert to FLOAT")?;
                Ok(Value::number(n))
            }
            BuiltIn::Str => Ok(Value::string(call.arg("value")?.to_string())),
            BuiltIn::Cls => {
                self.host_mut()
                    .clear_screen()
                    .map_err(|e| call.error(format!("Failed to clear the screen: {e}")))?;
                Ok(Value::string(""))
            }
            BuiltIn::Run => self.builtin_run(call),
            BuiltIn::Len => {
                let variable = call.arg("variable")?;
                let len = match &variable.kind {
                    ValueKind::List(elements) => elements.len(),
                    ValueKind::String(s) => s.chars().count(),
                    _ => return Err(call.arg_error(&variable, "Argument must be a List or String")),
                };
                Ok(Value::number(len as f64))
            }
            BuiltIn::Help => self.builtin_help(call),
            BuiltIn::Dir => self.builtin_dir(call),
            BuiltIn::Factorial => {
                let variable = call.arg("variable")?;
                let n = call.variable()?;
                if n < 0.0 || n.fract() != 0.0 {
                    return Err(call.arg_error(&variable, "Variable must be a non-negative whole Number"));
                }
                let mut product: f64 = 1.0;
                let mut k = 2.0;
                while k <= n && product.is_finite() {
                    product *= k;
                    k += 1.0;
                }
                Ok(Value::number(product))
            }
            BuiltIn::Log => {
                let variable = call.variable()?;
                let base = call.number("base", "Base argument must be a Number")?;
                if variable <= 0.0 || base <= 0.0 || base == 1.0 {
                    return Err(call.error("Math domain error"));
                }
                Ok(Value::number(variable.ln() / base.ln()))
            }
            BuiltIn::Round => {
                let n = call.variable()?;
                let rounded = to_decimal(n)
                    .map(|d| d.round_dp_with_strategy(0, RoundingStrategy::MidpointTowardZero))
                    .and_then(|d| d.to_f64())
                    .unwrap_or_else(|| n.round());
                Ok(Value::number(rounded))
            }
            BuiltIn::Cos => Ok(Value::number(call.variable()?.cos())),
            BuiltIn::Sin => Ok(Value::number(call.variable()?.sin())),
            BuiltIn::Tan => Ok(Value::number(call.variable()?.tan())),
            BuiltIn::Floor => Ok(Value::number(call.variable()?.floor())),
            BuiltIn::Ceil => Ok(Value::number(call.variable()?.ceil())),
            BuiltIn::Radians => Ok(Value::number(call.variable()?.to_radians())),
            BuiltIn::Degrees => Ok(Value::number(call.variable()?.to_degrees())),
            BuiltIn::Trunc => {
                let n = call.variable()?;
                let digits_value = call.arg("digits")?;
                let digits = call.number("digits", "Number of digits must be a Number")?;
                if digits < 0.0 || digits.fract() != 0.0 {
                    return Err(call.arg_error(
                        &digits_value,
                        "Number of digits must be a non-negative whole Number",
                    ));
                }
                let rounded = to_decimal(n)
                    .map(|d| d.round_dp_with_strategy(digits as u32, RoundingStrategy::MidpointNearestEven))
                    .and_then(|d| d.to_f64())
                    .unwrap_or(n);
                Ok(Value::number(rounded))
            }
        }
    }

    fn write(&mut self, call: &Invocation, text: &str) -> Result<(), Error> {
        self.host_mut()
            .write_line(text)
            .map_err(|e| call.error(format!("Failed to write output: {e}")))
    }

    fn to_number(&self, call: &Invocation, value: &Value, message: &str) -> Result<f64, Error> {
        match &value.kind {
            ValueKind::Number(n) => Ok(*n),
            ValueKind::String(s) if NUMERIC.is_match(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| call.arg_error(value, message)),
            _ => Err(call.arg_error(value, message)),
        }
    }

    fn builtin_input(&mut self, call: &Invocation) -> Result<Value, Error> {
        if !self.options().interactive {
            self.input_requested = true;
            return Ok(Value::string("INPUT"));
        }
        let line = self
            .host_mut()
            .read_line()
            .map_err(|e| call.error(format!("Failed to read input: {e}")))?;
        Ok(Value::string(line))
    }

    fn builtin_run(&mut self, call: &Invocation) -> Result<Value, Error> {
        let path_value = call.arg("fn")?;
        let Some(path) = path_value.as_str().map(str::to_string) else {
            return Err(call.arg_error(&path_value, "Argument must be a String"));
        };

        let text = self
            .host_mut()
            .load_script(&path)
            .map_err(|e| call.error(format!("Failed to load script \"{path}\"\n{e}")))?;

        let depth = call.context.depth() + 1;
        if depth > self.options().max_call_depth {
            return Err(call.error("Maximum call depth exceeded"));
        }

        debug!("running sub-script {path}");
        if let Err(inner) = self.run_at_depth(&path, &text, depth) {
            debug!("sub-script {path} failed: {inner}");
            return Err(call.error(format!(
                "Failed to finish script \"{path}\"\n{}",
                inner.render()
            )));
        }
        Ok(Value::null())
    }

    fn builtin_help(&mut self, call: &Invocation) -> Result<Value, Error> {
        let value = call.arg("value")?;

        let lines = match &value.kind {
            ValueKind::Function(function) => {
                let name = function.display_name();
                let rule = "_".repeat(RULE_WIDTH);
                vec![
                    rule.clone(),
                    format!("HELP: FUNCTION '{name}'"),
                    format!("FUNCTION {name} takes [{}] as arguments", function.params.join(", ")),
                    format!("FUNCTION {name} returns {}", function.body),
                    rule,
                ]
            }
            kind => {
                let (category, name) = match kind {
                    ValueKind::String(s) if Keyword::from_word(s).is_some() => {
                        (HelpCategory::Statements, s.clone())
                    }
                    ValueKind::BuiltIn(builtin) => (HelpCategory::Functions, builtin.name().to_string()),
                    _ => (HelpCategory::Types, value.type_name().to_string()),
                };
                self.host_mut()
                    .load_help_text(category, &name)
                    .map_err(|_| call.arg_error(&value, format!("No help available for '{name}'")))?
            }
        };

        if self.options().interactive {
            for line in &lines {
                self.write(call, line)?;
            }
            return Ok(Value::string(""));
        }
        Ok(Value::string(lines.join("\n")))
    }

    fn builtin_dir(&mut self, call: &Invocation) -> Result<Value, Error> {
        let names: Vec<&str> = BuiltIn::ALL.iter().map(|b| b.name()).collect();

        if !self.options().interactive {
            return Ok(Value::list(names.into_iter().map(Value::string).collect()));
        }

        let width = names.iter().map(|n| n.len()).max().unwrap_or(0) + 2;
        for row in names.chunks(DIR_COLUMNS) {
            let line: String = row.iter().map(|name| format!("{name:<width$}")).collect();
            self.write(call, line.trim_end())?;
        }
        Ok(Value::string(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for builtin in BuiltIn::ALL {
            assert_eq!(BuiltIn::from_name(builtin.name()), Some(builtin));
        }
        assert_eq!(BuiltIn::from_name("print"), None);
    }

    #[test]
    fn numeric_strings() {
        for ok in ["1", " -2.5 ", ".5", "3.", "1e3"] {
            assert!(NUMERIC.is_match(ok), "{ok}");
        }
        for bad in ["", "abc", "1.2.3", "--1"] {
            assert!(!NUMERIC.is_match(bad), "{bad}");
        }
    }
}
