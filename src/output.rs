//! Display and JSON output for CHP values.
//!
//! The display form is what `PRINT` and `STR` produce: integral numbers
//! without a fractional part, strings raw at the top level and quoted inside
//! lists, and functions as `<function name>`.
//!
//! JSON output goes through `serde_json`; functions become their display
//! string and non-finite numbers become `null`.
//!
//! # Examples
//!
//! ```
//! use chp_lang::Value;
//! use chp_lang::output::{to_json, to_json_pretty};
//!
//! let value = Value::list(vec![Value::number(1.0), Value::string("a")]);
//!
//! assert_eq!(value.to_string(), "[1, \"a\"]");
//! assert_eq!(to_json(&value), "[1,\"a\"]");
//! assert_eq!(to_json_pretty(&Value::number(2.5)), "2.5");
//! ```

use std::fmt;

use serde_json::Number;

use crate::value::{Value, ValueKind};

/// Largest magnitude printed as an integer.
const INTEGRAL_LIMIT: f64 = 1e16;

/// Formats a number the way scripts see it: `3` rather than `3.0`.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < INTEGRAL_LIMIT {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, nested: bool) -> fmt::Result {
    match &value.kind {
        ValueKind::Number(n) => f.write_str(&format_number(*n)),
        ValueKind::String(s) if nested => write!(f, "\"{s}\""),
        ValueKind::String(s) => f.write_str(s),
        ValueKind::List(elements) => {
            f.write_str("[")?;
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, element, true)?;
            }
            f.write_str("]")
        }
        ValueKind::Function(function) => write!(f, "<function {}>", function.display_name()),
        ValueKind::BuiltIn(builtin) => write!(f, "<built-in function {}>", builtin.name()),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, false)
    }
}

/// Converts a value into a `serde_json` tree.
pub fn to_json_value(value: &Value) -> serde_json::Value {
    match &value.kind {
        ValueKind::Number(n) => {
            if n.is_finite() && n.fract() == 0.0 && n.abs() < INTEGRAL_LIMIT {
                serde_json::Value::from(*n as i64)
            } else {
                Number::from_f64(*n).map_or(serde_json::Value::Null, serde_json::Value::Number)
            }
        }
        ValueKind::String(s) => serde_json::Value::String(s.clone()),
        ValueKind::List(elements) => {
            serde_json::Value::Array(elements.iter().map(to_json_value).collect())
        }
        ValueKind::Function(_) | ValueKind::BuiltIn(_) => serde_json::Value::String(value.to_string()),
    }
}

/// Converts a Value to compact JSON string representation.
pub fn to_json(value: &Value) -> String {
    to_json_value(value).to_string()
}

/// Converts a Value to JSON with 2-space indentation.
pub fn to_json_pretty(value: &Value) -> String {
    let json = to_json_value(value);
    serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_drop_the_fraction() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn nested_strings_are_quoted() {
        let value = Value::list(vec![
            Value::string("a"),
            Value::list(vec![Value::string("b")]),
        ]);
        assert_eq!(value.to_string(), "[\"a\", [\"b\"]]");
        assert_eq!(Value::string("a").to_string(), "a");
    }

    #[test]
    fn json_keeps_integers_integral() {
        let value = Value::list(vec![Value::number(1.0), Value::number(0.5)]);
        assert_eq!(to_json(&value), "[1,0.5]");
        assert_eq!(to_json_pretty(&value), "[\n  1,\n  0.5\n]");
    }
}
