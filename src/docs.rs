//! Help texts compiled into the crate, served by `HELP` and `chp docs`.

use crate::host::HelpCategory;

/// Help for one keyword, type or built-in, if there is any.
pub fn help_text(category: HelpCategory, name: &str) -> Option<&'static str> {
    match category {
        HelpCategory::Statements => statement_help(name),
        HelpCategory::Types => type_help(name),
        HelpCategory::Functions => function_help(name),
    }
}

fn statement_help(name: &str) -> Option<&'static str> {
    let text = match name {
        "VAR" => VAR_HELP,
        "AND" => AND_HELP,
        "OR" => OR_HELP,
        "NOT" => NOT_HELP,
        "IF" => IF_HELP,
        "ELIF" => ELIF_HELP,
        "ELSE" => ELSE_HELP,
        "THEN" => THEN_HELP,
        "FOR" => FOR_HELP,
        "WHILE" => WHILE_HELP,
        "STEP" => STEP_HELP,
        "END" => END_HELP,
        "DEF" => DEF_HELP,
        "BREAK" => BREAK_HELP,
        "CONTINUE" => CONTINUE_HELP,
        "RETURN" => RETURN_HELP,
        _ => return None,
    };
    Some(text)
}

fn type_help(name: &str) -> Option<&'static str> {
    match name {
        "Number" => Some(NUMBER_HELP),
        "String" => Some(STRING_HELP),
        "List" => Some(LIST_HELP),
        _ => None,
    }
}

fn function_help(name: &str) -> Option<&'static str> {
    let text = match name {
        "PRINT" => "PRINT(value)\n  Writes the display form of value on its own line.\n  Returns NULL.",
        "INPUT" => {
            "INPUT()\n  Reads one line of input and returns it as a String.\n  \
             Outside interactive mode it returns the String \"INPUT\" instead of reading."
        }
        "INT" => {
            "INT(value)\n  Converts a Number or numeric String to a whole Number,\n  \
             dropping the fractional part.\n  INT(3.9) gives 3, INT(\"-2.5\") gives -2."
        }
        "FLOAT" => "FLOAT(value)\n  Converts a Number or numeric String to a Number.\n  FLOAT(\"2.5\") gives 2.5.",
        "STR" => "STR(value)\n  Returns the display form of value as a String.\n  STR([1, 2]) gives \"[1, 2]\".",
        "CLS" => "CLS()\n  Clears the screen. Returns an empty String.",
        "RUN" => {
            "RUN(fn)\n  Loads the script at path fn and runs it with the current globals.\n  \
             Functions and variables it defines stay available afterwards.\n  Returns NULL."
        }
        "LEN" => "LEN(variable)\n  Number of elements of a List or characters of a String.",
        "HELP" => {
            "HELP(value)\n  Shows help for a function, a type, or a keyword given as a String.\n  \
             HELP(PRINT), HELP(5), HELP(\"FOR\")."
        }
        "DIR" => "DIR()\n  Lists the names of every built-in function.",
        "FACTORIAL" => "FACTORIAL(variable)\n  Factorial of a non-negative whole Number.\n  FACTORIAL(5) gives 120.",
        "LOG" => "LOG(variable, base)\n  Logarithm of variable in the given base.\n  LOG(8, 2) gives 3.",
        "ROUND" => "ROUND(variable)\n  Nearest whole Number. Halves round toward zero: ROUND(2.5) gives 2.",
        "COS" => "COS(variable)\n  Cosine of an angle in radians.",
        "SIN" => "SIN(variable)\n  Sine of an angle in radians.",
        "TAN" => "TAN(variable)\n  Tangent of an angle in radians.",
        "FLOOR" => "FLOOR(variable)\n  Largest whole Number not above variable. FLOOR(-1.5) gives -2.",
        "CEIL" => "CEIL(variable)\n  Smallest whole Number not below variable. CEIL(1.2) gives 2.",
        "RADIANS" => "RADIANS(variable)\n  Converts degrees to radians.",
        "DEGREES" => "DEGREES(variable)\n  Converts radians to degrees.",
        "TRUNC" => {
            "TRUNC(variable, digits)\n  Rounds variable to the given number of decimal places.\n  \
             Halves go to the even neighbour: TRUNC(2.675, 2) gives 2.68, TRUNC(0.125, 2) gives 0.12."
        }
        _ => return None,
    };
    Some(text)
}

const VAR_HELP: &str = "VAR name = expression
  Binds name in the current scope and returns the value.
  The VAR keyword is optional: x = 5 does the same.";

const AND_HELP: &str = "a AND b
  1 when both Numbers are nonzero, else 0. Both sides are always evaluated.";

const OR_HELP: &str = "a OR b
  1 when either Number is nonzero, else 0. Both sides are always evaluated.";

const NOT_HELP: &str = "NOT value
  1 when value is falsy (0, an empty String or an empty List), else 0.";

const IF_HELP: &str = "IF condition THEN expression
IF condition THEN
    statements
END
  Runs the first case whose condition is truthy.
  The inline form has the value of its expression, the block form is NULL.
  Cases chain with ELIF and ELSE.";

const ELIF_HELP: &str = "ELIF condition THEN ...
  Another case of an IF, tried when every case before it failed.";

const ELSE_HELP: &str = "ELSE expression
  The branch of an IF taken when no case matched.";

const THEN_HELP: &str = "THEN
  Separates a header from its body in IF, FOR, WHILE and DEF.
  ':' is the same keyword.";

const FOR_HELP: &str = "FOR i = start THEN end THEN body
FOR i = start THEN end THEN STEP step THEN body
  Counts i from start towards end (exclusive), adding step (default 1).
  The inline form collects the body values into a List, the block form is NULL.
  FOR i = 0 THEN 5 THEN i gives [0, 1, 2, 3, 4].";

const WHILE_HELP: &str = "WHILE condition THEN body
  Runs body as long as condition is truthy.
  The inline form collects the body values into a List, the block form is NULL.";

const STEP_HELP: &str = "STEP
  Sets the increment of a FOR loop: FOR i = 10 THEN 0 THEN STEP -2 THEN i.";

const END_HELP: &str = "END
  Closes a block started by a newline after THEN. '<-' is the same keyword.";

const DEF_HELP: &str = "DEF name(a, b) THEN expression
DEF name(a, b) THEN
    statements
END
  Defines a function. The inline form returns its expression,
  the block form returns what RETURN gives, or NULL.
  The name is optional: DEF (x) THEN x * 2 is an anonymous function.";

const BREAK_HELP: &str = "BREAK
  Leaves the innermost FOR or WHILE loop.";

const CONTINUE_HELP: &str = "CONTINUE
  Skips to the next iteration of the innermost loop.";

const RETURN_HELP: &str = "RETURN value
RETURN
  Leaves the current function with value, or NULL when there is none.";

const NUMBER_HELP: &str = "Number
  Integers and decimals share one type: 5, 2.5, .5
  Operators: + - * / ^ MOD (or %) and the root a # b, the a-th root of b.
  Comparisons give 1 or 0. TRUE is 1, FALSE and NULL are 0.";

const STRING_HELP: &str = "String
  Text in single or double quotes, taken literally.
  \"ab\" + \"cd\" concatenates, \"ab\" * 3 repeats, \"abc\" / 0 gives \"a\".
  Negative indexes count from the end.";

const LIST_HELP: &str = "List
  [1, \"two\", [3]]
  list + value appends, list + list extends, list * n repeats,
  list - i removes element i, list / i gives element i.";
