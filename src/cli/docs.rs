//! Documentation content for the chp CLI

use super::CliError;
use crate::docs::help_text;
use crate::host::HelpCategory;

/// Get the docs overview (topic listing)
pub fn get_docs_overview() -> &'static str {
    r#"CHP DOCUMENTATION

CHP is a small scripting language. Everything is an expression: IF, FOR,
WHILE and DEF all produce values, and a program evaluates to the list of its
statement values. Statements are separated by newlines or ';'.

STATEMENTS

  VAR  AND  OR  NOT  IF  ELIF  ELSE  THEN
  FOR  WHILE  STEP  END  DEF  BREAK  CONTINUE  RETURN

TYPES

  Number  String  List

BUILT-IN FUNCTIONS

  PRINT  INPUT  INT  FLOAT  STR  CLS  RUN  LEN  HELP  DIR  FACTORIAL
  LOG  ROUND  COS  SIN  TAN  FLOOR  CEIL  RADIANS  DEGREES  TRUNC

CONSTANTS

  NULL = 0   TRUE = 1   FALSE = 0   e = 2.71828   pi = 3.14159

QUICK REFERENCE

  VAR x = 5                     Assignment (VAR is optional)
  IF x > 3 THEN "big"           Inline form: the value of the branch
  IF x > 3 THEN                 Block form: NULL, closed by END
      PRINT("big")
  END
  FOR i = 0 THEN 5 THEN i       [0, 1, 2, 3, 4]
  DEF add(a, b) THEN a + b      Inline functions return their expression
  2 # 9                         Square root of 9
  @ comment @                   Comments run between '@'s or to the line end
  :  <-  ;                      Short forms of THEN, END and a newline

Run 'chp docs <TOPIC>' for any keyword, type or built-in above.
"#
}

/// Get the documentation for a keyword, type or built-in function
pub fn get_doc_topic(name: &str) -> Result<&'static str, CliError> {
    let upper = name.to_uppercase();
    let type_name = match name.to_lowercase().as_str() {
        "number" => "Number",
        "string" => "String",
        "list" => "List",
        _ => "",
    };

    help_text(HelpCategory::Statements, &upper)
        .or_else(|| help_text(HelpCategory::Types, type_name))
        .or_else(|| help_text(HelpCategory::Functions, &upper))
        .ok_or_else(|| CliError::UnknownTopic(name.to_string()))
}
