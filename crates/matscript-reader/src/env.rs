//! Script variables and the evaluation of `@name = ...` initializers.

use std::collections::HashMap;
use std::fmt;

use matscript_syntax::error::{error_at, ErrorKind, Result};
use matscript_syntax::token::{Token, TokenKind};

use crate::cursor::TokenCursor;
use crate::diagnostics::Diagnostics;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Number(f64),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Number(_) => "number",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Flat variable namespace of one script load.
#[derive(Debug, Clone, Default)]
pub struct Env {
    vars: HashMap<String, Value>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a fresh variable. Returns false (and logs an error) if `name` is taken.
    pub fn define(&mut self, name: &str, value: Value, diag: &mut Diagnostics) -> bool {
        if self.vars.contains_key(name) {
            diag.error(format!("Variable \"{}\" already used in material script", name));
            return false;
        }
        self.vars.insert(name.to_string(), value);
        true
    }

    /// Binds or replaces a variable.
    pub fn set(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Value of a string variable, `""` with a warning if there is none.
    pub fn lookup_string(&self, name: &str, diag: &mut Diagnostics) -> String {
        match self.vars.get(name) {
            Some(Value::Str(s)) => s.clone(),
            found => {
                warn_lookup(name, found, "string", diag);
                String::new()
            }
        }
    }

    /// Value of a number variable, `0.0` with a warning if there is none.
    pub fn lookup_number(&self, name: &str, diag: &mut Diagnostics) -> f64 {
        match self.vars.get(name) {
            Some(Value::Number(n)) => *n,
            found => {
                warn_lookup(name, found, "number", diag);
                0.0
            }
        }
    }

    /// Evaluates the initializer following `=` up to the end of the line.
    ///
    /// The cursor must sit on the `=` with newlines significant. On return it
    /// sits on the terminating newline (or end-of-file).
    ///
    /// A string initializer is a `+` separated list of string literals and
    /// string variables. A number initializer is a single, optionally
    /// negated, literal or variable.
    pub fn evaluate_assignment(&self, cursor: &mut TokenCursor, diag: &mut Diagnostics) -> Result<Value> {
        let mut value: Option<Value> = None;
        loop {
            let tk = cursor.advance(true).clone();
            if ends_line(&tk) {
                break;
            }

            let mut negative = false;
            let term = match &value {
                None if tk.kind == TokenKind::Minus => {
                    negative = true;
                    next_term(cursor)?
                }
                None => tk,
                Some(Value::Number(_)) => {
                    if tk.kind == TokenKind::Plus {
                        return mismatch(&tk, "only strings can be combined with '+'");
                    }
                    return unexpected(&tk);
                }
                Some(Value::Str(_)) => {
                    if tk.kind != TokenKind::Plus {
                        return unexpected(&tk);
                    }
                    let term = next_term(cursor)?;
                    if term.kind == TokenKind::Minus {
                        return mismatch(&term, "strings can not be negative");
                    }
                    term
                }
            };

            let in_string = matches!(value, Some(Value::Str(_)));
            let operand = match term.kind {
                TokenKind::Int | TokenKind::Float => Value::Number(parse_number(&term)?),
                TokenKind::String => Value::Str(term.text.clone()),
                TokenKind::At => {
                    let name = cursor.read_var_name()?;
                    match self.vars.get(&name) {
                        Some(v) => v.clone(),
                        None => {
                            warn_unknown(&name, diag);
                            if in_string {
                                Value::Str(String::new())
                            } else {
                                Value::Number(0.0)
                            }
                        }
                    }
                }
                _ => return unexpected(&term),
            };

            value = Some(match (value.take(), operand) {
                (None, Value::Number(n)) => Value::Number(if negative { -n } else { n }),
                (None, Value::Str(s)) => {
                    if negative {
                        return mismatch(&term, "strings can not be negative");
                    }
                    Value::Str(s)
                }
                (Some(Value::Str(mut acc)), Value::Str(s)) => {
                    acc.push_str(&s);
                    Value::Str(acc)
                }
                (Some(Value::Str(_)), Value::Number(_)) => {
                    return mismatch(&term, "numbers can not be appended to strings");
                }
                // numeric initializers never reach a second term
                (Some(Value::Number(_)), operand) => operand,
            });
        }

        match value {
            Some(v) => Ok(v),
            None => {
                let tk = cursor.current();
                error_at(tk.row, tk.column, ErrorKind::EmptyInitializer)
            }
        }
    }
}

fn warn_unknown(name: &str, diag: &mut Diagnostics) {
    diag.warning(format!("Unknown variable named \"{}\"", name));
}

fn warn_lookup(name: &str, found: Option<&Value>, expected: &str, diag: &mut Diagnostics) {
    match found {
        Some(value) => diag.warning(format!(
            "Variable \"{}\" is a {}, expected a {}",
            name,
            value.type_name(),
            expected
        )),
        None => warn_unknown(name, diag),
    }
}

fn ends_line(tk: &Token) -> bool {
    matches!(tk.kind, TokenKind::Newline | TokenKind::Eof)
}

/// The term after a `+` or leading `-`; the line may not end there.
fn next_term(cursor: &mut TokenCursor) -> Result<Token> {
    let tk = cursor.advance_no_eof(true)?.clone();
    if tk.kind == TokenKind::Newline {
        return unexpected(&tk);
    }
    Ok(tk)
}

pub(crate) fn parse_number(tk: &Token) -> Result<f64> {
    tk.text
        .parse::<f64>()
        .or_else(|_| error_at(tk.row, tk.column, ErrorKind::InvalidNumber(tk.text.clone())))
}

fn unexpected<T>(tk: &Token) -> Result<T> {
    error_at(tk.row, tk.column, ErrorKind::UnexpectedToken(tk.to_string()))
}

fn mismatch<T>(tk: &Token, what: &str) -> Result<T> {
    error_at(tk.row, tk.column, ErrorKind::TypeMismatch(what.to_string()))
}
